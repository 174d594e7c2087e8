//! Display formatting for durations and costs.

/// Formats a duration in minutes, e.g. `45 min`, `2h`, `1h 30min`.
///
/// Fractional minutes are rounded; negative or non-finite input reads as zero.
pub fn format_duration(minutes: f64) -> String {
    let minutes = if minutes.is_finite() && minutes > 0.0 { minutes.round() as u64 } else { 0 };
    if minutes < 60 {
        return format!("{} min", minutes);
    }
    let hours = minutes / 60;
    let remaining = minutes % 60;
    if remaining > 0 { format!("{}h {}min", hours, remaining) } else { format!("{}h", hours) }
}

/// Formats an amount in Colombian-peso style: whole units, `.` as the
/// thousands separator, e.g. `$ 1.250.000`.
pub fn format_cost(amount: f64) -> String {
    let amount = if amount.is_finite() { amount.round() } else { 0.0 };
    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{}$ {}", sign, group_thousands(amount.abs() as u64))
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}
