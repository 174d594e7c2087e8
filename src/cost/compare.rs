use std::{collections::HashSet, fmt};

use itertools::Itertools;
use serde::Serialize;
use strum::AsRefStr;

use crate::{
    FlowModel,
    cost::FlowCostSummary,
    format::{format_cost, format_duration},
};

/// What changed between an ideal flow and the one actually followed.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct FlowDifferences {
    /// labels present in the real flow only
    pub added_steps: Vec<String>,
    /// labels present in the ideal flow only
    pub removed_steps: Vec<String>,
    /// real minus ideal, in minutes
    pub duration_difference: f64,
    /// real minus ideal
    pub cost_difference: f64,
    /// 0 when durations match, up to 100
    pub efficiency_gap: f64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Recommendation {
    RemoveExtraSteps { steps: Vec<String> },
    AddMissingSteps { steps: Vec<String> },
    ReduceDuration { minutes: f64 },
    ReduceCost { amount: f64 },
    CloseEfficiencyGap { gap: f64 },
    OnTrack,
}

impl fmt::Display for Recommendation {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Recommendation::RemoveExtraSteps { steps } => write!(f, "Review {} step(s) not in the ideal flow: {}", steps.len(), steps.join(", ")),
            Recommendation::AddMissingSteps { steps } => write!(f, "Add {} missing step(s) from the ideal flow: {}", steps.len(), steps.join(", ")),
            Recommendation::ReduceDuration { minutes } => write!(f, "Reduce total duration by {}", format_duration(*minutes)),
            Recommendation::ReduceCost { amount } => write!(f, "Reduce total cost by {}", format_cost(*amount)),
            Recommendation::CloseEfficiencyGap { gap } => write!(f, "Efficiency gap of {:.1}% needs attention", gap),
            Recommendation::OnTrack => write!(f, "Flow follows the ideal pathway"),
        }
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EfficiencyRating {
    Excellent,
    Good,
    Fair,
    NeedsImprovement,
}

impl EfficiencyRating {
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            EfficiencyRating::Excellent
        } else if score >= 70.0 {
            EfficiencyRating::Good
        } else if score >= 50.0 {
            EfficiencyRating::Fair
        } else {
            EfficiencyRating::NeedsImprovement
        }
    }
}

/// Comparison of an ideal flow against a real one.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct FlowComparison {
    pub ideal: FlowCostSummary,
    pub real: FlowCostSummary,
    pub differences: FlowDifferences,
    pub recommendations: Vec<Recommendation>,
}

const GAP_THRESHOLD: f64 = 20.0;

fn labels(flow: &FlowModel) -> Vec<String> {
    flow.sorted_steps().into_iter().map(|s| s.label.trim().to_string()).filter(|l| !l.is_empty()).unique().collect()
}

impl FlowComparison {
    pub fn compare(
        ideal: &FlowModel,
        real: &FlowModel,
    ) -> Self {
        let ideal_labels = labels(ideal);
        let real_labels = labels(real);
        let ideal_set: HashSet<&String> = ideal_labels.iter().collect();
        let real_set: HashSet<&String> = real_labels.iter().collect();

        let added_steps: Vec<String> = real_labels.iter().filter(|l| !ideal_set.contains(l)).cloned().collect();
        let removed_steps: Vec<String> = ideal_labels.iter().filter(|l| !real_set.contains(l)).cloned().collect();

        let ideal_duration = ideal.effective_duration();
        let duration_difference = real.effective_duration() - ideal_duration;
        let cost_difference = real.effective_cost() - ideal.effective_cost();

        let base = if ideal_duration > 0.0 { ideal_duration } else { 1.0 };
        let efficiency_gap = 100.0 - (100.0 - duration_difference.abs() / base * 10.0).max(0.0);

        let mut recommendations = Vec::new();
        if !added_steps.is_empty() {
            recommendations.push(Recommendation::RemoveExtraSteps { steps: added_steps.clone() });
        }
        if !removed_steps.is_empty() {
            recommendations.push(Recommendation::AddMissingSteps { steps: removed_steps.clone() });
        }
        if duration_difference > 0.0 {
            recommendations.push(Recommendation::ReduceDuration { minutes: duration_difference });
        }
        if cost_difference > 0.0 {
            recommendations.push(Recommendation::ReduceCost { amount: cost_difference });
        }
        if efficiency_gap > GAP_THRESHOLD {
            recommendations.push(Recommendation::CloseEfficiencyGap { gap: efficiency_gap });
        }
        if recommendations.is_empty() {
            recommendations.push(Recommendation::OnTrack);
        }

        Self {
            ideal: FlowCostSummary::from_flow(ideal),
            real: FlowCostSummary::from_flow(real),
            differences: FlowDifferences {
                added_steps,
                removed_steps,
                duration_difference,
                cost_difference,
                efficiency_gap,
            },
            recommendations,
        }
    }

    pub fn efficiency(&self) -> f64 {
        100.0 - self.differences.efficiency_gap
    }

    pub fn rating(&self) -> EfficiencyRating {
        EfficiencyRating::from_score(self.efficiency())
    }

    pub fn is_on_track(&self) -> bool {
        self.recommendations == [Recommendation::OnTrack]
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::StepModel;

    fn flow(
        id: &str,
        steps: &[(&str, f64, f64)],
    ) -> FlowModel {
        steps.iter().enumerate().fold(FlowModel::new(id, id), |flow, (i, (label, duration, cost))| {
            let mut step = StepModel::new(format!("{}-{}", id, i), "st-cons", *label);
            step.order_index = Some(i as i64);
            step.duration_minutes = Some(*duration);
            step.cost_avg = Some(*cost);
            flow.with_step(step)
        })
    }

    #[test]
    fn test_identical_flows_are_on_track() {
        let ideal = flow("ideal", &[("Triage", 10.0, 25.0), ("Consult", 30.0, 100.0)]);
        let real = flow("real", &[("Triage", 10.0, 25.0), ("Consult", 30.0, 100.0)]);
        let cmp = FlowComparison::compare(&ideal, &real);

        assert!(cmp.differences.added_steps.is_empty());
        assert!(cmp.differences.removed_steps.is_empty());
        assert_eq!(cmp.differences.efficiency_gap, 0.0);
        assert_eq!(cmp.efficiency(), 100.0);
        assert_eq!(cmp.rating(), EfficiencyRating::Excellent);
        assert!(cmp.is_on_track());
    }

    #[test]
    fn test_step_differences_and_recommendations() {
        let ideal = flow("ideal", &[("Triage", 10.0, 25.0), ("ECG", 10.0, 30.0), ("Consult", 45.0, 200.0)]);
        let real = flow("real", &[("Triage", 18.0, 45.0), ("Consult", 50.0, 220.0), ("X-ray", 20.0, 60.0)]);
        let cmp = FlowComparison::compare(&ideal, &real);

        assert_eq!(cmp.differences.added_steps, vec!["X-ray"]);
        assert_eq!(cmp.differences.removed_steps, vec!["ECG"]);
        assert_eq!(cmp.differences.duration_difference, 23.0);
        assert_eq!(cmp.differences.cost_difference, 70.0);
        // 23 / 65 * 10 = 3.538...
        assert!((cmp.differences.efficiency_gap - 3.5384615).abs() < 1e-6);
        assert_eq!(
            cmp.recommendations,
            vec![
                Recommendation::RemoveExtraSteps { steps: vec!["X-ray".to_string()] },
                Recommendation::AddMissingSteps { steps: vec!["ECG".to_string()] },
                Recommendation::ReduceDuration { minutes: 23.0 },
                Recommendation::ReduceCost { amount: 70.0 },
            ]
        );
        assert_eq!(cmp.ideal.step_count, 3);
        assert_eq!(cmp.real.total_cost_avg, 325.0);
    }

    #[test]
    fn test_large_duration_gap() {
        let ideal = flow("ideal", &[("Consult", 10.0, 0.0)]);
        let real = flow("real", &[("Consult", 40.0, 0.0)]);
        let cmp = FlowComparison::compare(&ideal, &real);

        // 30 / 10 * 10 = 30
        assert_eq!(cmp.differences.efficiency_gap, 30.0);
        assert_eq!(cmp.efficiency(), 70.0);
        assert_eq!(cmp.rating(), EfficiencyRating::Good);
        assert!(cmp.recommendations.contains(&Recommendation::CloseEfficiencyGap { gap: 30.0 }));
    }

    #[test]
    fn test_faster_and_cheaper_is_on_track() {
        let ideal = flow("ideal", &[("Consult", 100.0, 500.0)]);
        let real = flow("real", &[("Consult", 90.0, 400.0)]);
        let cmp = FlowComparison::compare(&ideal, &real);
        assert_eq!(cmp.differences.duration_difference, -10.0);
        assert_eq!(cmp.differences.efficiency_gap, 1.0);
        assert!(cmp.is_on_track());
    }

    #[test]
    fn test_ideal_without_duration_uses_unit_base() {
        let ideal = flow("ideal", &[]);
        let real = flow("real", &[("Consult", 5.0, 0.0)]);
        let cmp = FlowComparison::compare(&ideal, &real);
        assert_eq!(cmp.differences.efficiency_gap, 50.0);
        assert_eq!(cmp.rating(), EfficiencyRating::Fair);
    }

    #[test]
    fn test_gap_is_capped() {
        let ideal = flow("ideal", &[("Consult", 1.0, 0.0)]);
        let real = flow("real", &[("Consult", 500.0, 0.0)]);
        let cmp = FlowComparison::compare(&ideal, &real);
        assert_eq!(cmp.differences.efficiency_gap, 100.0);
        assert_eq!(cmp.efficiency(), 0.0);
        assert_eq!(cmp.rating(), EfficiencyRating::NeedsImprovement);
    }

    #[rstest]
    #[case(100.0, EfficiencyRating::Excellent)]
    #[case(90.0, EfficiencyRating::Excellent)]
    #[case(89.9, EfficiencyRating::Good)]
    #[case(70.0, EfficiencyRating::Good)]
    #[case(50.0, EfficiencyRating::Fair)]
    #[case(49.9, EfficiencyRating::NeedsImprovement)]
    fn test_rating_thresholds(
        #[case] score: f64,
        #[case] expected: EfficiencyRating,
    ) {
        assert_eq!(EfficiencyRating::from_score(score), expected);
    }

    #[test]
    fn test_recommendation_messages() {
        assert_eq!(Recommendation::ReduceDuration { minutes: 90.0 }.to_string(), "Reduce total duration by 1h 30min");
        assert_eq!(Recommendation::ReduceCost { amount: 45000.0 }.to_string(), "Reduce total cost by $ 45.000");
        assert_eq!(
            Recommendation::AddMissingSteps {
                steps: vec!["ECG".to_string(), "Labs".to_string()]
            }
            .to_string(),
            "Add 2 missing step(s) from the ideal flow: ECG, Labs"
        );
    }
}
