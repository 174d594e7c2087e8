//! Step-type catalog.
//!
//! Every step carries a free-form step-type code. Both the normalized backend
//! codes (`st-cons`, `st-lab`, ...) and the older descriptive codes
//! (`consultation`, `laboratory`, ...) are accepted. Codes that match nothing
//! resolve to [`StepType::Other`], which has its own neutral style.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, EnumString, IntoEnumIterator};

/// Category of a clinical step.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash, AsRefStr, EnumString, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(ascii_case_insensitive)]
pub enum StepType {
    #[strum(to_string = "consultation", serialize = "st-cons")]
    Consultation,
    #[strum(to_string = "laboratory", serialize = "st-lab")]
    Laboratory,
    #[strum(to_string = "imaging", serialize = "st-img")]
    Imaging,
    #[strum(to_string = "diagnosis", serialize = "st-dx")]
    Diagnosis,
    #[strum(to_string = "treatment", serialize = "st-rx", serialize = "prescription")]
    Treatment,
    #[strum(to_string = "referral", serialize = "st-ref")]
    Referral,
    #[strum(to_string = "follow_up", serialize = "st-fu", serialize = "follow-up", serialize = "followup")]
    FollowUp,
    #[strum(to_string = "procedure", serialize = "st-proc")]
    Procedure,
    #[strum(to_string = "emergency", serialize = "st-emergency")]
    Emergency,
    #[strum(to_string = "discharge", serialize = "st-discharge")]
    Discharge,
    #[default]
    #[strum(to_string = "other")]
    Other,
}

/// Display attributes of a step type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepTypeStyle {
    /// Material icon name.
    pub icon: &'static str,
    /// Hex color used for borders and cost badges.
    pub color: &'static str,
    pub label: &'static str,
}

const FALLBACK_STYLE: StepTypeStyle = StepTypeStyle {
    icon: "help",
    color: "#757575",
    label: "Other",
};

impl StepType {
    /// Resolves a step-type code, falling back to [`StepType::Other`].
    pub fn from_code(code: &str) -> Self {
        code.trim().parse().unwrap_or(StepType::Other)
    }

    pub fn style(&self) -> StepTypeStyle {
        match self {
            StepType::Consultation => StepTypeStyle {
                icon: "medical_services",
                color: "#2196F3",
                label: "Consultation",
            },
            StepType::Laboratory => StepTypeStyle {
                icon: "science",
                color: "#4CAF50",
                label: "Laboratory",
            },
            StepType::Imaging => StepTypeStyle {
                icon: "camera_alt",
                color: "#FF9800",
                label: "Imaging",
            },
            StepType::Diagnosis => StepTypeStyle {
                icon: "psychology",
                color: "#9C27B0",
                label: "Diagnosis",
            },
            StepType::Treatment => StepTypeStyle {
                icon: "medication",
                color: "#F44336",
                label: "Treatment",
            },
            StepType::Referral => StepTypeStyle {
                icon: "arrow_forward",
                color: "#607D8B",
                label: "Referral",
            },
            StepType::FollowUp => StepTypeStyle {
                icon: "schedule",
                color: "#795548",
                label: "Follow-up",
            },
            StepType::Procedure => StepTypeStyle {
                icon: "medical_information",
                color: "#3F51B5",
                label: "Procedure",
            },
            StepType::Emergency => StepTypeStyle {
                icon: "emergency",
                color: "#E91E63",
                label: "Emergency",
            },
            StepType::Discharge => StepTypeStyle {
                icon: "exit_to_app",
                color: "#009688",
                label: "Discharge",
            },
            StepType::Other => FALLBACK_STYLE,
        }
    }

    /// All known step types, excluding the fallback.
    pub fn known() -> impl Iterator<Item = StepType> {
        StepType::iter().filter(|t| *t != StepType::Other)
    }
}
