use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TrialWindowUnit {
    Days,
    Minutes,
}

impl TrialWindowUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrialWindowUnit::Days => "days",
            TrialWindowUnit::Minutes => "minutes",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "days" => Some(TrialWindowUnit::Days),
            "minutes" => Some(TrialWindowUnit::Minutes),
            _ => None,
        }
    }
}

impl Display for TrialWindowUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
