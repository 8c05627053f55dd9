use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    Monthly,
    Yearly,
}

impl Plan {
    pub fn as_str(&self) -> &'static str {
        match self {
            Plan::Monthly => "monthly",
            Plan::Yearly => "yearly",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "monthly" => Some(Plan::Monthly),
            "yearly" => Some(Plan::Yearly),
            _ => None,
        }
    }

    /// USD price in minor units, matching the public pricing page.
    pub fn price_minor(&self) -> i32 {
        match self {
            Plan::Monthly => 500,
            Plan::Yearly => 3900,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Plan::Monthly => "Pro Monthly Subscription",
            Plan::Yearly => "Pro Yearly Subscription",
        }
    }
}

impl Display for Plan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
