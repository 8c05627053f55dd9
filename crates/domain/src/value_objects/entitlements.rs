use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::value_objects::enums::trial_window_units::TrialWindowUnit;

/// Length of the free trial in a given unit. Minutes exist only for the
/// accelerated test configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialWindow {
    pub length: i64,
    pub unit: TrialWindowUnit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrialWindowStatus {
    pub left: i64,
    pub expired: bool,
}

impl TrialWindow {
    pub const DEFAULT_LENGTH_DAYS: i64 = 5;
    pub const ACCELERATED_LENGTH_MINUTES: i64 = 15;

    pub fn standard() -> Self {
        Self {
            length: Self::DEFAULT_LENGTH_DAYS,
            unit: TrialWindowUnit::Days,
        }
    }

    pub fn accelerated() -> Self {
        Self {
            length: Self::ACCELERATED_LENGTH_MINUTES,
            unit: TrialWindowUnit::Minutes,
        }
    }

    /// Remaining window at `now`. Elapsed time is floored to whole units and
    /// clamped at zero, so a `now` before `trial_start` (clock skew) reads as
    /// an untouched window rather than a negative elapsed overflow.
    pub fn remaining(&self, trial_start: DateTime<Utc>, now: DateTime<Utc>) -> TrialWindowStatus {
        let elapsed = match self.unit {
            TrialWindowUnit::Days => (now - trial_start).num_days(),
            TrialWindowUnit::Minutes => (now - trial_start).num_minutes(),
        };
        let elapsed = elapsed.max(0);
        let left = (self.length - elapsed).max(0);

        TrialWindowStatus {
            left,
            expired: left <= 0,
        }
    }
}

/// Caller-facing entitlement read model. Computed fresh on every evaluation,
/// never persisted.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EntitlementView {
    pub is_pro: bool,
    pub days_left: Option<i64>,
    pub minutes_left: Option<i64>,
    pub expired: bool,
    pub trial_start: Option<DateTime<Utc>>,
}

impl EntitlementView {
    /// Active paid subscription: trial fields are irrelevant and must not
    /// block access.
    pub fn pro() -> Self {
        Self {
            is_pro: true,
            days_left: None,
            minutes_left: None,
            expired: false,
            trial_start: None,
        }
    }

    /// Gating disabled globally: full access without any store lookup.
    pub fn ungated() -> Self {
        Self::pro()
    }

    pub fn trialing(
        window: TrialWindow,
        trial_start: DateTime<Utc>,
        status: TrialWindowStatus,
    ) -> Self {
        let (days_left, minutes_left) = match window.unit {
            TrialWindowUnit::Days => (Some(status.left), None),
            TrialWindowUnit::Minutes => (None, Some(status.left)),
        };

        Self {
            is_pro: false,
            days_left,
            minutes_left,
            expired: status.expired,
            trial_start: Some(trial_start),
        }
    }
}
