pub mod plans;
pub mod subscription_statuses;
pub mod trial_window_units;
