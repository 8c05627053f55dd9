pub mod entitlements;
pub mod ideas;
pub mod subscriptions;
