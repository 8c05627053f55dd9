pub mod entitlements;
pub mod enums;
pub mod subscriptions;
