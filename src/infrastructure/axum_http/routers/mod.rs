pub mod materializations;
pub mod subscriptions;
