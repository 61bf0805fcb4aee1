pub mod expenses;
pub mod subscriptions;
