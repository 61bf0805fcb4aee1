pub mod materialize_recurring_expenses;
pub mod subscription_lifecycle;
pub mod subscription_pause_observer;
