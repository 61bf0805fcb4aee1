pub mod billing_period;
pub mod enums;
pub mod materialization;
pub mod pause_classifications;
pub mod recurring_charges;
pub mod subscription_snapshots;
