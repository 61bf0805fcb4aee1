pub mod billing_day_overflow;
pub mod pause_timings;
pub mod subscription_states;
