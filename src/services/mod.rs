pub mod daily_scheduler;
