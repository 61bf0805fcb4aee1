use chrono::NaiveTime;
use chrono_tz::Tz;

use crate::domain::value_objects::enums::billing_day_overflow::BillingDayOverflow;

#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub server: Server,
    pub database: Database,
    pub materializer: Materializer,
    pub internal: Internal,
}

#[derive(Debug, Clone)]
pub struct Server {
    pub port: u16,
    pub body_limit: u64,
    pub timeout: u64,
}

#[derive(Debug, Clone)]
pub struct Database {
    pub url: String,
    pub max_connections: u32,
    /// Seconds to wait for a pooled connection.
    pub connection_timeout: u64,
}

#[derive(Debug, Clone)]
pub struct Materializer {
    pub timezone: Tz,
    pub run_at: NaiveTime,
    pub run_on_startup: bool,
    pub concurrency: usize,
    pub billing_day_overflow: BillingDayOverflow,
}

#[derive(Debug, Clone)]
pub struct Internal {
    /// Internal routes answer 503 while this is unset.
    pub api_token: Option<String>,
}
