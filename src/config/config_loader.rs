use anyhow::{Context, Result, bail};
use chrono::NaiveTime;
use chrono_tz::Tz;

use crate::config::stage::Stage;
use crate::domain::value_objects::enums::billing_day_overflow::BillingDayOverflow;

use super::config_model::{Database, DotEnvyConfig, Internal, Materializer, Server};

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let server = Server {
        port: std::env::var("SERVER_PORT")
            .context("SERVER_PORT is invalid")?
            .parse()
            .context("SERVER_PORT is invalid")?,
        body_limit: std::env::var("SERVER_BODY_LIMIT")
            .unwrap_or_else(|_| "1".to_string())
            .parse()
            .context("SERVER_BODY_LIMIT is invalid")?,
        timeout: std::env::var("SERVER_TIMEOUT")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .context("SERVER_TIMEOUT is invalid")?,
    };

    let database = Database {
        url: std::env::var("DATABASE_URL").context("DATABASE_URL is invalid")?,
        max_connections: parse_at_least_one(
            &std::env::var("DATABASE_MAX_CONNECTIONS").unwrap_or_else(|_| "10".to_string()),
        )
        .context("DATABASE_MAX_CONNECTIONS is invalid")?,
        connection_timeout: std::env::var("DATABASE_CONNECTION_TIMEOUT")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .context("DATABASE_CONNECTION_TIMEOUT is invalid")?,
    };

    let materializer = Materializer {
        timezone: parse_timezone(
            &std::env::var("MATERIALIZER_TIMEZONE").unwrap_or_else(|_| "UTC".to_string()),
        )?,
        run_at: parse_run_at(
            &std::env::var("MATERIALIZER_RUN_AT").unwrap_or_else(|_| "00:00".to_string()),
        )?,
        run_on_startup: std::env::var("MATERIALIZER_RUN_ON_STARTUP")
            .unwrap_or_else(|_| "true".to_string())
            .parse()
            .context("MATERIALIZER_RUN_ON_STARTUP is invalid")?,
        concurrency: parse_at_least_one(
            &std::env::var("MATERIALIZER_CONCURRENCY").unwrap_or_else(|_| "4".to_string()),
        )
        .context("MATERIALIZER_CONCURRENCY is invalid")?,
        billing_day_overflow: BillingDayOverflow::try_from(
            std::env::var("BILLING_DAY_OVERFLOW")
                .unwrap_or_else(|_| "clamp".to_string())
                .as_str(),
        )
        .context("BILLING_DAY_OVERFLOW is invalid")?,
    };

    let internal = Internal {
        api_token: std::env::var("INTERNAL_API_TOKEN").ok().and_then(|v| {
            let trimmed = v.trim().to_string();
            (!trimmed.is_empty()).then_some(trimmed)
        }),
    };

    Ok(DotEnvyConfig {
        server,
        database,
        materializer,
        internal,
    })
}

pub fn get_stage() -> Stage {
    dotenvy::dotenv().ok();

    let stage_str = std::env::var("STAGE").unwrap_or("".to_string());
    Stage::try_from(&stage_str).unwrap_or_default()
}

fn parse_timezone(raw: &str) -> Result<Tz> {
    raw.trim()
        .parse::<Tz>()
        .map_err(|err| anyhow::anyhow!("MATERIALIZER_TIMEZONE is invalid: {err}"))
}

fn parse_run_at(raw: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M").context("MATERIALIZER_RUN_AT is invalid")
}

fn parse_at_least_one<T>(raw: &str) -> Result<T>
where
    T: std::str::FromStr + PartialOrd + From<u8>,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value: T = raw.trim().parse()?;
    if value < T::from(1) {
        bail!("must be at least 1, got {}", raw.trim());
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_run_at_as_hours_and_minutes() {
        assert_eq!(
            parse_run_at("00:00").unwrap(),
            NaiveTime::from_hms_opt(0, 0, 0).unwrap()
        );
        assert_eq!(
            parse_run_at(" 06:30 ").unwrap(),
            NaiveTime::from_hms_opt(6, 30, 0).unwrap()
        );
        assert!(parse_run_at("25:00").is_err());
        assert!(parse_run_at("midnight").is_err());
    }

    #[test]
    fn parses_iana_timezones() {
        assert_eq!(parse_timezone("Asia/Seoul").unwrap(), chrono_tz::Asia::Seoul);
        assert_eq!(parse_timezone("UTC").unwrap(), chrono_tz::UTC);
        assert!(parse_timezone("Mars/Olympus").is_err());
    }

    #[test]
    fn counts_must_be_positive_integers() {
        assert_eq!(parse_at_least_one::<usize>("4").unwrap(), 4);
        assert_eq!(parse_at_least_one::<u32>(" 12 ").unwrap(), 12);
        assert!(parse_at_least_one::<usize>("0").is_err());
        assert!(parse_at_least_one::<usize>("abc").is_err());
        assert!(parse_at_least_one::<usize>("-2").is_err());
        assert!(parse_at_least_one::<u32>("").is_err());
    }

    #[test]
    fn unknown_stage_falls_back_to_local() {
        assert_eq!(
            Stage::try_from(&"Production".to_string()).unwrap(),
            Stage::Production
        );
        assert_eq!(
            Stage::try_from(&"qa".to_string()).unwrap_or_default(),
            Stage::Local
        );
    }
}
