//! Runtime configuration, read from the environment (and `.env`)

pub mod contracts;

use std::env;
use std::time::Duration;

pub use contracts::ContractsConfig;

use crate::error::ConfigError;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_EVENT_POLL_INTERVAL_MS: u64 = 1_000;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub contracts: ContractsConfig,
    pub port: u16,
    pub event_poll_interval: Duration,
    /// Base time for the flight catalog; process start time when unset.
    pub flight_base_timestamp: Option<u64>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = parse_var("PORT")?.unwrap_or(DEFAULT_PORT);
        let poll_ms = parse_var("EVENT_POLL_INTERVAL_MS")?.unwrap_or(DEFAULT_EVENT_POLL_INTERVAL_MS);

        Ok(Self {
            contracts: ContractsConfig::from_env()?,
            port,
            event_poll_interval: Duration::from_millis(poll_ms),
            flight_base_timestamp: parse_var("FLIGHT_BASE_TIMESTAMP")?,
        })
    }
}

fn parse_var<T>(key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|err| ConfigError::InvalidVar {
                key,
                reason: err.to_string(),
            }),
        Err(_) => Ok(None),
    }
}
