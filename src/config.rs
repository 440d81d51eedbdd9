// config.rs
use crate::status::DerivationProfile;
use crate::telemetry::TrackerConfig;
use clap::{Args, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is required for the live feed")]
    Missing(&'static str),

    #[error("delimiter must be a single character, got {0:?}")]
    Delimiter(String),
}

const MAX_CACHE_TTL_SECS: i64 = 7 * 24 * 3600;
const MAX_STALE_AFTER_HOURS: i64 = 10 * 365 * 24;

/// Where telemetry comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceMode {
    /// Live tracker endpoint.
    Feed,
    /// Second uploaded sheet with hour-meter readings.
    Sheet,
}

/// Settings shared by `serve` and `report`. Every flag falls back to a
/// `FLEET_*` variable, so a `.env` file is enough for deployment.
#[derive(Debug, Clone, Args)]
pub struct AppConfig {
    /// Registry grid (JSON) loaded at startup.
    #[arg(long, env = "FLEET_REGISTRY")]
    pub registry: Option<PathBuf>,

    /// Measurement grid (JSON); only read in sheet mode.
    #[arg(long, env = "FLEET_MEASUREMENTS")]
    pub measurements: Option<PathBuf>,

    #[arg(long, value_enum, env = "FLEET_SOURCE", default_value = "feed")]
    pub source: SourceMode,

    #[arg(long, env = "FLEET_TELEMETRY_URL")]
    pub telemetry_url: Option<String>,

    #[arg(long, env = "FLEET_TELEMETRY_TOKEN", hide_env_values = true)]
    pub telemetry_token: Option<String>,

    #[arg(long, env = "FLEET_TELEMETRY_USER", hide_env_values = true)]
    pub telemetry_user: Option<String>,

    #[arg(long, env = "FLEET_TELEMETRY_PASSWORD", hide_env_values = true)]
    pub telemetry_password: Option<String>,

    #[arg(long, env = "FLEET_TOKEN_HEADER", default_value = "token")]
    pub token_header: String,

    #[arg(long, env = "FLEET_USER_HEADER", default_value = "login")]
    pub user_header: String,

    #[arg(long, env = "FLEET_PASSWORD_HEADER", default_value = "senha")]
    pub password_header: String,

    #[arg(long, env = "FLEET_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    /// At most one week.
    #[arg(
        long,
        env = "FLEET_CACHE_TTL_SECS",
        default_value_t = 300,
        value_parser = clap::value_parser!(i64).range(1..=MAX_CACHE_TTL_SECS)
    )]
    pub cache_ttl_secs: i64,

    #[arg(long, env = "FLEET_ACCEPT_INVALID_CERTS", default_value_t = false)]
    pub accept_invalid_certs: bool,

    /// Flag readings older than this many hours (at most ten years).
    #[arg(
        long,
        env = "FLEET_STALE_AFTER_HOURS",
        value_parser = clap::value_parser!(i64).range(1..=MAX_STALE_AFTER_HOURS)
    )]
    pub stale_after_hours: Option<i64>,

    #[arg(long, env = "FLEET_CSV_DELIMITER", default_value = ";")]
    pub delimiter: String,
}

impl AppConfig {
    pub fn profile(&self) -> DerivationProfile {
        let profile = match self.source {
            SourceMode::Feed => DerivationProfile::live_feed(),
            SourceMode::Sheet => DerivationProfile::measurement_sheet(),
        };

        match self.stale_after_hours {
            Some(hours) => profile.with_stale_after(chrono::Duration::hours(hours)),
            None => profile,
        }
    }

    pub fn tracker(&self) -> Result<TrackerConfig, ConfigError> {
        let required = |v: &Option<String>, name: &'static str| v.clone().ok_or(ConfigError::Missing(name));

        Ok(TrackerConfig {
            url: required(&self.telemetry_url, "FLEET_TELEMETRY_URL")?,
            token: required(&self.telemetry_token, "FLEET_TELEMETRY_TOKEN")?,
            user: required(&self.telemetry_user, "FLEET_TELEMETRY_USER")?,
            password: required(&self.telemetry_password, "FLEET_TELEMETRY_PASSWORD")?,
            token_header: self.token_header.clone(),
            user_header: self.user_header.clone(),
            password_header: self.password_header.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            accept_invalid_certs: self.accept_invalid_certs,
        })
    }

    pub fn cache_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.cache_ttl_secs)
    }

    pub fn delimiter(&self) -> Result<char, ConfigError> {
        let mut chars = self.delimiter.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(ConfigError::Delimiter(self.delimiter.clone())),
        }
    }
}
