use dotenv::dotenv;
use firewatch_core::SourceStrategy;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_API_URL: &str = "http://localhost:8000";
const DEFAULT_FALLBACK: &str = "./data/active_fires.json";
const DEFAULT_BOUNDARY: &str = "./data/uttarakhand_boundary.geojson";
const DEFAULT_REFRESH_MINUTES: u64 = 30;
const DEFAULT_STATIC_REFRESH_MINUTES: u64 = 180;
const DEFAULT_DAYS: u32 = 10;
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_LOG_FILE: &str = "firewatch.log";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be a positive whole number, got {value:?}")]
    NotPositive { key: &'static str, value: String },
}

/// Where the fallback snapshot is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackSource {
    File(PathBuf),
    Url(String),
}

impl FallbackSource {
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.starts_with("http://") || value.starts_with("https://") {
            Self::Url(value.to_string())
        } else {
            Self::File(PathBuf::from(value))
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::File(path) => path.display().to_string(),
            Self::Url(url) => url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_url: String,
    pub fallback: FallbackSource,
    pub boundary: PathBuf,
    pub refresh_interval: Duration,
    pub strategy: SourceStrategy,
    pub days: u32,
    pub timeout: Duration,
    pub log_file: PathBuf,
    pub debug: bool,
}

impl AppConfig {
    /// Loads `.env`, then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let static_only = value("FIREWATCH_STATIC_ONLY").is_some_and(|flag| is_truthy(&flag));
        let strategy = if static_only {
            SourceStrategy::FallbackOnly
        } else {
            SourceStrategy::PrimaryWithFallback
        };

        let default_minutes = if static_only {
            DEFAULT_STATIC_REFRESH_MINUTES
        } else {
            DEFAULT_REFRESH_MINUTES
        };
        let refresh_minutes =
            positive(value("FIREWATCH_REFRESH_MINUTES"), "FIREWATCH_REFRESH_MINUTES", default_minutes)?;
        let timeout_secs =
            positive(value("FIREWATCH_TIMEOUT_SECS"), "FIREWATCH_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        let days = positive(value("FIREWATCH_DAYS"), "FIREWATCH_DAYS", u64::from(DEFAULT_DAYS))?;
        let days = u32::try_from(days).map_err(|_| ConfigError::NotPositive {
            key: "FIREWATCH_DAYS",
            value: days.to_string(),
        })?;

        Ok(Self {
            api_url: value("FIREWATCH_API_URL")
                .map_or_else(|| DEFAULT_API_URL.to_string(), |url| url.trim_end_matches('/').to_string()),
            fallback: FallbackSource::parse(
                &value("FIREWATCH_FALLBACK").unwrap_or_else(|| DEFAULT_FALLBACK.to_string()),
            ),
            boundary: value("FIREWATCH_BOUNDARY")
                .map_or_else(|| PathBuf::from(DEFAULT_BOUNDARY), PathBuf::from),
            refresh_interval: Duration::from_secs(refresh_minutes.saturating_mul(60)),
            strategy,
            days,
            timeout: Duration::from_secs(timeout_secs),
            log_file: value("FIREWATCH_LOG_FILE")
                .map_or_else(|| PathBuf::from(DEFAULT_LOG_FILE), PathBuf::from),
            debug: value("DEBUG").is_some_and(|flag| is_truthy(&flag)),
        })
    }

    pub fn primary_url(&self) -> String {
        format!("{}/api/fires?days={}", self.api_url, self.days)
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn positive(value: Option<String>, key: &'static str, default: u64) -> Result<u64, ConfigError> {
    let Some(raw) = value else {
        return Ok(default);
    };
    raw.trim()
        .parse::<u64>()
        .ok()
        .filter(|number| *number > 0)
        .ok_or(ConfigError::NotPositive { key, value: raw })
}
