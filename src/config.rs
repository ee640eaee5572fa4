use crate::error::AppError;
use std::env;
use std::time::Duration;

const DEFAULT_AI_TIMEOUT_SECS: u64 = 10;
const DEFAULT_CACHE_MAX_AGE_MINS: u64 = 60;

#[derive(Debug, Clone)]
pub struct Config {
    /// Scout AI service endpoint. `None` means every request takes the fallback path.
    pub ai_url: Option<String>,
    pub ai_key: Option<String>,
    pub ai_timeout: Duration,
    pub stats_url: Option<String>,
    pub cache_max_age_mins: u64,
    pub json_logs: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            ai_url: None,
            ai_key: None,
            ai_timeout: Duration::from_secs(DEFAULT_AI_TIMEOUT_SECS),
            stats_url: None,
            cache_max_age_mins: DEFAULT_CACHE_MAX_AGE_MINS,
            json_logs: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let ai_timeout_secs = match non_empty("SCOUT_AI_TIMEOUT_SECS") {
            Some(raw) => parse_u64("SCOUT_AI_TIMEOUT_SECS", &raw)?,
            None => DEFAULT_AI_TIMEOUT_SECS,
        };

        let cache_max_age_mins = match non_empty("SCOUT_CACHE_MAX_AGE_MINS") {
            Some(raw) => parse_u64("SCOUT_CACHE_MAX_AGE_MINS", &raw)?,
            None => DEFAULT_CACHE_MAX_AGE_MINS,
        };

        let json_logs = non_empty("SCOUT_LOG_FORMAT")
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        Ok(Config {
            ai_url: non_empty("SCOUT_AI_URL"),
            ai_key: non_empty("SCOUT_AI_KEY"),
            ai_timeout: Duration::from_secs(ai_timeout_secs),
            stats_url: non_empty("SCOUT_STATS_URL"),
            cache_max_age_mins,
            json_logs,
        })
    }
}

fn parse_u64(key: &str, raw: &str) -> Result<u64, AppError> {
    raw.trim().parse().map_err(|_| {
        AppError::ConfigError(format!("{} must be a whole number, got '{}'", key, raw))
    })
}
