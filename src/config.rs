use crate::error::ConfigError;
use reqwest::Url;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/quiz";
pub const DEFAULT_LOG_FILE: &str = "ethik-quiz.log";
pub const DEFAULT_ADMIN_PASSWORD: &str = "adminglg";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: Url,
    pub db_path: PathBuf,
    pub log_file: PathBuf,
    pub admin_password: String,
    pub admin_token: Option<String>,
    pub leaderboard_limit: Option<u32>,
    pub http_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let raw_url = get("QUIZ_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_url = Url::parse(raw_url.trim()).map_err(|e| ConfigError::Invalid {
            key: "QUIZ_API_URL",
            reason: e.to_string(),
        })?;
        if api_url.cannot_be_a_base() {
            return Err(ConfigError::Invalid {
                key: "QUIZ_API_URL",
                reason: "url cannot be used as a base".to_string(),
            });
        }

        let leaderboard_limit = match get("QUIZ_LEADERBOARD_LIMIT") {
            Some(raw) => Some(parse_positive("QUIZ_LEADERBOARD_LIMIT", &raw)?),
            None => None,
        };

        let timeout_secs = match get("QUIZ_HTTP_TIMEOUT_SECS") {
            Some(raw) => parse_positive::<u64>("QUIZ_HTTP_TIMEOUT_SECS", &raw)?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        Ok(Self {
            api_url,
            db_path: get("QUIZ_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(crate::db::get_db_path),
            log_file: get("QUIZ_LOG_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE)),
            admin_password: get("QUIZ_ADMIN_PASSWORD")
                .unwrap_or_else(|| DEFAULT_ADMIN_PASSWORD.to_string()),
            admin_token: get("QUIZ_ADMIN_TOKEN"),
            leaderboard_limit,
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn parse_positive<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialOrd + Default,
    T::Err: std::fmt::Display,
{
    let value: T = raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        reason: e.to_string(),
    })?;
    if value <= T::default() {
        return Err(ConfigError::Invalid {
            key,
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(value)
}
