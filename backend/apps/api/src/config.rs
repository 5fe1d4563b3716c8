//! Runtime settings
//!
//! Read once at startup from the process environment (after `.env` has been
//! loaded). Every value has a default so a bare `cargo run` works against a
//! local PostgreSQL.

use platform::rate_limit::{RateLimitPolicy, RateLimitSettings};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_APP_ENV: &str = "development";
const DEFAULT_POSTGRES_PART: &str = "kasperjunge";
const DEFAULT_POSTGRES_HOST: &str = "localhost";
const DEFAULT_POSTGRES_PORT: u16 = 5432;
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:8000";
const DEFAULT_BACKEND_TIMEOUT_MS: u64 = 1000;
const DEFAULT_RATE_LIMIT_CONTACT: &str = "10/minute";
const DEFAULT_RATE_LIMIT_ANALYTICS: &str = "120/minute";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
const DEFAULT_LOG_FILE_PATH: &str = "./logs/backend.log";
const DEFAULT_LOG_FILE_MAX_BYTES: u64 = 10 * 1024 * 1024;
const DEFAULT_LOG_FILE_BACKUP_COUNT: usize = 5;

/// Environments where the API documentation is not served
const DOCS_DISABLED_ENVS: &[&str] = &["staging", "production", "prod"];

/// Crates whose events the default filter lets through
const LOG_TARGETS: &[&str] = &["api", "contact", "analytics", "platform", "tower_http"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} is not a valid {expected}: {value:?}")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("{name} is not a valid rate limit policy: {source}")]
    Policy {
        name: &'static str,
        #[source]
        source: platform::rate_limit::RateLimitError,
    },
}

/// Size-rotated log file; `path` is the active file, backups get `.1`, `.2`, ...
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFileSettings {
    pub path: PathBuf,
    pub max_bytes: u64,
    pub backup_count: usize,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub app_env: String,
    pub database_url: String,
    pub slack_webhook_url: Option<String>,
    pub cors_origins: Vec<String>,
    pub rate_limit: RateLimitSettings,
    pub rate_limit_contact: String,
    pub rate_limit_analytics: String,
    pub log_level: String,
    pub log_json: bool,
    /// `None` when `LOG_FILE_PATH` is set to a blank value
    pub log_file: Option<LogFileSettings>,
    pub bind_addr: SocketAddr,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build settings from any variable source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let var_or = |name: &str, default: &str| var(name).unwrap_or_else(|| default.to_string());

        let database_url = match var("DATABASE_URL") {
            Some(url) => url,
            None => {
                let port = match var("POSTGRES_PORT") {
                    Some(raw) => parse_value("POSTGRES_PORT", "port", &raw)?,
                    None => DEFAULT_POSTGRES_PORT,
                };
                build_database_url(
                    &var_or("POSTGRES_USER", DEFAULT_POSTGRES_PART),
                    &var_or("POSTGRES_PASSWORD", DEFAULT_POSTGRES_PART),
                    &var_or("POSTGRES_HOST", DEFAULT_POSTGRES_HOST),
                    port,
                    &var_or("POSTGRES_DB", DEFAULT_POSTGRES_PART),
                )?
            }
        };

        let slack_webhook_url = match var("SLACK_WEBHOOK_URL") {
            Some(raw) => Some(parse_http_url("SLACK_WEBHOOK_URL", &raw)?),
            None => None,
        };

        let enabled = match var("RATE_LIMIT_ENABLED") {
            Some(raw) => parse_bool("RATE_LIMIT_ENABLED", &raw)?,
            None => false,
        };
        let backend_timeout_ms = match var("RATE_LIMIT_BACKEND_TIMEOUT_MS") {
            Some(raw) => parse_value::<u64>("RATE_LIMIT_BACKEND_TIMEOUT_MS", "duration", &raw)?,
            None => DEFAULT_BACKEND_TIMEOUT_MS,
        };

        let log_json = match var("LOG_JSON") {
            Some(raw) => parse_bool("LOG_JSON", &raw)?,
            None => true,
        };

        let log_file = match lookup("LOG_FILE_PATH") {
            Some(raw) if raw.trim().is_empty() => None,
            raw => {
                let max_bytes = match var("LOG_FILE_MAX_BYTES") {
                    Some(raw) => parse_value::<u64>("LOG_FILE_MAX_BYTES", "byte count", &raw)?,
                    None => DEFAULT_LOG_FILE_MAX_BYTES,
                };
                if max_bytes == 0 {
                    return Err(ConfigError::Invalid {
                        name: "LOG_FILE_MAX_BYTES",
                        expected: "positive byte count",
                        value: "0".to_string(),
                    });
                }
                let backup_count = match var("LOG_FILE_BACKUP_COUNT") {
                    Some(raw) => parse_value("LOG_FILE_BACKUP_COUNT", "count", &raw)?,
                    None => DEFAULT_LOG_FILE_BACKUP_COUNT,
                };
                Some(LogFileSettings {
                    path: PathBuf::from(
                        raw.map(|p| p.trim().to_string())
                            .unwrap_or_else(|| DEFAULT_LOG_FILE_PATH.to_string()),
                    ),
                    max_bytes,
                    backup_count,
                })
            }
        };

        let settings = Self {
            app_env: var_or("APP_ENV", DEFAULT_APP_ENV),
            database_url,
            slack_webhook_url,
            cors_origins: parse_origins(&var("CORS_ORIGINS").unwrap_or_else(|| {
                // An explicitly blank value disables CORS
                match lookup("CORS_ORIGINS") {
                    Some(_) => String::new(),
                    None => DEFAULT_CORS_ORIGINS.to_string(),
                }
            }))?,
            rate_limit: RateLimitSettings {
                enabled,
                backend_url: var("REDIS_URL"),
                backend_timeout: Duration::from_millis(backend_timeout_ms),
            },
            rate_limit_contact: var_or("RATE_LIMIT_CONTACT", DEFAULT_RATE_LIMIT_CONTACT),
            rate_limit_analytics: var_or("RATE_LIMIT_ANALYTICS", DEFAULT_RATE_LIMIT_ANALYTICS),
            log_level: var_or("LOG_LEVEL", DEFAULT_LOG_LEVEL).to_lowercase(),
            log_json,
            log_file,
            bind_addr: parse_value("BIND_ADDR", "socket address", &var_or("BIND_ADDR", DEFAULT_BIND_ADDR))?,
        };

        settings.validate()?;
        Ok(settings)
    }

    /// Fail fast on policies that would otherwise only error per request
    fn validate(&self) -> Result<(), ConfigError> {
        for (name, policy) in [
            ("RATE_LIMIT_CONTACT", &self.rate_limit_contact),
            ("RATE_LIMIT_ANALYTICS", &self.rate_limit_analytics),
        ] {
            RateLimitPolicy::parse(policy).map_err(|source| ConfigError::Policy { name, source })?;
        }
        Ok(())
    }

    /// OpenAPI document and viewers are hidden outside development-like
    /// environments
    pub fn docs_enabled(&self) -> bool {
        let env = self.app_env.to_ascii_lowercase();
        !DOCS_DISABLED_ENVS.contains(&env.as_str())
    }

    /// `EnvFilter` directive used when `RUST_LOG` is not set
    pub fn default_log_filter(&self) -> String {
        LOG_TARGETS
            .iter()
            .map(|target| format!("{}={}", target, self.log_level))
            .collect::<Vec<_>>()
            .join(",")
    }
}

fn parse_value<T: std::str::FromStr>(
    name: &'static str,
    expected: &'static str,
    raw: &str,
) -> Result<T, ConfigError> {
    raw.parse().map_err(|_| ConfigError::Invalid {
        name,
        expected,
        value: raw.to_string(),
    })
}

fn parse_bool(name: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            name,
            expected: "boolean",
            value: raw.to_string(),
        }),
    }
}

fn parse_http_url(name: &'static str, raw: &str) -> Result<String, ConfigError> {
    match url::Url::parse(raw) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(raw.to_string()),
        _ => Err(ConfigError::Invalid {
            name,
            expected: "http(s) URL",
            value: raw.to_string(),
        }),
    }
}

/// Comma separated list, or a JSON array of strings
fn parse_origins(raw: &str) -> Result<Vec<String>, ConfigError> {
    let raw = raw.trim();
    let origins: Vec<String> = if raw.starts_with('[') {
        serde_json::from_str(raw).map_err(|_| ConfigError::Invalid {
            name: "CORS_ORIGINS",
            expected: "JSON array of strings",
            value: raw.to_string(),
        })?
    } else {
        raw.split(',').map(str::to_string).collect()
    };

    Ok(origins
        .into_iter()
        .map(|origin| origin.trim().to_string())
        .filter(|origin| !origin.is_empty())
        .collect())
}

fn build_database_url(
    user: &str,
    password: &str,
    host: &str,
    port: u16,
    database: &str,
) -> Result<String, ConfigError> {
    let invalid = || ConfigError::Invalid {
        name: "POSTGRES_HOST",
        expected: "host name",
        value: host.to_string(),
    };

    let mut url = url::Url::parse(&format!("postgres://{}:{}", host, port)).map_err(|_| invalid())?;
    url.set_username(user).map_err(|_| invalid())?;
    url.set_password(Some(password)).map_err(|_| invalid())?;
    url.path_segments_mut()
        .map_err(|_| invalid())?
        .push(database);
    Ok(url.to_string())
}
