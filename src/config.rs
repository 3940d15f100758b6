use std::env;
use std::path::PathBuf;
use std::time::Duration;

use dotenvy::dotenv;
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "https://dummy.restapiexample.com/api/v1/employees";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be a number, got {value:?}")]
    NotANumber { name: &'static str, value: String },

    #[error("FETCH_MAX_RETRIES must be at least 1")]
    NoAttempts,

    #[error("DATABASE may only contain letters, digits and underscores, got {0:?}")]
    InvalidDatabaseName(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    // MySQL
    pub db_user: String,
    pub db_password: String,
    pub db_host: String,
    pub db_port: u16,
    pub db_name: String,

    // Remote API
    pub api_url: String,
    pub employees_file: PathBuf,
    pub fetch_max_retries: u32,
    pub fetch_retry_delay: Duration,

    pub log_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, applying the documented defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_name = lookup("DATABASE").unwrap_or_else(|| "employee_db".to_string());
        if db_name.is_empty()
            || !db_name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(ConfigError::InvalidDatabaseName(db_name));
        }

        let fetch_max_retries = parse_or(&lookup, "FETCH_MAX_RETRIES", 3u32)?;
        if fetch_max_retries == 0 {
            return Err(ConfigError::NoAttempts);
        }

        Ok(Self {
            db_user: lookup("USER").unwrap_or_default(),
            db_password: lookup("PASSWORD").unwrap_or_default(),
            db_host: lookup("HOST").unwrap_or_else(|| "localhost".to_string()),
            db_port: parse_or(&lookup, "PORT", 3306u16)?,
            db_name,

            api_url: lookup("API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            employees_file: lookup("EMPLOYEES_FILE")
                .unwrap_or_else(|| "employees.json".to_string())
                .into(),
            fetch_max_retries,
            fetch_retry_delay: Duration::from_secs(parse_or(&lookup, "FETCH_RETRY_DELAY_SECS", 5u64)?),

            log_dir: lookup("LOG_DIR").unwrap_or_else(|| "logs".to_string()).into(),
        })
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::NotANumber { name, value }),
    }
}
