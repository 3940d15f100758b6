//! Employee API client - fetch with a fixed-delay retry loop
//!
//! One GET per attempt. 429 waits and retries, 406 reissues once with
//! reduced headers, any other non-success fails the attempt. The decoded
//! document is written to disk only on success.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, error, info, instrument, warn};

use super::transport::{HeaderProfile, Transport};
use crate::config::Config;
use crate::model::envelope::record_count;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to fetch employee data after {attempts} attempts")]
    RetriesExhausted { attempts: u32 },

    #[error("response was not valid JSON")]
    Decode(#[from] serde_json::Error),

    #[error("failed to serialize employee document")]
    Encode(#[source] serde_json::Error),

    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Why a single attempt did not produce a body.
#[derive(Debug, Error)]
enum AttemptFailure {
    #[error("request failed: {0:#}")]
    Transport(anyhow::Error),

    #[error("rate limited")]
    RateLimited,

    #[error("unexpected status {0}")]
    Status(StatusCode),
}

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub url: String,
    pub output: PathBuf,
    pub max_attempts: u32,
    pub retry_delay: Duration,
}

impl FetchSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            url: config.api_url.clone(),
            output: config.employees_file.clone(),
            max_attempts: config.fetch_max_retries,
            retry_delay: config.fetch_retry_delay,
        }
    }
}

pub struct EmployeeFetcher<T> {
    transport: T,
    settings: FetchSettings,
}

impl<T: Transport> EmployeeFetcher<T> {
    pub fn new(transport: T, settings: FetchSettings) -> Self {
        Self {
            transport,
            settings,
        }
    }

    /// Fetch the envelope and save it pretty-printed to the output path.
    #[instrument(name = "fetch_employees", skip(self), fields(url = %self.settings.url))]
    pub async fn fetch(&self) -> Result<Value, FetchError> {
        let max_attempts = self.settings.max_attempts;

        for attempt in 1..=max_attempts {
            info!(attempt, "Fetching employee data");

            match self.attempt().await {
                Ok(body) => {
                    let doc: Value = serde_json::from_str(&body).inspect_err(|e| {
                        error!(error = %e, "Failed to decode JSON response");
                    })?;

                    self.save(&doc).await?;
                    info!(
                        count = record_count(&doc),
                        path = %self.settings.output.display(),
                        "Successfully fetched employees"
                    );
                    return Ok(doc);
                }
                Err(failure) => {
                    warn!(attempt, reason = %failure, "Fetch attempt failed");

                    if attempt < max_attempts {
                        info!(
                            delay_secs = self.settings.retry_delay.as_secs(),
                            "Waiting before retry"
                        );
                        sleep(self.settings.retry_delay).await;
                    }
                }
            }
        }

        error!(attempts = max_attempts, "Max retries reached, no data written");
        Err(FetchError::RetriesExhausted {
            attempts: max_attempts,
        })
    }

    async fn attempt(&self) -> Result<String, AttemptFailure> {
        let url = &self.settings.url;

        let mut response = self
            .transport
            .get(url, HeaderProfile::Browser)
            .await
            .map_err(AttemptFailure::Transport)?;

        if response.status == StatusCode::TOO_MANY_REQUESTS {
            return Err(AttemptFailure::RateLimited);
        }

        if response.status == StatusCode::NOT_ACCEPTABLE {
            warn!("Request not acceptable, retrying with reduced headers");
            response = self
                .transport
                .get(url, HeaderProfile::Simple)
                .await
                .map_err(AttemptFailure::Transport)?;
        }

        if !response.status.is_success() {
            return Err(AttemptFailure::Status(response.status));
        }

        debug!(status = %response.status, bytes = response.body.len(), "Response received");
        Ok(response.body)
    }

    async fn save(&self, doc: &Value) -> Result<(), FetchError> {
        let path = &self.settings.output;
        let pretty = serde_json::to_string_pretty(doc).map_err(FetchError::Encode)?;

        tokio::fs::write(path, pretty)
            .await
            .map_err(|source| FetchError::Write {
                path: path.clone(),
                source,
            })
    }
}
