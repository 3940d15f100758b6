use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
const SIMPLE_USER_AGENT: &str = "Mozilla/5.0 (compatible; MSIE 10.0; Windows NT 6.1; Trident/6.0)";

/// Which header set a GET is sent with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderProfile {
    /// Desktop browser UA, JSON accept and content type.
    Browser,
    /// Reduced set used after a 406.
    Simple,
}

impl HeaderProfile {
    pub fn headers(self) -> &'static [(&'static str, &'static str)] {
        match self {
            HeaderProfile::Browser => &[
                ("user-agent", BROWSER_USER_AGENT),
                ("accept", "application/json"),
                ("content-type", "application/json"),
            ],
            HeaderProfile::Simple => &[("user-agent", SIMPLE_USER_AGENT), ("accept", "*/*")],
        }
    }
}

#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: String,
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &str, profile: HeaderProfile) -> Result<RawResponse>;
}

/// reqwest-backed transport.
pub struct HttpTransport {
    http: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self { http })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str, profile: HeaderProfile) -> Result<RawResponse> {
        let mut req = self.http.get(url);
        for (name, value) in profile.headers() {
            req = req.header(*name, *value);
        }

        let response = req.send().await?;
        let status = response.status();
        let body = response.text().await?;

        Ok(RawResponse { status, body })
    }
}
