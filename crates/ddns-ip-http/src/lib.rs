// # HTTP IP Source
//
// This crate determines the public IPv4 address by asking a plain-text
// "what is my IP" echo service.
//
// ## Failover
//
// The primary service is asked first. If that request fails (transport
// error, non-2xx status, unreadable body) the fallback service is asked
// exactly once. If the fallback fails too, `current()` returns
// `Error::IpLookup` describing both failures. There is no retry beyond that
// single swap and no caching between calls.
//
// A non-2xx answer counts as a failure on purpose: an echo service that
// returns an error page must not have that page taken for an address, so
// failover covers bad statuses as well as transport errors.

use ddns_core::traits::IpSource;
use ddns_core::{Error, Result};

use std::time::Duration;

/// Primary echo service, returns the bare address as text
pub const DEFAULT_PRIMARY_URL: &str = "https://api.ipify.org";

/// Fallback echo service, IPv4-only endpoint
pub const DEFAULT_FALLBACK_URL: &str = "https://ipv4.icanhazip.com/";

/// HTTP-based IP source with one fallback service
#[derive(Debug)]
pub struct HttpIpSource {
    /// URL asked first
    primary_url: String,

    /// URL asked when the primary fails
    fallback_url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpIpSource {
    /// Create a source using the default echo services and no timeout
    pub fn new() -> Result<Self> {
        Self::with_urls(DEFAULT_PRIMARY_URL, DEFAULT_FALLBACK_URL, None)
    }

    /// Create a source with explicit service URLs
    ///
    /// # Parameters
    ///
    /// - `primary_url`: URL asked first (e.g., "https://api.ipify.org")
    /// - `fallback_url`: URL asked once if the primary fails
    /// - `timeout`: Per-request timeout; `None` waits indefinitely
    pub fn with_urls(
        primary_url: impl Into<String>,
        fallback_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            primary_url: primary_url.into(),
            fallback_url: fallback_url.into(),
            client,
        })
    }

    /// Fetch the address from a single service
    async fn fetch_ip(&self, url: &str) -> std::result::Result<String, String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| format!("Request to {} failed: {}", url, e))?;

        if !response.status().is_success() {
            return Err(format!("{} answered HTTP {}", url, response.status()));
        }

        let ip_text = response
            .text()
            .await
            .map_err(|e| format!("Failed to read response from {}: {}", url, e))?;

        Ok(ip_text.trim().to_string())
    }
}

#[async_trait::async_trait]
impl IpSource for HttpIpSource {
    async fn current(&self) -> Result<String> {
        let primary_err = match self.fetch_ip(&self.primary_url).await {
            Ok(ip) => {
                tracing::debug!("Public IP from {}: {}", self.primary_url, ip);
                return Ok(ip);
            }
            Err(e) => e,
        };

        tracing::warn!("{}; trying {}", primary_err, self.fallback_url);

        match self.fetch_ip(&self.fallback_url).await {
            Ok(ip) => {
                tracing::debug!("Public IP from {}: {}", self.fallback_url, ip);
                Ok(ip)
            }
            Err(fallback_err) => Err(Error::ip_lookup(format!(
                "{}; {}",
                primary_err, fallback_err
            ))),
        }
    }

    fn source_name(&self) -> &'static str {
        "http"
    }
}
