// # Cloudflare DNS Provider
//
// Cloudflare API v4 client authenticating with the global API key
// (`X-Auth-Email` + `X-Auth-Key` headers).
//
// ## API Reference
//
// - List DNS Records: GET `/zones/:zone_id/dns_records?name=...`
// - Update DNS Record: PUT `/zones/:zone_id/dns_records/:record_id`
//
// ## Behavior
//
// - One HTTP request per trait call; no retries, no caching
// - Only existing records are updated; nothing is ever created
// - A lookup answered with a non-2xx status (bad credentials included) is
//   an error for that record, not "record does not exist", and no update
//   is sent for it
// - An update counts as successful when the raw response body contains
//   the text `success`. This mirrors how existing deployments judged the
//   API response and is kept for compatibility.
//
// ## Security
//
// The API key never appears in logs or in `Debug` output.

use async_trait::async_trait;
use ddns_core::config::Credentials;
use ddns_core::traits::{DnsProvider, DnsRecordSnapshot, RecordUpdate};
use ddns_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Cloudflare API base URL
pub const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Marker looked for in update response bodies
const SUCCESS_MARKER: &str = "success";

/// Whether a raw update response body denotes success
///
/// Plain substring match, not structured inspection: an error payload that
/// happens to contain the word (e.g. in a record name) also matches.
pub fn is_success_body(body: &str) -> bool {
    body.contains(SUCCESS_MARKER)
}

/// Response of the list-records endpoint; only the fields we read
#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    result_info: Option<ResultInfo>,
    #[serde(default)]
    result: Option<Vec<ListedRecord>>,
}

#[derive(Debug, Deserialize)]
struct ResultInfo {
    #[serde(default)]
    count: u64,
}

#[derive(Debug, Deserialize)]
struct ListedRecord {
    id: String,
    content: String,
}

/// Body of the update request
#[derive(Debug, Serialize)]
struct UpdatePayload<'a> {
    /// Carries the zone identifier, as existing deployments always sent it;
    /// Cloudflare takes the record id from the URL
    id: &'a str,
    #[serde(rename = "type")]
    record_type: &'static str,
    proxied: bool,
    name: &'a str,
    content: &'a str,
}

/// Cloudflare DNS provider
pub struct CloudflareProvider {
    credentials: Credentials,

    /// API root, overridable for tests
    base_url: String,

    /// HTTP client for API requests
    client: reqwest::Client,
}

// Custom Debug implementation that hides the API key
impl std::fmt::Debug for CloudflareProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareProvider")
            .field("credentials", &self.credentials)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl CloudflareProvider {
    /// Create a new Cloudflare provider against the public API
    ///
    /// # Parameters
    ///
    /// - `credentials`: Email, global API key and zone identifier
    /// - `timeout`: Per-request timeout; `None` waits indefinitely
    pub fn new(credentials: Credentials, timeout: Option<Duration>) -> Result<Self> {
        Self::with_base_url(credentials, CLOUDFLARE_API_BASE, timeout)
    }

    /// Create a provider talking to a different API root
    pub fn with_base_url(
        credentials: Credentials,
        base_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        credentials.validate()?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            credentials,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    fn records_url(&self) -> String {
        format!(
            "{}/zones/{}/dns_records",
            self.base_url, self.credentials.zone_identifier
        )
    }

    fn record_url(&self, record_id: &str) -> String {
        format!("{}/{}", self.records_url(), record_id)
    }

    /// Attach the authentication headers
    fn authed(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("X-Auth-Email", &self.credentials.email)
            .header("X-Auth-Key", &self.credentials.key)
            .header("Content-Type", "application/json")
    }
}

#[async_trait]
impl DnsProvider for CloudflareProvider {
    /// Look up a record by exact name
    ///
    /// # API Call
    ///
    /// ```http
    /// GET /zones/:zone_id/dns_records?name=home.example.com
    /// X-Auth-Email: <email>
    /// X-Auth-Key: <key>
    /// ```
    async fn find_record(&self, record_name: &str) -> Result<Option<DnsRecordSnapshot>> {
        tracing::debug!("Looking up record: {}", record_name);

        let response = self
            .authed(self.client.get(self.records_url()))
            .query(&[("name", record_name)])
            .send()
            .await
            .map_err(|e| Error::network(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::network(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return match status.as_u16() {
                401 | 403 => Err(Error::data(format!(
                    "Authentication failed: check auth_email and auth_key. Status: {}",
                    status
                ))),
                _ => Err(Error::data(format!(
                    "Record lookup failed: {} - {}",
                    status, body
                ))),
            };
        }

        let listing: ListResponse = serde_json::from_str(&body)
            .map_err(|e| Error::data(format!("Failed to parse response: {}", e)))?;

        let count = listing.result_info.map(|info| info.count).unwrap_or(0);
        if count == 0 {
            return Ok(None);
        }

        // First match wins; duplicates are not disambiguated
        let first = listing
            .result
            .and_then(|records| records.into_iter().next())
            .ok_or_else(|| {
                Error::data(format!(
                    "Provider reported {} match(es) for {} but returned none",
                    count, record_name
                ))
            })?;

        tracing::debug!("Found record ID: {}", first.id);
        Ok(Some(DnsRecordSnapshot {
            id: first.id,
            content: first.content,
        }))
    }

    /// Replace the record's content with a new A record value
    ///
    /// # API Call
    ///
    /// ```http
    /// PUT /zones/:zone_id/dns_records/:record_id
    /// {
    ///   "id": "<zone_id>",
    ///   "type": "A",
    ///   "proxied": true,
    ///   "name": "home.example.com",
    ///   "content": "1.2.3.4"
    /// }
    /// ```
    async fn update_record(&self, record_id: &str, update: &RecordUpdate) -> Result<String> {
        let payload = UpdatePayload {
            id: &self.credentials.zone_identifier,
            record_type: "A",
            proxied: update.proxied,
            name: &update.name,
            content: &update.content,
        };

        tracing::debug!("Updating record {}: {} -> {}", record_id, update.name, update.content);

        let response = self
            .authed(self.client.put(self.record_url(record_id)))
            .json(&payload)
            .send()
            .await
            .map_err(|e| Error::network(format!("HTTP request failed: {}", e)))?;

        response
            .text()
            .await
            .map_err(|e| Error::network(format!("Failed to read response: {}", e)))
    }

    fn is_success(&self, body: &str) -> bool {
        is_success_body(body)
    }

    fn provider_name(&self) -> &'static str {
        "cloudflare"
    }
}
