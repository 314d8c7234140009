//! Configuration types for the DDNS updater
//!
//! Credentials come from the command line; the list of records to manage
//! comes from a JSON file of the form
//!
//! ```json
//! [
//!   { "record": "home.example.com", "proxy": true },
//!   { "record": "nas.example.com" }
//! ]
//! ```

use serde::Deserialize;
use std::fmt;
use std::path::Path;

/// Value of `auth_method` when none is given
pub const DEFAULT_AUTH_METHOD: &str = "global";

/// Provider credentials for a single run
///
/// `auth_method` is accepted for compatibility with existing invocations but
/// never influences a request.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    /// ⚠️ NEVER log this value
    pub key: String,
    pub auth_method: String,
    pub zone_identifier: String,
}

// Custom Debug implementation that hides the API key
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("key", &"<REDACTED>")
            .field("auth_method", &self.auth_method)
            .field("zone_identifier", &self.zone_identifier)
            .finish()
    }
}

impl Credentials {
    /// Create credentials with the default `auth_method`
    pub fn new(
        email: impl Into<String>,
        key: impl Into<String>,
        zone_identifier: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            key: key.into(),
            auth_method: DEFAULT_AUTH_METHOD.to_string(),
            zone_identifier: zone_identifier.into(),
        }
    }

    /// Set the (unused) authentication method
    pub fn with_auth_method(mut self, auth_method: impl Into<String>) -> Self {
        self.auth_method = auth_method.into();
        self
    }

    /// Validate the credentials
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.email.trim().is_empty() {
            return Err(crate::Error::config("auth_email cannot be empty"));
        }
        if self.key.trim().is_empty() {
            return Err(crate::Error::config("auth_key cannot be empty"));
        }
        if self.zone_identifier.trim().is_empty() {
            return Err(crate::Error::config("zone_identifier cannot be empty"));
        }
        Ok(())
    }
}

/// One DNS record to keep pointed at the public IP
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSpec {
    /// Fully qualified record name; may be empty if the input omitted it
    pub record_name: String,
    /// Whether the record should be proxied by the provider
    pub proxy: bool,
}

impl RecordSpec {
    pub fn new(record_name: impl Into<String>, proxy: bool) -> Self {
        Self {
            record_name: record_name.into(),
            proxy,
        }
    }
}

/// On-disk shape of a record entry
///
/// Missing or null fields fall back to an empty name and `proxy = false`.
#[derive(Deserialize)]
struct RawRecord {
    #[serde(default)]
    record: Option<String>,
    #[serde(default)]
    proxy: Option<bool>,
}

impl From<RawRecord> for RecordSpec {
    fn from(raw: RawRecord) -> Self {
        Self {
            record_name: raw.record.unwrap_or_default(),
            proxy: raw.proxy.unwrap_or(false),
        }
    }
}

/// Parse a JSON array of record entries
pub fn parse_records(json: &str) -> Result<Vec<RecordSpec>, crate::Error> {
    let raw: Vec<RawRecord> = serde_json::from_str(json)
        .map_err(|e| crate::Error::config(format!("Invalid records JSON: {}", e)))?;

    Ok(raw.into_iter().map(RecordSpec::from).collect())
}

/// Read and parse the records file at `path`
pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<RecordSpec>, crate::Error> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|e| {
        crate::Error::config(format!("Cannot read {}: {}", path.display(), e))
    })?;

    let records = parse_records(&contents)?;
    tracing::debug!("Loaded {} record(s) from {}", records.len(), path.display());
    Ok(records)
}
