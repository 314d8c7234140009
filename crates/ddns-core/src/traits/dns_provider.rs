// # DNS Provider Trait
//
// Defines the interface for reading and updating DNS records via provider
// APIs.
//
// ## Implementations
//
// - Cloudflare: `ddns-provider-cloudflare` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::traits::{DnsProvider, RecordUpdate};
//
// async fn bump(provider: &dyn DnsProvider) -> ddns_core::Result<()> {
//     if let Some(record) = provider.find_record("home.example.com").await? {
//         let update = RecordUpdate::new("home.example.com", "1.2.3.4", false);
//         let body = provider.update_record(&record.id, &update).await?;
//         println!("{}", body);
//     }
//     Ok(())
// }
// ```

use async_trait::async_trait;

/// Current state of a DNS record as stored by the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsRecordSnapshot {
    /// The record ID (provider-specific)
    pub id: String,
    /// The address the record currently points to
    pub content: String,
}

/// Desired state of an A record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordUpdate {
    pub name: String,
    pub content: String,
    pub proxied: bool,
}

impl RecordUpdate {
    pub fn new(name: impl Into<String>, content: impl Into<String>, proxied: bool) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            proxied,
        }
    }
}

/// Trait for DNS provider implementations
///
/// Providers are stateless and single-shot: one HTTP request per method
/// call, no retries, no caching. Deciding whether an update is needed is
/// the reconciler's job.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Look up a record by exact name
    ///
    /// # Returns
    ///
    /// - `Ok(Some(_))`: The first matching record
    /// - `Ok(None)`: The provider reports no matching record
    /// - `Err(Error)`: Transport failure or malformed response
    async fn find_record(
        &self,
        record_name: &str,
    ) -> Result<Option<DnsRecordSnapshot>, crate::Error>;

    /// Replace the record's content
    ///
    /// # Returns
    ///
    /// The raw response body, whatever the HTTP status. Interpreting it is
    /// left to [`DnsProvider::is_success`].
    async fn update_record(
        &self,
        record_id: &str,
        update: &RecordUpdate,
    ) -> Result<String, crate::Error>;

    /// Whether a raw update response body denotes success
    fn is_success(&self, body: &str) -> bool;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}
