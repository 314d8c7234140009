//! Record reconciler
//!
//! The [`Reconciler`] drives one pass over the configured records:
//!
//! ```text
//! for each RecordSpec:
//!     IpSource::current()          (fresh lookup per record)
//!         │
//!         ▼
//!     DnsProvider::find_record()   ── none ──▶ NotFound
//!         │
//!         ▼
//!     content == ip ?              ── yes ───▶ Unchanged
//!         │ no
//!         ▼
//!     DnsProvider::update_record() ──▶ Updated | Rejected
//! ```
//!
//! Records are processed strictly one after another. A failed IP lookup
//! aborts the pass; any other error is logged and the next record is
//! processed.

use crate::config::RecordSpec;
use crate::error::Result;
use crate::traits::{DnsProvider, IpSource, RecordUpdate};
use std::net::Ipv4Addr;
use tracing::{debug, error, info};

/// What happened to a single record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The IP source answered with an empty body
    NoPublicIp,

    /// The IP source answered with something that is not an IPv4 address
    InvalidPublicIp { reported: String },

    /// The provider has no record with this name
    NotFound { ip: Ipv4Addr },

    /// The record already points at the current IP
    Unchanged { ip: Ipv4Addr },

    /// The provider accepted the update
    Updated { previous: String, ip: Ipv4Addr },

    /// The provider answered the update without signalling success
    Rejected { record_id: String, body: String },

    /// An update was needed but dry-run mode suppressed it
    DryRun { previous: String, ip: Ipv4Addr },

    /// A provider request failed; the error was logged
    Failed { error: String },
}

impl ReconcileOutcome {
    /// Whether this outcome should count against the run
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::NoPublicIp
                | Self::InvalidPublicIp { .. }
                | Self::NotFound { .. }
                | Self::Rejected { .. }
                | Self::Failed { .. }
        )
    }

    /// Whether a PUT request was issued for this record
    pub fn issued_update(&self) -> bool {
        matches!(self, Self::Updated { .. } | Self::Rejected { .. })
    }
}

/// Brings provider records in line with the current public IP
pub struct Reconciler {
    /// Where the public IP comes from
    ip_source: Box<dyn IpSource>,

    /// Where the records live
    provider: Box<dyn DnsProvider>,

    /// Skip the update request, only log it
    dry_run: bool,
}

impl Reconciler {
    /// Create a new reconciler in live mode
    pub fn new(ip_source: Box<dyn IpSource>, provider: Box<dyn DnsProvider>) -> Self {
        Self {
            ip_source,
            provider,
            dry_run: false,
        }
    }

    /// Enable or disable dry-run mode
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Reconcile every record in order
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<ReconcileOutcome>)`: One outcome per record, in input order
    /// - `Err(Error::IpLookup)`: The IP source failed; later records were skipped
    pub async fn run(&self, records: &[RecordSpec]) -> Result<Vec<ReconcileOutcome>> {
        debug!(
            "Reconciling {} record(s) via {} / {}{}",
            records.len(),
            self.ip_source.source_name(),
            self.provider.provider_name(),
            if self.dry_run { " [DRY-RUN]" } else { "" }
        );

        let mut outcomes = Vec::with_capacity(records.len());

        for record in records {
            match self.reconcile(record).await {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    error!(
                        "DDNS Updater: Failed to reconcile {}: {}",
                        record.record_name, e
                    );
                    outcomes.push(ReconcileOutcome::Failed {
                        error: e.to_string(),
                    });
                }
            }
        }

        Ok(outcomes)
    }

    /// Reconcile a single record
    ///
    /// Issues at most one update request, and only when the provider's
    /// content differs from the freshly resolved IP.
    pub async fn reconcile(&self, record: &RecordSpec) -> Result<ReconcileOutcome> {
        let name = record.record_name.as_str();

        let reported = self.ip_source.current().await?;
        if reported.is_empty() {
            error!("DDNS Updater: No public IP found");
            return Ok(ReconcileOutcome::NoPublicIp);
        }

        let ip: Ipv4Addr = match reported.parse() {
            Ok(ip) => ip,
            Err(_) => {
                error!(
                    "DDNS Updater: Public IP lookup returned a non-IPv4 value ({}) for {}",
                    reported, name
                );
                return Ok(ReconcileOutcome::InvalidPublicIp { reported });
            }
        };

        let Some(current) = self.provider.find_record(name).await? else {
            error!(
                "DDNS Updater: Record does not exist, perhaps create one first? ({} for {})",
                ip, name
            );
            return Ok(ReconcileOutcome::NotFound { ip });
        };

        // String comparison: the provider's content is not parsed
        if current.content == reported {
            info!("DDNS Updater: IP ({}) for {} has not changed.", ip, name);
            return Ok(ReconcileOutcome::Unchanged { ip });
        }

        let update = RecordUpdate::new(name, ip.to_string(), record.proxy);

        if self.dry_run {
            info!(
                "[DRY-RUN] DDNS Updater: Would update {} (record {}) from {} to {} (proxied: {})",
                name, current.id, current.content, ip, record.proxy
            );
            return Ok(ReconcileOutcome::DryRun {
                previous: current.content,
                ip,
            });
        }

        let body = self.provider.update_record(&current.id, &update).await?;

        if self.provider.is_success(&body) {
            info!("DDNS Updater: {} {} DDNS updated.", ip, name);
            Ok(ReconcileOutcome::Updated {
                previous: current.content,
                ip,
            })
        } else {
            error!(
                "DDNS Updater: {} {} DDNS failed for {} ({}). DUMPING RESULTS:\n{}",
                ip, name, current.id, ip, body
            );
            Ok(ReconcileOutcome::Rejected {
                record_id: current.id,
                body,
            })
        }
    }
}
