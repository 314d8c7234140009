// # ddns-core
//
// Core library for the one-shot DDNS updater.
//
// ## Architecture Overview
//
// - **IpSource**: Trait for determining the current public IP
// - **DnsProvider**: Trait for reading and updating DNS records via provider APIs
// - **Reconciler**: Compares each record with the public IP and updates on mismatch
// - **config**: Credentials and the JSON record list
//
// A run is a single sequential pass: no daemon, no persisted state. The
// provider holds the only durable data.

pub mod traits;
pub mod engine;
pub mod config;
pub mod error;

// Re-export core types for convenience
pub use traits::{IpSource, DnsProvider, DnsRecordSnapshot, RecordUpdate};
pub use engine::{Reconciler, ReconcileOutcome};
pub use config::{Credentials, RecordSpec, load_records, parse_records};
pub use error::{Error, Result};
