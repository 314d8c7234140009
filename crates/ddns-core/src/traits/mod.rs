//! Core traits for the DDNS updater
//!
//! - [`IpSource`]: Determine the current public IP address
//! - [`DnsProvider`]: Read and update DNS records via a provider API

pub mod ip_source;
pub mod dns_provider;

pub use ip_source::IpSource;
pub use dns_provider::{DnsProvider, DnsRecordSnapshot, RecordUpdate};
