//! Error types for the DDNS updater
//!
//! Errors fall into four classes. Only [`Error::IpLookup`] aborts a run;
//! everything else is scoped to the record being reconciled, or to input
//! loading before any network traffic happens.

use thiserror::Error;

/// Result type alias for DDNS operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the DDNS updater
#[derive(Error, Debug)]
pub enum Error {
    /// Every configured IP echo service failed
    #[error("IP lookup failed: {0}")]
    IpLookup(String),

    /// Transport-level failure talking to the DNS provider
    #[error("Network error: {0}")]
    Network(String),

    /// Malformed input file or invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// The provider answered with something we cannot use
    #[error("Data error: {0}")]
    Data(String),
}

impl Error {
    /// Create an IP lookup error
    pub fn ip_lookup(msg: impl Into<String>) -> Self {
        Self::IpLookup(msg.into())
    }

    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a data error
    pub fn data(msg: impl Into<String>) -> Self {
        Self::Data(msg.into())
    }

    /// Whether this error ends the whole run rather than a single record
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::IpLookup(_))
    }
}
