// # IP Source Trait
//
// Defines the interface for determining the caller's public IP address.
//
// ## Implementations
//
// - HTTP echo services with a single fallback: `ddns-ip-http` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::IpSource;
//
// async fn show(source: &dyn IpSource) -> ddns_core::Result<()> {
//     let ip = source.current().await?;
//     println!("public IP: {}", ip);
//     Ok(())
// }
// ```

use async_trait::async_trait;

/// Trait for IP source implementations
///
/// `current()` is called once per reconciled record; implementations must
/// not cache the answer across calls.
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Get the current public IP address as reported by the source
    ///
    /// The returned text is already trimmed of surrounding whitespace. It may
    /// be empty if the service answered with an empty body; callers decide
    /// what to do with that.
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: The reported address
    /// - `Err(Error::IpLookup)`: If every configured service failed
    async fn current(&self) -> Result<String, crate::Error>;

    /// Name of the source (for logging/debugging)
    fn source_name(&self) -> &'static str;
}
