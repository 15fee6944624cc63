//! Inbound ports (API) for Flood Propagation.

use async_trait::async_trait;

use crate::domain::FloodReport;

/// Primary API for flooding an update.
#[async_trait]
pub trait FloodApi: Send + Sync {
    /// Name of the server doing the flooding.
    fn origin(&self) -> &str;

    /// Send `message` verbatim to every outbound neighbor of the origin.
    ///
    /// Never fails as a whole: each neighbor's outcome is in the report.
    async fn flood(&self, message: &str) -> FloodReport;
}
