//! Outbound ports (SPI) for Flood Propagation.

use async_trait::async_trait;

use crate::domain::{FloodConfig, ServerIdentity, Topology};
use crate::error::PeerUnreachableError;

/// One-way delivery of a message to a neighbor server.
///
/// Implementations open a fresh connection per call, write the message,
/// signal end-of-output and close. Nothing is read back.
#[async_trait]
pub trait PeerTransport: Send + Sync + 'static {
    async fn deliver(
        &self,
        neighbor: &ServerIdentity,
        message: &str,
    ) -> Result<(), PeerUnreachableError>;
}

/// Source of the static herd configuration.
pub trait TopologyProvider: Send + Sync {
    /// The full neighbor graph.
    fn topology(&self) -> Topology;

    /// Flood timeouts and concurrency bound.
    fn flood_config(&self) -> FloodConfig;
}
