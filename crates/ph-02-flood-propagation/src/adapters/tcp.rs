use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::domain::{FloodConfig, ServerIdentity};
use crate::error::PeerUnreachableError;
use crate::ports::PeerTransport;

// ============================================================================
// TcpPeerTransport - Production one-shot TCP delivery
// ============================================================================

/// Delivers a flood message over a fresh TCP connection.
///
/// # Wire Protocol
///
/// The message text followed by `\n`, then the write half is shut down.
/// The receiving server answers nothing on peer connections.
#[derive(Debug, Clone)]
pub struct TcpPeerTransport {
    connect_timeout: Duration,
    write_timeout: Duration,
}

impl TcpPeerTransport {
    pub fn new(connect_timeout: Duration, write_timeout: Duration) -> Self {
        Self {
            connect_timeout,
            write_timeout,
        }
    }

    pub fn from_config(config: &FloodConfig) -> Self {
        Self::new(config.connect_timeout, config.write_timeout)
    }
}

impl Default for TcpPeerTransport {
    fn default() -> Self {
        Self::from_config(&FloodConfig::default())
    }
}

#[async_trait]
impl PeerTransport for TcpPeerTransport {
    async fn deliver(
        &self,
        neighbor: &ServerIdentity,
        message: &str,
    ) -> Result<(), PeerUnreachableError> {
        let mut stream = timeout(self.connect_timeout, TcpStream::connect(neighbor.address))
            .await
            .map_err(|_| PeerUnreachableError::ConnectTimeout {
                neighbor: neighbor.name.clone(),
                after: self.connect_timeout,
            })?
            .map_err(|source| PeerUnreachableError::Connect {
                neighbor: neighbor.name.clone(),
                source,
            })?;

        let write = async {
            stream.write_all(message.as_bytes()).await?;
            stream.write_all(b"\n").await?;
            stream.shutdown().await
        };

        timeout(self.write_timeout, write)
            .await
            .map_err(|_| PeerUnreachableError::WriteTimeout {
                neighbor: neighbor.name.clone(),
                after: self.write_timeout,
            })?
            .map_err(|source| PeerUnreachableError::Write {
                neighbor: neighbor.name.clone(),
                source,
            })
    }
}
