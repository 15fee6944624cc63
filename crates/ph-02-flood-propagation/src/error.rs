//! Error types for flood propagation and topology loading.

use std::io;
use std::time::Duration;

use thiserror::Error;

/// A single flood attempt to one neighbor failed.
///
/// Always non-fatal: the propagator logs it and keeps going with the
/// remaining neighbors.
#[derive(Debug, Error)]
pub enum PeerUnreachableError {
    #[error("Connect to {neighbor} timed out after {after:?}")]
    ConnectTimeout { neighbor: String, after: Duration },

    #[error("Connect to {neighbor} failed: {source}")]
    Connect {
        neighbor: String,
        #[source]
        source: io::Error,
    },

    #[error("Write to {neighbor} timed out after {after:?}")]
    WriteTimeout { neighbor: String, after: Duration },

    #[error("Write to {neighbor} failed: {source}")]
    Write {
        neighbor: String,
        #[source]
        source: io::Error,
    },

    #[error("Flood attempt to {neighbor} exceeded {after:?}")]
    AttemptTimeout { neighbor: String, after: Duration },

    #[error("Flood attempt to {neighbor} was cancelled")]
    Cancelled { neighbor: String },
}

impl PeerUnreachableError {
    /// Name of the neighbor the failed attempt targeted.
    pub fn neighbor(&self) -> &str {
        match self {
            Self::ConnectTimeout { neighbor, .. }
            | Self::Connect { neighbor, .. }
            | Self::WriteTimeout { neighbor, .. }
            | Self::Write { neighbor, .. }
            | Self::AttemptTimeout { neighbor, .. }
            | Self::Cancelled { neighbor } => neighbor,
        }
    }
}

/// The neighbor graph is inconsistent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopologyError {
    #[error("Topology has no servers")]
    Empty,

    #[error("Server {0} is declared more than once")]
    DuplicateServer(String),

    #[error("Server {server} floods to undeclared neighbor {neighbor}")]
    UnknownNeighbor { server: String, neighbor: String },

    #[error("Server {server} lists neighbor {neighbor} more than once")]
    DuplicateNeighbor { server: String, neighbor: String },

    #[error("Server {0} lists itself as a neighbor")]
    SelfLoop(String),

    #[error("Unknown server: {0}")]
    UnknownServer(String),
}

/// Errors that can occur while loading the herd configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {error}")]
    Io { path: String, error: String },

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("Server {server} has an invalid address {address:?}")]
    InvalidAddress { server: String, address: String },

    #[error(transparent)]
    Topology(#[from] TopologyError),
}
