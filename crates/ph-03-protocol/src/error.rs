//! Error types for the herd message protocol.

use ph_01_location_store::PositionError;
use thiserror::Error;

/// Result type for protocol parsing.
pub type Result<T> = std::result::Result<T, ProtocolError>;

/// A message could not be accepted.
///
/// Every variant except [`ProtocolError::MalformedPeerMessage`] is answered
/// with `? <original message>`. Malformed peer messages are dropped.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProtocolError {
    #[error("Empty message")]
    Empty,

    #[error("Unknown verb: {0:?}")]
    UnknownVerb(String),

    #[error("{verb} expects {expected} fields, got {got}")]
    FieldCount {
        verb: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("Invalid {verb} position: {source}")]
    InvalidPosition {
        verb: &'static str,
        #[source]
        source: PositionError,
    },

    #[error("Radius must be a number in (0, 50] km: {0:?}")]
    InvalidRadius(String),

    #[error("Result bound must be an integer in [0, 20]: {0:?}")]
    InvalidMaxResults(String),

    #[error("No position known for client {0:?}")]
    UnknownClient(String),

    #[error("Malformed peer message: {0}")]
    MalformedPeerMessage(String),
}

impl ProtocolError {
    /// True if the sender should get a `?` echo.
    pub fn is_echoed(&self) -> bool {
        !matches!(self, Self::MalformedPeerMessage(_))
    }
}

/// The nearby-places collaborator failed.
///
/// Never turned into an empty success; the client gets `! <original>`.
#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("Places request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Places rejected the request with status {status}: {message}")]
    Rejected { status: String, message: String },

    #[error("Places returned an undecodable body: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    #[error("No Places API key configured")]
    Unconfigured,
}
