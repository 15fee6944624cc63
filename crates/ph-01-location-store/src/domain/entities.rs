//! # Core Domain Entities
//!
//! - [`PositionRecord`]: the last known position of one client

use super::{ClientTimestamp, Coordinates};
use crate::error::PositionError;

/// The last known position of a client.
///
/// Exactly one record per client id is retained at a server. A record is
/// replaced wholesale by a strictly newer one, never merged field by field.
#[derive(Clone, Debug, PartialEq)]
pub struct PositionRecord {
    /// Opaque, externally supplied client identifier.
    pub client_id: String,
    /// Position the client reported.
    pub coordinates: Coordinates,
    /// Client clock reading attached to the report.
    pub client_time: ClientTimestamp,
}

impl PositionRecord {
    pub fn new(
        client_id: impl Into<String>,
        coordinates: Coordinates,
        client_time: ClientTimestamp,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            coordinates,
            client_time,
        }
    }

    /// Build a record from the three raw wire tokens of a report.
    pub fn from_tokens(
        client_id: &str,
        coordinates: &str,
        client_time: &str,
    ) -> Result<Self, PositionError> {
        Ok(Self::new(
            client_id,
            Coordinates::parse(coordinates)?,
            ClientTimestamp::parse(client_time)?,
        ))
    }
}
