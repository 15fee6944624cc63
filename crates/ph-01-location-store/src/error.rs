//! Error types for parsing position fields.

use thiserror::Error;

/// Errors raised while parsing the position fields of a report.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PositionError {
    #[error("Client timestamp is not an unsigned decimal: {0:?}")]
    InvalidTimestamp(String),

    #[error("Client timestamp does not fit in 64-bit seconds: {0:?}")]
    TimestampOverflow(String),

    #[error("Malformed coordinate token: {0:?}")]
    InvalidCoordinates(String),

    #[error("Latitude out of range [-90, 90]: {0}")]
    LatitudeOutOfRange(f64),

    #[error("Longitude out of range [-180, 180]: {0}")]
    LongitudeOutOfRange(f64),
}
