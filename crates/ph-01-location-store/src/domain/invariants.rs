//! Freshness invariant for position records.

use super::PositionRecord;

/// Last-writer-wins: a candidate supersedes the stored record only when its
/// client timestamp is strictly greater. Ties are stale.
pub fn invariant_strictly_newer(candidate: &PositionRecord, stored: &PositionRecord) -> bool {
    candidate.client_time > stored.client_time
}
