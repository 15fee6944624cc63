//! Driven ports: the nearby-places collaborator and the wall clock.

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{NearbyPlaces, NearbyQuery};
use crate::error::CollaboratorError;

/// External point-of-interest lookup.
///
/// A failure is always an error, never an empty success.
#[async_trait]
pub trait NearbyQueryClient: Send + Sync {
    async fn lookup(&self, query: NearbyQuery) -> Result<NearbyPlaces, CollaboratorError>;
}

/// Source of server wall-clock time.
pub trait Clock: Send + Sync {
    /// Time elapsed since the Unix epoch.
    fn now(&self) -> Duration;
}
