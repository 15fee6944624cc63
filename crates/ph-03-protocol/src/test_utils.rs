//! Test utilities for the herd protocol.
//!
//! Deterministic implementations of the outbound ports. Enable with the
//! `test-utils` feature flag.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use ph_03_protocol::test_utils::FixedClock;
//! use ph_03_protocol::Clock;
//!
//! let clock = FixedClock::new(Duration::from_secs(1_520_023_935));
//! assert_eq!(clock.now().as_secs(), 1_520_023_935);
//! ```

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{NearbyPlaces, NearbyQuery};
use crate::error::CollaboratorError;
use crate::ports::{Clock, NearbyQueryClient};

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<Duration>,
}

impl FixedClock {
    pub fn new(now: Duration) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: Duration) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = now;
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Duration {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

type FailureFn = fn() -> CollaboratorError;

/// Nearby client answering every lookup with the same result.
///
/// Records each query it receives.
#[derive(Debug)]
pub struct StaticNearbyClient {
    places: Result<NearbyPlaces, FailureFn>,
    queries: Mutex<Vec<NearbyQuery>>,
}

impl StaticNearbyClient {
    pub fn returning(places: NearbyPlaces) -> Self {
        Self {
            places: Ok(places),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: FailureFn) -> Self {
        Self {
            places: Err(error),
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Queries received so far, oldest first.
    pub fn queries(&self) -> Vec<NearbyQuery> {
        self.queries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl Default for StaticNearbyClient {
    fn default() -> Self {
        Self::returning(NearbyPlaces::with_results(Vec::new()))
    }
}

#[async_trait]
impl NearbyQueryClient for StaticNearbyClient {
    async fn lookup(&self, query: NearbyQuery) -> Result<NearbyPlaces, CollaboratorError> {
        self.queries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(query);
        match &self.places {
            Ok(places) => Ok(places.clone()),
            Err(error) => Err(error()),
        }
    }
}
