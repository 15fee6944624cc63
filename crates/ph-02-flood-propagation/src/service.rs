//! # Flood Propagator
//!
//! Fans one message out to every outbound neighbor of this server.
//!
//! Each neighbor gets its own task. Attempts run concurrently, are bounded
//! by a shared in-flight limit, and are cut off by the attempt deadline.
//! A failed attempt is logged and recorded, never retried.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::domain::{FloodAttempt, FloodConfig, FloodReport, ServerIdentity, Topology};
use crate::error::{PeerUnreachableError, TopologyError};
use crate::ports::inbound::FloodApi;
use crate::ports::outbound::PeerTransport;

/// Flood propagation service for one server of the herd.
///
/// Thread-safe; share it across connection tasks via `Arc`.
pub struct FloodPropagator<T: PeerTransport> {
    origin: String,
    /// Resolved outbound edges, in declaration order.
    neighbors: Vec<ServerIdentity>,
    transport: Arc<T>,
    config: FloodConfig,
    /// Shared across every flood issued by this server.
    in_flight: Arc<Semaphore>,
}

impl<T: PeerTransport> FloodPropagator<T> {
    /// Create a propagator for `origin`.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::UnknownServer`] if `origin` is not part of
    /// the topology.
    pub fn new(
        origin: &str,
        topology: &Topology,
        transport: Arc<T>,
        config: FloodConfig,
    ) -> Result<Self, TopologyError> {
        let neighbors = topology
            .neighbors_of(origin)?
            .into_iter()
            .cloned()
            .collect();

        Ok(Self {
            origin: origin.to_string(),
            neighbors,
            transport,
            in_flight: Arc::new(Semaphore::new(config.max_in_flight.max(1))),
            config,
        })
    }

    pub fn neighbors(&self) -> &[ServerIdentity] {
        &self.neighbors
    }

    pub fn config(&self) -> &FloodConfig {
        &self.config
    }

    async fn attempt(
        transport: Arc<T>,
        in_flight: Arc<Semaphore>,
        neighbor: ServerIdentity,
        message: Arc<str>,
        config: FloodConfig,
    ) -> Result<(), PeerUnreachableError> {
        let _permit = in_flight
            .acquire_owned()
            .await
            .map_err(|_| PeerUnreachableError::Cancelled {
                neighbor: neighbor.name.clone(),
            })?;

        let deadline = config.attempt_timeout();
        match timeout(deadline, transport.deliver(&neighbor, &message)).await {
            Ok(result) => result,
            Err(_) => Err(PeerUnreachableError::AttemptTimeout {
                neighbor: neighbor.name.clone(),
                after: deadline,
            }),
        }
    }
}

#[async_trait]
impl<T: PeerTransport> FloodApi for FloodPropagator<T> {
    fn origin(&self) -> &str {
        &self.origin
    }

    async fn flood(&self, message: &str) -> FloodReport {
        let mut report = FloodReport::new(&self.origin);
        if self.neighbors.is_empty() {
            debug!(origin = %self.origin, "No neighbors to flood");
            return report;
        }

        info!(
            origin = %self.origin,
            neighbors = self.neighbors.len(),
            "Flooding update"
        );

        let message: Arc<str> = Arc::from(message);
        let mut tasks = JoinSet::new();
        for (index, neighbor) in self.neighbors.iter().enumerate() {
            let fut = Self::attempt(
                Arc::clone(&self.transport),
                Arc::clone(&self.in_flight),
                neighbor.clone(),
                Arc::clone(&message),
                self.config.clone(),
            );
            tasks.spawn(async move { (index, fut.await) });
        }

        let mut outcomes: Vec<Option<Result<(), PeerUnreachableError>>> =
            (0..self.neighbors.len()).map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, outcome)) => outcomes[index] = Some(outcome),
                Err(e) => warn!(origin = %self.origin, error = %e, "Flood task aborted"),
            }
        }

        for (neighbor, outcome) in self.neighbors.iter().zip(outcomes) {
            let outcome = outcome.unwrap_or_else(|| {
                Err(PeerUnreachableError::Cancelled {
                    neighbor: neighbor.name.clone(),
                })
            });
            match &outcome {
                Ok(()) => debug!(neighbor = %neighbor.name, "Delivered"),
                Err(e) => warn!(neighbor = %neighbor.name, error = %e, "Neighbor unreachable"),
            }
            report.attempts.push(FloodAttempt {
                neighbor: neighbor.name.clone(),
                outcome,
            });
        }

        debug!(
            origin = %self.origin,
            delivered = report.delivered(),
            failed = report.failed(),
            "Flood complete"
        );
        report
    }
}
