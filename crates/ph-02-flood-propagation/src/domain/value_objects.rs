//! Value objects for flood configuration and results.

use std::time::Duration;

use crate::error::PeerUnreachableError;

/// Flood propagation configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FloodConfig {
    /// Upper bound on establishing one outbound connection.
    pub connect_timeout: Duration,
    /// Upper bound on writing the message and closing the write half.
    pub write_timeout: Duration,
    /// Maximum outbound attempts in flight across all floods.
    pub max_in_flight: usize,
}

impl FloodConfig {
    /// Overall deadline for one attempt, regardless of transport.
    pub fn attempt_timeout(&self) -> Duration {
        self.connect_timeout + self.write_timeout
    }
}

impl Default for FloodConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_millis(2_000),
            write_timeout: Duration::from_millis(2_000),
            max_in_flight: 64,
        }
    }
}

/// Outcome of one outbound attempt.
#[derive(Debug)]
pub struct FloodAttempt {
    pub neighbor: String,
    pub outcome: Result<(), PeerUnreachableError>,
}

impl FloodAttempt {
    pub fn is_delivered(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Per-neighbor results of one flood, in topology order.
#[derive(Debug, Default)]
pub struct FloodReport {
    pub origin: String,
    pub attempts: Vec<FloodAttempt>,
}

impl FloodReport {
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            attempts: Vec::new(),
        }
    }

    pub fn attempted(&self) -> usize {
        self.attempts.len()
    }

    pub fn delivered(&self) -> usize {
        self.attempts.iter().filter(|a| a.is_delivered()).count()
    }

    pub fn failed(&self) -> usize {
        self.attempted() - self.delivered()
    }

    /// Neighbor names in the order they were attempted.
    pub fn neighbors(&self) -> Vec<&str> {
        self.attempts.iter().map(|a| a.neighbor.as_str()).collect()
    }
}
