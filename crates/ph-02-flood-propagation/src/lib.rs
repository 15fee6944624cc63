//! # Flood Propagation Subsystem (ph-02)
//!
//! Pushes every newly accepted position update to this server's configured
//! neighbors. Each neighbor gets its own short-lived, one-way connection.
//!
//! ## Architecture Role
//!
//! ```text
//! [Protocol (ph-03)] ──AT line──→ [FloodPropagator]
//!                                        │
//!                                        ↓ one task per outbound edge
//!                                ┌───────┴───────┐
//!                                ↓               ↓
//!                          [Neighbor A]    [Neighbor B] ...
//! ```
//!
//! ## Delivery Guarantees
//!
//! - At-most-once, best-effort, per edge. No acknowledgment, no retry.
//! - A dead or slow neighbor never blocks delivery to the others: every
//!   attempt is bounded by connect and write timeouts.
//! - Termination on cyclic topologies comes from the freshness rule in
//!   ph-01: a server only re-floods an update that advanced its store.

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use domain::*;
pub use error::{ConfigError, PeerUnreachableError, TopologyError};
pub use ports::inbound::FloodApi;
pub use ports::outbound::{PeerTransport, TopologyProvider};
pub use service::FloodPropagator;
