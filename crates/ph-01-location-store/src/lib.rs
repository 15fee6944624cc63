//! # Location Store (ph-01)
//!
//! Keeps exactly one position record per client and decides, atomically,
//! whether an incoming record is new information.
//!
//! ## Architecture Role
//!
//! ```text
//! [IAMAT handler] ──compare_and_update──→ [LocationStore] ←──get── [WHATSAT handler]
//! [AT handler]    ──compare_and_update──┘
//!                                │
//!                                ↓ UpdateOutcome::is_new()
//!                       [Flood Propagation (ph-02)]
//! ```
//!
//! ## Freshness Rule
//!
//! A record replaces the stored one only when its client timestamp is
//! strictly greater. Equal or older timestamps are discarded, which is what
//! stops a flood cascade from looping forever on a cyclic topology.

pub mod domain;
pub mod error;
pub mod store;

pub use domain::*;
pub use error::PositionError;
pub use store::{LocationStore, UpdateOutcome};
