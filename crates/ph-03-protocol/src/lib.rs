//! # Herd Protocol (ph-03)
//!
//! Parses, validates and routes the three line-oriented messages a herd
//! server understands.
//!
//! ## Architecture Role
//!
//! ```text
//!                        ┌──IAMAT──→ [LocationStore] ──new?──→ flood AT line
//! [Listener] ──line──→ [ProtocolDispatcher]
//!                        ├──WHATSAT──→ [LocationStore] → [NearbyQueryClient]
//!                        └──AT─────→ [LocationStore] ──new?──→ re-flood same text
//! ```
//!
//! ## Wire Format
//!
//! ```text
//! IAMAT <client_id> <±lat±lon> <client_time>
//! WHATSAT <client_id> <radius_km> <max_results>
//! AT <server_id> <±time_diff> <client_id> <±lat±lon> <client_time>
//! ? <original message>      invalid message
//! ! <original message>      nearby lookup failed
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use adapters::{
    GooglePlacesClient, PlacesConfig, SystemClock, UnconfiguredPlacesClient,
    DEFAULT_PLACES_ENDPOINT,
};
pub use domain::*;
pub use error::{CollaboratorError, ProtocolError};
pub use ports::{Clock, Dispatch, MessageHandler, NearbyQueryClient};
pub use service::{strip_line_terminator, ProtocolDispatcher};

#[cfg(feature = "test-utils")]
pub use test_utils::{FixedClock, StaticNearbyClient};
