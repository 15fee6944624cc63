//! Adapters for the protocol's driven ports.

pub mod clock;
pub mod places;

pub use clock::SystemClock;
pub use places::{GooglePlacesClient, PlacesConfig, UnconfiguredPlacesClient, DEFAULT_PLACES_ENDPOINT};
