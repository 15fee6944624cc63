//! # Domain Layer for the Herd Protocol
//!
//! - **command**: `Command` parsing and per-verb validation
//! - **value_objects**: `RadiusKm`, `MaxResults`, `TimeDiff`, `NearbyQuery`
//! - **places**: `NearbyPlaces` payload
//! - **response**: wire rendering of `?`, `!`, `AT` and WHATSAT replies

mod command;
mod places;
pub mod response;
mod value_objects;

pub use command::*;
pub use places::*;
pub use value_objects::*;
