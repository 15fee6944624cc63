//! # Domain Layer for Flood Propagation
//!
//! - **topology**: `ServerIdentity`, `Topology` (static directed neighbor graph)
//! - **value_objects**: `FloodConfig`, `FloodReport`, `FloodAttempt`

mod topology;
mod value_objects;

pub use topology::*;
pub use value_objects::*;
