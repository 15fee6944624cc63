//! # Domain Layer for the Location Store
//!
//! Pure value types with no I/O.
//!
//! ## Contents
//!
//! - **value_objects**: `ClientTimestamp`, `Coordinates`, decimal token rules
//! - **entities**: `PositionRecord`
//! - **invariants**: the freshness (last-writer-wins) rule

mod entities;
mod invariants;
mod value_objects;

pub use entities::*;
pub use invariants::*;
pub use value_objects::*;
