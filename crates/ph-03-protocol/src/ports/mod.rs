//! # Ports Layer
//!
//! - **inbound**: `MessageHandler` (what the listener calls)
//! - **outbound**: `NearbyQueryClient`, `Clock`

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
