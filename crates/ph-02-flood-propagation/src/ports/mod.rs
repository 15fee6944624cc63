//! Ports layer for Flood Propagation.

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
