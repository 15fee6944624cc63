//! # Integration Flows
//!
//! - `cascade`: flood termination and convergence on a cyclic topology,
//!   with neighbor delivery simulated in memory
//! - `herd`: end-to-end IAMAT / AT / WHATSAT over real sockets

pub mod cascade;
pub mod herd;
