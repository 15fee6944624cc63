//! # Herd Node Container
//!
//! Holds the subsystem instances of one herd server and wires them together.
//!
//! - `config`: TOML + environment configuration
//! - `node`: `HerdNode`, the store, dispatcher and propagator of one server

pub mod config;
pub mod node;

pub use config::{ConfigError, HerdConfig, ListenerConfig};
pub use node::{nearby_client, HerdNode};
