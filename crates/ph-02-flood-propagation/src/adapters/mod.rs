//! Adapters for flood propagation.
//!
//! - `tcp`: one-shot TCP delivery to neighbors
//! - `config`: static and TOML topology providers

pub mod config;
pub mod tcp;

pub use config::{StaticTopologyProvider, TomlTopologyProvider};
pub use tcp::TcpPeerTransport;
