//! # Node Runtime Library
//!
//! Runtime pieces of one herd server, exposed for the binary and for
//! integration tests.
//!
//! - `container/`: configuration and subsystem wiring (`HerdNode`)
//! - `server`: TCP accept loop and per-connection handling
//! - `telemetry`: tracing subscriber setup

pub mod container;
pub mod server;
pub mod telemetry;

pub use container::{nearby_client, ConfigError, HerdConfig, HerdNode, ListenerConfig};
pub use server::{ConnectionHandler, HerdServer};
pub use telemetry::{default_log_file, init_logging, LogConfig, TelemetryError};
