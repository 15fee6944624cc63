use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::domain::{FloodConfig, ServerIdentity, Topology};
use crate::error::ConfigError;
use crate::ports::TopologyProvider;

// ============================================================================
// StaticTopologyProvider - Compiled-in herd
// ============================================================================

/// Provider backed by values fixed at construction.
///
/// Defaults to [`Topology::builtin`] and [`FloodConfig::default`].
#[derive(Debug, Clone)]
pub struct StaticTopologyProvider {
    topology: Topology,
    config: FloodConfig,
}

impl StaticTopologyProvider {
    #[must_use]
    pub fn new() -> Self {
        Self {
            topology: Topology::builtin(),
            config: FloodConfig::default(),
        }
    }

    #[must_use]
    pub fn with_topology(mut self, topology: Topology) -> Self {
        self.topology = topology;
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: FloodConfig) -> Self {
        self.config = config;
        self
    }
}

impl Default for StaticTopologyProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl TopologyProvider for StaticTopologyProvider {
    fn topology(&self) -> Topology {
        self.topology.clone()
    }

    fn flood_config(&self) -> FloodConfig {
        self.config.clone()
    }
}

// ============================================================================
// TomlTopologyProvider - Herd loaded from a config file
// ============================================================================

#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    servers: Vec<ServerEntry>,
    #[serde(default)]
    flood: FloodSection,
}

#[derive(Debug, Deserialize)]
struct ServerEntry {
    name: String,
    address: String,
    #[serde(default)]
    neighbors: Vec<String>,
}

#[derive(Debug, Deserialize, Default)]
struct FloodSection {
    connect_timeout_ms: Option<u64>,
    write_timeout_ms: Option<u64>,
    max_in_flight: Option<usize>,
}

/// TOML-based topology provider.
///
/// Other tables in the same file (listener, places) are ignored here.
///
/// # Config File Format
///
/// ```toml
/// [[servers]]
/// name = "Goloman"
/// address = "127.0.0.1:12001"
/// neighbors = ["Hands", "Holiday", "Wilkes"]
///
/// [[servers]]
/// name = "Hands"
/// address = "127.0.0.1:12002"
/// neighbors = ["Goloman"]
///
/// [flood]
/// connect_timeout_ms = 2000
/// write_timeout_ms = 2000
/// max_in_flight = 64
/// ```
///
/// An empty `servers` list falls back to the built-in herd.
#[derive(Debug, Clone)]
pub struct TomlTopologyProvider {
    topology: Topology,
    config: FloodConfig,
}

impl TomlTopologyProvider {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, parsed, or describes an
    /// inconsistent topology.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        let topology = if file.servers.is_empty() {
            Topology::builtin()
        } else {
            let servers = file
                .servers
                .into_iter()
                .map(|entry| {
                    let address: SocketAddr =
                        entry
                            .address
                            .parse()
                            .map_err(|_| ConfigError::InvalidAddress {
                                server: entry.name.clone(),
                                address: entry.address.clone(),
                            })?;
                    Ok(ServerIdentity::new(entry.name, address, entry.neighbors))
                })
                .collect::<Result<Vec<_>, ConfigError>>()?;
            Topology::new(servers)?
        };

        let defaults = FloodConfig::default();
        let fc = file.flood;
        let config = FloodConfig {
            connect_timeout: fc
                .connect_timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.connect_timeout),
            write_timeout: fc
                .write_timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.write_timeout),
            max_in_flight: fc.max_in_flight.unwrap_or(defaults.max_in_flight).max(1),
        };

        Ok(Self { topology, config })
    }
}

impl TopologyProvider for TomlTopologyProvider {
    fn topology(&self) -> Topology {
        self.topology.clone()
    }

    fn flood_config(&self) -> FloodConfig {
        self.config.clone()
    }
}
