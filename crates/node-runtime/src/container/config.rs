//! # Herd Configuration
//!
//! One TOML file describes the whole herd plus this process's runtime knobs.
//! Every table is optional; a missing file means the built-in herd with
//! default limits.
//!
//! ```toml
//! [[servers]]
//! name = "Goloman"
//! address = "127.0.0.1:12001"
//! neighbors = ["Hands", "Holiday", "Wilkes"]
//!
//! [flood]
//! connect_timeout_ms = 2000
//! write_timeout_ms = 2000
//! max_in_flight = 64
//!
//! [listener]
//! max_line_bytes = 8192
//! read_timeout_ms = 10000
//!
//! [places]
//! endpoint = "https://maps.googleapis.com/maps/api/place/nearbysearch/json"
//! api_key = "..."
//! timeout_ms = 10000
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use ph_02_flood_propagation::adapters::{StaticTopologyProvider, TomlTopologyProvider};
use ph_02_flood_propagation::{FloodConfig, Topology, TopologyProvider};
use ph_03_protocol::PlacesConfig;
use serde::Deserialize;
use thiserror::Error;

/// Environment variable overriding `[places] api_key`.
pub const ENV_PLACES_API_KEY: &str = "HERD_PLACES_API_KEY";
/// Environment variable overriding `[places] endpoint`.
pub const ENV_PLACES_ENDPOINT: &str = "HERD_PLACES_ENDPOINT";

/// Errors raised while loading the runtime configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {error}")]
    Io { path: String, error: String },

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error(transparent)]
    Herd(#[from] ph_02_flood_propagation::ConfigError),
}

/// Limits applied to each inbound connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenerConfig {
    /// Longest accepted line, terminator excluded.
    pub max_line_bytes: usize,
    /// Deadline for the whole line to arrive, and for the reply to be written.
    pub read_timeout: Duration,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            max_line_bytes: 8 * 1024,
            read_timeout: Duration::from_secs(10),
        }
    }
}

/// Complete runtime configuration.
#[derive(Debug, Clone)]
pub struct HerdConfig {
    pub topology: Topology,
    pub flood: FloodConfig,
    pub listener: ListenerConfig,
    pub places: PlacesConfig,
}

impl Default for HerdConfig {
    fn default() -> Self {
        let provider = StaticTopologyProvider::new();
        Self {
            topology: provider.topology(),
            flood: provider.flood_config(),
            listener: ListenerConfig::default(),
            places: PlacesConfig::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RuntimeSections {
    #[serde(default)]
    listener: ListenerSection,
    #[serde(default)]
    places: PlacesSection,
}

#[derive(Debug, Default, Deserialize)]
struct ListenerSection {
    max_line_bytes: Option<usize>,
    read_timeout_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct PlacesSection {
    endpoint: Option<String>,
    api_key: Option<String>,
    timeout_ms: Option<u64>,
}

impl HerdConfig {
    /// Load from `path`, or the built-in defaults when `path` is `None`.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed, or describes an
    /// inconsistent topology.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        Self::parse(&content)
    }

    /// Parse a full configuration file.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let herd = TomlTopologyProvider::parse(content)?;
        let sections: RuntimeSections =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        let defaults = Self::default();
        let listener = ListenerConfig {
            max_line_bytes: sections
                .listener
                .max_line_bytes
                .unwrap_or(defaults.listener.max_line_bytes)
                .max(1),
            read_timeout: sections
                .listener
                .read_timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.listener.read_timeout),
        };
        let places = PlacesConfig {
            endpoint: sections
                .places
                .endpoint
                .unwrap_or(defaults.places.endpoint),
            api_key: sections.places.api_key,
            timeout: sections
                .places
                .timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.places.timeout),
        };

        Ok(Self {
            topology: herd.topology(),
            flood: herd.flood_config(),
            listener,
            places,
        })
    }

    /// Apply `HERD_*` overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply `HERD_*` overrides from `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(ENV_PLACES_API_KEY).filter(|k| !k.is_empty()) {
            self.places.api_key = Some(key);
        }
        if let Some(endpoint) = lookup(ENV_PLACES_ENDPOINT).filter(|e| !e.is_empty()) {
            self.places.endpoint = endpoint;
        }
    }
}
