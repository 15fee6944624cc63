//! Result payload of a nearby-places lookup.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Status values that count as a successful lookup.
pub const STATUS_OK: &str = "OK";
pub const STATUS_ZERO_RESULTS: &str = "ZERO_RESULTS";

/// A nearby-search response.
///
/// Individual places are kept as opaque JSON so they are re-emitted with
/// every field the lookup service returned.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NearbyPlaces {
    #[serde(default)]
    pub html_attributions: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
    #[serde(default)]
    pub results: Vec<Value>,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl NearbyPlaces {
    /// A successful response carrying `results`.
    pub fn with_results(results: Vec<Value>) -> Self {
        let status = if results.is_empty() {
            STATUS_ZERO_RESULTS
        } else {
            STATUS_OK
        };
        Self {
            results,
            status: status.to_string(),
            ..Default::default()
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == STATUS_OK || self.status == STATUS_ZERO_RESULTS
    }

    /// Keep at most `max` results.
    pub fn truncate(&mut self, max: usize) {
        self.results.truncate(max);
    }
}
