use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::domain::{NearbyPlaces, NearbyQuery};
use crate::error::CollaboratorError;
use crate::ports::NearbyQueryClient;

pub const DEFAULT_PLACES_ENDPOINT: &str =
    "https://maps.googleapis.com/maps/api/place/nearbysearch/json";

/// Settings for the Places nearby-search client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacesConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl Default for PlacesConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_PLACES_ENDPOINT.to_string(),
            api_key: None,
            timeout: Duration::from_secs(10),
        }
    }
}

// ============================================================================
// GooglePlacesClient - Places nearby search over HTTPS
// ============================================================================

/// Nearby-search client for the Google Places JSON API.
#[derive(Debug, Clone)]
pub struct GooglePlacesClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl GooglePlacesClient {
    /// Build a client from config.
    ///
    /// # Errors
    ///
    /// [`CollaboratorError::Unconfigured`] without an API key, or
    /// [`CollaboratorError::Transport`] if the HTTP client cannot be built.
    pub fn new(config: &PlacesConfig) -> Result<Self, CollaboratorError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or(CollaboratorError::Unconfigured)?;

        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout.min(Duration::from_secs(2)))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key,
        })
    }
}

#[async_trait]
impl NearbyQueryClient for GooglePlacesClient {
    async fn lookup(&self, query: NearbyQuery) -> Result<NearbyPlaces, CollaboratorError> {
        let location = format!("{},{}", query.latitude, query.longitude);
        let radius = query.radius_meters.to_string();

        debug!(location = %location, radius = %radius, "Places nearby search");

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("location", location.as_str()),
                ("radius", radius.as_str()),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let body = response.bytes().await?;
        let places: NearbyPlaces = serde_json::from_slice(&body)?;

        if !places.is_success() {
            return Err(CollaboratorError::Rejected {
                message: places.error_message.clone().unwrap_or_default(),
                status: places.status,
            });
        }
        Ok(places)
    }
}

// ============================================================================
// UnconfiguredPlacesClient - No API key available
// ============================================================================

/// Fails every lookup with [`CollaboratorError::Unconfigured`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredPlacesClient;

#[async_trait]
impl NearbyQueryClient for UnconfiguredPlacesClient {
    async fn lookup(&self, _query: NearbyQuery) -> Result<NearbyPlaces, CollaboratorError> {
        Err(CollaboratorError::Unconfigured)
    }
}
