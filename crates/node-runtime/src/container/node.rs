//! # Herd Node
//!
//! Initialization order:
//!
//! 1. Resolve this server's identity in the topology
//! 2. Create the empty `LocationStore`
//! 3. Create the `ProtocolDispatcher` over the store
//! 4. Create the `FloodPropagator` over this server's outbound edges

use std::sync::Arc;

use ph_01_location_store::LocationStore;
use ph_02_flood_propagation::adapters::TcpPeerTransport;
use ph_02_flood_propagation::{FloodApi, FloodPropagator, ServerIdentity, TopologyError};
use ph_03_protocol::{
    Clock, GooglePlacesClient, MessageHandler, NearbyQueryClient, PlacesConfig,
    ProtocolDispatcher, UnconfiguredPlacesClient,
};
use tracing::{info, warn};

use super::HerdConfig;
use crate::server::ConnectionHandler;

/// Pick the nearby-places client for `places`.
///
/// Without an API key every WHATSAT lookup fails with `Unconfigured`.
pub fn nearby_client(places: &PlacesConfig) -> Arc<dyn NearbyQueryClient> {
    match GooglePlacesClient::new(places) {
        Ok(client) => {
            info!(endpoint = %places.endpoint, "Places client configured");
            Arc::new(client)
        }
        Err(e) => {
            warn!(error = %e, "Nearby lookups disabled");
            Arc::new(UnconfiguredPlacesClient)
        }
    }
}

/// All subsystem instances of one herd server.
pub struct HerdNode {
    identity: ServerIdentity,
    store: Arc<LocationStore>,
    dispatcher: Arc<ProtocolDispatcher>,
    nearby: Arc<dyn NearbyQueryClient>,
    propagator: Arc<dyn FloodApi>,
    config: HerdConfig,
}

impl HerdNode {
    /// Build the node for `name`, flooding over TCP.
    ///
    /// # Errors
    ///
    /// [`TopologyError::UnknownServer`] if `name` is not in the topology.
    pub fn new(
        name: &str,
        config: HerdConfig,
        nearby: Arc<dyn NearbyQueryClient>,
    ) -> Result<Self, TopologyError> {
        let transport = Arc::new(TcpPeerTransport::from_config(&config.flood));
        let propagator =
            FloodPropagator::new(name, &config.topology, transport, config.flood.clone())?;
        Self::with_propagator(name, config, nearby, Arc::new(propagator))
    }

    /// Build the node around an existing propagator.
    pub fn with_propagator(
        name: &str,
        config: HerdConfig,
        nearby: Arc<dyn NearbyQueryClient>,
        propagator: Arc<dyn FloodApi>,
    ) -> Result<Self, TopologyError> {
        let identity = config.topology.identity(name)?.clone();
        let store = Arc::new(LocationStore::new());
        let dispatcher = Arc::new(ProtocolDispatcher::new(
            identity.name.clone(),
            Arc::clone(&store),
            Arc::clone(&nearby),
        ));

        info!(
            server = %identity.name,
            address = %identity.address,
            neighbors = ?identity.neighbors,
            "Herd node initialized"
        );

        Ok(Self {
            identity,
            store,
            dispatcher,
            nearby,
            propagator,
            config,
        })
    }

    /// Replace the dispatcher's wall clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.dispatcher = Arc::new(
            ProtocolDispatcher::new(
                self.identity.name.clone(),
                Arc::clone(&self.store),
                Arc::clone(&self.nearby),
            )
            .with_clock(clock),
        );
        self
    }

    pub fn identity(&self) -> &ServerIdentity {
        &self.identity
    }

    pub fn store(&self) -> &Arc<LocationStore> {
        &self.store
    }

    pub fn config(&self) -> &HerdConfig {
        &self.config
    }

    /// Per-connection handler sharing this node's subsystems.
    pub fn connection_handler(&self) -> ConnectionHandler {
        let handler: Arc<dyn MessageHandler> = self.dispatcher.clone();
        ConnectionHandler::new(
            handler,
            Arc::clone(&self.propagator),
            self.config.listener.clone(),
        )
    }
}
