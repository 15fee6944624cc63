//! # Protocol Dispatcher
//!
//! Classifies one inbound line and runs the matching handler:
//!
//! - `IAMAT`: answer with the canonical `AT` line, store, flood if new
//! - `WHATSAT`: look up the stored position, query nearby places
//! - `AT`: store, re-flood the same text if new, never answer
//!
//! The dispatcher decides what to write and what to flood; the caller owns
//! the connection and the propagator.

use std::sync::Arc;

use async_trait::async_trait;
use ph_01_location_store::{LocationStore, PositionRecord, UpdateOutcome};
use tracing::{debug, info, warn};

use crate::adapters::SystemClock;
use crate::domain::response::{at_line, failure_echo, invalid_echo, whatsat_response};
use crate::domain::{Command, MaxResults, NearbyQuery, PeerUpdate, RadiusKm, TimeDiff};
use crate::error::ProtocolError;
use crate::ports::{Clock, Dispatch, MessageHandler, NearbyQueryClient};

/// Strip one trailing `\n` or `\r\n`.
pub fn strip_line_terminator(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

/// Message dispatcher for one named server.
pub struct ProtocolDispatcher {
    server: String,
    store: Arc<LocationStore>,
    nearby: Arc<dyn NearbyQueryClient>,
    clock: Arc<dyn Clock>,
}

impl ProtocolDispatcher {
    pub fn new(
        server: impl Into<String>,
        store: Arc<LocationStore>,
        nearby: Arc<dyn NearbyQueryClient>,
    ) -> Self {
        Self {
            server: server.into(),
            store,
            nearby,
            clock: Arc::new(SystemClock),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    pub fn store(&self) -> &Arc<LocationStore> {
        &self.store
    }

    fn handle_iamat(&self, record: PositionRecord) -> Dispatch {
        let time_diff = TimeDiff::between(&record.client_time, self.clock.now());
        let line = at_line(&self.server, time_diff, &record);
        let client_id = record.client_id.clone();

        let outcome = self.store.compare_and_update(record);
        info!(server = %self.server, client_id = %client_id, new = outcome.is_new(), "IAMAT accepted");

        let dispatch = Dispatch::reply(line.clone());
        if outcome.is_new() {
            dispatch.with_flood(line)
        } else {
            dispatch
        }
    }

    async fn handle_whatsat(
        &self,
        original: &str,
        client_id: &str,
        radius: RadiusKm,
        max_results: MaxResults,
    ) -> Dispatch {
        let Some(record) = self.store.get(client_id) else {
            let err = ProtocolError::UnknownClient(client_id.to_string());
            info!(server = %self.server, error = %err, "WHATSAT rejected");
            return Dispatch::reply(invalid_echo(original));
        };

        let time_diff = TimeDiff::between(&record.client_time, self.clock.now());
        let line = at_line(&self.server, time_diff, &record);

        let query = NearbyQuery {
            latitude: record.coordinates.latitude(),
            longitude: record.coordinates.longitude(),
            radius_meters: radius.meters(),
            max_results: max_results.get(),
        };

        let mut places = match self.nearby.lookup(query).await {
            Ok(places) => places,
            Err(e) => {
                warn!(server = %self.server, client_id, error = %e, "Nearby lookup failed");
                return Dispatch::reply(failure_echo(original));
            }
        };
        places.truncate(max_results.get());

        match whatsat_response(&line, &places) {
            Ok(response) => {
                info!(
                    server = %self.server,
                    client_id,
                    results = places.results.len(),
                    "WHATSAT answered"
                );
                Dispatch::reply(response)
            }
            Err(e) => {
                warn!(server = %self.server, client_id, error = %e, "Failed to render places");
                Dispatch::reply(failure_echo(original))
            }
        }
    }

    fn handle_at(&self, original: &str, update: PeerUpdate) -> Dispatch {
        let client_id = update.record.client_id.clone();
        match self.store.compare_and_update(update.record) {
            UpdateOutcome::Stale { current } => {
                debug!(
                    server = %self.server,
                    from = %update.server_id,
                    client_id = %client_id,
                    stored = %current.client_time,
                    "Stale peer update, not flooding"
                );
                Dispatch::silent()
            }
            _ => {
                info!(
                    server = %self.server,
                    from = %update.server_id,
                    client_id = %client_id,
                    "Peer update accepted"
                );
                Dispatch::silent().with_flood(original.to_string())
            }
        }
    }
}

#[async_trait]
impl MessageHandler for ProtocolDispatcher {
    async fn dispatch(&self, line: &str) -> Dispatch {
        let original = strip_line_terminator(line);
        debug!(server = %self.server, message = %original, "Received");

        match Command::parse(original) {
            Ok(Command::Iamat(record)) => self.handle_iamat(record),
            Ok(Command::Whatsat {
                client_id,
                radius,
                max_results,
            }) => {
                self.handle_whatsat(original, &client_id, radius, max_results)
                    .await
            }
            Ok(Command::At(update)) => self.handle_at(original, update),
            Err(e) if e.is_echoed() => {
                info!(server = %self.server, error = %e, "Invalid message");
                Dispatch::reply(invalid_echo(original))
            }
            Err(e) => {
                warn!(server = %self.server, error = %e, message = %original, "Dropping peer message");
                Dispatch::silent()
            }
        }
    }
}
