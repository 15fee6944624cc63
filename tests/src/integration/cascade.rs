//! # Flood Cascade Flows
//!
//! Every server of the built-in herd gets a real `ProtocolDispatcher` and
//! `FloodPropagator`. Deliveries go into a shared in-memory queue instead of
//! sockets, and the test drains the queue one message at a time, feeding each
//! message to the addressed server exactly as its listener would.
//!
//! ## Properties Tested
//!
//! 1. A cascade terminates on a cyclic graph
//! 2. Each server floods a given (client, timestamp) at most once
//! 3. Total messages are bounded by reachable servers × out-degree
//! 4. Replays are suppressed; strictly newer reports cascade again
//! 5. Interleaved cascades converge on the newest report

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, VecDeque};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;

    use ph_01_location_store::LocationStore;
    use ph_02_flood_propagation::{
        FloodApi, FloodConfig, FloodPropagator, PeerTransport, PeerUnreachableError,
        ServerIdentity, Topology,
    };
    use ph_03_protocol::test_utils::{FixedClock, StaticNearbyClient};
    use ph_03_protocol::{MessageHandler, ProtocolDispatcher};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    /// Delivery queue shared by the whole herd: (target server, message).
    #[derive(Default)]
    struct InMemoryNetwork {
        queue: Mutex<VecDeque<(String, String)>>,
        /// Servers whose inbound edges are cut.
        down: Mutex<Vec<String>>,
    }

    impl InMemoryNetwork {
        fn pop(&self) -> Option<(String, String)> {
            self.queue.lock().unwrap().pop_front()
        }
    }

    #[async_trait]
    impl PeerTransport for InMemoryNetwork {
        async fn deliver(
            &self,
            neighbor: &ServerIdentity,
            message: &str,
        ) -> Result<(), PeerUnreachableError> {
            if self.down.lock().unwrap().contains(&neighbor.name) {
                return Err(PeerUnreachableError::Connect {
                    neighbor: neighbor.name.clone(),
                    source: std::io::Error::from(std::io::ErrorKind::ConnectionRefused),
                });
            }
            self.queue
                .lock()
                .unwrap()
                .push_back((neighbor.name.clone(), message.to_string()));
            Ok(())
        }
    }

    struct Node {
        dispatcher: ProtocolDispatcher,
        propagator: FloodPropagator<InMemoryNetwork>,
        store: Arc<LocationStore>,
    }

    struct Herd {
        topology: Topology,
        network: Arc<InMemoryNetwork>,
        nodes: BTreeMap<String, Node>,
        floods: BTreeMap<String, usize>,
        messages: usize,
    }

    impl Herd {
        fn new(topology: Topology) -> Self {
            let network = Arc::new(InMemoryNetwork::default());
            let clock = Arc::new(FixedClock::new(Duration::from_secs(1_520_023_935)));

            let nodes = topology
                .servers()
                .map(|server| {
                    let store = Arc::new(LocationStore::new());
                    let dispatcher = ProtocolDispatcher::new(
                        server.name.clone(),
                        Arc::clone(&store),
                        Arc::new(StaticNearbyClient::default()),
                    )
                    .with_clock(clock.clone());
                    let propagator = FloodPropagator::new(
                        &server.name,
                        &topology,
                        Arc::clone(&network),
                        FloodConfig::default(),
                    )
                    .unwrap();
                    (
                        server.name.clone(),
                        Node {
                            dispatcher,
                            propagator,
                            store,
                        },
                    )
                })
                .collect();

            Self {
                topology,
                network,
                nodes,
                floods: BTreeMap::new(),
                messages: 0,
            }
        }

        /// Hand `line` to `server` and run the flood it asks for.
        async fn receive(&mut self, server: &str, line: &str) -> Option<String> {
            let node = &self.nodes[server];
            let dispatch = node.dispatcher.dispatch(line).await;
            if let Some(message) = &dispatch.flood {
                node.propagator.flood(message).await;
                *self.floods.entry(server.to_string()).or_default() += 1;
            }
            dispatch.reply
        }

        /// Deliver queued peer messages until the herd is quiet.
        async fn settle(&mut self) {
            while let Some((target, message)) = self.network.pop() {
                self.messages += 1;
                assert!(
                    self.messages < 1_000,
                    "cascade did not terminate"
                );
                let reply = self.receive(&target, &message).await;
                assert_eq!(reply, None, "peers are never answered");
            }
        }

        fn client_time(&self, server: &str, client: &str) -> Option<String> {
            self.nodes[server]
                .store
                .get(client)
                .map(|r| r.client_time.as_str().to_string())
        }

        fn reset_counters(&mut self) {
            self.floods.clear();
            self.messages = 0;
        }
    }

    fn out_degree_sum(topology: &Topology, origin: &str) -> usize {
        topology
            .reachable_from(origin)
            .unwrap()
            .iter()
            .map(|name| topology.get(name).unwrap().neighbors.len())
            .sum()
    }

    // =============================================================================
    // CASCADE TESTS
    // =============================================================================

    #[tokio::test]
    async fn test_cascade_terminates_on_cyclic_herd() {
        let topology = Topology::builtin();
        assert!(topology.has_cycle());
        let mut herd = Herd::new(topology.clone());

        let reply = herd
            .receive(
                "Goloman",
                "IAMAT client1 +34.068930-118.445127 1520023934.918963",
            )
            .await;
        assert_eq!(
            reply.as_deref(),
            Some("AT Goloman -0.081037 client1 +34.068930-118.445127 1520023934.918963")
        );
        herd.settle().await;

        // Everyone converged.
        for server in topology.servers() {
            assert_eq!(
                herd.client_time(&server.name, "client1").as_deref(),
                Some("1520023934.918963"),
                "{} did not converge",
                server.name
            );
        }

        // One flood per server, and exactly one message per edge.
        assert!(herd.floods.values().all(|&n| n == 1), "{:?}", herd.floods);
        assert_eq!(herd.floods.len(), topology.len());
        assert_eq!(herd.messages, out_degree_sum(&topology, "Goloman"));
        assert!(herd.messages <= topology.len() * 3);
    }

    #[tokio::test]
    async fn test_replay_is_suppressed_and_newer_report_cascades() {
        let topology = Topology::builtin();
        let mut herd = Herd::new(topology.clone());
        let report = "IAMAT kiwi +34.068930-118.445127 1520023934.918963";

        herd.receive("Welsh", report).await;
        herd.settle().await;
        herd.reset_counters();

        // Same report at another server: answered, but nothing moves.
        let reply = herd.receive("Hands", report).await;
        assert!(reply.unwrap().starts_with("AT Hands "));
        herd.settle().await;
        assert!(herd.floods.is_empty());
        assert_eq!(herd.messages, 0);

        // A strictly newer report floods the whole herd again.
        herd.receive("Hands", "IAMAT kiwi +34.1-118.4 1520023940.5")
            .await;
        herd.settle().await;
        assert_eq!(herd.floods.len(), topology.len());
        for server in topology.servers() {
            assert_eq!(
                herd.client_time(&server.name, "kiwi").as_deref(),
                Some("1520023940.5")
            );
        }
    }

    #[tokio::test]
    async fn test_interleaved_cascades_converge_on_newest() {
        let topology = Topology::builtin();
        let mut herd = Herd::new(topology.clone());

        // Both reports enter before either cascade is delivered.
        herd.receive("Welsh", "IAMAT c +1.0+1.0 200.0").await;
        herd.receive("Hands", "IAMAT c +2.0+2.0 100.0").await;
        herd.settle().await;

        for server in topology.servers() {
            assert_eq!(herd.client_time(&server.name, "c").as_deref(), Some("200.0"));
            assert_eq!(
                herd.nodes[&server.name]
                    .store
                    .get("c")
                    .unwrap()
                    .coordinates
                    .as_str(),
                "+1.0+1.0"
            );
        }
        // Nobody floods the same timestamp twice.
        assert!(herd.floods.values().all(|&n| n <= 2));
    }

    #[tokio::test]
    async fn test_unreachable_server_does_not_stop_the_cascade() {
        let topology = Topology::builtin();
        let mut herd = Herd::new(topology.clone());
        herd.network.down.lock().unwrap().push("Wilkes".to_string());

        herd.receive("Goloman", "IAMAT c +1.0+1.0 5.0").await;
        herd.settle().await;

        assert_eq!(herd.client_time("Wilkes", "c"), None);
        for name in ["Goloman", "Hands", "Holiday", "Welsh"] {
            assert_eq!(herd.client_time(name, "c").as_deref(), Some("5.0"));
        }
    }

    #[tokio::test]
    async fn test_directed_edges_limit_reach() {
        let addr = |port| std::net::SocketAddr::from(([127, 0, 0, 1], port));
        let topology = Topology::new(vec![
            ServerIdentity::new("A", addr(1), vec!["B".into()]),
            ServerIdentity::new("B", addr(2), vec!["C".into()]),
            ServerIdentity::new("C", addr(3), vec!["A".into()]),
            ServerIdentity::new("D", addr(4), vec!["A".into()]),
        ])
        .unwrap();
        let mut herd = Herd::new(topology.clone());

        herd.receive("B", "IAMAT c +1.0+1.0 5.0").await;
        herd.settle().await;

        assert_eq!(herd.client_time("D", "c"), None);
        assert_eq!(herd.messages, out_degree_sum(&topology, "B"));
        assert_eq!(herd.messages, 3);
    }
}
