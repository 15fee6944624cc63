//! # Live Herd Flows
//!
//! Three servers on ephemeral localhost ports, wired in a cycle
//! (Alpha → Bravo → Charlie → Alpha), each running the real listener, TCP
//! flood transport and protocol dispatcher. Nearby lookups use a stub client.
//!
//! ## Flows Tested
//!
//! 1. IAMAT at Alpha is answered and reaches Charlie two hops away
//! 2. WHATSAT at Charlie answers from the flooded record, truncated
//! 3. Invalid and unknown-client queries get `?` echoes
//! 4. A dead neighbor does not stop service

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use serde_json::{json, Value};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::sync::watch;
    use tokio::task::JoinHandle;

    use node_runtime::{HerdConfig, HerdNode, HerdServer};
    use ph_02_flood_propagation::{FloodConfig, ServerIdentity, Topology};
    use ph_03_protocol::test_utils::{FixedClock, StaticNearbyClient};
    use ph_03_protocol::NearbyPlaces;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    struct LiveHerd {
        nodes: Vec<HerdNode>,
        shutdown: watch::Sender<bool>,
        servers: Vec<JoinHandle<()>>,
    }

    impl LiveHerd {
        fn node(&self, name: &str) -> &HerdNode {
            self.nodes
                .iter()
                .find(|n| n.identity().name == name)
                .unwrap()
        }

        async fn stop(self) {
            self.shutdown.send(true).unwrap();
            for server in self.servers {
                tokio::time::timeout(Duration::from_secs(10), server)
                    .await
                    .unwrap()
                    .unwrap();
            }
        }
    }

    fn places(count: usize) -> NearbyPlaces {
        NearbyPlaces::with_results(
            (0..count)
                .map(|i| json!({ "name": format!("place{i}"), "rating": 4.5 }))
                .collect(),
        )
    }

    /// Start the three-server cycle. `skip` names a server that is left
    /// without a listener.
    async fn start_herd(skip: Option<&str>) -> LiveHerd {
        let names = ["Alpha", "Bravo", "Charlie"];
        let mut listeners = Vec::new();
        for _ in names {
            listeners.push(TcpListener::bind("127.0.0.1:0").await.unwrap());
        }
        let addrs: Vec<_> = listeners.iter().map(|l| l.local_addr().unwrap()).collect();

        let topology = Topology::new(
            names
                .iter()
                .enumerate()
                .map(|(i, name)| {
                    ServerIdentity::new(*name, addrs[i], vec![names[(i + 1) % 3].to_string()])
                })
                .collect(),
        )
        .unwrap();

        let config = HerdConfig {
            topology,
            flood: FloodConfig {
                connect_timeout: Duration::from_millis(500),
                write_timeout: Duration::from_millis(500),
                max_in_flight: 8,
            },
            ..HerdConfig::default()
        };
        let clock = Arc::new(FixedClock::new(Duration::from_secs(1_520_023_935)));

        let (shutdown, shutdown_rx) = watch::channel(false);
        let mut nodes = Vec::new();
        let mut servers = Vec::new();
        for (name, listener) in names.iter().zip(listeners) {
            let node = HerdNode::new(
                name,
                config.clone(),
                Arc::new(StaticNearbyClient::returning(places(8))),
            )
            .unwrap()
            .with_clock(clock.clone());

            if Some(*name) == skip {
                drop(listener);
            } else {
                let server = HerdServer::from_listener(*name, listener, node.connection_handler());
                servers.push(tokio::spawn(server.run(shutdown_rx.clone())));
            }
            nodes.push(node);
        }

        LiveHerd {
            nodes,
            shutdown,
            servers,
        }
    }

    /// One request per connection; returns everything the server wrote.
    async fn send(herd: &LiveHerd, server: &str, message: &str) -> String {
        let addr = herd.node(server).identity().address;
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(message.as_bytes()).await.unwrap();
        stream.write_all(b"\n").await.unwrap();

        let mut response = String::new();
        tokio::time::timeout(Duration::from_secs(5), stream.read_to_string(&mut response))
            .await
            .unwrap()
            .unwrap();
        response
    }

    async fn wait_for_client(herd: &LiveHerd, server: &str, client: &str) {
        let store = herd.node(server).store().clone();
        tokio::time::timeout(Duration::from_secs(5), async move {
            while store.get(client).is_none() {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap_or_else(|_| panic!("{client} never reached {server}"));
    }

    // =============================================================================
    // LIVE HERD TESTS
    // =============================================================================

    #[tokio::test]
    async fn test_iamat_floods_across_the_cycle() {
        let herd = start_herd(None).await;

        let response = send(
            &herd,
            "Alpha",
            "IAMAT kiwi.cs.ucla.edu +34.068930-118.445127 1520023934.918963",
        )
        .await;
        assert_eq!(
            response,
            "AT Alpha -0.081037 kiwi.cs.ucla.edu +34.068930-118.445127 1520023934.918963"
        );

        wait_for_client(&herd, "Charlie", "kiwi.cs.ucla.edu").await;
        wait_for_client(&herd, "Bravo", "kiwi.cs.ucla.edu").await;

        herd.stop().await;
    }

    #[tokio::test]
    async fn test_whatsat_answers_from_flooded_record() {
        let herd = start_herd(None).await;

        send(&herd, "Alpha", "IAMAT kiwi +34.068930-118.445127 1520023936.5").await;
        wait_for_client(&herd, "Charlie", "kiwi").await;

        let response = send(&herd, "Charlie", "WHATSAT kiwi 10 5").await;
        let (first_line, payload) = response.split_once('\n').unwrap();
        assert_eq!(
            first_line,
            "AT Charlie +1.5 kiwi +34.068930-118.445127 1520023936.5"
        );
        assert!(payload.ends_with("\n\n"));
        assert!(payload.contains("\n   \"results\": ["));

        let payload: Value = serde_json::from_str(payload.trim_end()).unwrap();
        assert_eq!(payload["results"].as_array().unwrap().len(), 5);

        herd.stop().await;
    }

    #[tokio::test]
    async fn test_invalid_and_unknown_queries_are_echoed() {
        let herd = start_herd(None).await;

        assert_eq!(
            send(&herd, "Bravo", "IAMAT client2 bad_time").await,
            "? IAMAT client2 bad_time"
        );
        assert_eq!(
            send(&herd, "Bravo", "WHATSAT ghost_client 5 5").await,
            "? WHATSAT ghost_client 5 5"
        );
        assert_eq!(
            send(&herd, "Bravo", "WHATSAT ghost_client 51 5").await,
            "? WHATSAT ghost_client 51 5"
        );
        // Peer messages are never answered.
        assert_eq!(send(&herd, "Bravo", "AT Alpha +0.1 c +1+1 bogus").await, "");

        herd.stop().await;
    }

    #[tokio::test]
    async fn test_dead_neighbor_does_not_block_service() {
        // Bravo never listens, so Alpha's only edge is dead.
        let herd = start_herd(Some("Bravo")).await;

        let response = send(&herd, "Alpha", "IAMAT c +1.0+1.0 1520023935.0").await;
        assert_eq!(response, "AT Alpha +0.0 c +1.0+1.0 1520023935.0");

        // Alpha still serves its own record.
        let response = send(&herd, "Alpha", "WHATSAT c 1 0").await;
        let (_, payload) = response.split_once('\n').unwrap();
        let payload: Value = serde_json::from_str(payload.trim_end()).unwrap();
        assert!(payload["results"].as_array().unwrap().is_empty());
        assert!(herd.node("Charlie").store().get("c").is_none());

        herd.stop().await;
    }
}
