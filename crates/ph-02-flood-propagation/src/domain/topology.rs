//! Static herd topology.
//!
//! The graph is directed and may contain cycles. It is built once at startup
//! and shared read-only.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use std::net::SocketAddr;

use crate::error::TopologyError;

/// One named server: where it listens and whom it floods to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerIdentity {
    pub name: String,
    pub address: SocketAddr,
    /// Outbound flood edges, by server name.
    pub neighbors: Vec<String>,
}

impl ServerIdentity {
    pub fn new(name: impl Into<String>, address: SocketAddr, neighbors: Vec<String>) -> Self {
        Self {
            name: name.into(),
            address,
            neighbors,
        }
    }
}

/// Immutable neighbor graph of the herd.
#[derive(Clone, Debug)]
pub struct Topology {
    servers: Vec<ServerIdentity>,
    index: HashMap<String, usize>,
}

impl Topology {
    /// Validate and build a topology.
    ///
    /// Every neighbor must be a declared server, names are unique, and no
    /// server may list itself or the same neighbor twice.
    pub fn new(servers: Vec<ServerIdentity>) -> Result<Self, TopologyError> {
        if servers.is_empty() {
            return Err(TopologyError::Empty);
        }

        let mut index = HashMap::with_capacity(servers.len());
        for (i, server) in servers.iter().enumerate() {
            if index.insert(server.name.clone(), i).is_some() {
                return Err(TopologyError::DuplicateServer(server.name.clone()));
            }
        }

        for server in &servers {
            let mut seen = HashSet::new();
            for neighbor in &server.neighbors {
                if *neighbor == server.name {
                    return Err(TopologyError::SelfLoop(server.name.clone()));
                }
                if !index.contains_key(neighbor) {
                    return Err(TopologyError::UnknownNeighbor {
                        server: server.name.clone(),
                        neighbor: neighbor.clone(),
                    });
                }
                if !seen.insert(neighbor.as_str()) {
                    return Err(TopologyError::DuplicateNeighbor {
                        server: server.name.clone(),
                        neighbor: neighbor.clone(),
                    });
                }
            }
        }

        Ok(Self { servers, index })
    }

    /// The five-server herd: Goloman, Hands, Holiday, Welsh and Wilkes on
    /// 127.0.0.1 ports 12001-12005.
    pub fn builtin() -> Self {
        let server = |name: &str, port: u16, neighbors: &[&str]| {
            ServerIdentity::new(
                name,
                SocketAddr::from(([127, 0, 0, 1], port)),
                neighbors.iter().map(|n| n.to_string()).collect(),
            )
        };

        let servers = vec![
            server("Goloman", 12001, &["Hands", "Holiday", "Wilkes"]),
            server("Hands", 12002, &["Goloman", "Wilkes"]),
            server("Holiday", 12003, &["Welsh", "Goloman", "Wilkes"]),
            server("Welsh", 12004, &["Holiday"]),
            server("Wilkes", 12005, &["Goloman", "Hands", "Holiday"]),
        ];
        let index = servers
            .iter()
            .enumerate()
            .map(|(i, s)| (s.name.clone(), i))
            .collect();

        Self { servers, index }
    }

    pub fn get(&self, name: &str) -> Option<&ServerIdentity> {
        self.index.get(name).map(|&i| &self.servers[i])
    }

    /// Like [`Topology::get`], but an unknown name is an error.
    pub fn identity(&self, name: &str) -> Result<&ServerIdentity, TopologyError> {
        self.get(name)
            .ok_or_else(|| TopologyError::UnknownServer(name.to_string()))
    }

    /// Outbound neighbors of `name`, in declaration order.
    pub fn neighbors_of(&self, name: &str) -> Result<Vec<&ServerIdentity>, TopologyError> {
        let server = self.identity(name)?;
        // Neighbor names were validated in `new`.
        Ok(server
            .neighbors
            .iter()
            .filter_map(|n| self.get(n))
            .collect())
    }

    pub fn servers(&self) -> impl Iterator<Item = &ServerIdentity> {
        self.servers.iter()
    }

    pub fn len(&self) -> usize {
        self.servers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    /// Servers reachable from `name` by following flood edges, including
    /// `name` itself.
    pub fn reachable_from(&self, name: &str) -> Result<BTreeSet<String>, TopologyError> {
        self.identity(name)?;

        let mut seen = BTreeSet::new();
        let mut queue = VecDeque::from([name.to_string()]);
        while let Some(current) = queue.pop_front() {
            if !seen.insert(current.clone()) {
                continue;
            }
            if let Some(server) = self.get(&current) {
                queue.extend(server.neighbors.iter().cloned());
            }
        }
        Ok(seen)
    }

    /// True if following flood edges can lead back to a server already
    /// visited.
    pub fn has_cycle(&self) -> bool {
        // Iterative three-color DFS.
        #[derive(Clone, Copy, PartialEq)]
        enum Color {
            White,
            Grey,
            Black,
        }

        let mut color = vec![Color::White; self.servers.len()];
        for start in 0..self.servers.len() {
            if color[start] != Color::White {
                continue;
            }
            let mut stack = vec![(start, 0usize)];
            color[start] = Color::Grey;
            while let Some((node, edge)) = stack.pop() {
                let neighbors = &self.servers[node].neighbors;
                if edge < neighbors.len() {
                    stack.push((node, edge + 1));
                    let Some(&next) = self.index.get(&neighbors[edge]) else {
                        continue;
                    };
                    match color[next] {
                        Color::Grey => return true,
                        Color::White => {
                            color[next] = Color::Grey;
                            stack.push((next, 0));
                        }
                        Color::Black => {}
                    }
                } else {
                    color[node] = Color::Black;
                }
            }
        }
        false
    }
}
