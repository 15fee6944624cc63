//! # Herd Server
//!
//! TCP front end of one herd server: one message per connection.
//!
//! ```text
//! accept ──spawn──→ read one line (bounded, timed)
//!                        │
//!                        ↓
//!                  [MessageHandler]
//!                        │
//!                        ├──reply──→ write, shut down write half
//!                        └──flood──→ [FloodApi] (after the client is released)
//! ```

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use ph_02_flood_propagation::FloodApi;
use ph_03_protocol::{response, Dispatch, MessageHandler};
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader,
};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::container::ListenerConfig;

/// What arrived on a connection before it was handled.
#[derive(Debug, PartialEq, Eq)]
enum Inbound {
    Line(String),
    /// Longer than the limit; carries the first `limit` bytes.
    Oversized(String),
    /// Peer closed without sending anything.
    Closed,
}

/// Handles one accepted connection end to end.
#[derive(Clone)]
pub struct ConnectionHandler {
    handler: Arc<dyn MessageHandler>,
    propagator: Arc<dyn FloodApi>,
    config: ListenerConfig,
}

impl ConnectionHandler {
    pub fn new(
        handler: Arc<dyn MessageHandler>,
        propagator: Arc<dyn FloodApi>,
        config: ListenerConfig,
    ) -> Self {
        Self {
            handler,
            propagator,
            config,
        }
    }

    /// Read one line, answer it, close, then flood if the handler asked to.
    pub async fn handle<S>(&self, stream: S, peer: SocketAddr)
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let mut reader = BufReader::new(stream);

        let inbound = match timeout(self.config.read_timeout, self.read_line(&mut reader)).await {
            Ok(Ok(inbound)) => inbound,
            Ok(Err(e)) => {
                warn!(peer = %peer, error = %e, "Read failed");
                return;
            }
            Err(_) => {
                debug!(peer = %peer, after = ?self.config.read_timeout, "Read timed out");
                return;
            }
        };

        let dispatch = match inbound {
            Inbound::Closed => {
                debug!(peer = %peer, "Closed without a message");
                return;
            }
            Inbound::Oversized(prefix) => {
                warn!(peer = %peer, limit = self.config.max_line_bytes, "Line too long");
                Dispatch::reply(response::invalid_echo(&prefix))
            }
            Inbound::Line(line) => self.handler.dispatch(&line).await,
        };

        let mut stream = reader.into_inner();
        if let Some(reply) = &dispatch.reply {
            let write = async {
                stream.write_all(reply.as_bytes()).await?;
                stream.flush().await
            };
            match timeout(self.config.read_timeout, write).await {
                Ok(Ok(())) => debug!(peer = %peer, reply = %reply, "Sent"),
                Ok(Err(e)) => warn!(peer = %peer, error = %e, "Write failed"),
                Err(_) => warn!(peer = %peer, "Write timed out"),
            }
        }
        if let Err(e) = stream.shutdown().await {
            debug!(peer = %peer, error = %e, "Shutdown failed");
        }
        drop(stream);

        if let Some(message) = dispatch.flood {
            let report = self.propagator.flood(&message).await;
            debug!(
                delivered = report.delivered(),
                failed = report.failed(),
                "Flood finished"
            );
        }
    }

    async fn read_line<R>(&self, reader: &mut R) -> io::Result<Inbound>
    where
        R: AsyncBufRead + Unpin,
    {
        let limit = self.config.max_line_bytes;
        let mut buf = Vec::new();
        // One extra byte for the terminator, another to detect overflow.
        let mut limited = reader.take(limit as u64 + 2);
        limited.read_until(b'\n', &mut buf).await?;

        if buf.is_empty() {
            return Ok(Inbound::Closed);
        }

        let content_len = match buf.strip_suffix(b"\n") {
            Some(line) => line.strip_suffix(b"\r").unwrap_or(line).len(),
            None => buf.len(),
        };
        if content_len > limit {
            buf.truncate(limit);
            return Ok(Inbound::Oversized(
                String::from_utf8_lossy(&buf).into_owned(),
            ));
        }
        Ok(Inbound::Line(String::from_utf8_lossy(&buf).into_owned()))
    }
}

/// Accept loop for one herd server.
pub struct HerdServer {
    name: String,
    listener: TcpListener,
    connections: ConnectionHandler,
}

impl HerdServer {
    /// Bind `address` and serve with `connections`.
    pub async fn bind(
        name: impl Into<String>,
        address: SocketAddr,
        connections: ConnectionHandler,
    ) -> io::Result<Self> {
        let listener = TcpListener::bind(address).await?;
        Ok(Self::from_listener(name, listener, connections))
    }

    /// Serve on an already bound listener.
    pub fn from_listener(
        name: impl Into<String>,
        listener: TcpListener,
        connections: ConnectionHandler,
    ) -> Self {
        Self {
            name: name.into(),
            listener,
            connections,
        }
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept until `shutdown` flips to true, then wait for in-flight
    /// connections to finish.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let addr = self.listener.local_addr().ok();
        info!(server = %self.name, addr = ?addr, "Listening");

        let mut tasks = JoinSet::new();
        loop {
            tokio::select! {
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        debug!(server = %self.name, peer = %peer, "Accepted");
                        let connections = self.connections.clone();
                        tasks.spawn(async move { connections.handle(stream, peer).await });
                    }
                    Err(e) => warn!(server = %self.name, error = %e, "Accept failed"),
                },
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                // Reap finished connections so the set stays small.
                Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
            }
        }

        info!(server = %self.name, in_flight = tasks.len(), "Stopped accepting");
        while tasks.join_next().await.is_some() {}
    }
}
