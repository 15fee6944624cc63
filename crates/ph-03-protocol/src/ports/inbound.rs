//! Driving port: one inbound message in, one dispatch decision out.

use async_trait::async_trait;

/// What to do after handling one message.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Dispatch {
    /// Bytes to write back on the originating connection, if any.
    pub reply: Option<String>,
    /// Message to flood to this server's neighbors, if any.
    pub flood: Option<String>,
}

impl Dispatch {
    /// Close without writing or flooding.
    pub fn silent() -> Self {
        Self::default()
    }

    pub fn reply(reply: String) -> Self {
        Self {
            reply: Some(reply),
            flood: None,
        }
    }

    #[must_use]
    pub fn with_flood(mut self, message: String) -> Self {
        self.flood = Some(message);
        self
    }
}

/// Handles one line received on a connection.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    /// `line` may still carry its `\n` or `\r\n` terminator.
    async fn dispatch(&self, line: &str) -> Dispatch;
}
