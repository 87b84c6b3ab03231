//! Server configuration.

use std::time::Duration;

use teleprox_protocol::{DEFAULT_HOST, DEFAULT_PORT};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on.
    pub bind_addr: String,

    /// Socket-level read deadline applied to each connection; `None`
    /// lets an idle connection stay open indefinitely.
    pub read_timeout: Option<Duration>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: format!("{DEFAULT_HOST}:{DEFAULT_PORT}"),
            read_timeout: None,
        }
    }
}

impl ServerConfig {
    /// Creates a configuration listening on the given address.
    pub fn new(bind_addr: impl Into<String>) -> Self {
        Self {
            bind_addr: bind_addr.into(),
            ..Default::default()
        }
    }

    /// Builder: set the per-connection read deadline.
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }
}
