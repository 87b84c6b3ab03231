//! Client configuration.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use teleprox_protocol::{DEFAULT_HOST, DEFAULT_PORT};

use crate::error::{ClientError, ClientResult};

/// Connection settings for the control client, loadable from a TOML file.
///
/// ```toml
/// host = "192.168.1.20"
/// port = 10000
/// timeout_secs = 5
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    /// Server host.
    pub host: String,

    /// Server port.
    pub port: u16,

    /// Socket-level deadline in seconds applied to each exchange.
    /// Zero disables the deadline; a call then blocks indefinitely,
    /// which is the protocol's default behavior.
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            timeout_secs: 0,
        }
    }
}

impl ClientConfig {
    /// Loads configuration from a TOML file.
    pub fn load_from(path: impl AsRef<Path>) -> ClientResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ClientError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        toml::from_str(&contents).map_err(|e| {
            ClientError::Config(format!("failed to parse {}: {e}", path.display()))
        })
    }

    /// The configured socket deadline, if any.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}
