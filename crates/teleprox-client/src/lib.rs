//! Control client: RPC session, object proxies, and the `teleprox` CLI.
//!
//! The client opens one connection to a control server, discovers remote
//! objects through their API descriptors, and builds [`ObjectProxy`]
//! values whose method calls and property accesses are forwarded over the
//! wire. Errors raised by the remote operation are reconstructed locally:
//! recognized kinds become typed [`ClientError::Remote`] values, unknown
//! kinds are carried verbatim in [`ClientError::ServerSide`].
//!
//! ```rust,no_run
//! use teleprox_client::ControlClient;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ControlClient::connect("127.0.0.1", 10000)?;
//!     let chopper = client.get_object("chopper")?;
//!     chopper.set("power_switch", serde_json::json!(true))?;
//!     println!("state: {}", chopper.get("state")?);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod proxy;
pub mod session;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult, RemoteErrorKind, map_response};
pub use proxy::ObjectProxy;
pub use session::ControlClient;
pub use transport::{MessageChannel, TcpChannel};
