//! Control server: object exposure, dispatch, and the TCP listener.
//!
//! A server holds an [`ObjectRegistry`] of named [`ExposedObject`]s,
//! each declaring callable methods and property accessors. Clients query
//! an object's shape via `"<name>:api"`, enumerate the registry via
//! `getObjects`, and drive members through prefixed method names like
//! `"chopper.speed:set"`. Every connection is served one blocking
//! request/reply exchange at a time.
//!
//! ```rust,no_run
//! use serde_json::Value;
//! use teleprox_server::{ControlServer, ExposedObject, ObjectRegistry, ServerConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut registry = ObjectRegistry::new();
//!     registry.register(
//!         "echo",
//!         ExposedObject::new("Echo")
//!             .method("echo", |args| Ok(args.first().cloned().unwrap_or(Value::Null))),
//!     );
//!
//!     let server = ControlServer::bind(ServerConfig::default(), registry)?;
//!     server.run()?;
//!     Ok(())
//! }
//! ```

mod config;
mod error;
mod handler;
mod registry;
mod socket;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use handler::handle_request;
pub use registry::{ExposedObject, Fault, ObjectRegistry};
pub use socket::ControlServer;
