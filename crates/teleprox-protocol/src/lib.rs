//! Wire protocol for remote object control.
//!
//! This crate defines the request/reply envelopes exchanged between a
//! control client and a control server, the member-name conventions used
//! to describe remote objects, and the message framing used on stream
//! transports.
//!
//! # Protocol Overview
//!
//! Every exchange is a single blocking round trip: the client sends one
//! JSON document and the server answers with exactly one JSON document.
//! Requests are JSON-RPC-2.0 shaped:
//!
//! ```text
//! {"method": "chopper.speed:get", "params": [], "jsonrpc": "2.0", "id": "<uuid>"}
//! ```
//!
//! Responses carry either a `result` or an `error`, and always echo the
//! request id so the client can detect a desynchronized server.
//!
//! # Member conventions
//!
//! A remote object's API is queried via the `"<objectName>:api"` method
//! and described as a class name plus a member list. Plain entries name
//! callable methods; entries suffixed with `:get`/`:set` name property
//! accessors, grouped by the trailing name segment (see [`MemberDescriptor`]).
//!
//! # Framing
//!
//! On stream transports messages are length-prefixed JSON:
//! - 4 bytes: message length (u32, big-endian)
//! - N bytes: JSON payload

mod error;
mod framing;
mod member;
mod types;

pub use error::{ProtocolError, ProtocolResult};
pub use framing::{FrameReader, FrameWriter, decode_message, encode_message, read_frame, write_frame};
pub use member::{
    GETTER_SUFFIX, MemberDescriptor, MemberKind, PropertyAccess, SETTER_SUFFIX, partition_members,
};
pub use types::{ApiDescriptor, ErrorData, ErrorObject, Request, Response};

/// Fixed JSON-RPC version tag carried by every request.
pub const JSONRPC_VERSION: &str = "2.0";

/// Maximum message size (1 MB).
pub const MAX_MESSAGE_SIZE: u32 = 1024 * 1024;

/// Method-name suffix that queries an object's API descriptor.
pub const API_SUFFIX: &str = ":api";

/// Zero-argument method a collection object exposes to enumerate its
/// child object names.
pub const COLLECTION_METHOD: &str = "getObjects";

/// Default server host.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port.
pub const DEFAULT_PORT: u16 = 10000;
