//! Protocol error types.

use thiserror::Error;

/// Result type for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;

/// Errors that can occur while encoding, decoding, or validating an exchange.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Message exceeds maximum allowed size.
    #[error("message too large: {size} bytes (max: {max})")]
    MessageTooLarge { size: u32, max: u32 },

    /// Failed to serialize or deserialize a JSON document.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error during read/write.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Incomplete message (buffer ended before the full message).
    #[error("incomplete message: expected {expected} bytes, got {received}")]
    IncompleteMessage { expected: usize, received: usize },

    /// Empty message received.
    #[error("empty message")]
    EmptyMessage,

    /// Request carried an unsupported JSON-RPC version tag.
    #[error("unsupported protocol version: {0}")]
    UnsupportedVersion(String),

    /// Response id does not match the id of the request that produced it.
    #[error("response id '{received}' does not match request id '{expected}'")]
    IdMismatch { expected: String, received: String },

    /// Response that was required to carry a result did not.
    #[error("response to '{method}' carries no result")]
    MissingResult { method: String },

    /// The server reported a failure of the exchange itself (an error
    /// without application-level detail).
    #[error("{message}")]
    ServerReported { message: String },
}
