//! Client error taxonomy and response-to-error mapping.
//!
//! Three kinds of failure cross the wire, and all three keep their
//! identity on this side:
//! - protocol failures (malformed exchange, id mismatch, error without
//!   detail) surface as [`ClientError::Protocol`];
//! - errors whose kind name is in the local vocabulary surface as
//!   [`ClientError::Remote`] with the matching [`RemoteErrorKind`];
//! - anything else surfaces as [`ClientError::ServerSide`], retaining the
//!   original kind name and message verbatim.

use serde_json::Value;
use thiserror::Error;

use teleprox_protocol::{ErrorData, ProtocolError, Response};

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Server error kinds the client recognizes and reconstructs as typed
/// errors. Everything outside this vocabulary is passed through as
/// [`ClientError::ServerSide`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteErrorKind {
    /// `ValueError`: an argument had the right type but a bad value.
    Value,
    /// `TypeError`: an argument had the wrong type.
    Type,
    /// `AttributeError`: no such member on the remote object.
    Attribute,
    /// `KeyError`: missing mapping key.
    Key,
    /// `IndexError`: sequence index out of range.
    Index,
    /// `RuntimeError`: the operation failed at runtime.
    Runtime,
    /// `ZeroDivisionError`: division by zero.
    ZeroDivision,
    /// `NotImplementedError`: the remote operation is not implemented.
    NotImplemented,
}

impl RemoteErrorKind {
    /// Looks up a kind by its wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ValueError" => Some(Self::Value),
            "TypeError" => Some(Self::Type),
            "AttributeError" => Some(Self::Attribute),
            "KeyError" => Some(Self::Key),
            "IndexError" => Some(Self::Index),
            "RuntimeError" => Some(Self::Runtime),
            "ZeroDivisionError" => Some(Self::ZeroDivision),
            "NotImplementedError" => Some(Self::NotImplemented),
            _ => None,
        }
    }

    /// The wire name of this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Value => "ValueError",
            Self::Type => "TypeError",
            Self::Attribute => "AttributeError",
            Self::Key => "KeyError",
            Self::Index => "IndexError",
            Self::Runtime => "RuntimeError",
            Self::ZeroDivision => "ZeroDivisionError",
            Self::NotImplemented => "NotImplementedError",
        }
    }
}

impl std::fmt::Display for RemoteErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur in the client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// IO error while connecting or exchanging.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed exchange: framing, serialization, id mismatch, or an
    /// error response without application detail.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// The remote operation raised an error of a recognized kind.
    #[error("remote raised {kind}: {message}")]
    Remote {
        kind: RemoteErrorKind,
        message: String,
    },

    /// The remote operation raised an error outside the local vocabulary.
    #[error("exception on server side of type '{kind}': '{message}'")]
    ServerSide { kind: String, message: String },

    /// The proxy's member table has no such member.
    #[error("remote object '{class_name}' has no member '{name}'")]
    UnknownMember { class_name: String, name: String },

    /// Attempt to write a property that only listed a `:get` accessor.
    #[error("property '{name}' of remote object '{class_name}' is read-only")]
    ReadOnlyProperty { class_name: String, name: String },

    /// Attempt to read a property that only listed a `:set` accessor.
    #[error("property '{name}' of remote object '{class_name}' is write-only")]
    WriteOnlyProperty { class_name: String, name: String },
}

impl ClientError {
    fn from_error_data(data: ErrorData) -> Self {
        match RemoteErrorKind::from_name(&data.kind) {
            Some(kind) => Self::Remote {
                kind,
                message: data.message,
            },
            None => Self::ServerSide {
                kind: data.kind,
                message: data.message,
            },
        }
    }
}

/// Interprets a response: the result value on success, the matching
/// client error otherwise.
///
/// An error carrying `data` is an application failure and maps onto the
/// local vocabulary (or the verbatim pass-through). An error without
/// `data` is a failure of the exchange itself and surfaces as a protocol
/// error carrying the server's message.
pub fn map_response(method: &str, response: Response) -> ClientResult<Value> {
    if let Some(result) = response.result {
        return Ok(result);
    }

    match response.error {
        Some(error) => match error.data {
            Some(data) => Err(ClientError::from_error_data(data)),
            None => Err(ClientError::Protocol(ProtocolError::ServerReported {
                message: error.message,
            })),
        },
        None => Err(ClientError::Protocol(ProtocolError::MissingResult {
            method: method.to_string(),
        })),
    }
}
