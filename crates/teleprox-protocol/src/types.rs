//! Request and response envelopes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::JSONRPC_VERSION;

/// A single remote call.
///
/// The id is chosen by the caller (a fresh UUID per call) and echoed by
/// the server on the matching response. Only one request may be in flight
/// per connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    /// Fully prefixed member name, e.g. `"chopper.speed:get"`.
    pub method: String,
    /// Positional arguments.
    pub params: Vec<Value>,
    /// JSON-RPC version tag (always "2.0").
    pub jsonrpc: String,
    /// Correlation id, unique per request.
    pub id: String,
}

impl Request {
    /// Creates a request with the current protocol version.
    pub fn new(method: impl Into<String>, params: Vec<Value>, id: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            params,
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: id.into(),
        }
    }

    /// Checks whether the request carries the supported version tag.
    pub fn is_compatible(&self) -> bool {
        self.jsonrpc == JSONRPC_VERSION
    }
}

/// Reply to a [`Request`], carrying either a result or an error.
///
/// `result: null` is a successful reply (a remote member returning
/// nothing), which is distinct from the field being absent. The custom
/// deserializer below preserves that distinction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Echo of the request's correlation id.
    pub id: String,

    /// Call result, present on success.
    #[serde(
        default,
        deserialize_with = "present_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub result: Option<Value>,

    /// Error details, present on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorObject>,
}

/// Deserializes any present JSON value (including `null`) to `Some`.
/// An absent field falls back to the `None` default.
fn present_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl Response {
    /// Creates a successful response.
    pub fn success(id: impl Into<String>, result: Value) -> Self {
        Self {
            id: id.into(),
            result: Some(result),
            error: None,
        }
    }

    /// Creates a failed response.
    pub fn failure(id: impl Into<String>, error: ErrorObject) -> Self {
        Self {
            id: id.into(),
            result: None,
            error: Some(error),
        }
    }
}

/// Error member of a failed [`Response`].
///
/// `data` carries the application-level error raised by the remote
/// operation; its absence signals a failure of the exchange itself
/// (unknown method, malformed request, version mismatch).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorObject {
    /// Human-readable description.
    pub message: String,

    /// Application-level error detail, absent for protocol failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ErrorData>,
}

impl ErrorObject {
    /// Creates a protocol-level error (no `data`).
    pub fn protocol(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: None,
        }
    }

    /// Creates an application-level error of the given kind.
    pub fn application(kind: impl Into<String>, message: impl Into<String>) -> Self {
        let kind = kind.into();
        let message = message.into();
        Self {
            message: format!("{kind}: {message}"),
            data: Some(ErrorData { kind, message }),
        }
    }
}

/// Application-level error detail: the kind name the server raised and
/// its message, both verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorData {
    /// Error kind name on the server side, e.g. `"ValueError"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Error message on the server side.
    pub message: String,
}

/// A remote object's declared shape: class name plus member list.
///
/// Produced by the server for a `"<objectName>:api"` query and consumed
/// once to build a proxy. Descriptors are not cached client-side; every
/// proxy construction re-fetches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiDescriptor {
    /// Class name of the remote object.
    #[serde(rename = "class")]
    pub class_name: String,
    /// Member descriptors: plain method names and `:get`/`:set` accessors.
    pub methods: Vec<String>,
}

impl ApiDescriptor {
    /// Creates a descriptor.
    pub fn new(class_name: impl Into<String>, methods: Vec<String>) -> Self {
        Self {
            class_name: class_name.into(),
            methods,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_wire_shape() {
        let request = Request::new("echo", vec![json!(42)], "req-1");
        let json = serde_json::to_string(&request).unwrap();
        insta::assert_snapshot!(
            json,
            @r#"{"method":"echo","params":[42],"jsonrpc":"2.0","id":"req-1"}"#
        );
    }

    #[test]
    fn request_version_tag() {
        let request = Request::new("foo", Vec::new(), "id");
        assert!(request.is_compatible());

        let stale = Request {
            jsonrpc: "1.0".to_string(),
            ..request
        };
        assert!(!stale.is_compatible());
    }

    #[test]
    fn response_success_roundtrip() {
        let response = Response::success("req-1", json!({"speed": 100}));
        let json = serde_json::to_string(&response).unwrap();
        let parsed: Response = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, response);
        assert!(parsed.error.is_none());
    }

    #[test]
    fn response_null_result_is_present() {
        let parsed: Response = serde_json::from_str(r#"{"id":"req-1","result":null}"#).unwrap();
        assert_eq!(parsed.result, Some(Value::Null));
    }

    #[test]
    fn response_absent_result_is_none() {
        let parsed: Response = serde_json::from_str(r#"{"id":"req-1"}"#).unwrap();
        assert!(parsed.result.is_none());
        assert!(parsed.error.is_none());
    }

    #[test]
    fn response_error_with_data() {
        let response = Response::failure("req-1", ErrorObject::application("ValueError", "bad"));
        let json = serde_json::to_string(&response).unwrap();
        insta::assert_snapshot!(
            json,
            @r#"{"id":"req-1","error":{"message":"ValueError: bad","data":{"type":"ValueError","message":"bad"}}}"#
        );

        let parsed: Response = serde_json::from_str(&json).unwrap();
        let data = parsed.error.unwrap().data.unwrap();
        assert_eq!(data.kind, "ValueError");
        assert_eq!(data.message, "bad");
    }

    #[test]
    fn response_error_without_data() {
        let parsed: Response =
            serde_json::from_str(r#"{"id":"req-1","error":{"message":"no data"}}"#).unwrap();
        let error = parsed.error.unwrap();
        assert_eq!(error.message, "no data");
        assert!(error.data.is_none());
    }

    #[test]
    fn api_descriptor_wire_field_names() {
        let json = r#"{"class":"SimpleChopper","methods":["unlock","speed:get","speed:set"]}"#;
        let api: ApiDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(api.class_name, "SimpleChopper");
        assert_eq!(api.methods.len(), 3);

        let back = serde_json::to_string(&api).unwrap();
        assert_eq!(back, json);
    }
}
