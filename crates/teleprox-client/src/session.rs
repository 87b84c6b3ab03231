//! RPC session: correlation ids and the single blocking exchange.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use teleprox_protocol::{
    API_SUFFIX, ApiDescriptor, COLLECTION_METHOD, ProtocolError, Request, Response,
};

use crate::config::ClientConfig;
use crate::error::{ClientResult, map_response};
use crate::proxy::ObjectProxy;
use crate::transport::{MessageChannel, TcpChannel};

/// Client side of one control connection.
///
/// Every call is a single blocking round trip tagged with a fresh random
/// id; the session verifies the reply echoes that id before handing it
/// back, so a desynchronized server is caught immediately rather than
/// silently answering the wrong question.
///
/// The handle is cheap to clone. All clones share the one underlying
/// channel and serialize their exchanges through it, which preserves the
/// one-exchange-in-flight discipline even when proxies are used from
/// several threads.
#[derive(Clone)]
pub struct ControlClient {
    channel: Arc<Mutex<Box<dyn MessageChannel>>>,
}

impl ControlClient {
    /// Connects to a control server.
    pub fn connect(host: &str, port: u16) -> ClientResult<Self> {
        let channel = TcpChannel::connect((host, port))?;
        Ok(Self::with_channel(Box::new(channel)))
    }

    /// Connects using the given configuration, applying its socket
    /// deadline if one is set.
    pub fn connect_with(config: &ClientConfig) -> ClientResult<Self> {
        let channel = TcpChannel::connect((config.host.as_str(), config.port))?;
        channel.set_deadline(config.timeout())?;
        Ok(Self::with_channel(Box::new(channel)))
    }

    /// Wraps an already connected channel.
    pub fn with_channel(channel: Box<dyn MessageChannel>) -> Self {
        Self {
            channel: Arc::new(Mutex::new(channel)),
        }
    }

    /// Performs one remote call: send the request, block for the reply.
    ///
    /// Returns the response together with the id the request was tagged
    /// with. A reply whose id differs is rejected as a protocol error.
    pub fn call(&self, method: &str, params: Vec<Value>) -> ClientResult<(Response, String)> {
        let id = Uuid::new_v4().to_string();
        let request = Request::new(method, params, id.clone());
        let bytes = serde_json::to_vec(&request).map_err(ProtocolError::from)?;

        debug!(method, id = %id, "issuing request");

        let reply = {
            let mut channel = self.channel.lock().unwrap_or_else(|e| e.into_inner());
            channel.send(&bytes)?;
            channel.recv()?
        };

        let response: Response = serde_json::from_slice(&reply).map_err(ProtocolError::from)?;

        if response.id != id {
            return Err(ProtocolError::IdMismatch {
                expected: id,
                received: response.id,
            }
            .into());
        }

        debug!(method, "response received");
        Ok((response, id))
    }

    /// Fetches the API descriptor of a remote object (empty name for the
    /// top-level object).
    ///
    /// A response without a result is a protocol error: the descriptor
    /// query is part of the exchange contract, not an application call.
    pub fn describe(&self, object_name: &str) -> ClientResult<ApiDescriptor> {
        let method = format!("{object_name}{API_SUFFIX}");
        let (response, _id) = self.call(&method, Vec::new())?;

        let result = response
            .result
            .ok_or_else(|| ProtocolError::MissingResult {
                method: method.clone(),
            })?;
        let api = serde_json::from_value(result).map_err(ProtocolError::from)?;
        Ok(api)
    }

    /// Builds a proxy for the named remote object.
    ///
    /// The descriptor is fetched fresh on every call; proxies hold no
    /// server-side lease and may be discarded and recreated freely.
    pub fn get_object(&self, object_name: &str) -> ClientResult<ObjectProxy> {
        let api = self.describe(object_name)?;
        let prefix = object_prefix(object_name);
        Ok(ObjectProxy::new(self.clone(), api, prefix))
    }

    /// Discovers a collection of objects exposed under the given name
    /// (empty for the top level) and builds one proxy per child.
    ///
    /// Costs n+1 round trips for n children: one `getObjects` call plus
    /// one descriptor fetch each. Any failure aborts the whole discovery.
    pub fn get_object_collection(
        &self,
        object_name: &str,
    ) -> ClientResult<BTreeMap<String, ObjectProxy>> {
        let method = format!("{}{}", object_prefix(object_name), COLLECTION_METHOD);
        let (response, _id) = self.call(&method, Vec::new())?;
        let names: Vec<String> =
            serde_json::from_value(map_response(&method, response)?).map_err(ProtocolError::from)?;

        let mut objects = BTreeMap::new();
        for name in names {
            let proxy = self.get_object(&name)?;
            objects.insert(name, proxy);
        }
        Ok(objects)
    }
}

/// Dotted prefix for members of the named object; empty for the top level.
fn object_prefix(object_name: &str) -> String {
    if object_name.is_empty() {
        String::new()
    } else {
        format!("{object_name}.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::testing::{Reply, ScriptedChannel};
    use serde_json::json;

    fn client_with(replies: Vec<Reply>) -> (ControlClient, Arc<Mutex<Vec<String>>>) {
        let channel = ScriptedChannel::new(replies);
        let log = channel.method_log();
        (ControlClient::with_channel(Box::new(channel)), log)
    }

    #[test]
    fn call_returns_result_and_id() {
        let (client, _) = client_with(vec![Reply::Result(json!("pong"))]);
        let (response, id) = client.call("ping", Vec::new()).unwrap();
        assert_eq!(response.id, id);
        assert_eq!(response.result, Some(json!("pong")));
    }

    #[test]
    fn call_rejects_mismatched_id() {
        let (client, _) = client_with(vec![Reply::WrongId("stale")]);
        match client.call("ping", Vec::new()) {
            Err(ClientError::Protocol(ProtocolError::IdMismatch { received, .. })) => {
                assert_eq!(received, "stale");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn ids_are_unique_per_call() {
        let (client, _) = client_with(vec![
            Reply::Result(Value::Null),
            Reply::Result(Value::Null),
        ]);
        let (_, first) = client.call("a", Vec::new()).unwrap();
        let (_, second) = client.call("a", Vec::new()).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn describe_queries_api_method() {
        let (client, log) = client_with(vec![Reply::Result(
            json!({"class": "SimpleChopper", "methods": ["unlock", "speed:get"]}),
        )]);
        let api = client.describe("chopper").unwrap();
        assert_eq!(api.class_name, "SimpleChopper");
        assert_eq!(log.lock().unwrap().as_slice(), ["chopper:api"]);
    }

    #[test]
    fn describe_without_result_is_a_protocol_error() {
        let (client, _) = client_with(vec![Reply::Error(
            teleprox_protocol::ErrorObject::protocol("desynchronized"),
        )]);
        match client.describe("") {
            Err(ClientError::Protocol(ProtocolError::MissingResult { method })) => {
                assert_eq!(method, ":api");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn collection_costs_n_plus_one_calls() {
        let api = |class: &str| json!({"class": class, "methods": []});
        let (client, log) = client_with(vec![
            Reply::Result(json!(["a", "b"])),
            Reply::Result(api("A")),
            Reply::Result(api("B")),
        ]);

        let objects = client.get_object_collection("").unwrap();
        assert_eq!(objects.keys().collect::<Vec<_>>(), ["a", "b"]);

        let log = log.lock().unwrap();
        assert_eq!(log.as_slice(), ["getObjects", "a:api", "b:api"]);
    }

    #[test]
    fn collection_under_named_container_prefixes_discovery() {
        let (client, log) = client_with(vec![
            Reply::Result(json!([])),
        ]);
        let objects = client.get_object_collection("rack").unwrap();
        assert!(objects.is_empty());
        assert_eq!(log.lock().unwrap().as_slice(), ["rack.getObjects"]);
    }

    #[test]
    fn collection_discovery_aborts_on_first_failure() {
        let (client, log) = client_with(vec![
            Reply::Result(json!(["a", "b"])),
            Reply::Error(teleprox_protocol::ErrorObject::protocol("gone")),
        ]);
        assert!(client.get_object_collection("").is_err());
        // The failing descriptor fetch is the last exchange attempted.
        assert_eq!(log.lock().unwrap().len(), 2);
    }
}
