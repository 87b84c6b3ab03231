//! Remote object proxies.
//!
//! A proxy is built once from an API descriptor and never re-queries the
//! server: its member table is fixed at construction. The shape of the
//! remote object is only known at runtime, so the proxy exposes a
//! dynamic-lookup surface (`call`/`get`/`set` by name) rather than typed
//! per-member methods; lookups that miss the table fail locally, without
//! a round trip.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;

use teleprox_protocol::{ApiDescriptor, GETTER_SUFFIX, PropertyAccess, SETTER_SUFFIX, partition_members};

use crate::error::{ClientError, ClientResult, map_response};
use crate::session::ControlClient;

/// Client-side stand-in for an object living in a control server.
///
/// Holds a clone of the session (many proxies may share one) and the
/// object's dotted address prefix. Purely a naming convenience: no
/// server-side handle is held, so proxies may be freely discarded and
/// recreated via [`ControlClient::get_object`].
pub struct ObjectProxy {
    session: ControlClient,
    prefix: String,
    class_name: String,
    methods: BTreeSet<String>,
    properties: BTreeMap<String, PropertyAccess>,
}

impl std::fmt::Debug for ObjectProxy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectProxy")
            .field("prefix", &self.prefix)
            .field("class_name", &self.class_name)
            .field("methods", &self.methods)
            .field("properties", &self.properties)
            .finish_non_exhaustive()
    }
}

impl ObjectProxy {
    pub(crate) fn new(session: ControlClient, api: ApiDescriptor, prefix: String) -> Self {
        let (methods, properties) = partition_members(&api.methods);
        Self {
            session,
            prefix,
            class_name: api.class_name,
            methods,
            properties,
        }
    }

    /// Class name declared by the server.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Dotted address prefix (empty for the top-level object).
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Names of the callable methods, sorted.
    pub fn method_names(&self) -> impl Iterator<Item = &str> {
        self.methods.iter().map(String::as_str)
    }

    /// Grouped properties and their access modes.
    pub fn properties(&self) -> &BTreeMap<String, PropertyAccess> {
        &self.properties
    }

    /// Whether the member table lists a callable of this name.
    pub fn has_method(&self, name: &str) -> bool {
        self.methods.contains(name)
    }

    /// Calls a remote method with positional arguments.
    pub fn call(&self, method: &str, args: Vec<Value>) -> ClientResult<Value> {
        if !self.methods.contains(method) {
            return Err(self.unknown_member(method));
        }
        let wire = format!("{}{}", self.prefix, method);
        let (response, _id) = self.session.call(&wire, args)?;
        map_response(&wire, response)
    }

    /// Reads a remote property.
    pub fn get(&self, property: &str) -> ClientResult<Value> {
        match self.properties.get(property) {
            Some(access) if access.readable() => {}
            Some(_) => {
                return Err(ClientError::WriteOnlyProperty {
                    class_name: self.class_name.clone(),
                    name: property.to_string(),
                });
            }
            None => return Err(self.unknown_member(property)),
        }

        let wire = format!("{}{}{}", self.prefix, property, GETTER_SUFFIX);
        let (response, _id) = self.session.call(&wire, Vec::new())?;
        map_response(&wire, response)
    }

    /// Writes a remote property.
    pub fn set(&self, property: &str, value: Value) -> ClientResult<()> {
        match self.properties.get(property) {
            Some(access) if access.writable() => {}
            Some(_) => {
                return Err(ClientError::ReadOnlyProperty {
                    class_name: self.class_name.clone(),
                    name: property.to_string(),
                });
            }
            None => return Err(self.unknown_member(property)),
        }

        let wire = format!("{}{}{}", self.prefix, property, SETTER_SUFFIX);
        let (response, _id) = self.session.call(&wire, vec![value])?;
        map_response(&wire, response)?;
        Ok(())
    }

    fn unknown_member(&self, name: &str) -> ClientError {
        ClientError::UnknownMember {
            class_name: self.class_name.clone(),
            name: name.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Reply, ScriptedChannel};
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    fn proxy_for(
        members: &[&str],
        prefix: &str,
        replies: Vec<Reply>,
    ) -> (ObjectProxy, Arc<Mutex<Vec<String>>>) {
        let channel = ScriptedChannel::new(replies);
        let log = channel.method_log();
        let session = ControlClient::with_channel(Box::new(channel));
        let api = ApiDescriptor::new(
            "Test",
            members.iter().map(|m| m.to_string()).collect(),
        );
        (ObjectProxy::new(session, api, prefix.to_string()), log)
    }

    #[test]
    fn echo_roundtrip() {
        let payload = json!({"nested": [1, 2, {"deep": true}]});
        let (proxy, log) = proxy_for(&["echo"], "", vec![Reply::Result(payload.clone())]);

        let result = proxy.call("echo", vec![payload.clone()]).unwrap();
        assert_eq!(result, payload);
        assert_eq!(log.lock().unwrap().as_slice(), ["echo"]);
    }

    #[test]
    fn method_call_carries_prefix() {
        let (proxy, log) = proxy_for(&["unlock"], "chopper.", vec![Reply::Result(Value::Null)]);
        proxy.call("unlock", Vec::new()).unwrap();
        assert_eq!(log.lock().unwrap().as_slice(), ["chopper.unlock"]);
    }

    #[test]
    fn read_write_pair_is_one_accessor() {
        let (proxy, log) = proxy_for(
            &["speed:get", "speed:set"],
            "chopper.",
            vec![Reply::Result(json!(0)), Reply::Result(Value::Null)],
        );

        assert_eq!(proxy.properties().len(), 1);
        assert_eq!(proxy.properties()["speed"], PropertyAccess::ReadWrite);
        assert_eq!(proxy.method_names().count(), 0);

        proxy.get("speed").unwrap();
        proxy.set("speed", json!(100)).unwrap();
        assert_eq!(
            log.lock().unwrap().as_slice(),
            ["chopper.speed:get", "chopper.speed:set"]
        );
    }

    #[test]
    fn lone_getter_is_read_only() {
        let (proxy, _) = proxy_for(&["speed:get"], "", Vec::new());
        assert_eq!(proxy.properties()["speed"], PropertyAccess::ReadOnly);

        match proxy.set("speed", json!(1)) {
            Err(ClientError::ReadOnlyProperty { name, .. }) => assert_eq!(name, "speed"),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn independent_accessors_do_not_cross_contaminate() {
        let (proxy, _) = proxy_for(&["speed:get", "other:set"], "", Vec::new());
        assert_eq!(proxy.properties().len(), 2);
        assert_eq!(proxy.properties()["speed"], PropertyAccess::ReadOnly);
        assert_eq!(proxy.properties()["other"], PropertyAccess::WriteOnly);

        assert!(matches!(
            proxy.get("other"),
            Err(ClientError::WriteOnlyProperty { .. })
        ));
    }

    #[test]
    fn dotted_member_groups_by_trailing_segment() {
        let (proxy, log) = proxy_for(
            &["motor.speed:get"],
            "rig.",
            vec![Reply::Result(json!(7))],
        );
        // Grouped under the trailing name; the call carries the proxy
        // prefix plus that name.
        assert_eq!(proxy.get("speed").unwrap(), json!(7));
        assert_eq!(log.lock().unwrap().as_slice(), ["rig.speed:get"]);
    }

    #[test]
    fn unknown_member_fails_without_a_round_trip() {
        let (proxy, log) = proxy_for(&["echo"], "", Vec::new());

        assert!(matches!(
            proxy.call("missing", Vec::new()),
            Err(ClientError::UnknownMember { .. })
        ));
        assert!(matches!(
            proxy.get("missing"),
            Err(ClientError::UnknownMember { .. })
        ));
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn remote_error_propagates_from_call() {
        let (proxy, _) = proxy_for(
            &["explode"],
            "",
            vec![Reply::Error(teleprox_protocol::ErrorObject::application(
                "RuntimeError",
                "boom",
            ))],
        );
        match proxy.call("explode", Vec::new()) {
            Err(ClientError::Remote { kind, message }) => {
                assert_eq!(kind, crate::error::RemoteErrorKind::Runtime);
                assert_eq!(message, "boom");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
