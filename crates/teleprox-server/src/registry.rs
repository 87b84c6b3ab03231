//! Object exposure and member dispatch.
//!
//! An [`ExposedObject`] declares the members a remote object offers:
//! callable methods plus property getters/setters, each backed by a
//! closure. The [`ObjectRegistry`] holds exposed objects by name, routes
//! prefixed wire methods to them, answers `:api` descriptor queries, and
//! behaves as a collection at the top level (`getObjects` enumerates the
//! registered names).

use std::collections::BTreeMap;

use serde_json::{Value, json};

use teleprox_protocol::{
    API_SUFFIX, ApiDescriptor, COLLECTION_METHOD, GETTER_SUFFIX, MemberDescriptor, MemberKind,
    SETTER_SUFFIX,
};

/// Application-level error raised by an exposed member.
///
/// The kind name and message cross the wire verbatim in the response's
/// `error.data`, so clients can reconstruct the matching error kind on
/// their side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    /// Error kind name, e.g. `"ValueError"`.
    pub kind: String,
    /// Human-readable message.
    pub message: String,
}

impl Fault {
    /// Creates a fault of an arbitrary kind.
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// A `ValueError`: right type, unusable value.
    pub fn value_error(message: impl Into<String>) -> Self {
        Self::new("ValueError", message)
    }

    /// A `TypeError`: wrong argument type or arity.
    pub fn type_error(message: impl Into<String>) -> Self {
        Self::new("TypeError", message)
    }

    /// An `AttributeError`: no such object or member.
    pub fn attribute_error(message: impl Into<String>) -> Self {
        Self::new("AttributeError", message)
    }

    /// A `RuntimeError`: the operation failed.
    pub fn runtime_error(message: impl Into<String>) -> Self {
        Self::new("RuntimeError", message)
    }
}

impl std::fmt::Display for Fault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for Fault {}

type MethodFn = Box<dyn FnMut(&[Value]) -> Result<Value, Fault> + Send>;
type GetterFn = Box<dyn FnMut() -> Result<Value, Fault> + Send>;
type SetterFn = Box<dyn FnMut(Value) -> Result<(), Fault> + Send>;

/// One object made callable over the wire.
///
/// Built with the fluent methods below; the member set is fixed once the
/// object is registered.
pub struct ExposedObject {
    class_name: String,
    methods: BTreeMap<String, MethodFn>,
    getters: BTreeMap<String, GetterFn>,
    setters: BTreeMap<String, SetterFn>,
}

impl ExposedObject {
    /// Creates an object of the given class name with no members.
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            methods: BTreeMap::new(),
            getters: BTreeMap::new(),
            setters: BTreeMap::new(),
        }
    }

    /// Adds a callable method.
    pub fn method(
        mut self,
        name: impl Into<String>,
        f: impl FnMut(&[Value]) -> Result<Value, Fault> + Send + 'static,
    ) -> Self {
        self.methods.insert(name.into(), Box::new(f));
        self
    }

    /// Adds a read/write property.
    pub fn property(
        mut self,
        name: impl Into<String>,
        getter: impl FnMut() -> Result<Value, Fault> + Send + 'static,
        setter: impl FnMut(Value) -> Result<(), Fault> + Send + 'static,
    ) -> Self {
        let name = name.into();
        self.getters.insert(name.clone(), Box::new(getter));
        self.setters.insert(name, Box::new(setter));
        self
    }

    /// Adds a read-only property.
    pub fn read_only(
        mut self,
        name: impl Into<String>,
        getter: impl FnMut() -> Result<Value, Fault> + Send + 'static,
    ) -> Self {
        self.getters.insert(name.into(), Box::new(getter));
        self
    }

    /// Adds a write-only property.
    pub fn write_only(
        mut self,
        name: impl Into<String>,
        setter: impl FnMut(Value) -> Result<(), Fault> + Send + 'static,
    ) -> Self {
        self.setters.insert(name.into(), Box::new(setter));
        self
    }

    /// Class name reported in the API descriptor.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// The descriptor a client receives for this object.
    pub fn api(&self) -> ApiDescriptor {
        let mut members: Vec<String> = self.methods.keys().cloned().collect();
        members.extend(self.getters.keys().map(|n| format!("{n}{GETTER_SUFFIX}")));
        members.extend(self.setters.keys().map(|n| format!("{n}{SETTER_SUFFIX}")));
        ApiDescriptor::new(self.class_name.clone(), members)
    }

    /// Dispatches one member invocation.
    pub(crate) fn dispatch(&mut self, member: &str, params: &[Value]) -> Result<Value, Fault> {
        let descriptor = MemberDescriptor::parse(member);
        match descriptor.kind() {
            MemberKind::Method => match self.methods.get_mut(member) {
                Some(f) => f(params),
                None => Err(self.no_member(member)),
            },
            MemberKind::Getter => match self.getters.get_mut(descriptor.path()) {
                Some(getter) => getter(),
                None => Err(self.no_member(descriptor.path())),
            },
            MemberKind::Setter => match self.setters.get_mut(descriptor.path()) {
                Some(setter) => {
                    let value = params.first().cloned().ok_or_else(|| {
                        Fault::type_error(format!(
                            "setting property '{}' takes exactly one argument",
                            descriptor.path()
                        ))
                    })?;
                    setter(value)?;
                    Ok(Value::Null)
                }
                None => Err(self.no_member(descriptor.path())),
            },
        }
    }

    fn no_member(&self, name: &str) -> Fault {
        Fault::attribute_error(format!("'{}' object has no member '{name}'", self.class_name))
    }
}

impl std::fmt::Debug for ExposedObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExposedObject")
            .field("class_name", &self.class_name)
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .field("getters", &self.getters.keys().collect::<Vec<_>>())
            .field("setters", &self.setters.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Named objects exposed by one server, acting as the top-level
/// collection.
#[derive(Debug, Default)]
pub struct ObjectRegistry {
    objects: BTreeMap<String, ExposedObject>,
}

impl ObjectRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an object under the given non-empty name. A previous
    /// object of the same name is replaced.
    pub fn register(&mut self, name: impl Into<String>, object: ExposedObject) {
        self.objects.insert(name.into(), object);
    }

    /// Names of the registered objects, sorted.
    pub fn object_names(&self) -> Vec<String> {
        self.objects.keys().cloned().collect()
    }

    /// Answers a descriptor query; the empty name describes the registry
    /// itself as a collection.
    pub fn api_descriptor(&self, object_name: &str) -> Result<ApiDescriptor, Fault> {
        if object_name.is_empty() {
            return Ok(ApiDescriptor::new(
                "ObjectCollection",
                vec![COLLECTION_METHOD.to_string()],
            ));
        }
        match self.objects.get(object_name) {
            Some(object) => Ok(object.api()),
            None => Err(Fault::attribute_error(format!(
                "no object named '{object_name}'"
            ))),
        }
    }

    /// Dispatches one wire method: descriptor queries, top-level
    /// collection enumeration, or a member of a registered object.
    pub fn dispatch(&mut self, method: &str, params: &[Value]) -> Result<Value, Fault> {
        if let Some(object_name) = method.strip_suffix(API_SUFFIX) {
            let api = self.api_descriptor(object_name)?;
            return serde_json::to_value(api)
                .map_err(|e| Fault::runtime_error(format!("descriptor serialization: {e}")));
        }

        if method == COLLECTION_METHOD {
            return Ok(json!(self.object_names()));
        }

        match self.route(method) {
            Some((object_name, member)) => {
                let member = member.to_string();
                let object = self
                    .objects
                    .get_mut(&object_name)
                    .expect("routed to a registered object");
                object.dispatch(&member, params)
            }
            None => Err(Fault::attribute_error(format!(
                "no remote member '{method}'"
            ))),
        }
    }

    /// Finds the longest registered object name that is a dotted prefix
    /// of the wire method.
    fn route<'m>(&self, method: &'m str) -> Option<(String, &'m str)> {
        let mut best: Option<(String, &'m str)> = None;
        for name in self.objects.keys() {
            if let Some(rest) = method.strip_prefix(name.as_str())
                && let Some(member) = rest.strip_prefix('.')
                && best.as_ref().is_none_or(|(b, _)| name.len() > b.len())
            {
                best = Some((name.clone(), member));
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter_object(start: i64) -> ExposedObject {
        let count = std::sync::Arc::new(std::sync::Mutex::new(start));
        let for_get = std::sync::Arc::clone(&count);
        let for_set = std::sync::Arc::clone(&count);
        let for_add = std::sync::Arc::clone(&count);

        ExposedObject::new("Counter")
            .method("add", move |args| {
                let delta = args
                    .first()
                    .and_then(Value::as_i64)
                    .ok_or_else(|| Fault::type_error("add takes one integer argument"))?;
                let mut count = for_add.lock().unwrap();
                *count += delta;
                Ok(json!(*count))
            })
            .property(
                "value",
                move || Ok(json!(*for_get.lock().unwrap())),
                move |value| {
                    let new = value
                        .as_i64()
                        .ok_or_else(|| Fault::type_error("value must be an integer"))?;
                    *for_set.lock().unwrap() = new;
                    Ok(())
                },
            )
            .read_only("limit", || Ok(json!(100)))
    }

    #[test]
    fn api_lists_methods_and_accessors() {
        let api = counter_object(0).api();
        assert_eq!(api.class_name, "Counter");
        assert_eq!(
            api.methods,
            vec!["add", "limit:get", "value:get", "value:set"]
        );
    }

    #[test]
    fn registry_dispatches_prefixed_members() {
        let mut registry = ObjectRegistry::new();
        registry.register("counter", counter_object(10));

        assert_eq!(
            registry.dispatch("counter.value:get", &[]).unwrap(),
            json!(10)
        );
        assert_eq!(
            registry.dispatch("counter.value:set", &[json!(3)]).unwrap(),
            Value::Null
        );
        assert_eq!(
            registry.dispatch("counter.add", &[json!(4)]).unwrap(),
            json!(7)
        );
    }

    #[test]
    fn top_level_collection_enumerates_names() {
        let mut registry = ObjectRegistry::new();
        registry.register("b", counter_object(0));
        registry.register("a", counter_object(0));

        assert_eq!(
            registry.dispatch(COLLECTION_METHOD, &[]).unwrap(),
            json!(["a", "b"])
        );

        let api = registry.api_descriptor("").unwrap();
        assert_eq!(api.class_name, "ObjectCollection");
        assert_eq!(api.methods, vec!["getObjects"]);
    }

    #[test]
    fn descriptor_query_for_unknown_object_is_attribute_error() {
        let mut registry = ObjectRegistry::new();
        let fault = registry.dispatch("bogus:api", &[]).unwrap_err();
        assert_eq!(fault.kind, "AttributeError");
    }

    #[test]
    fn unknown_member_is_attribute_error() {
        let mut registry = ObjectRegistry::new();
        registry.register("counter", counter_object(0));

        let fault = registry.dispatch("counter.missing", &[]).unwrap_err();
        assert_eq!(fault.kind, "AttributeError");

        let fault = registry.dispatch("orphan.value:get", &[]).unwrap_err();
        assert_eq!(fault.kind, "AttributeError");
    }

    #[test]
    fn setter_requires_an_argument() {
        let mut registry = ObjectRegistry::new();
        registry.register("counter", counter_object(0));

        let fault = registry.dispatch("counter.value:set", &[]).unwrap_err();
        assert_eq!(fault.kind, "TypeError");
    }

    #[test]
    fn read_only_property_rejects_writes() {
        let mut registry = ObjectRegistry::new();
        registry.register("counter", counter_object(0));

        let fault = registry
            .dispatch("counter.limit:set", &[json!(1)])
            .unwrap_err();
        assert_eq!(fault.kind, "AttributeError");
    }

    #[test]
    fn route_prefers_longest_registered_name() {
        let mut registry = ObjectRegistry::new();
        registry.register("rack", counter_object(1));
        registry.register("rack.motor", counter_object(2));

        assert_eq!(
            registry.dispatch("rack.motor.value:get", &[]).unwrap(),
            json!(2)
        );
        assert_eq!(
            registry.dispatch("rack.value:get", &[]).unwrap(),
            json!(1)
        );
    }

    #[test]
    fn handler_faults_propagate() {
        let mut registry = ObjectRegistry::new();
        registry.register(
            "flaky",
            ExposedObject::new("Flaky")
                .method("explode", |_| Err(Fault::runtime_error("boom"))),
        );

        let fault = registry.dispatch("flaky.explode", &[]).unwrap_err();
        assert_eq!(fault.kind, "RuntimeError");
        assert_eq!(fault.message, "boom");
    }
}
