//! Property descriptors: names, value types and defaults.

use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Scalar value types a property can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    String,
    Boolean,
    Integer,
}

impl ScalarType {
    /// Returns the label used in error messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
        }
    }

    pub(crate) fn accepts(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Boolean => value.is_boolean(),
            Self::Integer => value.is_i64() || value.is_u64(),
        }
    }
}

/// The declared type of a property.
///
/// Entity types are referenced by name and resolved through the
/// [`SchemaRegistry`](crate::SchemaRegistry), so a type may point at itself
/// or at a type registered after it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyType {
    /// A plain value.
    Scalar(ScalarType),
    /// A single nested entity.
    Entity(String),
    /// An array of nested entities, all of one type.
    EntityArray(String),
}

impl PropertyType {
    /// Returns the nested entity type name, if this is an entity property.
    pub fn entity_name(&self) -> Option<&str> {
        match self {
            Self::Scalar(_) => None,
            Self::Entity(name) | Self::EntityArray(name) => Some(name),
        }
    }

    /// Returns `true` for singular and array entity properties.
    pub fn is_entity(&self) -> bool {
        self.entity_name().is_some()
    }

    /// Returns the label used in error messages.
    pub fn label(&self) -> String {
        match self {
            Self::Scalar(scalar) => scalar.label().to_string(),
            Self::Entity(name) => name.clone(),
            Self::EntityArray(name) => format!("[{name}]"),
        }
    }
}

impl From<ScalarType> for PropertyType {
    fn from(scalar: ScalarType) -> Self {
        Self::Scalar(scalar)
    }
}

impl From<EntityTarget> for PropertyType {
    fn from(target: EntityTarget) -> Self {
        match target {
            EntityTarget::One(name) => Self::Entity(name),
            EntityTarget::Many(name) => Self::EntityArray(name),
        }
    }
}

/// Target of an entity declaration.
///
/// `"Photo"` declares one nested `Photo`; `["Photo"]` declares an array of
/// them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityTarget {
    One(String),
    Many(String),
}

impl From<&str> for EntityTarget {
    fn from(name: &str) -> Self {
        Self::One(name.to_string())
    }
}

impl From<String> for EntityTarget {
    fn from(name: String) -> Self {
        Self::One(name)
    }
}

impl From<[&str; 1]> for EntityTarget {
    fn from([name]: [&str; 1]) -> Self {
        Self::Many(name.to_string())
    }
}

impl From<[String; 1]> for EntityTarget {
    fn from([name]: [String; 1]) -> Self {
        Self::Many(name)
    }
}

/// Zero-argument function producing a default value.
pub type Producer = Arc<dyn Fn() -> Value + Send + Sync>;

/// Default value of a property.
#[derive(Clone)]
pub enum DefaultValue {
    /// Returned as-is every time.
    Static(Value),
    /// Invoked on every resolution; never cached.
    Producer(Producer),
}

impl DefaultValue {
    pub fn value(value: impl Into<Value>) -> Self {
        Self::Static(value.into())
    }

    pub fn producer(producer: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        Self::Producer(Arc::new(producer))
    }

    /// A `null` default: the property is optional and absent unless supplied.
    pub fn optional() -> Self {
        Self::Static(Value::Null)
    }

    /// Resolves the default to a concrete value.
    pub fn resolve(&self) -> Value {
        match self {
            Self::Static(value) => value.clone(),
            Self::Producer(producer) => producer(),
        }
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(value) => f.debug_tuple("Static").field(value).finish(),
            Self::Producer(_) => f.write_str("Producer(..)"),
        }
    }
}

/// A declared property of an entity type.
#[derive(Debug, Clone)]
pub struct PropertyDefinition {
    name: String,
    property_type: PropertyType,
    default: Option<DefaultValue>,
}

impl PropertyDefinition {
    pub(crate) fn new(
        name: String,
        property_type: PropertyType,
        default: Option<DefaultValue>,
    ) -> Self {
        Self {
            name,
            property_type,
            default,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn property_type(&self) -> &PropertyType {
        &self.property_type
    }

    pub fn default(&self) -> Option<&DefaultValue> {
        self.default.as_ref()
    }

    /// A property is required when it has no default at all.
    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

/// Returns `true` for `[A-Za-z_][A-Za-z0-9_]*`.
pub(crate) fn is_identifier(candidate: &str) -> bool {
    let mut chars = candidate.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Names the JSON kind of a value for error messages.
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
