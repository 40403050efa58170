//! Per-type property declarations.

use crate::error::SchemaError;
use crate::property::{
    is_identifier, DefaultValue, EntityTarget, PropertyDefinition, PropertyType, ScalarType,
};
use serde_json::{Map, Value};

/// The declared shape of one entity type.
///
/// ```rust,ignore
/// let mut profile = EntitySchema::new("Profile")?;
/// profile
///     .declare_property("handle", ScalarType::String, None)?
///     .declare_property("searchable", ScalarType::Boolean, Some(DefaultValue::value(true)))?;
///
/// let mut person = EntitySchema::new("Person")?;
/// person.declare_entity("profile", "Profile", None)?;
/// ```
#[derive(Debug, Clone)]
pub struct EntitySchema {
    name: String,
    props: Vec<PropertyDefinition>,
}

impl EntitySchema {
    /// Starts an empty schema for the entity type `name`.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::InvalidEntityName` unless `name` is an identifier.
    pub fn new(name: impl Into<String>) -> Result<Self, SchemaError> {
        let name = name.into();
        if !is_identifier(&name) {
            return Err(SchemaError::InvalidEntityName(name));
        }
        Ok(Self {
            name,
            props: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declares a property.
    ///
    /// # Errors
    ///
    /// - `InvalidName` if `name` is not an identifier.
    /// - `InvalidType` if an entity type is requested whose name is not an
    ///   identifier.
    /// - `DuplicateProperty` if `name` is already declared on this type.
    pub fn declare_property(
        &mut self,
        name: &str,
        property_type: impl Into<PropertyType>,
        default: Option<DefaultValue>,
    ) -> Result<&mut Self, SchemaError> {
        if !is_identifier(name) {
            return Err(SchemaError::InvalidName(name.to_string()));
        }
        let property_type = property_type.into();
        if let Some(target) = property_type.entity_name() {
            if !is_identifier(target) {
                return Err(SchemaError::InvalidType {
                    property: name.to_string(),
                    target: target.to_string(),
                });
            }
        }
        if self.property(name).is_some() {
            return Err(SchemaError::DuplicateProperty {
                entity: self.name.clone(),
                property: name.to_string(),
            });
        }

        self.props.push(PropertyDefinition::new(
            name.to_string(),
            property_type,
            default,
        ));
        Ok(self)
    }

    /// Declares a string property, the common case.
    ///
    /// # Errors
    ///
    /// Same as [`declare_property`](Self::declare_property).
    pub fn declare_string(
        &mut self,
        name: &str,
        default: Option<DefaultValue>,
    ) -> Result<&mut Self, SchemaError> {
        self.declare_property(name, ScalarType::String, default)
    }

    /// Declares a nested entity property, singular (`"Type"`) or an array of
    /// one kind (`["Type"]`).
    ///
    /// # Errors
    ///
    /// Same as [`declare_property`](Self::declare_property).
    pub fn declare_entity(
        &mut self,
        name: &str,
        target: impl Into<EntityTarget>,
        default: Option<DefaultValue>,
    ) -> Result<&mut Self, SchemaError> {
        self.declare_property(name, target.into(), default)
    }

    /// The type's own declared properties, in declaration order.
    pub fn class_props(&self) -> &[PropertyDefinition] {
        &self.props
    }

    /// Names of the type's own declared properties.
    pub fn class_prop_names(&self) -> Vec<&str> {
        self.props.iter().map(PropertyDefinition::name).collect()
    }

    /// Looks up an own property by name.
    pub fn property(&self, name: &str) -> Option<&PropertyDefinition> {
        self.props.iter().find(|prop| prop.name() == name)
    }

    /// Resolved defaults for every property that declares one.
    ///
    /// Producer defaults run on every call, so two calls never share a value.
    pub fn default_values(&self) -> Map<String, Value> {
        self.props
            .iter()
            .filter_map(|prop| {
                prop.default()
                    .map(|default| (prop.name().to_string(), default.resolve()))
            })
            .collect()
    }
}
