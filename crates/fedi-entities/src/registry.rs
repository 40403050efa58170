//! The set of registered entity types.

use crate::error::SchemaError;
use crate::property::{json_kind, PropertyDefinition, PropertyType};
use crate::record::{FieldValue, Record};
use crate::schema::EntitySchema;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Maximum nesting depth accepted by [`SchemaRegistry::construct`].
pub const MAX_NESTING_DEPTH: usize = 32;

/// Collects entity schemas before they are checked and frozen.
#[derive(Debug, Default)]
pub struct SchemaRegistryBuilder {
    schemas: Vec<EntitySchema>,
}

impl SchemaRegistryBuilder {
    /// Adds a schema. Entity references are not checked until [`build`](Self::build),
    /// so schemas can be registered in any order.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::DuplicateEntity` if a type of the same name is
    /// already registered.
    pub fn register(&mut self, schema: EntitySchema) -> Result<&mut Self, SchemaError> {
        if self.schemas.iter().any(|s| s.name() == schema.name()) {
            return Err(SchemaError::DuplicateEntity(schema.name().to_string()));
        }
        self.schemas.push(schema);
        Ok(self)
    }

    /// Resolves every entity reference and freezes the registry.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::InvalidType` for the first property that names an
    /// unregistered entity type.
    pub fn build(self) -> Result<SchemaRegistry, SchemaError> {
        let names: HashSet<&str> = self.schemas.iter().map(EntitySchema::name).collect();
        for schema in &self.schemas {
            for prop in schema.class_props() {
                if let Some(target) = prop.property_type().entity_name() {
                    if !names.contains(target) {
                        return Err(SchemaError::InvalidType {
                            property: format!("{}.{}", schema.name(), prop.name()),
                            target: target.to_string(),
                        });
                    }
                }
            }
        }

        tracing::debug!(entities = self.schemas.len(), "built schema registry");

        let schemas = self
            .schemas
            .into_iter()
            .map(|schema| (schema.name().to_string(), schema))
            .collect();
        Ok(SchemaRegistry { schemas })
    }
}

/// Read-only table of entity schemas with every reference resolved.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    schemas: HashMap<String, EntitySchema>,
}

impl SchemaRegistry {
    pub fn builder() -> SchemaRegistryBuilder {
        SchemaRegistryBuilder::default()
    }

    pub fn get(&self, entity: &str) -> Option<&EntitySchema> {
        self.schemas.get(entity)
    }

    /// Names of all registered entity types, sorted.
    pub fn entity_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.schemas.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    fn schema(&self, entity: &str) -> Result<&EntitySchema, SchemaError> {
        self.get(entity)
            .ok_or_else(|| SchemaError::UnknownEntity(entity.to_string()))
    }

    /// The type's own declared properties.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::UnknownEntity` if `entity` is not registered.
    pub fn class_props(&self, entity: &str) -> Result<&[PropertyDefinition], SchemaError> {
        Ok(self.schema(entity)?.class_props())
    }

    /// Names of the type's own declared properties.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::UnknownEntity` if `entity` is not registered.
    pub fn class_prop_names(&self, entity: &str) -> Result<Vec<&str>, SchemaError> {
        Ok(self.schema(entity)?.class_prop_names())
    }

    /// Resolved defaults of the type's own properties.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::UnknownEntity` if `entity` is not registered.
    pub fn default_values(&self, entity: &str) -> Result<Map<String, Value>, SchemaError> {
        Ok(self.schema(entity)?.default_values())
    }

    /// The type's own properties followed by the own properties of every
    /// entity type reachable through its entity properties.
    ///
    /// Each type contributes once, so self-referential and mutually nested
    /// types terminate.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::UnknownEntity` if `entity` is not registered.
    pub fn nested_class_props(
        &self,
        entity: &str,
    ) -> Result<Vec<&PropertyDefinition>, SchemaError> {
        let mut visited = HashSet::new();
        let mut props = Vec::new();
        self.collect_nested(entity, &mut visited, &mut props)?;
        Ok(props)
    }

    fn collect_nested<'a>(
        &'a self,
        entity: &str,
        visited: &mut HashSet<&'a str>,
        props: &mut Vec<&'a PropertyDefinition>,
    ) -> Result<(), SchemaError> {
        let schema = self.schema(entity)?;
        if !visited.insert(schema.name()) {
            return Ok(());
        }
        props.extend(schema.class_props());
        for prop in schema.class_props() {
            if let Some(target) = prop.property_type().entity_name() {
                self.collect_nested(target, visited, props)?;
            }
        }
        Ok(())
    }

    /// Builds a record of type `entity` from a JSON object.
    ///
    /// Each declared property takes the supplied value, else its resolved
    /// default, else stays absent. `null` counts as not supplied. Nested
    /// objects are constructed recursively; undeclared keys are ignored.
    ///
    /// # Errors
    ///
    /// - `UnknownEntity` if `entity` is not registered.
    /// - `NotAnObject` if `supplied` is not a JSON object.
    /// - `TypeMismatch` if a value does not match its declared type.
    /// - `NestingTooDeep` past [`MAX_NESTING_DEPTH`] levels.
    pub fn construct(&self, entity: &str, supplied: Value) -> Result<Record, SchemaError> {
        self.construct_at(entity, supplied, 0)
    }

    fn construct_at(
        &self,
        entity: &str,
        supplied: Value,
        depth: usize,
    ) -> Result<Record, SchemaError> {
        let schema = self.schema(entity)?;
        if depth > MAX_NESTING_DEPTH {
            return Err(SchemaError::NestingTooDeep {
                entity: entity.to_string(),
                limit: MAX_NESTING_DEPTH,
            });
        }
        let mut supplied = match supplied {
            Value::Object(map) => map,
            other => {
                return Err(SchemaError::NotAnObject {
                    entity: entity.to_string(),
                    found: json_kind(&other),
                })
            }
        };

        let mut values = BTreeMap::new();
        for prop in schema.class_props() {
            let raw = match supplied.remove(prop.name()) {
                Some(Value::Null) | None => prop.default().map(|default| default.resolve()),
                Some(value) => Some(value),
            };
            let Some(raw) = raw.filter(|value| !value.is_null()) else {
                continue;
            };
            let value = self.convert(schema, prop, raw, depth)?;
            values.insert(prop.name().to_string(), value);
        }

        Ok(Record::new(schema.name().to_string(), values))
    }

    fn convert(
        &self,
        schema: &EntitySchema,
        prop: &PropertyDefinition,
        raw: Value,
        depth: usize,
    ) -> Result<FieldValue, SchemaError> {
        let mismatch = |found: &Value| SchemaError::TypeMismatch {
            entity: schema.name().to_string(),
            property: prop.name().to_string(),
            expected: prop.property_type().label(),
            found: json_kind(found),
        };

        match prop.property_type() {
            PropertyType::Scalar(scalar) => {
                if scalar.accepts(&raw) {
                    Ok(FieldValue::Scalar(raw))
                } else {
                    Err(mismatch(&raw))
                }
            }
            PropertyType::Entity(target) => {
                if !raw.is_object() {
                    return Err(mismatch(&raw));
                }
                let record = self.construct_at(target, raw, depth + 1)?;
                Ok(FieldValue::Entity(Box::new(record)))
            }
            PropertyType::EntityArray(target) => match raw {
                Value::Array(items) => items
                    .into_iter()
                    .map(|item| {
                        if item.is_object() {
                            self.construct_at(target, item, depth + 1)
                        } else {
                            Err(mismatch(&item))
                        }
                    })
                    .collect::<Result<Vec<_>, _>>()
                    .map(FieldValue::Entities),
                other => Err(mismatch(&other)),
            },
        }
    }

    /// Checks that every property without a default is present, recursing
    /// into nested records.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::MissingProperties` naming the absent properties
    /// of the first incomplete record, or `UnknownEntity` if the record's
    /// type is not registered.
    pub fn validate(&self, record: &Record) -> Result<(), SchemaError> {
        let schema = self.schema(record.entity())?;
        let missing: Vec<String> = schema
            .class_props()
            .iter()
            .filter(|prop| prop.is_required() && !record.contains(prop.name()))
            .map(|prop| prop.name().to_string())
            .collect();
        if !missing.is_empty() {
            return Err(SchemaError::MissingProperties {
                entity: schema.name().to_string(),
                properties: missing,
            });
        }

        for (_, value) in record.iter() {
            match value {
                FieldValue::Scalar(_) => {}
                FieldValue::Entity(nested) => self.validate(nested)?,
                FieldValue::Entities(nested) => {
                    for item in nested {
                        self.validate(item)?;
                    }
                }
            }
        }
        Ok(())
    }
}
