//! Constructed entity instances.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// The value of one property in a [`Record`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Scalar(Value),
    Entity(Box<Record>),
    Entities(Vec<Record>),
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(value) => value.as_str(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Scalar(value) => value.as_bool(),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Scalar(value) => value.as_i64(),
            _ => None,
        }
    }

    pub fn as_entity(&self) -> Option<&Record> {
        match self {
            Self::Entity(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_entities(&self) -> Option<&[Record]> {
        match self {
            Self::Entities(records) => Some(records),
            _ => None,
        }
    }

    /// Converts the value back to plain JSON.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Scalar(value) => value.clone(),
            Self::Entity(record) => record.to_json(),
            Self::Entities(records) => Value::Array(records.iter().map(Record::to_json).collect()),
        }
    }
}

/// An instance of a registered entity type.
///
/// Records are produced by [`SchemaRegistry::construct`](crate::SchemaRegistry::construct)
/// and are immutable afterwards. Only present properties are stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    #[serde(skip)]
    entity: String,
    #[serde(flatten)]
    values: BTreeMap<String, FieldValue>,
}

impl Record {
    pub(crate) fn new(entity: String, values: BTreeMap<String, FieldValue>) -> Self {
        Self { entity, values }
    }

    /// Name of the entity type this record belongs to.
    pub fn entity(&self) -> &str {
        &self.entity
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_str)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(FieldValue::as_bool)
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(FieldValue::as_i64)
    }

    pub fn get_entity(&self, name: &str) -> Option<&Record> {
        self.get(name).and_then(FieldValue::as_entity)
    }

    pub fn get_entities(&self, name: &str) -> Option<&[Record]> {
        self.get(name).and_then(FieldValue::as_entities)
    }

    /// Present properties in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Converts the record to a JSON object of its present values.
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .values
            .iter()
            .map(|(name, value)| (name.clone(), value.to_json()))
            .collect();
        Value::Object(map)
    }
}
