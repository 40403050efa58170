//! Declarative property schemas for federation entities.
//!
//! Every entity type exchanged over federation (discovered accounts, their
//! profiles, and message types built on top of them) declares its shape once
//! as an [`EntitySchema`]: named properties with a scalar or nested-entity
//! type and an optional default. Schemas are collected into a
//! [`SchemaRegistry`], which resolves nested-entity references by name,
//! answers introspection queries, fills defaults while constructing
//! [`Record`]s, and validates required properties.
//!
//! The registry is built once during initialisation and is read-only
//! afterwards, so it can be shared freely between tasks.
//!
//! # Usage
//!
//! ```rust,ignore
//! use fedi_entities::{DefaultValue, EntitySchema, ScalarType, SchemaRegistry};
//! use serde_json::json;
//!
//! let mut photo = EntitySchema::new("Photo")?;
//! photo.declare_property("url", ScalarType::String, None)?;
//!
//! let mut post = EntitySchema::new("Post")?;
//! post.declare_property("text", ScalarType::String, None)?
//!     .declare_property("public", ScalarType::Boolean, Some(DefaultValue::value(false)))?
//!     .declare_entity("photos", ["Photo"], Some(DefaultValue::producer(|| json!([]))))?;
//!
//! let mut builder = SchemaRegistry::builder();
//! builder.register(post)?.register(photo)?;
//! let registry = builder.build()?;
//!
//! let record = registry.construct("Post", json!({ "text": "hello" }))?;
//! registry.validate(&record)?;
//! ```

mod error;
mod federation;
mod property;
mod record;
mod registry;
mod schema;

pub use error::SchemaError;
pub use federation::{federation_schemas, Person, Profile, PERSON, PROFILE};
pub use property::{
    DefaultValue, EntityTarget, Producer, PropertyDefinition, PropertyType, ScalarType,
};
pub use record::{FieldValue, Record};
pub use registry::{SchemaRegistry, SchemaRegistryBuilder, MAX_NESTING_DEPTH};
pub use schema::EntitySchema;

#[cfg(test)]
mod tests;
