//! Built-in federation entities produced by account discovery.

use crate::error::SchemaError;
use crate::property::{DefaultValue, ScalarType};
use crate::record::Record;
use crate::registry::SchemaRegistry;
use crate::schema::EntitySchema;
use serde::Serialize;

/// Entity type name of a discovered account.
pub const PERSON: &str = "Person";

/// Entity type name of an account's public profile.
pub const PROFILE: &str = "Profile";

/// Builds a registry holding the `Person` and `Profile` schemas.
///
/// # Errors
///
/// Only fails if the declarations below are inconsistent.
pub fn federation_schemas() -> Result<SchemaRegistry, SchemaError> {
    let mut builder = SchemaRegistry::builder();
    builder
        .register(person_schema()?)?
        .register(profile_schema()?)?;
    builder.build()
}

fn person_schema() -> Result<EntitySchema, SchemaError> {
    let mut schema = EntitySchema::new(PERSON)?;
    schema
        .declare_string("guid", None)?
        .declare_string("handle", None)?
        .declare_string("url", None)?
        .declare_string("public_key", None)?
        .declare_entity("profile", PROFILE, None)?;
    Ok(schema)
}

fn profile_schema() -> Result<EntitySchema, SchemaError> {
    let optional = || Some(DefaultValue::optional());

    let mut schema = EntitySchema::new(PROFILE)?;
    schema
        .declare_string("handle", None)?
        .declare_string("first_name", optional())?
        .declare_string("last_name", optional())?
        .declare_string("image_url", optional())?
        .declare_string("image_url_medium", optional())?
        .declare_string("image_url_small", optional())?
        .declare_property(
            "searchable",
            ScalarType::Boolean,
            Some(DefaultValue::value(true)),
        )?;
    Ok(schema)
}

/// A discovered remote account: a read-only view over a `Person` record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Person {
    record: Record,
}

impl Person {
    /// Wraps a record.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::EntityMismatch` unless the record is a `Person`.
    pub fn from_record(record: Record) -> Result<Self, SchemaError> {
        if record.entity() != PERSON {
            return Err(SchemaError::EntityMismatch {
                expected: PERSON.to_string(),
                found: record.entity().to_string(),
            });
        }
        Ok(Self { record })
    }

    pub fn guid(&self) -> Option<&str> {
        self.record.get_str("guid")
    }

    pub fn handle(&self) -> Option<&str> {
        self.record.get_str("handle")
    }

    /// The account's profile (seed) URL.
    pub fn url(&self) -> Option<&str> {
        self.record.get_str("url")
    }

    pub fn public_key(&self) -> Option<&str> {
        self.record.get_str("public_key")
    }

    pub fn profile(&self) -> Option<Profile<'_>> {
        self.record.get_entity("profile").map(|record| Profile { record })
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    pub fn into_record(self) -> Record {
        self.record
    }
}

/// Read-only view over the `Profile` record embedded in a [`Person`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Profile<'a> {
    record: &'a Record,
}

impl<'a> Profile<'a> {
    pub fn handle(&self) -> Option<&'a str> {
        self.record.get_str("handle")
    }

    pub fn first_name(&self) -> Option<&'a str> {
        self.record.get_str("first_name")
    }

    pub fn last_name(&self) -> Option<&'a str> {
        self.record.get_str("last_name")
    }

    /// Large avatar URL.
    pub fn image_url(&self) -> Option<&'a str> {
        self.record.get_str("image_url")
    }

    pub fn image_url_medium(&self) -> Option<&'a str> {
        self.record.get_str("image_url_medium")
    }

    pub fn image_url_small(&self) -> Option<&'a str> {
        self.record.get_str("image_url_small")
    }

    /// Whether the account may be listed in searches. Defaults to `true`.
    pub fn searchable(&self) -> bool {
        self.record.get_bool("searchable").unwrap_or(true)
    }

    pub fn record(&self) -> &'a Record {
        self.record
    }
}
