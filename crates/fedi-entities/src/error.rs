//! Error types for the entity schema system.

/// Errors that can occur while declaring, registering, constructing or
/// validating entities.
///
/// Declaration errors (`InvalidName`, `InvalidType`, `InvalidEntityName`,
/// `DuplicateProperty`, `DuplicateEntity`) indicate a mistake in a type
/// declaration and are raised during initialisation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// A property name is not an identifier.
    #[error("invalid property name: {0:?}")]
    InvalidName(String),

    /// An entity property targets something that is not an entity type.
    #[error("invalid entity type {target:?} for property {property:?}")]
    InvalidType { property: String, target: String },

    /// An entity type name is not an identifier.
    #[error("invalid entity name: {0:?}")]
    InvalidEntityName(String),

    /// The same property was declared twice on one entity type.
    #[error("property {property:?} declared twice on {entity}")]
    DuplicateProperty { entity: String, property: String },

    /// The same entity type was registered twice.
    #[error("entity type {0} registered twice")]
    DuplicateEntity(String),

    /// No entity type with this name is registered.
    #[error("unknown entity type: {0}")]
    UnknownEntity(String),

    /// A record was handed to a view for a different entity type.
    #[error("expected a {expected} record, got {found}")]
    EntityMismatch { expected: String, found: String },

    /// Entity data must be a JSON object.
    #[error("{entity} expects an object, got {found}")]
    NotAnObject { entity: String, found: &'static str },

    /// A supplied or default value does not match the declared type.
    #[error("{entity}.{property} expects {expected}, got {found}")]
    TypeMismatch {
        entity: String,
        property: String,
        expected: String,
        found: &'static str,
    },

    /// Nested entity data exceeded the supported depth.
    #[error("{entity} nests deeper than {limit} levels")]
    NestingTooDeep { entity: String, limit: usize },

    /// Required properties (no supplied value, no default) are absent.
    #[error("{entity} is missing required properties: {}", .properties.join(", "))]
    MissingProperties {
        entity: String,
        properties: Vec<String>,
    },
}
