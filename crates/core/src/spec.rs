//! Schema document structs for serde deserialization.
//!
//! This module defines the subset of an OpenAPI document we need to compile
//! component schemas into TypeScript type declarations: the component
//! sections, the schema nodes themselves, and the discriminator object.
//! Maps use [`IndexMap`] throughout so property and component declaration
//! order survives into the generated output.

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::Error;

/// Root schema document.
#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    /// Reusable components referenced by `#/components/...` pointers.
    pub components: Option<Components>,
}

impl Document {
    /// Parse a schema document from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Components section containing the reusable, pointer-addressable nodes.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Components {
    /// Named schemas.
    pub schemas: Option<IndexMap<String, SchemaNode>>,
    /// Named parameters.
    pub parameters: Option<IndexMap<String, SchemaNode>>,
    /// Named request bodies.
    pub request_bodies: Option<IndexMap<String, SchemaNode>>,
    /// Named responses.
    pub responses: Option<IndexMap<String, SchemaNode>>,
}

impl Components {
    /// Look up a component section by its pointer segment name.
    pub fn section(&self, name: &str) -> Option<&IndexMap<String, SchemaNode>> {
        match name {
            "schemas" => self.schemas.as_ref(),
            "parameters" => self.parameters.as_ref(),
            "requestBodies" => self.request_bodies.as_ref(),
            "responses" => self.responses.as_ref(),
            _ => None,
        }
    }
}

/// One unit of the API description: either a local reference or a schema.
///
/// References win the untagged race: any object carrying `$ref` is a
/// [`Reference`], everything else parses as a [`Schema`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SchemaNode {
    /// A `$ref` pointer to another node in the document.
    Reference(Reference),
    /// An inline schema.
    Schema(Box<Schema>),
}

/// A `$ref` pointer node.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Reference {
    /// The pointer, e.g. `#/components/schemas/User`.
    #[serde(rename = "$ref")]
    pub pointer: String,
}

/// A schema definition.
///
/// Only the keywords the compiler consumes are modeled as fields; everything
/// else (vendor `x-` extensions included) lands in [`Schema::extensions`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    /// The primitive kind (null, boolean, integer, number, string, object,
    /// array). Unrecognized kinds compile to the unconstrained type.
    #[serde(rename = "type")]
    pub schema_type: Option<String>,

    /// OpenAPI 3.0 nullable flag.
    pub nullable: Option<bool>,

    /// Enum values (strings, numbers, or booleans; other kinds degrade).
    #[serde(rename = "enum")]
    pub enum_values: Option<Vec<serde_json::Value>>,

    /// Properties for object types, in declaration order.
    pub properties: Option<IndexMap<String, SchemaNode>>,

    /// Required property names for object types.
    pub required: Option<Vec<String>>,

    /// Additional properties for object types (index signature source).
    pub additional_properties: Option<AdditionalProperties>,

    /// Item schema for array types.
    pub items: Option<Box<SchemaNode>>,

    /// Union composition (exactly one member matches).
    pub one_of: Option<Vec<SchemaNode>>,

    /// Union composition (any member matches).
    pub any_of: Option<Vec<SchemaNode>>,

    /// Merge composition (all members match).
    pub all_of: Option<Vec<SchemaNode>>,

    /// Discriminator for polymorphic `oneOf`/`anyOf` schemas.
    pub discriminator: Option<Discriminator>,

    // --- Documentation metadata (expressed as doc tags, never as types) ---
    /// Human-readable description.
    pub description: Option<String>,

    /// Minimum value for numbers.
    pub minimum: Option<serde_json::Number>,

    /// Maximum value for numbers.
    pub maximum: Option<serde_json::Number>,

    /// Default value.
    pub default: Option<serde_json::Value>,

    /// Minimum length for strings.
    pub min_length: Option<u64>,

    /// Maximum length for strings.
    pub max_length: Option<u64>,

    /// Format hint (e.g. date-time, uuid).
    pub format: Option<String>,

    /// Regex pattern for string validation.
    pub pattern: Option<String>,

    /// Example value.
    pub example: Option<serde_json::Value>,

    /// Example values; each one becomes its own doc tag.
    pub examples: Option<Vec<serde_json::Value>>,

    /// Multiple-of constraint for numbers.
    pub multiple_of: Option<serde_json::Number>,

    /// Exclusive maximum (boolean in 3.0 documents, number in 3.1).
    pub exclusive_maximum: Option<serde_json::Value>,

    /// Exclusive minimum (boolean in 3.0 documents, number in 3.1).
    pub exclusive_minimum: Option<serde_json::Value>,

    /// Maximum items for arrays.
    pub max_items: Option<u64>,

    /// Minimum items for arrays.
    pub min_items: Option<u64>,

    /// Uniqueness constraint for arrays.
    pub unique_items: Option<bool>,

    /// Maximum property count for objects.
    pub max_properties: Option<u64>,

    /// Minimum property count for objects.
    pub min_properties: Option<u64>,

    /// Deprecation flag.
    pub deprecated: Option<bool>,

    /// Every keyword not modeled above, vendor `x-` extensions included.
    #[serde(flatten)]
    pub extensions: IndexMap<String, serde_json::Value>,

    /// Internal collision marker set by the merge engine on freshly built
    /// merged values; never read from or written to the input document. A
    /// marked schema compiles to the uninhabited type.
    #[serde(skip)]
    pub forced_never: bool,
}

impl Schema {
    /// Check whether the schema constrains nothing (an empty `{}` schema).
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Check whether a property name is listed as required.
    pub fn requires(&self, name: &str) -> bool {
        self.required
            .as_ref()
            .is_some_and(|required| required.iter().any(|r| r == name))
    }
}

/// Discriminator for polymorphic schemas.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discriminator {
    /// The property name that carries the discriminator value.
    pub property_name: String,
    /// Mapping from discriminator values to schema pointers.
    pub mapping: Option<IndexMap<String, String>>,
}

/// Additional properties: a boolean or a schema node.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    /// `additionalProperties: true` / `false`.
    Bool(bool),
    /// An explicit value schema (possibly a reference, possibly empty).
    Node(Box<SchemaNode>),
}
