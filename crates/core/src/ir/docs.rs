//! Documentation synthesis from schema metadata.
//!
//! Tags are collected in one fixed order, not the schema's key order, so
//! two documents describing the same constraints render identical
//! documentation.

use crate::error::Error;
use crate::spec::{Schema, SchemaNode};

use super::resolve::{Context, resolve};
use super::types::{DocBlock, DocTag};
use super::utils::doc_scalar;

/// Synthesize a doc block from a node's metadata.
///
/// `allOf` members are folded into the node first (collisions are
/// irrelevant for documentation) so metadata contributed at any level is
/// visible. Returns `None` when there is neither a description nor a tag.
pub fn synthesize_doc(node: &SchemaNode, ctx: &Context<'_>) -> Result<Option<DocBlock>, Error> {
    let SchemaNode::Schema(boxed) = node else {
        return Ok(None);
    };
    let schema = boxed.as_ref();
    let folded;
    let meta = match &schema.all_of {
        Some(members) => {
            folded = fold_all_of(schema, members, ctx)?;
            &folded
        }
        None => schema,
    };

    let mut tags = Vec::new();
    if let Some(value) = &meta.minimum {
        tags.push(DocTag::new("minimum", value.to_string()));
    }
    if let Some(value) = &meta.maximum {
        tags.push(DocTag::new("maximum", value.to_string()));
    }
    if let Some(value) = &meta.default {
        tags.push(DocTag::new("default", doc_scalar(value)));
    }
    if let Some(value) = &meta.min_length {
        tags.push(DocTag::new("minLength", value.to_string()));
    }
    if let Some(value) = &meta.max_length {
        tags.push(DocTag::new("maxLength", value.to_string()));
    }
    if let Some(value) = &meta.format {
        tags.push(DocTag::new("format", value.clone()));
    }
    if let Some(value) = &meta.pattern {
        tags.push(DocTag::new("pattern", value.clone()));
    }
    if let Some(value) = &meta.example {
        tags.push(DocTag::new("example", doc_scalar(value)));
    }
    if let Some(values) = &meta.examples {
        // One tag per element, under the singular name.
        for value in values {
            tags.push(DocTag::new("example", doc_scalar(value)));
        }
    }
    if let Some(value) = &meta.multiple_of {
        tags.push(DocTag::new("multipleOf", value.to_string()));
    }
    if let Some(value) = &meta.exclusive_maximum {
        tags.push(DocTag::new("exclusiveMaximum", doc_scalar(value)));
    }
    if let Some(value) = &meta.exclusive_minimum {
        tags.push(DocTag::new("exclusiveMinimum", doc_scalar(value)));
    }
    if let Some(value) = &meta.max_items {
        tags.push(DocTag::new("maxItems", value.to_string()));
    }
    if let Some(value) = &meta.min_items {
        tags.push(DocTag::new("minItems", value.to_string()));
    }
    if let Some(value) = &meta.unique_items {
        tags.push(DocTag::new("uniqueItems", value.to_string()));
    }
    if let Some(value) = &meta.max_properties {
        tags.push(DocTag::new("maxProperties", value.to_string()));
    }
    if let Some(value) = &meta.min_properties {
        tags.push(DocTag::new("minProperties", value.to_string()));
    }
    if let Some(value) = &meta.deprecated {
        tags.push(DocTag::new("deprecated", value.to_string()));
    }
    for (key, value) in &meta.extensions {
        if key.starts_with("x-") && !value.is_object() && !value.is_array() {
            tags.push(DocTag::new(key.clone(), doc_scalar(value)));
        }
    }

    let description = meta
        .description
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(ToString::to_string);

    if description.is_none() && tags.is_empty() {
        return Ok(None);
    }
    Ok(Some(DocBlock { description, tags }))
}

/// Fold the node's `allOf` members into one schema, seeded with the node
/// itself, resolving referenced members through the context.
fn fold_all_of(
    schema: &Schema,
    members: &[SchemaNode],
    ctx: &Context<'_>,
) -> Result<Schema, Error> {
    let mut folded = schema.clone();
    for member in members {
        let other: &Schema = match member {
            SchemaNode::Schema(inline) => inline,
            SchemaNode::Reference(reference) => resolve(&reference.pointer, ctx)?,
        };
        folded = super::merge::merge_two(&folded, other).schema;
    }
    Ok(folded)
}
