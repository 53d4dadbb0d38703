//! Discriminated-union member rewriting.
//!
//! When a `oneOf`/`anyOf` carries a discriminator, every referenced member
//! whose pointer appears in the mapping gets a literal tag field injected
//! into its compiled type, unless the member already encodes the tag
//! exactly. Inline members are left untouched: the mapping can only name
//! them by pointer, so there is nothing to match against.

use crate::error::Error;
use crate::spec::{Discriminator, Schema, SchemaNode};

use super::resolve::{Context, resolve};
use super::types::{Field, Literal, TypeExpr};

/// Rewrite one union member's compiled type for a discriminator.
///
/// Returns the input unchanged when there is nothing to do: no
/// discriminator, no mapping, an inline member, or a member whose pointer
/// no mapping entry names.
pub fn apply_discriminator(
    compiled: TypeExpr,
    member: &SchemaNode,
    discriminator: Option<&Discriminator>,
    ctx: &Context<'_>,
) -> Result<TypeExpr, Error> {
    let Some(discriminator) = discriminator else {
        return Ok(compiled);
    };
    let Some(mapping) = &discriminator.mapping else {
        return Ok(compiled);
    };
    if discriminator.property_name.is_empty() {
        return Ok(compiled);
    }
    let SchemaNode::Reference(reference) = member else {
        return Ok(compiled);
    };
    let Some(tag) = mapping
        .iter()
        .find_map(|(tag, target)| (target == &reference.pointer).then_some(tag.as_str()))
    else {
        return Ok(compiled);
    };

    let property_name = &discriminator.property_name;
    let resolved = resolve(&reference.pointer, ctx)?;
    let property = resolved
        .properties
        .as_ref()
        .and_then(|properties| properties.get(property_name));

    match property {
        // The member already declares the tag exactly; leave it alone.
        Some(SchemaNode::Schema(schema))
            if encodes_tag_exactly(schema, resolved, property_name, tag) =>
        {
            Ok(compiled)
        }
        // No such field: add the tag without displacing anything.
        None => Ok(TypeExpr::Intersection(vec![
            compiled,
            tag_field(property_name, tag),
        ])),
        // The field exists but is wider than the literal: strip it first.
        Some(_) => Ok(TypeExpr::Intersection(vec![
            TypeExpr::Omit { base: Box::new(compiled), field: property_name.clone() },
            tag_field(property_name, tag),
        ])),
    }
}

/// The member declares the discriminant as a required single-value enum
/// equal to the tag.
fn encodes_tag_exactly(property: &Schema, owner: &Schema, name: &str, tag: &str) -> bool {
    let exact_enum = matches!(
        property.enum_values.as_deref(),
        Some([serde_json::Value::String(value)]) if value == tag
    );
    exact_enum && owner.requires(name)
}

fn tag_field(name: &str, tag: &str) -> TypeExpr {
    TypeExpr::Struct {
        fields: vec![Field {
            name: name.to_string(),
            optional: false,
            ty: TypeExpr::Literal(Literal::String(tag.to_string())),
            doc: None,
        }],
        index: None,
    }
}
