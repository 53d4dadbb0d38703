//! Schema merge algebra backing `allOf` compilation.
//!
//! [`merge_two`] combines two schemas into a fresh value and reports whether
//! the combination is representable without information loss. Inputs are
//! never mutated; a conflict is recorded on the merged value itself (the
//! collision marker), which the compiler turns into the uninhabited type.

use indexmap::IndexMap;

use crate::error::Error;
use crate::spec::{Schema, SchemaNode};

use super::normalize::compile_type;
use super::resolve::{Context, resolve};
use super::types::TypeExpr;

/// Result of merging two schemas.
#[derive(Debug, Clone, PartialEq)]
pub struct Merged {
    /// The combined schema, possibly carrying collision markers.
    pub schema: Schema,
    /// Whether the two sides could not be combined losslessly.
    pub colliding: bool,
}

/// Merge two schemas pairwise.
///
/// Kind disagreement marks the whole merged value; per-property kind
/// disagreement marks just that property. Any property-name overlap counts
/// as a collision, even when both sides agree on the shape: structural
/// identity is not verified beyond the kind check.
pub fn merge_two(a: &Schema, b: &Schema) -> Merged {
    if let (Some(kind_a), Some(kind_b)) = (&a.schema_type, &b.schema_type)
        && kind_a != kind_b
    {
        let mut schema = deep_merge(a, b);
        schema.forced_never = true;
        return Merged { schema, colliding: true };
    }

    if let (Some(props_a), Some(props_b)) = (&a.properties, &b.properties) {
        let mut colliding = false;
        let mut properties = IndexMap::with_capacity(props_a.len() + props_b.len());
        for (name, node_a) in props_a {
            let Some(node_b) = props_b.get(name) else {
                properties.insert(name.clone(), node_a.clone());
                continue;
            };
            colliding = true;
            properties.insert(name.clone(), merge_property(node_a, node_b));
        }
        for (name, node_b) in props_b {
            if !properties.contains_key(name) {
                properties.insert(name.clone(), node_b.clone());
            }
        }
        let mut schema = deep_merge(a, b);
        schema.properties = Some(properties);
        return Merged { schema, colliding };
    }

    let colliding = required_overlaps_properties(a, b) || required_overlaps_properties(b, a);
    Merged { schema: deep_merge(a, b), colliding }
}

/// Merge one property present on both sides, marking it when the two
/// declared kinds are incompatible.
fn merge_property(a: &SchemaNode, b: &SchemaNode) -> SchemaNode {
    if let (SchemaNode::Schema(schema_a), SchemaNode::Schema(schema_b)) = (a, b)
        && let (Some(kind_a), Some(kind_b)) = (&schema_a.schema_type, &schema_b.schema_type)
        && kind_a != kind_b
    {
        let mut clash = deep_merge(schema_a, schema_b);
        clash.forced_never = true;
        return SchemaNode::Schema(Box::new(clash));
    }
    merge_nodes(a, b)
}

/// One side requires a field that only the other side's shape carries.
fn required_overlaps_properties(required_side: &Schema, shaped_side: &Schema) -> bool {
    let (Some(required), Some(properties)) =
        (&required_side.required, &shaped_side.properties)
    else {
        return false;
    };
    required.iter().any(|name| properties.contains_key(name))
}

/// Combine two nodes with right-hand precedence.
fn merge_nodes(a: &SchemaNode, b: &SchemaNode) -> SchemaNode {
    match (a, b) {
        (SchemaNode::Schema(schema_a), SchemaNode::Schema(schema_b)) => {
            SchemaNode::Schema(Box::new(deep_merge(schema_a, schema_b)))
        }
        _ => b.clone(),
    }
}

fn right_or<T: Clone>(a: &Option<T>, b: &Option<T>) -> Option<T> {
    b.as_ref().or(a.as_ref()).cloned()
}

/// Field-wise combination of two schemas: right side wins for scalar and
/// list metadata, `required` is the order-preserving union, properties
/// merge per-key, and the collision marker is sticky.
fn deep_merge(a: &Schema, b: &Schema) -> Schema {
    let properties = match (&a.properties, &b.properties) {
        (Some(props_a), Some(props_b)) => {
            let mut merged = IndexMap::with_capacity(props_a.len() + props_b.len());
            for (name, node) in props_a {
                merged.insert(name.clone(), node.clone());
            }
            for (name, node_b) in props_b {
                let combined = match merged.get(name) {
                    Some(node_a) => merge_nodes(node_a, node_b),
                    None => node_b.clone(),
                };
                merged.insert(name.clone(), combined);
            }
            Some(merged)
        }
        (Some(props), None) | (None, Some(props)) => Some(props.clone()),
        (None, None) => None,
    };

    let required = match (&a.required, &b.required) {
        (Some(required_a), Some(required_b)) => {
            let mut merged = required_a.clone();
            for name in required_b {
                if !merged.contains(name) {
                    merged.push(name.clone());
                }
            }
            Some(merged)
        }
        (Some(required), None) | (None, Some(required)) => Some(required.clone()),
        (None, None) => None,
    };

    let mut extensions = a.extensions.clone();
    for (key, value) in &b.extensions {
        extensions.insert(key.clone(), value.clone());
    }

    Schema {
        schema_type: right_or(&a.schema_type, &b.schema_type),
        nullable: right_or(&a.nullable, &b.nullable),
        enum_values: right_or(&a.enum_values, &b.enum_values),
        properties,
        required,
        additional_properties: right_or(&a.additional_properties, &b.additional_properties),
        items: right_or(&a.items, &b.items),
        one_of: right_or(&a.one_of, &b.one_of),
        any_of: right_or(&a.any_of, &b.any_of),
        all_of: right_or(&a.all_of, &b.all_of),
        discriminator: right_or(&a.discriminator, &b.discriminator),
        description: right_or(&a.description, &b.description),
        minimum: right_or(&a.minimum, &b.minimum),
        maximum: right_or(&a.maximum, &b.maximum),
        default: right_or(&a.default, &b.default),
        min_length: right_or(&a.min_length, &b.min_length),
        max_length: right_or(&a.max_length, &b.max_length),
        format: right_or(&a.format, &b.format),
        pattern: right_or(&a.pattern, &b.pattern),
        example: right_or(&a.example, &b.example),
        examples: right_or(&a.examples, &b.examples),
        multiple_of: right_or(&a.multiple_of, &b.multiple_of),
        exclusive_maximum: right_or(&a.exclusive_maximum, &b.exclusive_maximum),
        exclusive_minimum: right_or(&a.exclusive_minimum, &b.exclusive_minimum),
        max_items: right_or(&a.max_items, &b.max_items),
        min_items: right_or(&a.min_items, &b.min_items),
        unique_items: right_or(&a.unique_items, &b.unique_items),
        max_properties: right_or(&a.max_properties, &b.max_properties),
        min_properties: right_or(&a.min_properties, &b.min_properties),
        deprecated: right_or(&a.deprecated, &b.deprecated),
        extensions,
        forced_never: a.forced_never || b.forced_never,
    }
}

/// Compile an `allOf` combinator.
///
/// Folds the members left to right through [`merge_two`]. A combinator made
/// purely of inline schemas always collapses to the merged schema; one that
/// mixes in references stays an intersection of the independently compiled
/// members as long as no merge collided, and otherwise falls back to the
/// flattened merge, sacrificing the named references to stay correct.
pub fn compile_all_of(members: &[SchemaNode], ctx: &Context<'_>) -> Result<TypeExpr, Error> {
    let mut merged = Schema::default();
    let mut inline_only = true;
    let mut intersectable = true;
    let mut parts = Vec::with_capacity(members.len());

    for (index, member) in members.iter().enumerate() {
        parts.push(compile_type(member, ctx)?);
        match member {
            SchemaNode::Schema(schema) if index == 0 => merged = (**schema).clone(),
            SchemaNode::Schema(schema) => {
                let outcome = merge_two(&merged, schema);
                intersectable &= !outcome.colliding;
                merged = outcome.schema;
            }
            SchemaNode::Reference(reference) => {
                inline_only = false;
                let resolved = resolve(&reference.pointer, ctx)?;
                let outcome = merge_two(&merged, resolved);
                intersectable &= !outcome.colliding;
                merged = outcome.schema;
            }
        }
    }

    if !inline_only && intersectable {
        return Ok(TypeExpr::Intersection(parts));
    }
    compile_type(&SchemaNode::Schema(Box::new(merged)), ctx)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    fn schema(json: serde_json::Value) -> Schema {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_kind_clash_marks_whole_schema() {
        let outcome = merge_two(
            &schema(serde_json::json!({ "type": "string" })),
            &schema(serde_json::json!({ "type": "number" })),
        );
        assert!(outcome.colliding);
        assert!(outcome.schema.forced_never);
        // Right side wins for the kind itself.
        assert_eq!(outcome.schema.schema_type.as_deref(), Some("number"));
    }

    #[test]
    fn test_matching_kinds_do_not_collide() {
        let outcome = merge_two(
            &schema(serde_json::json!({ "type": "string", "minLength": 1 })),
            &schema(serde_json::json!({ "type": "string", "maxLength": 255 })),
        );
        assert!(!outcome.colliding);
        assert!(!outcome.schema.forced_never);
        assert_eq!(outcome.schema.min_length, Some(1));
        assert_eq!(outcome.schema.max_length, Some(255));
    }

    #[test]
    fn test_property_kind_clash_marks_property_only() {
        let outcome = merge_two(
            &schema(serde_json::json!({ "properties": { "foo": { "type": "string" } } })),
            &schema(serde_json::json!({ "properties": { "foo": { "type": "number" } } })),
        );
        assert!(outcome.colliding);
        assert!(!outcome.schema.forced_never);

        let properties = outcome.schema.properties.unwrap();
        let SchemaNode::Schema(foo) = &properties["foo"] else {
            panic!("expected an inline schema for foo");
        };
        assert!(foo.forced_never);
    }

    #[test]
    fn test_any_name_overlap_collides() {
        // Both sides declare `foo` as a string; the shapes agree, but the
        // overlap is still reported.
        let outcome = merge_two(
            &schema(serde_json::json!({ "properties": { "foo": { "type": "string" } } })),
            &schema(
                serde_json::json!({ "properties": { "foo": { "type": "string" }, "bar": {} } }),
            ),
        );
        assert!(outcome.colliding);

        let properties = outcome.schema.properties.unwrap();
        assert_eq!(
            properties.keys().cloned().collect::<Vec<_>>(),
            ["foo", "bar"]
        );
        let SchemaNode::Schema(foo) = &properties["foo"] else {
            panic!("expected an inline schema for foo");
        };
        assert!(!foo.forced_never);
    }

    #[test]
    fn test_required_against_foreign_shape_collides() {
        let outcome = merge_two(
            &schema(serde_json::json!({ "properties": { "bar": { "type": "string" } } })),
            &schema(serde_json::json!({ "required": ["bar"] })),
        );
        assert!(outcome.colliding);
        assert!(!outcome.schema.forced_never);
        assert_eq!(outcome.schema.required.as_deref(), Some(&["bar".to_string()][..]));
        assert!(outcome.schema.properties.is_some());
    }

    #[test]
    fn test_required_union_preserves_order() {
        let outcome = merge_two(
            &schema(serde_json::json!({ "type": "object", "required": ["a", "b"] })),
            &schema(serde_json::json!({ "type": "object", "required": ["b", "c"] })),
        );
        assert_eq!(
            outcome.schema.required.unwrap(),
            ["a".to_string(), "b".to_string(), "c".to_string()]
        );
    }

    #[test]
    fn test_marker_is_sticky() {
        let first = merge_two(
            &schema(serde_json::json!({ "type": "string" })),
            &schema(serde_json::json!({ "type": "number" })),
        );
        let second = merge_two(&first.schema, &schema(serde_json::json!({ "type": "number" })));
        assert!(second.schema.forced_never);
    }
}
