//! Schema node to type-expression compilation.
//!
//! The compiler is a pure recursive transform: every rule returns a fresh
//! [`TypeExpr`] value and nothing is patched in afterwards. Dispatch order
//! matters and mirrors the schema semantics: the collision marker wins over
//! everything, then references, combinators, enums, and finally the
//! primitive kind.

use crate::error::Error;
use crate::spec::{AdditionalProperties, Discriminator, Schema, SchemaNode};

use super::discriminator::apply_discriminator;
use super::docs::synthesize_doc;
use super::merge::compile_all_of;
use super::resolve::{Context, parse_pointer};
use super::types::{Field, Literal, TypeAliasDecl, TypeExpr};

/// Compile a named schema into its declaration record: the optional doc
/// block paired with the compiled type.
pub fn compile_declaration(
    name: &str,
    node: &SchemaNode,
    ctx: &Context<'_>,
) -> Result<TypeAliasDecl, Error> {
    Ok(TypeAliasDecl {
        name: name.to_string(),
        doc: synthesize_doc(node, ctx)?,
        ty: compile_type(node, ctx)?,
    })
}

/// Compile a schema node into a type expression.
pub fn compile_type(node: &SchemaNode, ctx: &Context<'_>) -> Result<TypeExpr, Error> {
    match node {
        SchemaNode::Reference(reference) => compile_reference(&reference.pointer, ctx),
        SchemaNode::Schema(schema) => compile_schema(schema, ctx),
    }
}

fn compile_reference(pointer: &str, ctx: &Context<'_>) -> Result<TypeExpr, Error> {
    let (section, name) = parse_pointer(pointer)?;
    Ok(match ctx.ref_prefixes.for_section(section) {
        Some(prefix) => TypeExpr::Reference(format!("{prefix}{name}")),
        // Sections outside generated-type scope may legally appear in the
        // document; they degrade to the unconstrained type.
        None => TypeExpr::Any,
    })
}

fn compile_schema(schema: &Schema, ctx: &Context<'_>) -> Result<TypeExpr, Error> {
    if schema.forced_never {
        return Ok(TypeExpr::Never);
    }

    if let Some(members) = &schema.one_of {
        return compile_union(members, schema.discriminator.as_ref(), ctx);
    }
    if let Some(members) = &schema.any_of {
        return compile_union(members, schema.discriminator.as_ref(), ctx);
    }
    if let Some(members) = &schema.all_of {
        return compile_all_of(members, ctx);
    }
    if let Some(values) = &schema.enum_values {
        return Ok(TypeExpr::Union(values.iter().map(literal_member).collect()));
    }

    let ty = match schema.schema_type.as_deref() {
        Some("null") => return Ok(TypeExpr::Null),
        Some("integer" | "number") => TypeExpr::Number,
        Some("string") => TypeExpr::String,
        Some("boolean") => TypeExpr::Boolean,
        Some("object") => compile_object(schema, ctx)?,
        Some("array") => compile_array(schema, ctx)?,
        // Unknown shapes stay compilable instead of failing.
        _ => TypeExpr::Any,
    };
    Ok(with_nullable(ty, schema.nullable == Some(true)))
}

fn compile_union(
    members: &[SchemaNode],
    discriminator: Option<&Discriminator>,
    ctx: &Context<'_>,
) -> Result<TypeExpr, Error> {
    let mut parts = Vec::with_capacity(members.len());
    for member in members {
        let compiled = compile_type(member, ctx)?;
        parts.push(apply_discriminator(compiled, member, discriminator, ctx)?);
    }
    Ok(TypeExpr::Union(parts))
}

/// One enum value as a literal-type union member. The literal kind follows
/// the value's runtime kind; anything else degrades to the unconstrained
/// type for that member only.
fn literal_member(value: &serde_json::Value) -> TypeExpr {
    match value {
        serde_json::Value::String(text) => TypeExpr::Literal(Literal::String(text.clone())),
        serde_json::Value::Number(number) => match number.as_i64() {
            Some(int) => TypeExpr::Literal(Literal::Int(int)),
            None => TypeExpr::Literal(Literal::Number(number.as_f64().unwrap_or(0.0))),
        },
        serde_json::Value::Bool(flag) => TypeExpr::Literal(Literal::Bool(*flag)),
        _ => TypeExpr::Any,
    }
}

fn compile_object(schema: &Schema, ctx: &Context<'_>) -> Result<TypeExpr, Error> {
    let Some(properties) = &schema.properties else {
        // Free-form object.
        return Ok(TypeExpr::OpenRecord);
    };

    let mut fields = Vec::with_capacity(properties.len());
    for (name, node) in properties {
        fields.push(Field {
            name: name.clone(),
            optional: !schema.requires(name),
            ty: compile_type(node, ctx)?,
            doc: synthesize_doc(node, ctx)?,
        });
    }

    Ok(TypeExpr::Struct { fields, index: index_signature(schema, ctx)? })
}

/// Value type of the struct's index signature, if `additionalProperties`
/// calls for one. `true` and the empty schema mean "anything"; `false`
/// means no signature at all.
fn index_signature(schema: &Schema, ctx: &Context<'_>) -> Result<Option<Box<TypeExpr>>, Error> {
    Ok(match &schema.additional_properties {
        None | Some(AdditionalProperties::Bool(false)) => None,
        Some(AdditionalProperties::Bool(true)) => Some(Box::new(TypeExpr::Any)),
        Some(AdditionalProperties::Node(node)) => match &**node {
            SchemaNode::Schema(value) if value.is_empty() => Some(Box::new(TypeExpr::Any)),
            _ => Some(Box::new(compile_type(node, ctx)?)),
        },
    })
}

fn compile_array(schema: &Schema, ctx: &Context<'_>) -> Result<TypeExpr, Error> {
    let element = match &schema.items {
        Some(items) => compile_type(items, ctx)?,
        None => TypeExpr::Any,
    };
    Ok(TypeExpr::Array(Box::new(element)))
}

fn with_nullable(ty: TypeExpr, nullable: bool) -> TypeExpr {
    if nullable {
        TypeExpr::Union(vec![ty, TypeExpr::Null])
    } else {
        ty
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use crate::spec::Components;

    use super::super::resolve::RefPrefixes;
    use super::*;

    fn node(json: serde_json::Value) -> SchemaNode {
        serde_json::from_value(json).unwrap()
    }

    fn compile(json: serde_json::Value) -> TypeExpr {
        let components = Components::default();
        let ctx = Context { components: &components, ref_prefixes: RefPrefixes::default() };
        compile_type(&node(json), &ctx).unwrap()
    }

    #[test]
    fn test_primitives() {
        assert_eq!(compile(serde_json::json!({ "type": "null" })), TypeExpr::Null);
        assert_eq!(compile(serde_json::json!({ "type": "integer" })), TypeExpr::Number);
        assert_eq!(compile(serde_json::json!({ "type": "number" })), TypeExpr::Number);
        assert_eq!(compile(serde_json::json!({ "type": "string" })), TypeExpr::String);
        assert_eq!(compile(serde_json::json!({ "type": "boolean" })), TypeExpr::Boolean);
    }

    #[test]
    fn test_unknown_kind_degrades() {
        assert_eq!(compile(serde_json::json!({ "type": "file" })), TypeExpr::Any);
        assert_eq!(compile(serde_json::json!({})), TypeExpr::Any);
    }

    #[test]
    fn test_nullable_wraps_leaves() {
        assert_eq!(
            compile(serde_json::json!({ "type": "integer", "nullable": true })),
            TypeExpr::Union(vec![TypeExpr::Number, TypeExpr::Null])
        );
        assert_eq!(
            compile(serde_json::json!({ "type": "object", "nullable": true })),
            TypeExpr::Union(vec![TypeExpr::OpenRecord, TypeExpr::Null])
        );
        assert_eq!(
            compile(serde_json::json!({ "type": "array", "nullable": true })),
            TypeExpr::Union(vec![
                TypeExpr::Array(Box::new(TypeExpr::Any)),
                TypeExpr::Null
            ])
        );
    }

    #[test]
    fn test_nullable_does_not_wrap_enums() {
        // The narrow nullable scope is deliberate: enum, reference, and
        // combinator results stay unwrapped.
        assert_eq!(
            compile(serde_json::json!({ "type": "string", "nullable": true, "enum": ["a"] })),
            TypeExpr::Union(vec![TypeExpr::Literal(Literal::String("a".to_string()))])
        );
    }

    #[test]
    fn test_enum_preserves_order() {
        assert_eq!(
            compile(serde_json::json!({ "type": "integer", "enum": [1, 2, 3] })),
            TypeExpr::Union(vec![
                TypeExpr::Literal(Literal::Int(1)),
                TypeExpr::Literal(Literal::Int(2)),
                TypeExpr::Literal(Literal::Int(3)),
            ])
        );
    }

    #[test]
    fn test_enum_mixed_kinds() {
        assert_eq!(
            compile(serde_json::json!({ "enum": ["auto", 1.5, true, null] })),
            TypeExpr::Union(vec![
                TypeExpr::Literal(Literal::String("auto".to_string())),
                TypeExpr::Literal(Literal::Number(1.5)),
                TypeExpr::Literal(Literal::Bool(true)),
                TypeExpr::Any,
            ])
        );
    }

    #[test]
    fn test_struct_fields_follow_declaration_order() {
        let compiled = compile(serde_json::json!({
            "type": "object",
            "properties": {
                "zeta": { "type": "string" },
                "alpha": { "type": "number" }
            },
            "required": ["alpha"]
        }));
        let TypeExpr::Struct { fields, index } = compiled else {
            panic!("expected a struct");
        };
        assert!(index.is_none());
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].name, "zeta");
        assert!(fields[0].optional);
        assert_eq!(fields[1].name, "alpha");
        assert!(!fields[1].optional);
    }

    #[test]
    fn test_index_signature_variants() {
        let open = compile(serde_json::json!({
            "type": "object",
            "properties": { "foo": { "type": "string" } },
            "additionalProperties": true
        }));
        let TypeExpr::Struct { index, .. } = open else {
            panic!("expected a struct");
        };
        assert_eq!(index.as_deref(), Some(&TypeExpr::Any));

        let empty = compile(serde_json::json!({
            "type": "object",
            "properties": { "foo": { "type": "string" } },
            "additionalProperties": {}
        }));
        let TypeExpr::Struct { index, .. } = empty else {
            panic!("expected a struct");
        };
        assert_eq!(index.as_deref(), Some(&TypeExpr::Any));

        let typed = compile(serde_json::json!({
            "type": "object",
            "properties": { "foo": { "type": "string" } },
            "additionalProperties": { "type": "number" }
        }));
        let TypeExpr::Struct { index, .. } = typed else {
            panic!("expected a struct");
        };
        assert_eq!(index.as_deref(), Some(&TypeExpr::Number));

        let closed = compile(serde_json::json!({
            "type": "object",
            "properties": { "foo": { "type": "string" } },
            "additionalProperties": false
        }));
        let TypeExpr::Struct { index, .. } = closed else {
            panic!("expected a struct");
        };
        assert!(index.is_none());
    }

    #[test]
    fn test_reference_prefixing() {
        let components = Components::default();
        let ctx = Context {
            components: &components,
            ref_prefixes: RefPrefixes {
                schemas: "Schemas.".to_string(),
                ..RefPrefixes::default()
            },
        };
        let compiled =
            compile_type(&node(serde_json::json!({ "$ref": "#/components/schemas/User" })), &ctx)
                .unwrap();
        assert_eq!(compiled, TypeExpr::Reference("Schemas.User".to_string()));
    }

    #[test]
    fn test_unrecognized_section_degrades() {
        let components = Components::default();
        let ctx = Context { components: &components, ref_prefixes: RefPrefixes::default() };
        let compiled = compile_type(
            &node(serde_json::json!({ "$ref": "#/components/examples/Sample" })),
            &ctx,
        )
        .unwrap();
        assert_eq!(compiled, TypeExpr::Any);
    }

    #[test]
    fn test_bad_pointer_shape_is_fatal() {
        let components = Components::default();
        let ctx = Context { components: &components, ref_prefixes: RefPrefixes::default() };
        let result =
            compile_type(&node(serde_json::json!({ "$ref": "#/paths/~1users/get" })), &ctx);
        assert!(matches!(result, Err(Error::UnsupportedPointer(_))));
    }

    #[test]
    fn test_compilation_is_pure() {
        let components = Components::default();
        let ctx = Context { components: &components, ref_prefixes: RefPrefixes::default() };
        let input = node(serde_json::json!({
            "type": "object",
            "description": "Stable",
            "properties": { "foo": { "type": "string", "minimum": 1 } }
        }));
        let first = compile_declaration("Stable", &input, &ctx).unwrap();
        let second = compile_declaration("Stable", &input, &ctx).unwrap();
        assert_eq!(first, second);
    }
}
