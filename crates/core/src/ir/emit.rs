//! TypeScript rendering via the Emit trait.
//!
//! Emission is purely mechanical string building: all schema logic is
//! resolved before a value reaches this module. Structs render as
//! multi-line blocks (field docs need their own lines); everything else
//! renders inline. Two-space indentation throughout.

use super::types::{DocBlock, Field, Literal, TypeAliasDecl, TypeExpr};
use super::utils::{escape_string, quote_if_needed};

/// Trait for rendering IR nodes to TypeScript source text.
pub trait Emit {
    /// Convert the node to its TypeScript string representation.
    fn emit(&self) -> String;
}

impl Emit for Literal {
    fn emit(&self) -> String {
        match self {
            Literal::String(text) => {
                let escaped = escape_string(text);
                format!("\"{escaped}\"")
            }
            Literal::Int(int) => int.to_string(),
            Literal::Number(number) => number.to_string(),
            Literal::Bool(flag) => flag.to_string(),
        }
    }
}

impl Emit for TypeExpr {
    fn emit(&self) -> String {
        self.emit_at(0)
    }
}

impl TypeExpr {
    /// Render with the surrounding indentation level (2 spaces per level).
    fn emit_at(&self, indent: usize) -> String {
        match self {
            TypeExpr::Null => "null".to_string(),
            TypeExpr::Number => "number".to_string(),
            TypeExpr::String => "string".to_string(),
            TypeExpr::Boolean => "boolean".to_string(),
            TypeExpr::Any => "any".to_string(),
            TypeExpr::Never => "never".to_string(),
            TypeExpr::Literal(literal) => literal.emit(),
            TypeExpr::Reference(name) => name.clone(),
            TypeExpr::OpenRecord => "Record<string, any>".to_string(),
            TypeExpr::Array(element) => {
                let inner = element.emit_at(indent);
                if matches!(**element, TypeExpr::Union(_) | TypeExpr::Intersection(_)) {
                    format!("({inner})[]")
                } else {
                    format!("{inner}[]")
                }
            }
            TypeExpr::Union(members) => members
                .iter()
                .map(|member| {
                    let text = member.emit_at(indent);
                    if matches!(member, TypeExpr::Intersection(_)) {
                        format!("({text})")
                    } else {
                        text
                    }
                })
                .collect::<Vec<_>>()
                .join(" | "),
            TypeExpr::Intersection(members) => members
                .iter()
                .map(|member| {
                    let text = member.emit_at(indent);
                    if matches!(member, TypeExpr::Union(_)) {
                        format!("({text})")
                    } else {
                        text
                    }
                })
                .collect::<Vec<_>>()
                .join(" & "),
            TypeExpr::Struct { fields, index } => emit_struct(fields, index.as_deref(), indent),
            TypeExpr::Omit { base, field } => {
                let base = base.emit_at(indent);
                let field = escape_string(field);
                format!("Omit<{base}, \"{field}\">")
            }
        }
    }
}

fn emit_struct(fields: &[Field], index: Option<&TypeExpr>, indent: usize) -> String {
    if fields.is_empty() && index.is_none() {
        return "{}".to_string();
    }

    let pad = "  ".repeat(indent + 1);
    let mut output = String::from("{\n");
    for field in fields {
        if let Some(doc) = &field.doc {
            output.push_str(&doc.emit_at(indent + 1));
        }
        let name = quote_if_needed(&field.name);
        let optional = if field.optional { "?" } else { "" };
        let ty = field.ty.emit_at(indent + 1);
        output.push_str(&format!("{pad}{name}{optional}: {ty};\n"));
    }
    if let Some(value) = index {
        let ty = value.emit_at(indent + 1);
        output.push_str(&format!("{pad}[key: string]: {ty};\n"));
    }
    let close_pad = "  ".repeat(indent);
    output.push_str(&format!("{close_pad}}}"));
    output
}

impl Emit for DocBlock {
    fn emit(&self) -> String {
        self.emit_at(0)
    }
}

impl DocBlock {
    /// Render as a `/** ... */` block at the given indentation level.
    fn emit_at(&self, indent: usize) -> String {
        let pad = "  ".repeat(indent);
        let mut output = format!("{pad}/**\n");
        if let Some(description) = &self.description {
            for line in description.lines() {
                if line.is_empty() {
                    output.push_str(&format!("{pad} *\n"));
                } else {
                    output.push_str(&format!("{pad} * {line}\n"));
                }
            }
            if !self.tags.is_empty() {
                output.push_str(&format!("{pad} *\n"));
            }
        }
        for tag in &self.tags {
            let name = &tag.name;
            let value = &tag.value;
            output.push_str(&format!("{pad} * @{name} {value}\n"));
        }
        output.push_str(&format!("{pad} */\n"));
        output
    }
}

impl Emit for TypeAliasDecl {
    fn emit(&self) -> String {
        let mut output = String::new();
        if let Some(doc) = &self.doc {
            output.push_str(&doc.emit());
        }
        let name = &self.name;
        let ty = self.ty.emit_at(0);
        output.push_str(&format!("export type {name} = {ty};\n"));
        output
    }
}
