//! Declaration-file generation pipeline.
//!
//! Thin wrapper around the IR-based compilation. The pipeline is:
//! 1. Parse: JSON -> Document
//! 2. Compile: each named schema -> declaration record (doc block + type)
//! 3. Emit: declaration records -> TypeScript source text
//!
//! Everything interesting happens in [`crate::ir`]; this module only walks
//! the `schemas` section in declaration order and joins the rendered
//! output.

use tracing::debug;

use crate::error::Error;
use crate::ir::{Context, Emit, RefPrefixes, compile_declaration};
use crate::spec::{Components, Document};

/// Generate TypeScript type declarations from a schema document in JSON
/// form, with no reference-name prefixes.
pub fn generate(document_json: &str) -> Result<String, Error> {
    let document = Document::from_json(document_json)?;
    let fallback = Components::default();
    let components = document.components.as_ref().unwrap_or(&fallback);
    generate_components(components, RefPrefixes::default())
}

/// Generate declarations for every schema in an already-parsed components
/// section, in declaration order.
pub fn generate_components(
    components: &Components,
    ref_prefixes: RefPrefixes,
) -> Result<String, Error> {
    let ctx = Context { components, ref_prefixes };

    let mut rendered = Vec::new();
    if let Some(schemas) = &components.schemas {
        debug!(schema_count = schemas.len(), "Compiling component schemas.");
        for (name, node) in schemas {
            let declaration = compile_declaration(name, node, &ctx)?;
            rendered.push(declaration.emit());
        }
    }

    let output = rendered.join("\n");
    debug!(output_len = output.len(), "Rendered type declarations.");
    Ok(output)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_document() {
        let document = r##"{
  "components": {
    "schemas": {
      "Role": { "type": "string", "enum": ["admin", "member"] },
      "User": {
        "type": "object",
        "description": "A registered user",
        "properties": {
          "id": { "type": "string" },
          "role": { "$ref": "#/components/schemas/Role" }
        },
        "required": ["id"]
      }
    }
  }
}"##;

        let rendered = generate(document).unwrap();
        assert_eq!(
            rendered,
            "export type Role = \"admin\" | \"member\";\n\
             \n\
             /**\n\
             \x20* A registered user\n\
             \x20*/\n\
             export type User = {\n\
             \x20 id: string;\n\
             \x20 role?: Role;\n\
             };\n"
        );
    }

    #[test]
    fn test_generate_without_components() {
        assert_eq!(generate("{}").unwrap(), "");
    }

    #[test]
    fn test_generate_rejects_invalid_json() {
        assert!(matches!(generate("not json"), Err(Error::Parse(_))));
    }

    #[test]
    fn test_generate_propagates_pointer_errors() {
        let document = r##"{
  "components": {
    "schemas": {
      "Broken": { "allOf": [{ "$ref": "#/components/schemas/Missing" }] }
    }
  }
}"##;
        assert!(matches!(
            generate(document),
            Err(Error::PointerNotFound(_))
        ));
    }
}
