//! Reference resolution against the document component sections.
//!
//! Pointers are name-keyed lookups into the component sections, never raw
//! graph edges, so cycles are a property of the lookup graph and the
//! resolver can bound how far it chases a chain of pure references.

use crate::error::Error;
use crate::spec::{Components, Schema, SchemaNode};

/// Prefixes prepended to type names generated from each component section.
///
/// Exactly these four sections produce named types; references into any
/// other section compile to the unconstrained type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefPrefixes {
    /// Prefix for `#/components/schemas/*` references.
    pub schemas: String,
    /// Prefix for `#/components/parameters/*` references.
    pub parameters: String,
    /// Prefix for `#/components/requestBodies/*` references.
    pub request_bodies: String,
    /// Prefix for `#/components/responses/*` references.
    pub responses: String,
}

impl RefPrefixes {
    /// Prefix for a component section, or `None` when the section is not
    /// one generated types can point at.
    pub fn for_section(&self, section: &str) -> Option<&str> {
        match section {
            "schemas" => Some(&self.schemas),
            "parameters" => Some(&self.parameters),
            "requestBodies" => Some(&self.request_bodies),
            "responses" => Some(&self.responses),
            _ => None,
        }
    }
}

/// Read-only compilation context: one document's component sections plus
/// the reference-prefix table. Constructed once per compilation call.
#[derive(Debug, Clone)]
pub struct Context<'a> {
    /// The document's component sections.
    pub components: &'a Components,
    /// Prefixes applied to resolved reference names.
    pub ref_prefixes: RefPrefixes,
}

/// Longest chain of pure references the resolver follows before deciding
/// the pointer never bottoms out in a concrete schema.
const MAX_REF_HOPS: usize = 64;

/// Split a pointer into its `(section, name)` pair.
///
/// Only the `#/components/<section>/<name>` shape is supported; anything
/// else is a fatal input error.
pub fn parse_pointer(pointer: &str) -> Result<(&str, &str), Error> {
    let mut segments = pointer.split('/');
    match (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) {
        (Some("#"), Some("components"), Some(section), Some(name), None)
            if !section.is_empty() && !name.is_empty() =>
        {
            Ok((section, name))
        }
        _ => Err(Error::UnsupportedPointer(pointer.to_string())),
    }
}

/// Dereference a pointer to the concrete schema it names, following
/// intermediate references transitively.
pub fn resolve<'a>(pointer: &str, ctx: &Context<'a>) -> Result<&'a Schema, Error> {
    let mut target = lookup(pointer, ctx)?;
    for _ in 0..MAX_REF_HOPS {
        match target {
            SchemaNode::Schema(schema) => return Ok(schema),
            SchemaNode::Reference(reference) => target = lookup(&reference.pointer, ctx)?,
        }
    }
    Err(Error::UnresolvedPointer(pointer.to_string()))
}

fn lookup<'a>(pointer: &str, ctx: &Context<'a>) -> Result<&'a SchemaNode, Error> {
    let (section, name) = parse_pointer(pointer)?;
    ctx.components
        .section(section)
        .and_then(|entries| entries.get(name))
        .ok_or_else(|| Error::PointerNotFound(pointer.to_string()))
}
