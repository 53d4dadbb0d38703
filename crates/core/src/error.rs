//! Error types for schema compilation.

use thiserror::Error;

/// Errors produced while compiling schema nodes into type declarations.
///
/// Pointer errors are fatal for the declaration being compiled; the caller
/// decides whether to skip the declaration or abort the run. Unrecognized
/// reference categories are not errors: they degrade to the `any` type.
#[derive(Debug, Error)]
pub enum Error {
    /// The reference pointer does not have the
    /// `#/components/<section>/<name>` shape.
    #[error("unsupported pointer shape `{0}`: only `#/components/<section>/<name>` references are supported")]
    UnsupportedPointer(String),

    /// The reference pointer names a component absent from the document.
    #[error("pointer `{0}` not found in the document components")]
    PointerNotFound(String),

    /// The reference chain never reached a concrete schema.
    #[error("pointer `{0}` does not resolve to a concrete schema")]
    UnresolvedPointer(String),

    /// The schema document is not valid JSON.
    #[error("failed to parse schema document: {0}")]
    Parse(#[from] serde_json::Error),
}
