//! OpenAPI schema to TypeScript type declaration compiler.
//!
//! typewright compiles JSON-Schema-derived API descriptions into structural
//! TypeScript type declarations with synthesized documentation blocks:
//!
//! - Component schemas become `export type` aliases
//! - `oneOf`/`anyOf` become unions; `allOf` goes through a merge algebra
//!   with collision detection and collapses, intersects, or flattens
//! - Discriminators inject literal tag fields into referenced union members
//! - Schema metadata becomes structured `/** ... */` doc comments
//!
//! The compiler is a pure function of the schema node and its context;
//! everything around it (document loading, file writing) is left to the
//! caller.

mod error;
mod generator;
pub mod ir;
pub mod spec;

pub use error::Error;
pub use generator::{generate, generate_components};
