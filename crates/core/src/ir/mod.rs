//! Intermediate representation and compilation passes.
//!
//! The pipeline is layered so every stage stays independently testable:
//! 1. Compilation: schema nodes -> type-expression IR (all schema corner
//!    cases resolved here)
//! 2. Documentation: schema metadata -> doc blocks
//! 3. Emission: IR -> TypeScript source text via the `Emit` trait
//!
//! ## Module Structure
//!
//! - `types`: type-expression IR (TypeExpr, Field, DocBlock, TypeAliasDecl)
//! - `resolve`: pointer parsing and reference resolution (Context, RefPrefixes)
//! - `merge`: schema merge algebra backing `allOf`
//! - `discriminator`: union-member tag rewriting
//! - `normalize`: schema node -> type expression compilation
//! - `docs`: documentation synthesis
//! - `emit`: rendering via the `Emit` trait
//! - `utils`: identifier and escaping helpers shared across modules

mod discriminator;
mod docs;
mod emit;
mod merge;
mod normalize;
mod resolve;
mod types;
pub mod utils;

// Re-export the main entry points.
pub use discriminator::apply_discriminator;
pub use docs::synthesize_doc;
pub use emit::Emit;
pub use merge::{Merged, compile_all_of, merge_two};
pub use normalize::{compile_declaration, compile_type};
pub use resolve::{Context, RefPrefixes, resolve};
pub use types::{DocBlock, DocTag, Field, Literal, TypeAliasDecl, TypeExpr};
