//! Semantic analysis (spec.md §4.D).
//!
//! Two passes over the syntactic tree, mirroring the teacher's
//! `type_registry.rs` + `validation.rs` split: pass 1 ([`symbols`]) registers
//! every top-level name so forward references resolve; pass 2 ([`types`])
//! walks field/enum/implements bodies against the now-complete table and
//! builds the arena-indexed [`schema::Schema`].

mod schema;
mod symbols;
mod types;

pub use schema::{
    Enum, EnumId, EnumValue, Field, FieldType, Interface, InterfaceId, Model, ModelId, Schema,
    Struct, StructId,
};

use crate::ast::AstFile;
use crate::error::CompileError;

/// Runs both passes and returns the finished [`Schema`], or the first error
/// encountered.
pub fn analyze(file: &AstFile) -> Result<Schema, CompileError> {
    let table = symbols::build_symbol_table(file)?;
    types::compile(file, &table)
}
