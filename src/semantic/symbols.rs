//! Pass 1 — registration (spec.md §4.D).
//!
//! Walks the AST in source order, normalizes every top-level name, and
//! assigns each a stable arena id before any field or body is compiled, so
//! that forward references (a field naming a model declared later in the
//! file) resolve during pass 2. Grounded on the teacher's
//! `type_registry.rs::register`/`resolve` pair, generalized from
//! namespace-qualified FQNs to this schema dialect's flat top-level
//! namespace.

use heck::ToUpperCamelCase;
use std::collections::HashMap;

use crate::ast::{AstFile, AstItemKind};
use crate::error::{CompileError, SchemaError};
use crate::reserved;

use super::schema::{EnumId, InterfaceId, ModelId, StructId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    Model(ModelId),
    Struct(StructId),
    Enum(EnumId),
    Interface(InterfaceId),
}

/// Maps every normalized top-level name to the arena id pass 2 should fill
/// in. Built once, read-only afterward.
#[derive(Debug, Default)]
pub struct SymbolTable {
    by_name: HashMap<String, Symbol>,
}

impl SymbolTable {
    pub fn resolve(&self, name: &str) -> Option<Symbol> {
        self.by_name.get(&normalize_type_name(name)).copied()
    }
}

/// Normalizes a user-written declaration name to UpperCamel (spec.md §3,
/// "All names are case-normalized on entry").
pub fn normalize_type_name(name: &str) -> String {
    name.to_upper_camel_case()
}

pub fn build_symbol_table(file: &AstFile) -> Result<SymbolTable, CompileError> {
    let mut table = SymbolTable::default();
    let mut next_model = 0usize;
    let mut next_struct = 0usize;
    let mut next_enum = 0usize;
    let mut next_interface = 0usize;

    for item in &file.items {
        let (raw_name, symbol) = match &item.kind {
            AstItemKind::Model(m) => {
                let id = ModelId(next_model);
                next_model += 1;
                (&m.name, Symbol::Model(id))
            }
            AstItemKind::Struct(s) => {
                let id = StructId(next_struct);
                next_struct += 1;
                (&s.name, Symbol::Struct(id))
            }
            AstItemKind::Enum(e) => {
                let id = EnumId(next_enum);
                next_enum += 1;
                (&e.name, Symbol::Enum(id))
            }
            AstItemKind::Interface(i) => {
                let id = InterfaceId(next_interface);
                next_interface += 1;
                (&i.name, Symbol::Interface(id))
            }
            AstItemKind::Option(_) => continue,
        };

        let normalized = normalize_type_name(raw_name);
        if reserved::is_reserved(&normalized) {
            return Err(SchemaError::ReservedIdentifier { name: raw_name.clone() }.into());
        }
        if table.by_name.contains_key(&normalized) {
            return Err(SchemaError::NameCollision { name: normalized }.into());
        }
        table.by_name.insert(normalized, symbol);
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;

    #[test]
    fn registers_forward_references() {
        let file = parser::parse("model M: \"/ms/{id}\" { reference<Other> o; } model Other: \"/os/{id}\" {}").unwrap();
        let table = build_symbol_table(&file).unwrap();
        assert!(matches!(table.resolve("Other"), Some(Symbol::Model(_))));
    }

    #[test]
    fn rejects_duplicate_names_across_kinds() {
        let file = parser::parse("struct Widget {} enum Widget {}").unwrap();
        assert!(build_symbol_table(&file).is_err());
    }

    #[test]
    fn rejects_reserved_name() {
        let file = parser::parse("model String: \"/xs/{id}\" {}").unwrap();
        let err = build_symbol_table(&file).unwrap_err();
        assert!(matches!(
            err,
            CompileError::Schema(SchemaError::ReservedIdentifier { .. })
        ));
    }
}
