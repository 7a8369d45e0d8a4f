//! Syntactic tree (spec.md §3, "Syntactic tree").
//!
//! Produced by [`crate::parser`], consumed by [`crate::semantic`] and then
//! discarded — nothing downstream of semantic analysis holds an `Ast*` node.

use crate::error::Position;

/// The whole of one parsed schema source file (or, after the CLI
/// concatenates multiple `--schema` files, the whole input stream).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AstFile {
    pub items: Vec<AstItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AstItem {
    pub comment: Option<String>,
    pub pos: Position,
    pub kind: AstItemKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AstItemKind {
    Model(AstModel),
    Struct(AstStruct),
    Interface(AstInterface),
    Enum(AstEnum),
    Option(AstOption),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AstModel {
    pub name: String,
    pub path: AstPathTemplate,
    pub implements: Vec<String>,
    pub elements: Vec<AstModelElement>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AstModelElement {
    Field(AstField),
    Option(AstOption),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AstStruct {
    pub name: String,
    pub implements: Vec<String>,
    pub fields: Vec<AstField>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AstInterface {
    pub name: String,
    pub fields: Vec<AstField>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AstEnum {
    pub name: String,
    pub values: Vec<AstEnumValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AstEnumValue {
    pub comment: Option<String>,
    pub name: String,
    pub associated_value: Option<AstTypeRef>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AstField {
    pub comment: Option<String>,
    pub type_ref: AstTypeRef,
    pub name: String,
    pub pos: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AstTypeRef {
    pub base: String,
    pub inner: Option<Box<AstTypeRef>>,
    pub pos: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AstOption {
    pub namespace: String,
    pub key: String,
    pub value: AstLiteral,
    pub pos: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AstLiteral {
    String(String),
    Int(i64),
    Bool(bool),
    Null,
}

/// One `{collection_name, document_placeholder}` pair within a path
/// template (spec.md §3 glossary: "Path template").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionPart {
    pub collection_name: String,
    pub document_placeholder: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AstPathTemplate {
    pub pattern: String,
    pub parts: Vec<CollectionPart>,
    pub pos: Position,
}
