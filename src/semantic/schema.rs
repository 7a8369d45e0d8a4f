//! Semantic schema types (spec.md §3, "Semantic schema").
//!
//! Arena-plus-index design: models/structs/enums/interfaces live in flat
//! `Vec`s inside [`Schema`], and cross-references (`Reference`, `Struct`,
//! `Enum`, `AssociatedValue`) hold stable newtype indices rather than owning
//! pointers, so a model referencing itself (or two models referencing each
//! other) never needs a cycle-breaking `Rc`/`Weak` pair. Grounded on the
//! teacher's `type_registry.rs` `TypeInfo`/FQN-handle pattern, generalized
//! from namespace-qualified names to plain arena indices.

use crate::ast::CollectionPart;

macro_rules! arena_id {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub usize);
    };
}

arena_id!(ModelId);
arena_id!(StructId);
arena_id!(EnumId);
arena_id!(InterfaceId);

#[derive(Debug, Clone, Default)]
pub struct Schema {
    pub models: Vec<Model>,
    pub structs: Vec<Struct>,
    pub enums: Vec<Enum>,
    pub interfaces: Vec<Interface>,
}

impl Schema {
    pub fn model(&self, id: ModelId) -> &Model {
        &self.models[id.0]
    }

    pub fn struct_(&self, id: StructId) -> &Struct {
        &self.structs[id.0]
    }

    pub fn enum_(&self, id: EnumId) -> &Enum {
        &self.enums[id.0]
    }

    pub fn interface(&self, id: InterfaceId) -> &Interface {
        &self.interfaces[id.0]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub name: String,
    pub comment: Option<String>,
    pub fields: Vec<Field>,
    pub implements: Vec<InterfaceId>,
    pub path: PathTemplate,
    pub options: OptionMap,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Struct {
    pub name: String,
    pub comment: Option<String>,
    pub fields: Vec<Field>,
    pub implements: Vec<InterfaceId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Interface {
    pub name: String,
    pub comment: Option<String>,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Enum {
    pub name: String,
    pub comment: Option<String>,
    pub values: Vec<EnumValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumValue {
    pub name: String,
    pub comment: Option<String>,
    pub associated_value: Option<StructId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub comment: Option<String>,
    pub ty: FieldType,
}

/// Structural equality is required by spec.md §8 Property 3 (two runs over
/// the same source must produce identical schemas) and is used directly by
/// the golden fixture tests — it falls out of `#[derive(PartialEq)]` since
/// every variant's payload is itself `PartialEq` (arena ids are plain
/// newtype wrappers around `usize`).
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    Boolean,
    Integer,
    Double,
    GeoPoint,
    Timestamp,
    String,
    Bytes,
    Url,
    File,
    Reference(Option<ModelId>),
    Array(Option<Box<FieldType>>),
    Map(Option<Box<FieldType>>),
    Struct(StructId),
    Enum(EnumId),
}

/// Semantic copy of an [`crate::ast::AstPathTemplate`] (spec.md §3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    pub pattern: String,
    pub parts: Vec<CollectionPart>,
}

/// Folded `namespace -> key -> value` option map (spec.md §4.D, "Model
/// options").
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionMap {
    entries: std::collections::BTreeMap<(String, String), OptionValue>,
}

impl OptionMap {
    pub fn insert(&mut self, namespace: String, key: String, value: OptionValue) {
        self.entries.insert((namespace, key), value);
    }

    pub fn get(&self, namespace: &str, key: &str) -> Option<&OptionValue> {
        self.entries.get(&(namespace.to_string(), key.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &OptionValue)> {
        self.entries
            .iter()
            .map(|((ns, k), v)| (ns.as_str(), k.as_str(), v))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    String(String),
    Int(i64),
    Bool(bool),
    Null,
}
