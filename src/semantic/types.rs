//! Pass 2 — body compilation (spec.md §4.D).
//!
//! Fills in the skeleton [`super::schema::Schema`] the symbol table
//! describes: normalizes field names, compiles every [`AstTypeRef`] via the
//! nine-step procedure spec.md lays out, folds model options, and resolves
//! `implements` clauses. Runs after [`super::symbols::build_symbol_table`]
//! so every forward reference is already in scope.

use heck::ToSnakeCase;

use crate::ast::{
    AstEnum, AstField, AstFile, AstInterface, AstItemKind, AstLiteral, AstModel, AstModelElement,
    AstOption, AstStruct, AstTypeRef,
};
use crate::error::{CompileError, SchemaError};
use crate::reserved;

use super::schema::{
    Enum, EnumValue, Field, FieldType, Interface, Model, OptionMap, OptionValue, PathTemplate,
    Schema, Struct,
};
use super::symbols::{normalize_type_name, Symbol, SymbolTable};

pub fn compile(file: &AstFile, table: &SymbolTable) -> Result<Schema, CompileError> {
    let mut schema = Schema::default();

    for item in &file.items {
        match &item.kind {
            AstItemKind::Model(m) => {
                let model = compile_model(m, item.comment.clone(), table)?;
                schema.models.push(model);
            }
            AstItemKind::Struct(s) => {
                let st = compile_struct(s, item.comment.clone(), table)?;
                schema.structs.push(st);
            }
            AstItemKind::Enum(e) => {
                let en = compile_enum(e, item.comment.clone(), table)?;
                schema.enums.push(en);
            }
            AstItemKind::Interface(i) => {
                let iface = compile_interface(i, item.comment.clone(), table)?;
                schema.interfaces.push(iface);
            }
            AstItemKind::Option(_) => {}
        }
    }

    Ok(schema)
}

fn compile_model(m: &AstModel, comment: Option<String>, table: &SymbolTable) -> Result<Model, CompileError> {
    let mut fields = Vec::new();
    let mut options = OptionMap::default();

    for element in &m.elements {
        match element {
            AstModelElement::Field(f) => fields.push(compile_field(f, table)?),
            AstModelElement::Option(o) => insert_option(&mut options, o, &m.name)?,
        }
    }

    Ok(Model {
        name: normalize_type_name(&m.name),
        comment,
        fields,
        implements: resolve_implements(&m.implements, table)?,
        path: PathTemplate {
            pattern: m.path.pattern.clone(),
            parts: m.path.parts.clone(),
        },
        options,
    })
}

fn compile_struct(s: &AstStruct, comment: Option<String>, table: &SymbolTable) -> Result<Struct, CompileError> {
    let fields = s
        .fields
        .iter()
        .map(|f| compile_field(f, table))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Struct {
        name: normalize_type_name(&s.name),
        comment,
        fields,
        implements: resolve_implements(&s.implements, table)?,
    })
}

fn compile_interface(i: &AstInterface, comment: Option<String>, table: &SymbolTable) -> Result<Interface, CompileError> {
    let fields = i
        .fields
        .iter()
        .map(|f| compile_field(f, table))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Interface {
        name: normalize_type_name(&i.name),
        comment,
        fields,
    })
}

fn compile_enum(e: &AstEnum, comment: Option<String>, table: &SymbolTable) -> Result<Enum, CompileError> {
    let mut values = Vec::with_capacity(e.values.len());
    for v in &e.values {
        let normalized = v.name.to_snake_case();
        if reserved::is_reserved(&normalized) {
            return Err(SchemaError::ReservedIdentifier { name: v.name.clone() }.into());
        }
        let associated_value = match &v.associated_value {
            Some(type_ref) => match table.resolve(&type_ref.base) {
                Some(Symbol::Struct(id)) => Some(id),
                _ => {
                    return Err(SchemaError::EnumPayloadNotAStruct {
                        name: type_ref.base.clone(),
                        pos: type_ref.pos,
                    }
                    .into())
                }
            },
            None => None,
        };
        values.push(EnumValue {
            name: normalized,
            comment: v.comment.clone(),
            associated_value,
        });
    }
    Ok(Enum {
        name: normalize_type_name(&e.name),
        comment,
        values,
    })
}

fn compile_field(f: &AstField, table: &SymbolTable) -> Result<Field, CompileError> {
    let normalized = f.name.to_snake_case();
    if reserved::is_reserved(&normalized) {
        return Err(SchemaError::ReservedIdentifier { name: f.name.clone() }.into());
    }
    let ty = compile_type_ref(&f.type_ref, table)?;
    Ok(Field {
        name: normalized,
        comment: f.comment.clone(),
        ty,
    })
}

/// The nine-step type-reference compilation procedure (spec.md §4.D).
fn compile_type_ref(type_ref: &AstTypeRef, table: &SymbolTable) -> Result<FieldType, CompileError> {
    let base_lower = type_ref.base.to_ascii_lowercase();

    // Steps 1-2: a name that resolves to a previously-registered enum or
    // struct wins over any built-in keyword of the same spelling, since
    // user declarations and built-ins never share a name (reserved-word
    // rejection in pass 1 guarantees that).
    match table.resolve(&type_ref.base) {
        Some(Symbol::Enum(id)) => {
            if type_ref.inner.is_some() {
                return Err(SchemaError::InvalidGenericUse {
                    base: type_ref.base.clone(),
                    pos: type_ref.pos,
                }
                .into());
            }
            return Ok(FieldType::Enum(id));
        }
        Some(Symbol::Struct(id)) => {
            if type_ref.inner.is_some() {
                return Err(SchemaError::InvalidGenericUse {
                    base: type_ref.base.clone(),
                    pos: type_ref.pos,
                }
                .into());
            }
            return Ok(FieldType::Struct(id));
        }
        // Step 3: models can never be field types.
        Some(Symbol::Model(_)) => {
            return Err(SchemaError::ModelAsField {
                name: type_ref.base.clone(),
                pos: type_ref.pos,
            }
            .into())
        }
        Some(Symbol::Interface(_)) | None => {}
    }

    match base_lower.as_str() {
        // Step 4: built-in primitives, no generic parameter.
        "boolean" | "integer" | "double" | "timestamp" | "string" | "bytes" | "geopoint"
        | "file" | "url" => {
            if type_ref.inner.is_some() {
                return Err(SchemaError::InvalidGenericUse {
                    base: type_ref.base.clone(),
                    pos: type_ref.pos,
                }
                .into());
            }
            Ok(primitive_variant(&base_lower))
        }
        // Step 5.
        "array" => {
            let inner = match &type_ref.inner {
                Some(inner) => Some(Box::new(compile_type_ref(inner, table)?)),
                None => None,
            };
            Ok(FieldType::Array(inner))
        }
        // Step 6.
        "map" => {
            let inner = match &type_ref.inner {
                Some(inner) => Some(Box::new(compile_type_ref(inner, table)?)),
                None => None,
            };
            Ok(FieldType::Map(inner))
        }
        // Step 7.
        "reference" => match &type_ref.inner {
            None => Ok(FieldType::Reference(None)),
            Some(inner) => match table.resolve(&inner.base) {
                Some(Symbol::Model(id)) if inner.inner.is_none() => Ok(FieldType::Reference(Some(id))),
                _ => Err(SchemaError::ReferenceTargetNotAModel {
                    name: inner.base.clone(),
                    pos: inner.pos,
                }
                .into()),
            },
        },
        // Step 8: `collection` never appears at field level.
        "collection" => Err(SchemaError::InvalidGenericUse {
            base: type_ref.base.clone(),
            pos: type_ref.pos,
        }
        .into()),
        // Step 9.
        _ => Err(SchemaError::UnknownType {
            name: type_ref.base.clone(),
            pos: type_ref.pos,
        }
        .into()),
    }
}

fn primitive_variant(base_lower: &str) -> FieldType {
    match base_lower {
        "boolean" => FieldType::Boolean,
        "integer" => FieldType::Integer,
        "double" => FieldType::Double,
        "timestamp" => FieldType::Timestamp,
        "string" => FieldType::String,
        "bytes" => FieldType::Bytes,
        "geopoint" => FieldType::GeoPoint,
        "file" => FieldType::File,
        "url" => FieldType::Url,
        other => unreachable!("primitive_variant called with non-primitive base '{other}'"),
    }
}

fn resolve_implements(
    names: &[String],
    table: &SymbolTable,
) -> Result<Vec<super::schema::InterfaceId>, CompileError> {
    names
        .iter()
        .map(|name| match table.resolve(name) {
            Some(Symbol::Interface(id)) => Ok(id),
            _ => Err(SchemaError::UnknownInterface {
                name: name.clone(),
                pos: crate::error::Position::default(),
            }
            .into()),
        })
        .collect()
}

fn insert_option(options: &mut OptionMap, option: &AstOption, scope: &str) -> Result<(), CompileError> {
    let key_normalized = option.key.to_snake_case();
    if reserved::is_reserved(&key_normalized) {
        return Err(SchemaError::ReservedOptionKey {
            key: option.key.clone(),
            scope: scope.to_string(),
        }
        .into());
    }
    let value = match &option.value {
        AstLiteral::String(s) => OptionValue::String(s.clone()),
        AstLiteral::Int(i) => OptionValue::Int(*i),
        AstLiteral::Bool(b) => OptionValue::Bool(*b),
        AstLiteral::Null => OptionValue::Null,
    };
    options.insert(option.namespace.clone(), key_normalized, value);
    Ok(())
}
