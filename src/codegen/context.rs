//! Schema → template [`Context`] translation shared by all three generators
//! (spec.md §9, "Text templates": "factor shared helpers ... into one
//! place").
//!
//! Each target supplies a [`TargetIdioms`] impl that renders a
//! [`FieldType`] and a field name the way that target's idioms require;
//! everything else (model/struct/enum enumeration, relationship-engine
//! lookups, do-not-edit header) is identical across targets.

use std::collections::BTreeMap;

use crate::relationships;
use crate::semantic::{FieldType, Model, ModelId, Schema};

use super::helpers;
use super::template::{Context, Value};

/// Per-target rendering rules a generator must supply.
pub trait TargetIdioms {
    /// Renders the textual type expression for `ty` (spec.md §4.H item 3).
    fn type_expr(&self, ty: &FieldType, schema: &Schema) -> String;

    /// Converts a semantic field name (already lower_snake) into this
    /// target's idiomatic field-name casing (spec.md §4.H item 6).
    fn field_name(&self, name: &str) -> String;
}

/// Builds the shared context every generator's top-level template renders
/// against. `version` is the do-not-edit header's version stamp (spec.md
/// §4.H item 1), supplied by the host.
pub fn build(schema: &Schema, idioms: &dyn TargetIdioms, version: &str) -> Context {
    let mut ctx = Context::new();
    ctx.set("version", Value::Str(version.to_string()));
    ctx.set(
        "models",
        Value::List(
            schema
                .models
                .iter()
                .enumerate()
                .map(|(i, m)| model_value(schema, ModelId(i), m, idioms))
                .collect(),
        ),
    );
    ctx.set(
        "structs",
        Value::List(schema.structs.iter().map(|s| fields_owner_value(&s.name, s.comment.as_deref(), &s.fields, schema, idioms)).collect()),
    );
    ctx.set(
        "interfaces",
        Value::List(
            schema
                .interfaces
                .iter()
                .map(|i| fields_owner_value(&i.name, i.comment.as_deref(), &i.fields, schema, idioms))
                .collect(),
        ),
    );
    ctx.set("enums", Value::List(schema.enums.iter().map(|e| enum_value(e, schema)).collect()));
    ctx
}

fn fields_owner_value(
    name: &str,
    comment: Option<&str>,
    fields: &[crate::semantic::Field],
    schema: &Schema,
    idioms: &dyn TargetIdioms,
) -> Value {
    let mut map = BTreeMap::new();
    map.insert("name".to_string(), Value::Str(name.to_string()));
    map.insert(
        "comment".to_string(),
        match comment {
            Some(c) => Value::Str(c.to_string()),
            None => Value::Null,
        },
    );
    map.insert(
        "fields".to_string(),
        Value::List(fields.iter().map(|f| field_value(f, schema, idioms)).collect()),
    );
    Value::Map(map)
}

fn field_value(field: &crate::semantic::Field, schema: &Schema, idioms: &dyn TargetIdioms) -> Value {
    let mut map = BTreeMap::new();
    map.insert("name".to_string(), Value::Str(idioms.field_name(&field.name)));
    map.insert(
        "comment".to_string(),
        match &field.comment {
            Some(c) => Value::Str(c.clone()),
            None => Value::Null,
        },
    );
    map.insert("type".to_string(), Value::Str(idioms.type_expr(&field.ty, schema)));
    map.insert("is_reference".to_string(), Value::Bool(matches!(field.ty, FieldType::Reference(_))));
    map.insert(
        "is_untyped_array".to_string(),
        Value::Bool(matches!(field.ty, FieldType::Array(None))),
    );
    map.insert(
        "is_untyped_map".to_string(),
        Value::Bool(matches!(field.ty, FieldType::Map(None))),
    );
    Value::Map(map)
}

fn model_value(schema: &Schema, id: ModelId, model: &Model, idioms: &dyn TargetIdioms) -> Value {
    let mut map = BTreeMap::new();
    map.insert("name".to_string(), Value::Str(model.name.clone()));
    map.insert("plural_name".to_string(), Value::Str(helpers::camel_case(&helpers::pluralize(&model.name))));
    map.insert(
        "comment".to_string(),
        match &model.comment {
            Some(c) => Value::Str(c.clone()),
            None => Value::Null,
        },
    );
    map.insert(
        "fields".to_string(),
        Value::List(model.fields.iter().map(|f| field_value(f, schema, idioms)).collect()),
    );
    map.insert("path_pattern".to_string(), Value::Str(model.path.pattern.clone()));
    let is_root = model.path.parts.len() == 1;
    map.insert("is_root".to_string(), Value::Bool(is_root));
    map.insert(
        "root_collection_name".to_string(),
        Value::Str(model.path.parts[0].collection_name.clone()),
    );

    let parent_name = relationships::parent_model(schema, id)
        .ok()
        .flatten()
        .map(|pid| relationships::model_by_id(schema, pid).name.clone());
    map.insert(
        "parent_name".to_string(),
        match parent_name {
            Some(n) => Value::Str(n),
            None => Value::Null,
        },
    );

    let children = relationships::direct_subcollections_of_model(schema, id)
        .into_iter()
        .map(|cid| {
            let child_name = relationships::model_by_id(schema, cid).name.clone();
            let mut cmap = BTreeMap::new();
            cmap.insert("name".to_string(), Value::Str(child_name.clone()));
            cmap.insert(
                "accessor_name".to_string(),
                Value::Str(helpers::camel_case(&helpers::pluralize(&child_name))),
            );
            Value::Map(cmap)
        })
        .collect();
    map.insert("child_collections".to_string(), Value::List(children));

    Value::Map(map)
}

fn enum_value(e: &crate::semantic::Enum, schema: &Schema) -> Value {
    let mut map = BTreeMap::new();
    map.insert("name".to_string(), Value::Str(e.name.clone()));
    map.insert(
        "comment".to_string(),
        match &e.comment {
            Some(c) => Value::Str(c.clone()),
            None => Value::Null,
        },
    );
    map.insert(
        "values".to_string(),
        Value::List(
            e.values
                .iter()
                .map(|v| {
                    let mut vmap = BTreeMap::new();
                    vmap.insert("name".to_string(), Value::Str(v.name.clone()));
                    vmap.insert("wire_name".to_string(), Value::Str(helpers::screaming_snake_case(&v.name)));
                    vmap.insert(
                        "payload_type".to_string(),
                        match v.associated_value {
                            Some(sid) => Value::Str(schema.struct_(sid).name.clone()),
                            None => Value::Null,
                        },
                    );
                    Value::Map(vmap)
                })
                .collect(),
        ),
    );
    Value::Map(map)
}
