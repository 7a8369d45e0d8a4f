//! Swift generator (spec.md §4.H) — object-oriented target with structured
//! concurrency; chosen to fill the spec's "object-oriented ... structured
//! concurrency" target slot (see DESIGN.md). Structured concurrency itself
//! is a property of the *generated* client code's callers, not of this
//! (synchronous) compiler.

use crate::error::CompileError;
use crate::semantic::{FieldType, Schema};
use crate::writer::Writer;

use super::context::{self, TargetIdioms};
use super::registry::Generator;
use super::template;

const MAIN_TEMPLATE: &str = include_str!("../../templates/swift/main.tmpl");

pub struct SwiftGenerator;

struct SwiftIdioms;

impl TargetIdioms for SwiftIdioms {
    fn type_expr(&self, ty: &FieldType, schema: &Schema) -> String {
        match ty {
            FieldType::Boolean => "Bool".to_string(),
            FieldType::Integer => "Int".to_string(),
            FieldType::Double => "Double".to_string(),
            FieldType::GeoPoint => "GeoPoint".to_string(),
            FieldType::Timestamp => "Date".to_string(),
            FieldType::String => "String".to_string(),
            FieldType::Bytes => "Data".to_string(),
            FieldType::Url => "URL".to_string(),
            FieldType::File => "FileRef".to_string(),
            FieldType::Reference(Some(id)) => format!("Reference<{}>", schema.model(*id).name),
            FieldType::Reference(None) => "UntypedReference".to_string(),
            FieldType::Array(Some(inner)) => format!("[{}]", self.type_expr(inner, schema)),
            FieldType::Array(None) => "[Any]".to_string(),
            FieldType::Map(Some(inner)) => format!("[String: {}]", self.type_expr(inner, schema)),
            FieldType::Map(None) => "[String: Any]".to_string(),
            FieldType::Struct(id) => schema.struct_(*id).name.clone(),
            FieldType::Enum(id) => schema.enum_(*id).name.clone(),
        }
    }

    fn field_name(&self, name: &str) -> String {
        super::helpers::camel_case(name)
    }
}

impl Generator for SwiftGenerator {
    fn name(&self) -> &'static str {
        "swift"
    }

    fn render(&self, schema: &Schema, writer: &mut Writer, version: &str) -> Result<(), CompileError> {
        let ctx = context::build(schema, &SwiftIdioms, version);
        let rendered = template::render(MAIN_TEMPLATE, &ctx)?;
        let mut handle = writer.new_file("Schema.swift")?;
        handle.write_str(&rendered)?;
        Ok(())
    }
}
