//! Go generator (spec.md §4.H) — strongly-typed compiled backend target.

use crate::error::CompileError;
use crate::semantic::{FieldType, Schema};
use crate::writer::Writer;

use super::context::{self, TargetIdioms};
use super::registry::Generator;
use super::template;

const MAIN_TEMPLATE: &str = include_str!("../../templates/go/main.tmpl");

pub struct GoGenerator;

struct GoIdioms;

impl TargetIdioms for GoIdioms {
    fn type_expr(&self, ty: &FieldType, schema: &Schema) -> String {
        match ty {
            FieldType::Boolean => "bool".to_string(),
            FieldType::Integer => "int64".to_string(),
            FieldType::Double => "float64".to_string(),
            FieldType::GeoPoint => "GeoPoint".to_string(),
            FieldType::Timestamp => "time.Time".to_string(),
            FieldType::String | FieldType::Url => "string".to_string(),
            FieldType::Bytes => "[]byte".to_string(),
            FieldType::File => "FileRef".to_string(),
            FieldType::Reference(Some(id)) => format!("Reference{}", schema.model(*id).name),
            FieldType::Reference(None) => "UntypedReference".to_string(),
            FieldType::Array(Some(inner)) => format!("[]{}", self.type_expr(inner, schema)),
            FieldType::Array(None) => "[]interface{}".to_string(),
            FieldType::Map(Some(inner)) => format!("map[string]{}", self.type_expr(inner, schema)),
            FieldType::Map(None) => "map[string]interface{}".to_string(),
            FieldType::Struct(id) => schema.struct_(*id).name.clone(),
            FieldType::Enum(id) => schema.enum_(*id).name.clone(),
        }
    }

    fn field_name(&self, name: &str) -> String {
        super::helpers::snake_case(name)
    }
}

impl Generator for GoGenerator {
    fn name(&self) -> &'static str {
        "go"
    }

    fn render(&self, schema: &Schema, writer: &mut Writer, version: &str) -> Result<(), CompileError> {
        let ctx = context::build(schema, &GoIdioms, version);
        let rendered = template::render(MAIN_TEMPLATE, &ctx)?;
        let mut handle = writer.new_file("schema.go")?;
        handle.write_str(&rendered)?;
        Ok(())
    }
}
