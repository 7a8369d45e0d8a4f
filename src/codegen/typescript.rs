//! TypeScript generator (spec.md §4.H) — dynamically-loaded,
//! structurally-typed web front-end target.

use crate::error::CompileError;
use crate::semantic::{FieldType, Schema};
use crate::writer::Writer;

use super::context::{self, TargetIdioms};
use super::registry::Generator;
use super::template;

const MAIN_TEMPLATE: &str = include_str!("../../templates/typescript/main.tmpl");

pub struct TypeScriptGenerator;

struct TypeScriptIdioms;

impl TargetIdioms for TypeScriptIdioms {
    fn type_expr(&self, ty: &FieldType, schema: &Schema) -> String {
        match ty {
            FieldType::Boolean => "boolean".to_string(),
            FieldType::Integer | FieldType::Double => "number".to_string(),
            FieldType::GeoPoint => "GeoPoint".to_string(),
            FieldType::Timestamp => "Date".to_string(),
            FieldType::String | FieldType::Url => "string".to_string(),
            FieldType::Bytes => "Uint8Array".to_string(),
            FieldType::File => "FileRef".to_string(),
            FieldType::Reference(Some(id)) => format!("Reference<{}>", schema.model(*id).name),
            FieldType::Reference(None) => "UntypedReference".to_string(),
            FieldType::Array(Some(inner)) => format!("{}[]", self.type_expr(inner, schema)),
            FieldType::Array(None) => "unknown[]".to_string(),
            FieldType::Map(Some(inner)) => format!("Record<string, {}>", self.type_expr(inner, schema)),
            FieldType::Map(None) => "Record<string, unknown>".to_string(),
            FieldType::Struct(id) => schema.struct_(*id).name.clone(),
            FieldType::Enum(id) => schema.enum_(*id).name.clone(),
        }
    }

    fn field_name(&self, name: &str) -> String {
        super::helpers::camel_case(name)
    }
}

impl Generator for TypeScriptGenerator {
    fn name(&self) -> &'static str {
        "typescript"
    }

    fn render(&self, schema: &Schema, writer: &mut Writer, version: &str) -> Result<(), CompileError> {
        let ctx = context::build(schema, &TypeScriptIdioms, version);
        let rendered = template::render(MAIN_TEMPLATE, &ctx)?;
        let mut handle = writer.new_file("schema.ts")?;
        handle.write_str(&rendered)?;
        Ok(())
    }
}
