//! Template helper functions (spec.md §4.H).
//!
//! Case conversion, pluralization, and filters exposed to `{{expr|filter}}`
//! interpolations. Grounded on the teacher's `rhai/registry.rs::register_common_helpers`,
//! minus the scripting-engine bridge: these are plain Rust functions called
//! either while building a [`super::template::Context`] or from
//! [`apply_filter`] during rendering.

use heck::{ToLowerCamelCase, ToShoutySnakeCase, ToSnakeCase, ToUpperCamelCase};
use inflector::Inflector;

use crate::error::CompileError;

use super::template::Value;

/// Applies a named filter to a template value. Unknown filter names are a
/// generator bug (spec.md §7, GeneratorError), not a user-facing error.
pub fn apply_filter(name: &str, value: &Value) -> Result<Value, CompileError> {
    let Value::Str(s) = value else {
        return Ok(value.clone());
    };
    let out = match name {
        "pascal_case" => pascal_case(s),
        "camel_case" => camel_case(s),
        "snake_case" => snake_case(s),
        "screaming_snake_case" => screaming_snake_case(s),
        "pluralize" => pluralize(s),
        other => {
            return Err(CompileError::Generator(format!(
                "unknown template filter '{other}'"
            )))
        }
    };
    Ok(Value::Str(out))
}

/// Generated type names are UpperCamel (spec.md §4.H item 6).
pub fn pascal_case(s: &str) -> String {
    s.to_upper_camel_case()
}

/// Generated field names for TypeScript and Swift (spec.md §4.H item 6).
pub fn camel_case(s: &str) -> String {
    s.to_lower_camel_case()
}

/// Generated field names for Go (spec.md §4.H item 6).
pub fn snake_case(s: &str) -> String {
    s.to_snake_case()
}

/// Enum-value names as stored on the wire (spec.md §4.H item 6, §9 open
/// question 2).
pub fn screaming_snake_case(s: &str) -> String {
    s.to_shouty_snake_case()
}

/// Collection accessor names on the client, pluralized using standard
/// English rules including irregulars (spec.md §9, "Plural-izer
/// dependency"). `inflector` supplies the table; the teacher itself has no
/// pluralization dependency, so this is adopted from the wider example pack
/// (see DESIGN.md).
pub fn pluralize(singular: &str) -> String {
    singular.to_plural()
}
