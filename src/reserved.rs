//! Identifier reservation table (spec.md §4.C).

use once_cell::sync::Lazy;
use std::collections::HashSet;

const RESERVED_WORDS: &[&str] = &[
    "boolean",
    "integer",
    "double",
    "timestamp",
    "string",
    "bytes",
    "reference",
    "geopoint",
    "array",
    "map",
    "url",
    "file",
    "collection",
    "model",
    "option",
    "enum",
    "implements",
    "struct",
    "at",
];

static RESERVED: Lazy<HashSet<String>> = Lazy::new(|| {
    RESERVED_WORDS
        .iter()
        .map(|w| w.to_ascii_lowercase())
        .collect()
});

/// Case-insensitively checks whether `name` collides with a built-in
/// keyword or type name.
pub fn is_reserved(name: &str) -> bool {
    RESERVED.contains(&name.to_ascii_lowercase())
}
