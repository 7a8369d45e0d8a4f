//! Path template literal parsing (spec.md §3 invariant 7, §8 Property 7).
//!
//! Split out from [`crate::parser`] so both the parser and the round-trip
//! test (S7) can call the same `parse`/`emit` pair without going through a
//! pest `Pair`.

use crate::ast::CollectionPart;
use crate::error::{Position, SchemaError};

/// Parses a path template pattern such as `"/operators/{operator_id}/machines/{machine_id}"`
/// into its alternating collection/placeholder parts.
pub fn parse(pattern: &str) -> Result<Vec<CollectionPart>, SchemaError> {
    if !pattern.starts_with('/') {
        return Err(invalid(pattern, "must begin with '/'"));
    }
    let segments: Vec<&str> = pattern[1..].split('/').collect();
    if segments.len() % 2 != 0 || segments.is_empty() {
        return Err(invalid(
            pattern,
            "must alternate collection and document-placeholder segments",
        ));
    }

    let mut parts = Vec::with_capacity(segments.len() / 2);
    for pair in segments.chunks_exact(2) {
        let collection = pair[0];
        let placeholder = pair[1];
        if collection.is_empty() || !collection.chars().all(is_segment_char) {
            return Err(invalid(
                pattern,
                &format!("invalid collection segment '{collection}'"),
            ));
        }
        if !is_placeholder(placeholder) {
            return Err(invalid(
                pattern,
                &format!("invalid document placeholder '{placeholder}'"),
            ));
        }
        let document_placeholder = placeholder[1..placeholder.len() - 1].to_string();
        parts.push(CollectionPart {
            collection_name: collection.to_string(),
            document_placeholder,
        });
    }
    Ok(parts)
}

/// Re-emits a pattern string from parts, the inverse of [`parse`]. Used by
/// the round-trip test and by generators that need to print a path back out.
pub fn emit(parts: &[CollectionPart]) -> String {
    let mut out = String::new();
    for part in parts {
        out.push('/');
        out.push_str(&part.collection_name);
        out.push_str("/{");
        out.push_str(&part.document_placeholder);
        out.push('}');
    }
    out
}

fn is_segment_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

fn is_placeholder(s: &str) -> bool {
    s.len() >= 3
        && s.starts_with('{')
        && s.ends_with('}')
        && s[1..s.len() - 1].chars().all(is_segment_char)
        && !s[1..s.len() - 1].is_empty()
}

fn invalid(template: &str, reason: &str) -> SchemaError {
    SchemaError::InvalidPathTemplate {
        template: template.to_string(),
        reason: reason.to_string(),
    }
}

/// Parses a path template together with a source position, for callers that
/// need to build an [`crate::ast::AstPathTemplate`].
pub fn parse_at(pattern: &str, pos: Position) -> Result<Vec<CollectionPart>, (SchemaError, Position)> {
    parse(pattern).map_err(|e| (e, pos))
}
