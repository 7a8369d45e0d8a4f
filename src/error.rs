//! Error taxonomy (spec.md §7).
//!
//! Library code always returns `Result<_, CompileError>`. `anyhow` is used
//! only at the CLI boundary in `main.rs` to add process-exit-code plumbing.

use thiserror::Error;

/// Position of a token or AST node in the original source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// The top-level error type returned by every stage of the pipeline.
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("syntax error at {pos}: expected {expected}, found {found}")]
    Syntax {
        pos: Position,
        expected: String,
        found: String,
    },

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("generator error: {0}")]
    Generator(String),
}

/// Subkinds of §3 invariant violation, per spec.md §7.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("'{name}' is a reserved identifier and cannot be used as a declaration name")]
    ReservedIdentifier { name: String },

    #[error("'{name}' is already defined")]
    NameCollision { name: String },

    #[error("invalid path template '{template}': {reason}")]
    InvalidPathTemplate { template: String, reason: String },

    #[error("unknown type '{name}' at {pos}")]
    UnknownType { name: String, pos: Position },

    #[error("invalid generic use of '{base}' at {pos}")]
    InvalidGenericUse { base: String, pos: Position },

    #[error("model '{name}' cannot be used as a field type; use reference<{name}> or a sub-collection")]
    ModelAsField { name: String, pos: Position },

    #[error("reference target '{name}' at {pos} is not a declared model")]
    ReferenceTargetNotAModel { name: String, pos: Position },

    #[error("enum payload '{name}' at {pos} is not a declared struct")]
    EnumPayloadNotAStruct { name: String, pos: Position },

    #[error("model '{model}' has no parent collection for path template '{template}'")]
    MissingParentCollection { model: String, template: String },

    #[error("reserved option key '{key}' on '{scope}'")]
    ReservedOptionKey { key: String, scope: String },

    #[error("interface '{name}' referenced in implements clause is not declared")]
    UnknownInterface { name: String, pos: Position },
}
