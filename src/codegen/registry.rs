//! Generator registry (spec.md §4.G).
//!
//! Process-wide map from target name to generator, grounded on the
//! teacher's `codegen::discover_languages` + static-dispatch pattern,
//! simplified to a plain `HashMap` built once by [`default_registry`]
//! rather than a lazily-discovered directory scan, since this dialect's
//! three targets are compiled in rather than template-directory-discovered.

use std::collections::HashMap;

use crate::error::CompileError;
use crate::semantic::Schema;
use crate::writer::Writer;

/// One per-target code generator (spec.md §4.H).
pub trait Generator {
    /// Short target name as it appears on the CLI (`swift`, `typescript`, `go`).
    fn name(&self) -> &'static str;

    /// Renders every file this target produces for `schema` through `writer`.
    /// Does not flush; the orchestrator owns that.
    fn render(&self, schema: &Schema, writer: &mut Writer, version: &str) -> Result<(), CompileError>;
}

#[derive(Default)]
pub struct GeneratorRegistry {
    generators: HashMap<&'static str, Box<dyn Generator>>,
}

impl GeneratorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `generator`. Panics on a duplicate target name — two
    /// generators claiming the same target is a compiler bug, not a
    /// user-facing condition (spec.md §9, "Global registry").
    pub fn register(&mut self, generator: Box<dyn Generator>) {
        let name = generator.name();
        if self.generators.insert(name, generator).is_some() {
            panic!("generator target '{name}' registered twice");
        }
    }

    pub fn get(&self, target: &str) -> Option<&dyn Generator> {
        self.generators.get(target).map(|g| g.as_ref())
    }

    pub fn target_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.generators.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

/// Builds the registry with all three shipped generators (spec.md §4.H).
pub fn default_registry() -> GeneratorRegistry {
    let mut registry = GeneratorRegistry::new();
    registry.register(Box::new(super::swift::SwiftGenerator));
    registry.register(Box::new(super::typescript::TypeScriptGenerator));
    registry.register(Box::new(super::go::GoGenerator));
    registry
}
