//! Orchestrator (spec.md §4.I).
//!
//! Invokes one generator per requested (target, output-prefix) pair, in
//! submission order, halting on the first error (spec.md §5: "at-most-one
//! full render per target ... re-entrancy is not supported").

use crate::codegen::GeneratorRegistry;
use crate::error::CompileError;
use crate::semantic::Schema;
use crate::writer::Writer;

/// One requested generation target: a registered generator name and the
/// directory its files should land in.
pub struct Target {
    pub name: String,
    pub output_prefix: std::path::PathBuf,
}

/// Runs every entry in `targets` against `schema`, in order. `version` is
/// stamped into each generator's do-not-edit header. `wipe_before_commit`
/// is threaded straight from the CLI's force flag into each [`Writer`].
pub fn run(
    schema: &Schema,
    registry: &GeneratorRegistry,
    targets: &[Target],
    version: &str,
    wipe_before_commit: bool,
) -> Result<(), CompileError> {
    if targets.is_empty() {
        return Err(CompileError::Config("no targets requested".to_string()));
    }
    for target in targets {
        let generator = registry.get(&target.name).ok_or_else(|| {
            CompileError::Config(format!("unregistered target '{}'", target.name))
        })?;
        let mut writer = Writer::new(&target.output_prefix, wipe_before_commit)?;
        generator.render(schema, &mut writer, version)?;
        writer.flush()?;
    }
    Ok(())
}
