//! CLI shell (spec.md §6, "CLI surface").
//!
//! This is the one external-collaborator surface the spec names but does
//! not fully specify; it is a thin shell over the core pipeline, grounded
//! on the teacher's `clap`-derived `Cli` struct + `run(cli: Cli)` split in
//! `lib.rs`. `anyhow` is used only here, at the process boundary — every
//! library module returns [`crate::error::CompileError`].

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context as _};
use clap::{Parser, Subcommand};

use crate::codegen::default_registry;
use crate::orchestrator::{self, Target};
use crate::{parser, semantic};

#[derive(Parser, Debug)]
#[command(
    name = "schemac",
    version,
    about = "Schema compiler for a hierarchical document-store schema language"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Schema source file path or glob pattern. Repeatable; matched files
    /// are concatenated in argument order before parsing.
    #[arg(long = "schema", value_name = "PATH")]
    pub schema: Vec<String>,

    /// Emit Swift bindings into DIR.
    #[arg(long = "swift_out", value_name = "DIR")]
    pub swift_out: Option<PathBuf>,

    /// Emit TypeScript bindings into DIR.
    #[arg(long = "typescript_out", value_name = "DIR")]
    pub typescript_out: Option<PathBuf>,

    /// Emit Go bindings into DIR.
    #[arg(long = "go_out", value_name = "DIR")]
    pub go_out: Option<PathBuf>,

    /// Remove existing output directories before committing new output.
    #[arg(long = "force")]
    pub force: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List every registered target name, one per line.
    ShowLanguages,
}

/// Drives the whole pipeline for one CLI invocation.
pub fn run(cli: Cli) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let registry = default_registry();

    if let Some(Command::ShowLanguages) = cli.command {
        for name in registry.target_names() {
            println!("{name}");
        }
        return Ok(());
    }

    let targets = collect_targets(&cli);
    if targets.is_empty() {
        bail!("no targets requested: pass at least one of --swift_out, --typescript_out, --go_out");
    }
    if cli.schema.is_empty() {
        bail!("no schema input: pass at least one --schema path or glob pattern");
    }

    let source = read_and_concatenate(&cli.schema)?;
    tracing::info!(files = cli.schema.len(), "parsing schema input");

    let ast = parser::parse(&source).context("parsing schema")?;
    let schema = semantic::analyze(&ast).context("analyzing schema")?;

    tracing::info!(
        models = schema.models.len(),
        structs = schema.structs.len(),
        enums = schema.enums.len(),
        "schema analysis complete"
    );

    orchestrator::run(
        &schema,
        &registry,
        &targets,
        env!("CARGO_PKG_VERSION"),
        cli.force,
    )
    .context("generating output")?;

    tracing::info!(targets = targets.len(), "generation complete");
    Ok(())
}

fn collect_targets(cli: &Cli) -> Vec<Target> {
    let mut targets = Vec::new();
    if let Some(dir) = &cli.swift_out {
        targets.push(Target { name: "swift".to_string(), output_prefix: dir.clone() });
    }
    if let Some(dir) = &cli.typescript_out {
        targets.push(Target { name: "typescript".to_string(), output_prefix: dir.clone() });
    }
    if let Some(dir) = &cli.go_out {
        targets.push(Target { name: "go".to_string(), output_prefix: dir.clone() });
    }
    targets
}

/// Expands each `--schema` argument as a glob pattern and concatenates
/// every matched regular file's contents in argument order (spec.md §6).
fn read_and_concatenate(patterns: &[String]) -> anyhow::Result<String> {
    let mut combined = String::new();
    for pattern in patterns {
        let mut matched_any = false;
        for entry in glob::glob(pattern).with_context(|| format!("invalid glob pattern '{pattern}'"))? {
            let path = entry.with_context(|| format!("reading glob match for '{pattern}'"))?;
            if !path.is_file() {
                continue;
            }
            matched_any = true;
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("reading schema file '{}'", path.display()))?;
            combined.push_str(&contents);
            combined.push('\n');
        }
        if !matched_any {
            bail!("no files matched '{pattern}'");
        }
    }
    Ok(combined)
}
