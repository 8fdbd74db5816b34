//! Minimal CLI: infer → (rust | xsd | all | inspect)
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use xml_osi::codegen::{Codegen, CodegenOptions};
use xml_osi::{InferOptions, Registry};

const DEFAULT_INPUT: &str = "input.xml";
const DEFAULT_RUST_OUT: &str = "output.rs";
const DEFAULT_XSD_OUT: &str = "output.xsd";

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// infer structure from one annotated sample XML document and output Rust
/// bindings and/or an XSD
#[derive(Parser, Debug)]
#[command(name = "xml-osi")]
pub struct CommandLineInterface {
    #[command(flatten)]
    settings: Settings,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// emit Rust data bindings: [INPUT OUTPUT]
    Rust(Paths),
    /// emit an XML Schema: [INPUT OUTPUT]
    Xsd(Paths),
    /// emit both artifacts: [INPUT RUST_OUT XSD_OUT]
    All(Paths),
    /// print the inferred registry as JSON: [INPUT]
    Inspect(Paths),
}

#[derive(Args, Debug, Clone)]
struct Settings {
    /// attribute carrying the multiplicity marker (excluded from the schema)
    #[arg(long, global = true, default_value = "nodeCount")]
    marker_attr: String,

    /// trailing character marking a sample value as optional
    #[arg(long, global = true, default_value_t = '0')]
    optional_marker: char,

    /// module path of the DOM runtime used by generated bindings
    #[arg(long, global = true, default_value = "::xml_osi::dom")]
    runtime_path: String,

    /// debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,
}

#[derive(clap::Args, Debug, Clone)]
struct Paths {
    /// either none (use defaults) or all of them
    paths: Vec<PathBuf>,
}

/// Wrong number of positional paths.
#[derive(Debug, thiserror::Error)]
#[error("Usage: {usage}\nUsing default values: {}", .defaults.join(" "))]
pub struct UsageError {
    usage: String,
    defaults: Vec<&'static str>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl Paths {
    /// Zero paths → defaults; exactly `defaults.len()` paths → those; else usage.
    fn resolve(&self, command: &str, defaults: &[&'static str]) -> Result<Vec<PathBuf>, UsageError> {
        if self.paths.is_empty() {
            return Ok(defaults.iter().map(PathBuf::from).collect());
        }
        if self.paths.len() == defaults.len() {
            return Ok(self.paths.clone());
        }
        let placeholders = defaults.iter().map(|d| d.to_string()).collect::<Vec<_>>().join(" ");
        Err(UsageError {
            usage: format!("xml-osi {command} [{placeholders}]"),
            defaults: defaults.to_vec(),
        })
    }
}

impl Settings {
    fn infer_options(&self) -> InferOptions {
        InferOptions {
            marker_attribute: self.marker_attr.clone(),
            optional_marker: self.optional_marker,
            ..InferOptions::default()
        }
    }

    fn codegen_options(&self) -> CodegenOptions {
        CodegenOptions {
            runtime_path: self.runtime_path.clone(),
            ..CodegenOptions::default()
        }
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    /// Logs go to stderr so `inspect` output stays clean.
    pub fn init_tracing(&self) {
        let fallback = if self.settings.verbose { "xml_osi=debug" } else { "xml_osi=info" };
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }

    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Rust(paths) => {
                let paths = paths.resolve("rust", &[DEFAULT_INPUT, DEFAULT_RUST_OUT])?;
                let registry = self.infer(&paths[0])?;
                let rust_src = self.emit_rust(&registry)?;
                write_output(&paths[1], &rust_src)
            }
            Command::Xsd(paths) => {
                let paths = paths.resolve("xsd", &[DEFAULT_INPUT, DEFAULT_XSD_OUT])?;
                let registry = self.infer(&paths[0])?;
                let xsd_src = xml_osi::xsd::emit_schema(&registry)?;
                write_output(&paths[1], &xsd_src)
            }
            Command::All(paths) => {
                let paths = paths.resolve("all", &[DEFAULT_INPUT, DEFAULT_RUST_OUT, DEFAULT_XSD_OUT])?;
                let registry = self.infer(&paths[0])?;
                // registry is read-only from here on; both emitters may share it
                let (rust_src, xsd_src) = rayon::join(
                    || self.emit_rust(&registry),
                    || xml_osi::xsd::emit_schema(&registry),
                );
                write_output(&paths[1], &rust_src?)?;
                write_output(&paths[2], &xsd_src?)
            }
            Command::Inspect(paths) => {
                let paths = paths.resolve("inspect", &[DEFAULT_INPUT])?;
                let registry = self.infer(&paths[0])?;
                let json = serde_json::to_string_pretty(&registry)?;
                println!("{json}");
                Ok(())
            }
        }
    }

    fn infer(&self, input: &Path) -> Result<Registry> {
        xml_osi::infer_file(input, &self.settings.infer_options())
            .with_context(|| format!("failed to infer schema from {}", input.display()))
    }

    fn emit_rust(&self, registry: &Registry) -> xml_osi::Result<String> {
        let mut cg = Codegen::with_options(self.settings.codegen_options());
        cg.emit(registry)?;
        Ok(cg.into_string())
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn write_output(out: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(out, contents).with_context(|| format!("failed to write {}", out.display()))?;
    eprintln!("{} {}", "✅ generated".green(), out.display());
    Ok(())
}
