use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use joos_analyzer::{analyze, init_tracing, AnalysisError, AnalyzerConfig};
use joos_core::{Location, Phase, SemanticError};
use joos_hir::{CompilationUnit, Program};
use serde::{Deserialize, Serialize};

/// Exit status for a program that violates a semantic rule.
const EXIT_REJECTED: i32 = 42;
/// Exit status for unreadable input or configuration.
const EXIT_FAILURE: i32 = 1;

#[derive(Parser)]
#[command(
    name = "joosc",
    version,
    about = "Static semantic analysis of parsed Joos programs"
)]
struct Cli {
    /// JSON-encoded compilation units (or whole programs) to analyze together
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
    /// TOML analyzer configuration
    #[arg(long)]
    config: Option<PathBuf>,
    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,
    /// Do not add the built-in library declarations
    #[arg(long)]
    no_stdlib: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// One input file holds a single unit or a list of them.
#[derive(Deserialize)]
#[serde(untagged)]
enum InputFile {
    Program(Program),
    Unit(Box<CompilationUnit>),
}

#[derive(Serialize)]
struct Report {
    accepted: bool,
    errors: Vec<ErrorReport>,
}

#[derive(Serialize)]
struct ErrorReport {
    code: &'static str,
    phase: Phase,
    message: String,
    location: Location,
}

impl From<&SemanticError> for ErrorReport {
    fn from(err: &SemanticError) -> Self {
        Self {
            code: err.kind().code(),
            phase: err.phase(),
            message: err.to_string(),
            location: err.location().clone(),
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let exit_code = match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err:#}");
            EXIT_FAILURE
        }
    };

    std::process::exit(exit_code);
}

fn run(cli: Cli) -> Result<i32> {
    let mut config = match &cli.config {
        Some(path) => AnalyzerConfig::load_from_path(path)?,
        None => AnalyzerConfig::default(),
    };
    if cli.no_stdlib {
        config.include_stdlib = false;
    }
    init_tracing(&config.logging);

    let program = load_program(&cli.inputs)?;
    tracing::debug!(units = program.units.len(), "program loaded");

    let errors = match analyze(&program, &config) {
        Ok(_) => Vec::new(),
        Err(AnalysisError::Rejected { errors }) => errors,
        Err(err @ AnalysisError::MalformedUnit { .. }) => return Err(err.into()),
    };

    match cli.format {
        Format::Text => print_text(&errors),
        Format::Json => print_json(&errors)?,
    }
    Ok(if errors.is_empty() { 0 } else { EXIT_REJECTED })
}

fn load_program(paths: &[PathBuf]) -> Result<Program> {
    let mut program = Program::default();
    for path in paths {
        match load_file(path)? {
            InputFile::Program(mut loaded) => program.units.append(&mut loaded.units),
            InputFile::Unit(mut unit) => {
                if unit.file.is_none() {
                    unit.file = Some(path.display().to_string());
                }
                program.units.push(*unit);
            }
        }
    }
    Ok(program)
}

fn load_file(path: &Path) -> Result<InputFile> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("failed to decode {}", path.display()))
}

fn print_text(errors: &[SemanticError]) {
    if errors.is_empty() {
        println!("OK");
        return;
    }
    for err in errors {
        println!("{}: {err}", err.kind().code());
    }
}

fn print_json(errors: &[SemanticError]) -> Result<()> {
    let report = Report {
        accepted: errors.is_empty(),
        errors: errors.iter().map(ErrorReport::from).collect(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
