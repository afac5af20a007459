//! The analysis pipeline.
//!
//! [`analyze`] runs the stages in order (symbol table, linking, hierarchy,
//! type checking, reachability) and stops at the first stage that reports an
//! error. Library declarations from `joos-jdk` are added unless disabled in
//! [`AnalyzerConfig`].

mod config;

pub use crate::config::{init_tracing, AnalyzerConfig, ConfigError, LoggingConfig, LOG_ENV_VAR};

use joos_core::{QualifiedName, SemanticError};
use joos_flow::{check_flow, FlowOptions};
use joos_hierarchy::{check_hierarchy, Hierarchy};
use joos_hir::{CompilationUnit, Program};
use joos_resolve::{link, DefMap, LinkedProgram};
use joos_typeck::{check_program, TypeckOptions, TypeckResults};
use joos_types::{ClassId, TypeEnv, TypeStore};
use thiserror::Error;

/// Everything computed for an accepted program.
#[derive(Debug)]
pub struct AnalyzedProgram {
    store: TypeStore,
    hierarchy: Hierarchy,
    typeck: TypeckResults,
    program_types: Vec<ClassId>,
}

impl AnalyzedProgram {
    #[must_use]
    pub fn store(&self) -> &TypeStore {
        &self.store
    }

    #[must_use]
    pub fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    #[must_use]
    pub fn typeck(&self) -> &TypeckResults {
        &self.typeck
    }

    /// Types declared by the program, in input order.
    #[must_use]
    pub fn program_types(&self) -> &[ClassId] {
        &self.program_types
    }

    #[must_use]
    pub fn lookup(&self, dotted: &str) -> Option<ClassId> {
        self.store.lookup_class(&QualifiedName::from_dotted(dotted))
    }
}

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A unit's declarations refer to statements or expressions its body
    /// arena does not contain.
    #[error("malformed compilation unit for `{ty}`")]
    MalformedUnit { ty: String },
    #[error("{}", rejected_summary(.errors))]
    Rejected { errors: Vec<SemanticError> },
}

fn rejected_summary(errors: &[SemanticError]) -> String {
    match errors {
        [single] => single.to_string(),
        _ => format!("program rejected with {} errors", errors.len()),
    }
}

impl AnalysisError {
    /// The semantic errors of a rejected program; empty for malformed input.
    #[must_use]
    pub fn errors(&self) -> &[SemanticError] {
        match self {
            AnalysisError::MalformedUnit { .. } => &[],
            AnalysisError::Rejected { errors } => errors,
        }
    }
}

impl From<SemanticError> for AnalysisError {
    fn from(err: SemanticError) -> Self {
        AnalysisError::Rejected { errors: vec![err] }
    }
}

impl From<Vec<SemanticError>> for AnalysisError {
    fn from(errors: Vec<SemanticError>) -> Self {
        AnalysisError::Rejected { errors }
    }
}

/// Analyze `program` as a whole.
pub fn analyze(program: &Program, config: &AnalyzerConfig) -> Result<AnalyzedProgram, AnalysisError> {
    let _span = tracing::info_span!("analyze", units = program.units.len()).entered();

    if let Some(unit) = program.units.iter().find(|unit| !unit.decl.is_well_formed()) {
        return Err(AnalysisError::MalformedUnit {
            ty: unit.type_name().to_dotted(),
        });
    }

    let library: Vec<CompilationUnit> = if config.include_stdlib {
        joos_jdk::library_units()
    } else {
        Vec::new()
    };

    let result = run(&program.units, &library, config);
    match &result {
        Ok(analyzed) => tracing::info!(types = analyzed.program_types.len(), "program accepted"),
        Err(err) => tracing::info!(errors = err.errors().len(), "program rejected"),
    }
    result
}

fn run(
    program: &[CompilationUnit],
    library: &[CompilationUnit],
    config: &AnalyzerConfig,
) -> Result<AnalyzedProgram, AnalysisError> {
    let defs = {
        let _span = tracing::debug_span!("environment").entered();
        DefMap::new(program, library).map_err(report)?
    };
    let program_types: Vec<ClassId> = defs.program_ids().collect();

    let linked = {
        let _span = tracing::debug_span!("link").entered();
        link(defs).map_err(report)?
    };

    let hierarchy = check_hierarchy(&linked.store)?;

    let typeck = check_program(
        &linked,
        &hierarchy,
        &TypeckOptions {
            collect_all: config.collect_all,
        },
    )?;

    check_flow(
        &linked,
        &typeck,
        &FlowOptions {
            collect_all: config.collect_all,
        },
    )?;

    let LinkedProgram { store, .. } = linked;
    Ok(AnalyzedProgram {
        store,
        hierarchy,
        typeck,
        program_types,
    })
}

fn report(err: SemanticError) -> SemanticError {
    tracing::debug!(code = err.kind().code(), %err, "rejected");
    err
}
