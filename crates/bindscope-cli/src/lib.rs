//! Library interface for the bindscope CLI

use anyhow::{Context, Result};
use bindscope_analysis::observer::Tee;
use bindscope_analysis::{
    AnalysisConfig, AnalysisTrace, Analyzer, RecordingObserver, SymbolTable, TracingObserver,
};
use bindscope_core::format::{self, Format};
use bindscope_core::{DocPackage, Package, SourceModule};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Inputs of `bindscope analyze`
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    pub module: PathBuf,
    pub docs: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub format: Format,
    pub trace: bool,
}

impl AnalyzeOptions {
    pub fn new(module: impl Into<PathBuf>) -> Self {
        Self {
            module: module.into(),
            docs: None,
            config: None,
            format: Format::Json,
            trace: false,
        }
    }
}

/// Package model, with the analysis trace when requested
#[derive(Debug, Serialize)]
struct Report<'a> {
    package: &'a Package,
    trace: &'a AnalysisTrace,
}

/// Analyze a module description and render the resulting model
pub fn run_analyze(opts: &AnalyzeOptions) -> Result<String> {
    let module = SourceModule::from_path(&opts.module)
        .with_context(|| format!("Failed to load module from {:?}", opts.module))?;
    info!("Analyzing module {}", module.name);

    let docs = match &opts.docs {
        Some(path) => format::load::<DocPackage>(path)
            .with_context(|| format!("Failed to load docs from {:?}", path))?,
        None => {
            debug!("no documentation given, using empty docs");
            DocPackage::new(module.name.clone())
        }
    };

    let config = match &opts.config {
        Some(path) => AnalysisConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {:?}", path))?,
        None => AnalysisConfig::default(),
    };

    let analyzer = Analyzer::new(config);
    let rendered = if opts.trace {
        let mut recorder = RecordingObserver::new();
        let mut logger = TracingObserver;
        let package = analyzer
            .analyze_with(&module, &docs, &mut Tee(&mut logger, &mut recorder))
            .with_context(|| format!("Failed to analyze module {}", module.name))?;
        opts.format.render(&Report {
            package: &package,
            trace: &recorder.trace,
        })?
    } else {
        let package = analyzer
            .analyze(&module, &docs)
            .with_context(|| format!("Failed to analyze module {}", module.name))?;
        info!(
            "Found {} structs and {} functions",
            package.structs().len(),
            package.funcs().len()
        );
        opts.format.render(&package)?
    };

    Ok(rendered)
}

/// One line per exported symbol: name, kind and type
pub fn run_symbols(module: &Path) -> Result<String> {
    let module = SourceModule::from_path(module)
        .with_context(|| format!("Failed to load module from {:?}", module))?;
    let table = SymbolTable::from_scope(&module);

    let mut out = String::new();
    for sym in table.iter() {
        match &sym.ty {
            Some(ty) => writeln!(out, "{}\t{}\t{}", sym.name, sym.kind, ty.display_in(&module.name))?,
            None => writeln!(out, "{}\t{}", sym.name, sym.kind)?,
        }
    }
    Ok(out)
}
