//! Load dumps, lint them, and render the result.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, info_span};
use tsl_rules::{FileDiagnostics, Linter};

use crate::args::{CliArgs, OutputFormat};
use crate::loader;
use crate::reporter::{self, Reporter};

/// Diagnostics for every file of every dump, in input order.
#[derive(Debug, Default)]
pub struct LintReport {
    pub files: Vec<FileDiagnostics>,
    /// `(file name, text)` for files whose dump carried source text.
    pub sources: Vec<(String, String)>,
}

impl LintReport {
    pub fn error_count(&self) -> usize {
        self.diagnostics().filter(|d| d.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics().filter(|d| !d.is_error()).count()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics().any(|d| d.is_error())
    }

    fn diagnostics(&self) -> impl Iterator<Item = &tsl_common::Diagnostic> {
        self.files.iter().flat_map(|file| &file.diagnostics)
    }
}

/// Lint each dump in turn. Files inside one dump run in parallel.
pub fn lint_dumps(linter: &Linter, paths: &[PathBuf]) -> Result<LintReport> {
    let mut report = LintReport::default();
    for path in paths {
        let dump = loader::load_dump(path)?;
        let _span = info_span!("lint_dump", dump = %path.display()).entered();
        let started = Instant::now();

        let results = linter.lint_program(&dump.files, &dump.types);
        info!(
            files = results.len(),
            diagnostics = results.iter().map(|r| r.diagnostics.len()).sum::<usize>(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "linted dump"
        );

        report.files.extend(results);
        report.sources.extend(
            dump.files
                .into_iter()
                .filter_map(|file| Some((file.file_name, file.text?))),
        );
    }
    Ok(report)
}

/// What the binary prints and whether error diagnostics were found.
#[derive(Debug)]
pub struct RunOutcome {
    pub output: String,
    pub has_errors: bool,
}

/// Run a whole `tsl` invocation. `color` only affects text output.
pub fn run(args: &CliArgs, color: bool) -> Result<RunOutcome> {
    let rules = loader::load_rule_set(args.config.as_deref())?;
    let paths = loader::collect_dump_paths(&args.inputs)?;
    let linter = Linter::new(rules);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(args.threads)
        .build()
        .context("failed to start the lint thread pool")?;
    let report = pool.install(|| lint_dumps(&linter, &paths))?;

    let output = match args.format {
        OutputFormat::Text => {
            let mut reporter = Reporter::new(color);
            for (file, text) in &report.sources {
                reporter.add_source(file.as_str(), text.as_str());
            }
            reporter.render(&report.files)
        }
        OutputFormat::Json => reporter::render_json(&report.files)?,
    };

    Ok(RunOutcome {
        output,
        has_errors: report.has_errors(),
    })
}

#[cfg(test)]
#[path = "../tests/driver_tests.rs"]
mod driver_tests;
