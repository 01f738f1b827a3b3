use anyhow::{Context, Result};
use colored::Colorize;
use rustc_hash::FxHashMap;
use serde::Serialize;
use tsl_common::{Diagnostic, DiagnosticCategory, LineMap};
use tsl_rules::FileDiagnostics;

/// Renders diagnostics as text.
///
/// Plain mode prints one `file(line,col): error rule-id: message` line per
/// diagnostic. Pretty mode uses `file:line:col - ...`, colors, and a source
/// snippet underlining the range. Files without source text fall back to
/// byte ranges.
pub struct Reporter {
    color: bool,
    sources: FxHashMap<String, String>,
    line_maps: FxHashMap<String, LineMap>,
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Reporter {
            color,
            sources: FxHashMap::default(),
            line_maps: FxHashMap::default(),
        }
    }

    pub fn add_source(&mut self, file: impl Into<String>, text: impl Into<String>) {
        let file = file.into();
        let text = text.into();
        self.line_maps.insert(file.clone(), LineMap::build(&text));
        self.sources.insert(file, text);
    }

    pub fn render(&self, results: &[FileDiagnostics]) -> String {
        let mut out = String::new();
        let mut errors = 0;
        let mut warnings = 0;
        for diagnostic in results.iter().flat_map(|file| &file.diagnostics) {
            if diagnostic.is_error() {
                errors += 1;
            } else {
                warnings += 1;
            }
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&self.format_diagnostic(diagnostic));
        }
        if let Some(summary) = format_summary(errors, warnings) {
            out.push_str("\n\n");
            out.push_str(&summary);
        }
        out
    }

    pub fn format_diagnostic(&self, diagnostic: &Diagnostic) -> String {
        let location = self.format_location(diagnostic);
        let category = self.format_category(diagnostic.category);
        let rule = if self.color {
            diagnostic.rule_id.as_str().bright_blue().to_string()
        } else {
            diagnostic.rule_id.as_str().to_string()
        };

        let mut output = if self.color {
            format!(
                "{} - {} {}: {}",
                location, category, rule, diagnostic.message_text
            )
        } else {
            format!(
                "{}: {} {}: {}",
                location, category, rule, diagnostic.message_text
            )
        };
        if self.color {
            if let Some(snippet) = self.format_snippet(diagnostic) {
                output.push_str(&snippet);
            }
        }
        output
    }

    fn format_location(&self, diagnostic: &Diagnostic) -> String {
        let file = if diagnostic.file.is_empty() {
            "<unknown>"
        } else {
            &diagnostic.file
        };
        let location = match self.position_for(&diagnostic.file, diagnostic.start()) {
            Some((line, column)) if self.color => format!("{file}:{line}:{column}"),
            Some((line, column)) => format!("{file}({line},{column})"),
            None => format!(
                "{file}[{}..{}]",
                diagnostic.range.start, diagnostic.range.end
            ),
        };
        if self.color {
            location.cyan().to_string()
        } else {
            location
        }
    }

    /// One-based line and column.
    fn position_for(&self, file: &str, offset: u32) -> Option<(u32, u32)> {
        let position = self.line_maps.get(file)?.offset_to_position(offset);
        Some((position.line + 1, position.character + 1))
    }

    /// The offending line with the range underlined, clipped to that line.
    fn format_snippet(&self, diagnostic: &Diagnostic) -> Option<String> {
        let source = self.sources.get(&diagnostic.file)?;
        let (line, column) = self.position_for(&diagnostic.file, diagnostic.start())?;
        let line_text = source.lines().nth((line - 1) as usize)?;

        let lead = line_text.get(..(column - 1) as usize)?;
        let rest = &line_text[lead.len()..];
        let width = rest
            .char_indices()
            .take_while(|(offset, _)| (*offset as u32) < diagnostic.length())
            .count()
            .max(1);

        let mut underline: String = lead
            .chars()
            .map(|ch| if ch == '\t' { '\t' } else { ' ' })
            .collect();
        let tildes = "~".repeat(width);
        if self.color {
            underline.push_str(&tildes.red().to_string());
        } else {
            underline.push_str(&tildes);
        }

        Some(format!("\n  {line:>3}   {line_text}\n        {underline}"))
    }

    fn format_category(&self, category: DiagnosticCategory) -> String {
        let label = category.to_string();
        if !self.color {
            return label;
        }
        match category {
            DiagnosticCategory::Error => label.red().bold().to_string(),
            DiagnosticCategory::Warning => label.yellow().bold().to_string(),
        }
    }
}

/// `Found 2 errors and 1 warning.`; `None` when there is nothing to report.
pub fn format_summary(errors: usize, warnings: usize) -> Option<String> {
    fn count(n: usize, noun: &str) -> String {
        if n == 1 {
            format!("1 {noun}")
        } else {
            format!("{n} {noun}s")
        }
    }
    match (errors, warnings) {
        (0, 0) => None,
        (e, 0) => Some(format!("Found {}.", count(e, "error"))),
        (0, w) => Some(format!("Found {}.", count(w, "warning"))),
        (e, w) => Some(format!(
            "Found {} and {}.",
            count(e, "error"),
            count(w, "warning")
        )),
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport<'a> {
    files: &'a [FileDiagnostics],
    error_count: usize,
    warning_count: usize,
}

/// Every file's diagnostics plus totals, as one pretty-printed JSON document.
pub fn render_json(results: &[FileDiagnostics]) -> Result<String> {
    let diagnostics = results.iter().flat_map(|file| &file.diagnostics);
    let error_count = diagnostics.clone().filter(|d| d.is_error()).count();
    let report = JsonReport {
        files: results,
        error_count,
        warning_count: diagnostics.count() - error_count,
    };
    serde_json::to_string_pretty(&report).context("failed to serialize diagnostics")
}

#[cfg(test)]
#[path = "../tests/reporter_tests.rs"]
mod reporter_tests;
