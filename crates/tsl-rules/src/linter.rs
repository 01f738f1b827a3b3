//! Per-file linting and the parallel multi-file driver.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, debug_span};
use tsl_common::Diagnostic;
use tsl_solver::{TypeOracle, TypeTable};

use crate::config::RuleSet;
use crate::rule::RuleContext;
use crate::rules;
use crate::syntax::SourceFile;

/// A whole program as dumped by the host: the files plus one type table
/// answering for every node id in them.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ProgramDump {
    #[serde(default)]
    pub files: Vec<SourceFile>,
    #[serde(default)]
    pub types: TypeTable,
}

/// Diagnostics of one file, in source order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDiagnostics {
    pub file_name: String,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct Linter {
    rules: RuleSet,
}

impl Linter {
    pub fn new(rules: RuleSet) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Run every enabled rule over `file`.
    ///
    /// Each rule gets a fresh instance, so no analysis state crosses files.
    /// Diagnostics are sorted by position, then rule id.
    pub fn lint_file(&self, file: &SourceFile, oracle: &dyn TypeOracle) -> Vec<Diagnostic> {
        let _span = debug_span!("lint_file", file = %file.file_name).entered();
        let mut diagnostics = Vec::new();

        for entry in self.rules.entries() {
            let started = Instant::now();
            let mut rule = rules::instantiate(&entry.kind);
            let mut ctx = RuleContext::new(&file.file_name, oracle, rule.id(), entry.category);
            for node in &file.nodes {
                rule.check(node, &mut ctx);
            }
            let found = ctx.into_diagnostics();
            debug_assert!(
                found
                    .iter()
                    .all(|d| rule.messages().iter().any(|m| m.id == d.message_id)),
                "{} reported a message id missing from its message table",
                rule.id()
            );
            debug!(
                rule = %rule.id(),
                diagnostics = found.len(),
                elapsed_us = started.elapsed().as_micros() as u64,
                "rule finished"
            );
            diagnostics.extend(found);
        }

        sort_diagnostics(&mut diagnostics);
        diagnostics
    }

    /// Lint `files` in parallel. Results come back in input order.
    pub fn lint_program(
        &self,
        files: &[SourceFile],
        oracle: &(dyn TypeOracle + Sync),
    ) -> Vec<FileDiagnostics> {
        files
            .par_iter()
            .map(|file| FileDiagnostics {
                file_name: file.file_name.clone(),
                diagnostics: self.lint_file(file, oracle),
            })
            .collect()
    }
}

/// Stable sort by (start, end, rule id).
pub fn sort_diagnostics(diagnostics: &mut [Diagnostic]) {
    diagnostics.sort_by(|a, b| {
        a.range
            .cmp(&b.range)
            .then_with(|| a.rule_id.cmp(&b.rule_id))
    });
}

#[cfg(test)]
#[path = "../tests/linter_tests.rs"]
mod linter_tests;
