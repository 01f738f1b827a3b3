//! Reading lint configs and program dumps from disk.

use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use tracing::debug;
use tsl_rules::{ProgramDump, RuleSet};
use walkdir::WalkDir;

/// Resolve the rule set: the config file when given, else the recommended set.
pub fn load_rule_set(config: Option<&Path>) -> Result<RuleSet> {
    let Some(path) = config else {
        return Ok(RuleSet::recommended());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read lint config: {}", path.display()))?;
    let rules = RuleSet::from_json(&text)
        .with_context(|| format!("invalid lint config: {}", path.display()))?;
    debug!(config = %path.display(), rules = rules.entries().len(), "loaded lint config");
    Ok(rules)
}

/// Expand inputs into dump files.
///
/// Files are taken as given. Directories are walked recursively for `*.json`
/// files, in file-name order so runs are reproducible.
pub fn collect_dump_paths(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for input in inputs {
        if input.is_file() {
            paths.push(input.clone());
            continue;
        }
        if !input.is_dir() {
            bail!("input not found: {}", input.display());
        }
        for entry in WalkDir::new(input).sort_by_file_name() {
            let entry =
                entry.with_context(|| format!("failed to walk directory {}", input.display()))?;
            if entry.file_type().is_file() && is_json(entry.path()) {
                paths.push(entry.into_path());
            }
        }
    }
    Ok(paths)
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

pub fn load_dump(path: &Path) -> Result<ProgramDump> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read program dump: {}", path.display()))?;
    let dump: ProgramDump = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse program dump: {}", path.display()))?;
    debug!(
        dump = %path.display(),
        files = dump.files.len(),
        types = dump.types.len(),
        "loaded program dump"
    );
    Ok(dump)
}

#[cfg(test)]
#[path = "../tests/loader_tests.rs"]
mod loader_tests;
