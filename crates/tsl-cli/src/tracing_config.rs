//! Diagnostic logging for the `tsl` binary.
//!
//! Logging stays off until a filter is given. `TSL_LOG` takes an `EnvFilter`
//! directive and is read before `RUST_LOG`. `TSL_LOG_FORMAT` picks the
//! rendering: `text` lines (the fallback for anything unrecognised), a `tree`
//! of nested spans, or `json` events.
//!
//! ```bash
//! TSL_LOG=tsl_solver=trace TSL_LOG_FORMAT=tree tsl program.json
//! ```
//!
//! Events always go to stderr; stdout carries only the lint report.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

const FILTER_VAR: &str = "TSL_LOG";
const FORMAT_VAR: &str = "TSL_LOG_FORMAT";

/// How log events are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Tree,
    Json,
}

impl LogFormat {
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("tree") {
            Self::Tree
        } else if value.eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Text
        }
    }

    fn from_env() -> Self {
        std::env::var(FORMAT_VAR)
            .map(|value| Self::parse(&value))
            .unwrap_or(Self::Text)
    }
}

/// `None` when neither variable is set.
fn filter_from_env() -> Option<EnvFilter> {
    if let Ok(directives) = std::env::var(FILTER_VAR) {
        return Some(EnvFilter::builder().parse_lossy(directives));
    }
    std::env::var_os(EnvFilter::DEFAULT_ENV).map(|_| EnvFilter::from_default_env())
}

/// Install the global subscriber if logging was requested.
pub fn init_tracing() {
    let Some(filter) = filter_from_env() else {
        return;
    };
    let registry = Registry::default().with(filter);

    match LogFormat::from_env() {
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        // The tree layer writes to stderr on its own.
        LogFormat::Tree => registry
            .with(
                tracing_tree::HierarchicalLayer::new(2)
                    .with_indent_lines(true)
                    .with_deferred_spans(true)
                    .with_span_retrace(true)
                    .with_targets(true),
            )
            .init(),
    }
}
