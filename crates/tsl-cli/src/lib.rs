//! Command-line driver for the tsl linter.
//!
//! The host type checker dumps each program as JSON (syntax nodes plus a
//! type table); `tsl` loads those dumps, runs the configured rules and
//! prints the diagnostics.

pub mod args;
pub mod driver;
pub mod loader;
pub mod reporter;
pub mod tracing_config;
