//! Common types and utilities for the tsl lint engine.
//!
//! This crate provides foundational types used across all tsl crates:
//! - Host node identities (`NodeId`) and byte ranges (`SourceRange`)
//! - Line/column mapping for presenting ranges (`LineMap`, `Position`)
//! - The diagnostic model shared by rules and reporters

// Span - Source location tracking (byte offsets)
pub mod span;
pub use span::{NodeId, SourceRange};

// Position types for line/column source locations
pub mod position;
pub use position::{LineMap, Position};

pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory, MessageData, RuleId, format_message};
