//! Diagnostic types and message formatting for lint rules.
//!
//! Rules report a message id plus named data; the template is looked up
//! by the rule and rendered with [`format_message`] at report time.

use serde::Serialize;
use std::fmt;

use crate::span::SourceRange;

// =============================================================================
// Diagnostic Types
// =============================================================================

/// Diagnostic category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticCategory {
    Warning = 0,
    Error = 1,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => f.write_str("warning"),
            Self::Error => f.write_str("error"),
        }
    }
}

/// Stable identifier of a lint rule, e.g. `no-unsafe-assignment`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct RuleId(pub &'static str);

impl RuleId {
    #[inline]
    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Named substitutions for a message template, in insertion order.
pub type MessageData = Vec<(&'static str, String)>;

/// A lint diagnostic attached to a byte range of one file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub file: String,
    pub range: SourceRange,
    pub rule_id: RuleId,
    pub message_id: &'static str,
    pub message_text: String,
    pub category: DiagnosticCategory,
}

impl Diagnostic {
    /// Build a diagnostic, rendering `template` with `data`.
    #[must_use]
    pub fn new(
        file: impl Into<String>,
        range: SourceRange,
        rule_id: RuleId,
        message_id: &'static str,
        template: &str,
        data: &MessageData,
        category: DiagnosticCategory,
    ) -> Self {
        Self {
            file: file.into(),
            range,
            rule_id,
            message_id,
            message_text: format_message(template, data),
            category,
        }
    }

    #[inline]
    pub const fn start(&self) -> u32 {
        self.range.start
    }

    #[inline]
    pub const fn length(&self) -> u32 {
        self.range.len()
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }
}

/// Replace every `{{name}}` placeholder in `message` with its value in `data`.
///
/// Placeholders with no matching entry are left as written.
pub fn format_message(message: &str, data: &MessageData) -> String {
    let mut result = message.to_string();
    for (name, value) in data {
        result = result.replace(&format!("{{{{{name}}}}}"), value);
    }
    result
}

#[cfg(test)]
#[path = "../tests/diagnostics_tests.rs"]
mod diagnostics_tests;
