//! Lint configuration.
//!
//! ```json
//! {
//!   "rules": {
//!     "no-unsafe-assignment": "error",
//!     "prefer-readonly-parameter-types": ["warn", {
//!       "allow": ["Date", { "from": "package", "name": "Observable", "package": "rxjs" }],
//!       "treatMethodsAsReadonly": true
//!     }]
//!   }
//! }
//! ```
//!
//! Only the rules listed in a configuration run. Without a configuration the
//! linter uses [`RuleSet::recommended`].

use indexmap::IndexMap;
use serde::Deserialize;
use thiserror::Error;
use tsl_common::{DiagnosticCategory, RuleId};
use tsl_solver::{OriginMatcher, Policy};

use crate::rules;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse lint configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unknown rule `{0}`")]
    UnknownRule(String),
    #[error("invalid severity {value} for rule `{rule}`, expected \"off\", \"warn\" or \"error\"")]
    InvalidSeverity { rule: String, value: String },
    #[error("invalid options for rule `{rule}`: {source}")]
    InvalidOptions {
        rule: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("rule `{rule}` takes no options")]
    UnexpectedOptions { rule: String },
    #[error("invalid path glob `{pattern}` in the allow list of `{rule}`: {source}")]
    InvalidGlob {
        rule: String,
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

// =============================================================================
// Raw (serde) configuration
// =============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LintConfig {
    #[serde(default)]
    pub rules: IndexMap<String, RuleSetting>,
}

/// `"error"` or `["error", { ...options }]`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RuleSetting {
    Severity(String),
    WithOptions(Vec<serde_json::Value>),
}

/// One name or a list of names.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum Names {
    One(String),
    Many(Vec<String>),
}

impl Names {
    fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(name) => vec![name],
            Self::Many(names) => names,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "from", rename_all = "camelCase")]
enum RawOriginSpec {
    File {
        name: Names,
        #[serde(default)]
        path: Option<String>,
    },
    Lib {
        name: Names,
    },
    Package {
        name: Names,
        package: String,
    },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum RawOriginMatcher {
    Name(String),
    Origin(RawOriginSpec),
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawPreferReadonlyOptions {
    #[serde(default)]
    allow: Vec<RawOriginMatcher>,
    #[serde(default = "default_true")]
    check_parameter_properties: bool,
    #[serde(default)]
    ignore_inferred_types: bool,
    #[serde(default)]
    treat_methods_as_readonly: bool,
}

impl Default for RawPreferReadonlyOptions {
    fn default() -> Self {
        Self {
            allow: Vec::new(),
            check_parameter_properties: true,
            ignore_inferred_types: false,
            treat_methods_as_readonly: false,
        }
    }
}

// =============================================================================
// Resolved configuration
// =============================================================================

#[derive(Debug, Clone)]
pub struct PreferReadonlyParameterTypesOptions {
    pub policy: Policy,
    /// Also check constructor parameter properties.
    pub check_parameter_properties: bool,
    /// Skip parameters without a type annotation.
    pub ignore_inferred_types: bool,
}

impl Default for PreferReadonlyParameterTypesOptions {
    fn default() -> Self {
        Self {
            policy: Policy::default(),
            check_parameter_properties: true,
            ignore_inferred_types: false,
        }
    }
}

#[derive(Debug, Clone)]
pub enum RuleKind {
    PreferReadonlyParameterTypes(PreferReadonlyParameterTypesOptions),
    NoUnsafeAssignment,
    NoUnsafeArgument,
    NoUnsafeReturn,
}

impl RuleKind {
    pub fn id(&self) -> RuleId {
        match self {
            Self::PreferReadonlyParameterTypes(_) => rules::PREFER_READONLY_PARAMETER_TYPES,
            Self::NoUnsafeAssignment => rules::NO_UNSAFE_ASSIGNMENT,
            Self::NoUnsafeArgument => rules::NO_UNSAFE_ARGUMENT,
            Self::NoUnsafeReturn => rules::NO_UNSAFE_RETURN,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RuleEntry {
    pub kind: RuleKind,
    pub category: DiagnosticCategory,
}

/// The enabled rules, in configuration order.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    entries: Vec<RuleEntry>,
}

impl RuleSet {
    /// Every rule at error severity with default options.
    pub fn recommended() -> Self {
        let entries = [
            RuleKind::PreferReadonlyParameterTypes(PreferReadonlyParameterTypesOptions::default()),
            RuleKind::NoUnsafeAssignment,
            RuleKind::NoUnsafeArgument,
            RuleKind::NoUnsafeReturn,
        ]
        .into_iter()
        .map(|kind| RuleEntry {
            kind,
            category: DiagnosticCategory::Error,
        })
        .collect();
        Self { entries }
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: LintConfig = serde_json::from_str(text)?;
        Self::from_config(config)
    }

    pub fn from_config(config: LintConfig) -> Result<Self, ConfigError> {
        let mut entries = Vec::with_capacity(config.rules.len());
        for (name, setting) in config.rules {
            if let Some(entry) = resolve_rule(&name, setting)? {
                entries.push(entry);
            }
        }
        Ok(Self { entries })
    }

    #[must_use]
    pub fn with(mut self, kind: RuleKind, category: DiagnosticCategory) -> Self {
        self.entries.retain(|entry| entry.kind.id() != kind.id());
        self.entries.push(RuleEntry { kind, category });
        self
    }

    pub fn entries(&self) -> &[RuleEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn resolve_rule(name: &str, setting: RuleSetting) -> Result<Option<RuleEntry>, ConfigError> {
    let (severity, options) = match setting {
        RuleSetting::Severity(severity) => (severity, None),
        RuleSetting::WithOptions(values) => {
            let mut values = values.into_iter();
            let severity = match values.next() {
                Some(serde_json::Value::String(severity)) => severity,
                Some(other) => {
                    return Err(ConfigError::InvalidSeverity {
                        rule: name.to_string(),
                        value: other.to_string(),
                    });
                }
                None => {
                    return Err(ConfigError::InvalidSeverity {
                        rule: name.to_string(),
                        value: "[]".to_string(),
                    });
                }
            };
            (severity, values.next())
        }
    };

    let category = match severity.as_str() {
        "off" => None,
        "warn" => Some(DiagnosticCategory::Warning),
        "error" => Some(DiagnosticCategory::Error),
        _ => {
            return Err(ConfigError::InvalidSeverity {
                rule: name.to_string(),
                value: format!("\"{severity}\""),
            });
        }
    };

    let kind = match name {
        "prefer-readonly-parameter-types" => {
            RuleKind::PreferReadonlyParameterTypes(resolve_prefer_readonly(name, options)?)
        }
        "no-unsafe-assignment" => no_options(name, options, RuleKind::NoUnsafeAssignment)?,
        "no-unsafe-argument" => no_options(name, options, RuleKind::NoUnsafeArgument)?,
        "no-unsafe-return" => no_options(name, options, RuleKind::NoUnsafeReturn)?,
        _ => return Err(ConfigError::UnknownRule(name.to_string())),
    };

    Ok(category.map(|category| RuleEntry { kind, category }))
}

fn no_options(
    name: &str,
    options: Option<serde_json::Value>,
    kind: RuleKind,
) -> Result<RuleKind, ConfigError> {
    match options {
        None | Some(serde_json::Value::Null) => Ok(kind),
        Some(serde_json::Value::Object(map)) if map.is_empty() => Ok(kind),
        Some(_) => Err(ConfigError::UnexpectedOptions {
            rule: name.to_string(),
        }),
    }
}

fn resolve_prefer_readonly(
    name: &str,
    options: Option<serde_json::Value>,
) -> Result<PreferReadonlyParameterTypesOptions, ConfigError> {
    let raw = match options {
        None | Some(serde_json::Value::Null) => RawPreferReadonlyOptions::default(),
        Some(value) => {
            serde_json::from_value(value).map_err(|source| ConfigError::InvalidOptions {
                rule: name.to_string(),
                source,
            })?
        }
    };

    let mut policy = Policy::default().with_methods_as_immutable(raw.treat_methods_as_readonly);
    for matcher in raw.allow {
        policy = policy.allow(resolve_matcher(name, matcher)?);
    }

    Ok(PreferReadonlyParameterTypesOptions {
        policy,
        check_parameter_properties: raw.check_parameter_properties,
        ignore_inferred_types: raw.ignore_inferred_types,
    })
}

fn resolve_matcher(rule: &str, matcher: RawOriginMatcher) -> Result<OriginMatcher, ConfigError> {
    let origin = match matcher {
        RawOriginMatcher::Name(name) => return Ok(OriginMatcher::name(name)),
        RawOriginMatcher::Origin(origin) => origin,
    };
    Ok(match origin {
        RawOriginSpec::File { name, path } => OriginMatcher::file(name.into_vec(), path.as_deref())
            .map_err(|source| ConfigError::InvalidGlob {
                rule: rule.to_string(),
                pattern: path.unwrap_or_default(),
                source,
            })?,
        RawOriginSpec::Lib { name } => OriginMatcher::lib(name.into_vec()),
        RawOriginSpec::Package { name, package } => {
            OriginMatcher::package(name.into_vec(), package)
        }
    })
}

#[cfg(test)]
#[path = "../tests/config_tests.rs"]
mod config_tests;
