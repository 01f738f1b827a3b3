//! Type-aware lint rules.
//!
//! The host hands over a flattened syntax tree ([`SourceFile`]) and a
//! [`tsl_solver::TypeOracle`]; the [`Linter`] runs the configured rules over
//! each file and returns diagnostics in source order.
//!
//! Rules:
//! - `prefer-readonly-parameter-types`
//! - `no-unsafe-assignment`
//! - `no-unsafe-argument`
//! - `no-unsafe-return`

pub mod config;
pub mod linter;
pub mod rule;
pub mod rules;
pub mod syntax;

pub use config::{
    ConfigError, LintConfig, PreferReadonlyParameterTypesOptions, RuleEntry, RuleKind, RuleSet,
};
pub use linter::{FileDiagnostics, Linter, ProgramDump, sort_diagnostics};
pub use rule::{Rule, RuleContext, RuleMessage};
pub use syntax::{
    Argument, Binding, BindingPattern, Expr, ExprForm, NodeKind, Parameter, SourceFile, SyntaxNode,
};

#[cfg(test)]
#[path = "../tests/support.rs"]
pub(crate) mod test_support;
