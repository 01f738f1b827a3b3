//! Rule trait and the per-rule reporting context.

use tsl_common::{Diagnostic, DiagnosticCategory, MessageData, RuleId, SourceRange};
use tsl_solver::{OracleAdapter, TypeOracle};

use crate::syntax::SyntaxNode;

/// A message a rule can report: stable id plus `{{placeholder}}` template.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RuleMessage {
    pub id: &'static str,
    pub template: &'static str,
}

/// A type-aware lint rule.
///
/// A rule instance lives for exactly one file: the linter creates it when it
/// starts the file and drops it afterwards, so per-run analysis state kept in
/// the rule never outlives the type identities it was built from.
pub trait Rule {
    fn id(&self) -> RuleId;

    /// Every message this rule may report.
    fn messages(&self) -> &'static [RuleMessage];

    /// Inspect one node. Nodes arrive in the host's pre-order.
    fn check(&mut self, node: &SyntaxNode, ctx: &mut RuleContext<'_>);
}

/// What a rule sees while checking one file.
pub struct RuleContext<'a> {
    file_name: &'a str,
    oracle: OracleAdapter<'a>,
    rule_id: RuleId,
    category: DiagnosticCategory,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> RuleContext<'a> {
    pub fn new(
        file_name: &'a str,
        oracle: &'a dyn TypeOracle,
        rule_id: RuleId,
        category: DiagnosticCategory,
    ) -> Self {
        Self {
            file_name,
            oracle: OracleAdapter::new(oracle),
            rule_id,
            category,
            diagnostics: Vec::new(),
        }
    }

    #[inline]
    pub fn oracle(&self) -> OracleAdapter<'a> {
        self.oracle
    }

    #[inline]
    pub fn file_name(&self) -> &'a str {
        self.file_name
    }

    pub fn report(&mut self, range: SourceRange, message: &RuleMessage, data: MessageData) {
        self.diagnostics.push(Diagnostic::new(
            self.file_name,
            range,
            self.rule_id,
            message.id,
            message.template,
            &data,
            self.category,
        ));
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}
