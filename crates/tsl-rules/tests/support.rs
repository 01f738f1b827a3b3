//! Fixture builder shared by the rule tests.

use tsl_common::{Diagnostic, DiagnosticCategory, NodeId, SourceRange};
use tsl_solver::{TypeId, TypeTable};

use crate::config::{RuleKind, RuleSet};
use crate::linter::Linter;
use crate::syntax::{Argument, Binding, Expr, ExprForm, NodeKind, Parameter, SourceFile};

/// A file under construction plus the type table answering for it.
///
/// Every node and operand gets a fresh id and its own ten-byte range, laid
/// out left to right in creation order.
pub(crate) struct Fixture {
    pub table: TypeTable,
    pub file: SourceFile,
    next_id: u32,
    next_offset: u32,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            table: TypeTable::new(),
            file: SourceFile::new("test.ts"),
            next_id: 1,
            next_offset: 0,
        }
    }

    pub fn span(&mut self) -> (NodeId, SourceRange) {
        let id = NodeId(self.next_id);
        let range = SourceRange::new(self.next_offset, self.next_offset + 10);
        self.next_id += 1;
        self.next_offset += 10;
        (id, range)
    }

    /// Operand of type `ty`.
    pub fn expr(&mut self, ty: TypeId) -> Expr {
        let (id, range) = self.span();
        self.table.bind_node(id, ty);
        Expr::new(id, range)
    }

    /// Operand of type `ty` whose context expects `expected`.
    pub fn expr_expecting(&mut self, ty: TypeId, expected: TypeId) -> Expr {
        let expr = self.expr(ty);
        self.table.bind_contextual(expr.id, expected);
        expr
    }

    pub fn this_expr(&mut self, ty: TypeId) -> Expr {
        self.expr(ty).with_form(ExprForm::This)
    }

    /// Operand the oracle knows nothing about.
    pub fn unresolved_expr(&mut self) -> Expr {
        let (id, range) = self.span();
        Expr::new(id, range)
    }

    pub fn annotated(&mut self, ty: TypeId) -> Binding {
        let (id, range) = self.span();
        self.table.bind_node(id, ty);
        Binding::annotated(id, range)
    }

    pub fn inferred(&mut self, ty: TypeId) -> Binding {
        let (id, range) = self.span();
        self.table.bind_node(id, ty);
        Binding::inferred(id, range)
    }

    pub fn parameter(&mut self, ty: TypeId) -> Parameter {
        let (id, range) = self.span();
        self.table.bind_node(id, ty);
        Parameter {
            id,
            range,
            has_annotation: true,
            is_parameter_property: false,
        }
    }

    pub fn argument(&mut self, ty: TypeId, parameter: TypeId) -> Argument {
        Argument {
            value: self.expr_expecting(ty, parameter),
            spread: false,
        }
    }

    pub fn spread_argument(&mut self, ty: TypeId) -> Argument {
        Argument {
            value: self.expr(ty),
            spread: true,
        }
    }

    /// Append a node and return its range.
    pub fn add(&mut self, kind: NodeKind) -> SourceRange {
        let (id, range) = self.span();
        self.file.push(id, range, kind);
        range
    }

    pub fn run(&self, kind: RuleKind) -> Vec<Diagnostic> {
        let rules = RuleSet::default().with(kind, DiagnosticCategory::Error);
        Linter::new(rules).lint_file(&self.file, &self.table)
    }
}

pub(crate) fn message_ids(diagnostics: &[Diagnostic]) -> Vec<&'static str> {
    diagnostics.iter().map(|d| d.message_id).collect()
}
