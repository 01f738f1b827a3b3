//! `no-unsafe-assignment`: values typed `any`, or structures carrying `any`
//! in typed positions, must not be assigned to variables and fields.

use tsl_common::{RuleId, SourceRange};
use tsl_solver::{
    AssignmentComparator, AssignmentState, AssignmentTarget, ComparisonVerdict, LeakKind,
};

use crate::rule::{Rule, RuleContext, RuleMessage};
use crate::syntax::{Binding, BindingPattern, Expr, ExprForm, NodeKind, SyntaxNode};

pub const ANY_ASSIGNMENT: RuleMessage = RuleMessage {
    id: "anyAssignment",
    template: "Unsafe assignment of an `any` value.",
};
pub const ANY_ASSIGNMENT_THIS: RuleMessage = RuleMessage {
    id: "anyAssignmentThis",
    template: "Unsafe assignment of an `any` value. `this` is typed as `any`.\nYou can try to fix this by turning on the `noImplicitThis` compiler option, or adding a `this` parameter to the function.",
};
pub const UNSAFE_ARRAY_PATTERN: RuleMessage = RuleMessage {
    id: "unsafeArrayPattern",
    template: "Unsafe array destructuring of an `any` array value.",
};
pub const UNSAFE_ARRAY_SPREAD: RuleMessage = RuleMessage {
    id: "unsafeArraySpread",
    template: "Unsafe spread of an `any` value in an array.",
};
pub const UNSAFE_ASSIGNMENT: RuleMessage = RuleMessage {
    id: "unsafeAssignment",
    template: "Unsafe assignment of type `{{sender}}` to a variable of type `{{receiver}}`.",
};

const MESSAGES: &[RuleMessage] = &[
    ANY_ASSIGNMENT,
    ANY_ASSIGNMENT_THIS,
    UNSAFE_ARRAY_PATTERN,
    UNSAFE_ARRAY_SPREAD,
    UNSAFE_ASSIGNMENT,
];

pub struct NoUnsafeAssignment {
    state: AssignmentState,
}

impl NoUnsafeAssignment {
    pub fn new() -> Self {
        Self {
            state: AssignmentState::new(),
        }
    }

    fn check_assignment(
        &mut self,
        node_range: SourceRange,
        receiver: &Binding,
        sender: &Expr,
        ctx: &mut RuleContext<'_>,
    ) {
        let oracle = ctx.oracle();
        let (Some(sender_ty), Some(receiver_ty)) =
            (oracle.type_of_node(sender.id), oracle.type_of_node(receiver.id))
        else {
            return;
        };

        // `const x: unknown = y as any` is how `any` is meant to be contained.
        if receiver.has_annotation
            && oracle.is_unconstrained_dynamic(sender_ty)
            && (oracle.is_top_type(receiver_ty) || oracle.is_unconstrained_dynamic(receiver_ty))
        {
            return;
        }
        // `new Map()` is typed `Map<any, any>` by the library declaration.
        if sender.form == ExprForm::BareMapConstruction {
            return;
        }

        let target = AssignmentTarget {
            ty: receiver_ty,
            has_annotation: receiver.has_annotation,
            is_array_pattern: receiver.pattern == BindingPattern::ArrayPattern,
        };
        let comparator = AssignmentComparator::new(oracle.oracle());
        match comparator.compare(sender_ty, &target, &mut self.state) {
            ComparisonVerdict::Safe => {}
            ComparisonVerdict::UnconstrainedLeak(LeakKind::Direct) => {
                let message = if sender.form == ExprForm::This {
                    &ANY_ASSIGNMENT_THIS
                } else {
                    &ANY_ASSIGNMENT
                };
                ctx.report(node_range, message, Vec::new());
            }
            ComparisonVerdict::UnconstrainedLeak(LeakKind::ArrayPattern) => {
                ctx.report(receiver.range, &UNSAFE_ARRAY_PATTERN, Vec::new());
            }
            ComparisonVerdict::StructuralMismatch { sender, receiver } => {
                ctx.report(
                    node_range,
                    &UNSAFE_ASSIGNMENT,
                    vec![("sender", sender), ("receiver", receiver)],
                );
            }
        }
    }

    fn check_array_spread(&self, argument: &Expr, ctx: &mut RuleContext<'_>) {
        let oracle = ctx.oracle();
        let Some(ty) = oracle.type_of_node(argument.id) else {
            return;
        };
        if oracle.is_unconstrained_dynamic(ty) || oracle.is_dynamic_array(ty) {
            ctx.report(argument.range, &UNSAFE_ARRAY_SPREAD, Vec::new());
        }
    }
}

impl Rule for NoUnsafeAssignment {
    fn id(&self) -> RuleId {
        super::NO_UNSAFE_ASSIGNMENT
    }

    fn messages(&self) -> &'static [RuleMessage] {
        MESSAGES
    }

    fn check(&mut self, node: &SyntaxNode, ctx: &mut RuleContext<'_>) {
        match &node.kind {
            NodeKind::VariableDeclarator {
                binding,
                init: Some(init),
            } => self.check_assignment(node.range, binding, init, ctx),
            NodeKind::Assignment { target, value } => {
                // An assignment target's type is declared elsewhere, never
                // inferred from the value being assigned.
                let target = Binding {
                    has_annotation: true,
                    ..*target
                };
                self.check_assignment(node.range, &target, value, ctx);
            }
            NodeKind::PropertyDefinition {
                key,
                value: Some(value),
            } => self.check_assignment(node.range, key, value, ctx),
            NodeKind::ArraySpread { argument } => self.check_array_spread(argument, ctx),
            _ => {}
        }
    }
}

#[cfg(test)]
#[path = "../../tests/no_unsafe_assignment_tests.rs"]
mod no_unsafe_assignment_tests;
