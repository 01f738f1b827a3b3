//! `no-unsafe-return`: functions must not return `any`, or values carrying
//! `any` into their declared return type.

use tsl_common::RuleId;
use tsl_solver::{AssignmentComparator, AssignmentState, AssignmentTarget, ComparisonVerdict};

use crate::rule::{Rule, RuleContext, RuleMessage};
use crate::syntax::{Expr, ExprForm, NodeKind, SyntaxNode};

pub const UNSAFE_RETURN: RuleMessage = RuleMessage {
    id: "unsafeReturn",
    template: "Unsafe return of a value of type `{{type}}`.",
};
pub const UNSAFE_RETURN_THIS: RuleMessage = RuleMessage {
    id: "unsafeReturnThis",
    template: "Unsafe return of a value of type `{{type}}`. `this` is typed as `any`.\nYou can try to fix this by turning on the `noImplicitThis` compiler option, or adding a `this` parameter to the function.",
};
pub const UNSAFE_RETURN_ASSIGNMENT: RuleMessage = RuleMessage {
    id: "unsafeReturnAssignment",
    template: "Unsafe return of type `{{sender}}` from function with return type `{{receiver}}`.",
};

const MESSAGES: &[RuleMessage] = &[UNSAFE_RETURN, UNSAFE_RETURN_THIS, UNSAFE_RETURN_ASSIGNMENT];

pub struct NoUnsafeReturn {
    state: AssignmentState,
}

impl NoUnsafeReturn {
    pub fn new() -> Self {
        Self {
            state: AssignmentState::new(),
        }
    }

    fn check_returned(&mut self, returned: &Expr, ctx: &mut RuleContext<'_>) {
        let oracle = ctx.oracle();
        let Some(sender) = oracle.type_of_node(returned.id) else {
            return;
        };
        // Declared return type; `None` when it is inferred from the body.
        let declared = oracle.contextual_type_of(returned.id);

        if oracle.is_unconstrained_dynamic(sender) {
            if declared
                .is_some_and(|ty| oracle.is_top_type(ty) || oracle.is_unconstrained_dynamic(ty))
            {
                return;
            }
            let message = if returned.form == ExprForm::This {
                &UNSAFE_RETURN_THIS
            } else {
                &UNSAFE_RETURN
            };
            ctx.report(
                returned.range,
                message,
                vec![("type", oracle.type_to_string(sender))],
            );
            return;
        }

        let Some(declared) = declared else {
            return;
        };
        let comparator = AssignmentComparator::new(oracle.oracle());
        if let ComparisonVerdict::StructuralMismatch { sender, receiver } = comparator.compare(
            sender,
            &AssignmentTarget::annotated(declared),
            &mut self.state,
        ) {
            ctx.report(
                returned.range,
                &UNSAFE_RETURN_ASSIGNMENT,
                vec![("sender", sender), ("receiver", receiver)],
            );
        }
    }
}

impl Rule for NoUnsafeReturn {
    fn id(&self) -> RuleId {
        super::NO_UNSAFE_RETURN
    }

    fn messages(&self) -> &'static [RuleMessage] {
        MESSAGES
    }

    fn check(&mut self, node: &SyntaxNode, ctx: &mut RuleContext<'_>) {
        match &node.kind {
            NodeKind::Return { argument } => self.check_returned(argument, ctx),
            NodeKind::ArrowBody { body } => self.check_returned(body, ctx),
            _ => {}
        }
    }
}

#[cfg(test)]
#[path = "../../tests/no_unsafe_return_tests.rs"]
mod no_unsafe_return_tests;
