//! `no-unsafe-argument`: call arguments typed `any`, or carrying `any` into
//! a typed parameter position, are reported.

use tsl_common::RuleId;
use tsl_solver::{AssignmentComparator, AssignmentState, AssignmentTarget, ComparisonVerdict};

use crate::rule::{Rule, RuleContext, RuleMessage};
use crate::syntax::{Argument, NodeKind, SyntaxNode};

pub const UNSAFE_ARGUMENT: RuleMessage = RuleMessage {
    id: "unsafeArgument",
    template: "Unsafe argument of type `{{sender}}` assigned to a parameter of type `{{receiver}}`.",
};
pub const UNSAFE_SPREAD: RuleMessage = RuleMessage {
    id: "unsafeSpread",
    template: "Unsafe spread of an `any` type.",
};

const MESSAGES: &[RuleMessage] = &[UNSAFE_ARGUMENT, UNSAFE_SPREAD];

pub struct NoUnsafeArgument {
    state: AssignmentState,
}

impl NoUnsafeArgument {
    pub fn new() -> Self {
        Self {
            state: AssignmentState::new(),
        }
    }

    fn check_argument(&mut self, argument: &Argument, ctx: &mut RuleContext<'_>) {
        let oracle = ctx.oracle();
        let value = &argument.value;
        let Some(sender) = oracle.type_of_node(value.id) else {
            return;
        };

        if argument.spread {
            if oracle.is_unconstrained_dynamic(sender) || oracle.is_dynamic_array(sender) {
                ctx.report(value.range, &UNSAFE_SPREAD, Vec::new());
            }
            return;
        }

        // No known parameter (excess argument or untyped callee).
        let Some(parameter) = oracle.contextual_type_of(value.id) else {
            return;
        };
        if oracle.is_unconstrained_dynamic(sender)
            && (oracle.is_top_type(parameter) || oracle.is_unconstrained_dynamic(parameter))
        {
            return;
        }

        let comparator = AssignmentComparator::new(oracle.oracle());
        let verdict = comparator.compare(
            sender,
            &AssignmentTarget::annotated(parameter),
            &mut self.state,
        );
        let data = match verdict {
            ComparisonVerdict::Safe => return,
            ComparisonVerdict::UnconstrainedLeak(_) => vec![
                ("sender", oracle.type_to_string(sender)),
                ("receiver", oracle.type_to_string(parameter)),
            ],
            ComparisonVerdict::StructuralMismatch { sender, receiver } => {
                vec![("sender", sender), ("receiver", receiver)]
            }
        };
        ctx.report(value.range, &UNSAFE_ARGUMENT, data);
    }
}

impl Rule for NoUnsafeArgument {
    fn id(&self) -> RuleId {
        super::NO_UNSAFE_ARGUMENT
    }

    fn messages(&self) -> &'static [RuleMessage] {
        MESSAGES
    }

    fn check(&mut self, node: &SyntaxNode, ctx: &mut RuleContext<'_>) {
        if let NodeKind::Call { arguments } = &node.kind {
            for argument in arguments {
                self.check_argument(argument, ctx);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/no_unsafe_argument_tests.rs"]
mod no_unsafe_argument_tests;
