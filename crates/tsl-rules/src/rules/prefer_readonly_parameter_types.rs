//! `prefer-readonly-parameter-types`: function parameters should have deeply
//! readonly types.

use tracing::trace;
use tsl_common::RuleId;
use tsl_solver::{ReadonlyClassifier, ReadonlyState, Verdict};

use crate::config::PreferReadonlyParameterTypesOptions;
use crate::rule::{Rule, RuleContext, RuleMessage};
use crate::syntax::{NodeKind, Parameter, SyntaxNode};

pub const SHOULD_BE_READONLY: RuleMessage = RuleMessage {
    id: "shouldBeReadonly",
    template: "Parameter should be a read only type.",
};

const MESSAGES: &[RuleMessage] = &[SHOULD_BE_READONLY];

pub struct PreferReadonlyParameterTypes<'a> {
    options: &'a PreferReadonlyParameterTypesOptions,
    state: ReadonlyState,
}

impl<'a> PreferReadonlyParameterTypes<'a> {
    pub fn new(options: &'a PreferReadonlyParameterTypesOptions) -> Self {
        Self {
            options,
            state: ReadonlyState::new(),
        }
    }

    fn check_parameter(&mut self, param: &Parameter, ctx: &mut RuleContext<'_>) {
        if param.is_parameter_property && !self.options.check_parameter_properties {
            return;
        }
        if !param.has_annotation && self.options.ignore_inferred_types {
            return;
        }

        let oracle = ctx.oracle();
        let Some(ty) = oracle.type_of_node(param.id) else {
            return;
        };
        // `any` and `unknown` are reported by the unsafe-* rules.
        if oracle.is_unconstrained_dynamic(ty) || oracle.is_top_type(ty) {
            return;
        }

        let classifier = ReadonlyClassifier::new(oracle.oracle(), &self.options.policy);
        if classifier.classify(ty, &mut self.state) == Verdict::Mutable {
            trace!(param = %param.id, type_id = ty.0, "mutable parameter type");
            ctx.report(param.range, &SHOULD_BE_READONLY, Vec::new());
        }
    }
}

impl Rule for PreferReadonlyParameterTypes<'_> {
    fn id(&self) -> RuleId {
        super::PREFER_READONLY_PARAMETER_TYPES
    }

    fn messages(&self) -> &'static [RuleMessage] {
        MESSAGES
    }

    fn check(&mut self, node: &SyntaxNode, ctx: &mut RuleContext<'_>) {
        if let NodeKind::Function { parameters } = &node.kind {
            for param in parameters {
                self.check_parameter(param, ctx);
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/prefer_readonly_parameter_types_tests.rs"]
mod prefer_readonly_parameter_types_tests;
