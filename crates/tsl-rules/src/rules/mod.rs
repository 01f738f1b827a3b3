//! Rule adapters: syntax nodes in, readonlyness and assignment-safety
//! verdicts through the solver, diagnostics out.

mod no_unsafe_argument;
mod no_unsafe_assignment;
mod no_unsafe_return;
mod prefer_readonly_parameter_types;

pub use no_unsafe_argument::NoUnsafeArgument;
pub use no_unsafe_assignment::NoUnsafeAssignment;
pub use no_unsafe_return::NoUnsafeReturn;
pub use prefer_readonly_parameter_types::PreferReadonlyParameterTypes;

use tsl_common::RuleId;

use crate::config::RuleKind;
use crate::rule::Rule;

pub const PREFER_READONLY_PARAMETER_TYPES: RuleId = RuleId("prefer-readonly-parameter-types");
pub const NO_UNSAFE_ASSIGNMENT: RuleId = RuleId("no-unsafe-assignment");
pub const NO_UNSAFE_ARGUMENT: RuleId = RuleId("no-unsafe-argument");
pub const NO_UNSAFE_RETURN: RuleId = RuleId("no-unsafe-return");

pub const ALL_RULES: &[RuleId] = &[
    PREFER_READONLY_PARAMETER_TYPES,
    NO_UNSAFE_ASSIGNMENT,
    NO_UNSAFE_ARGUMENT,
    NO_UNSAFE_RETURN,
];

/// Fresh instance of a configured rule, with empty analysis state.
pub fn instantiate(kind: &RuleKind) -> Box<dyn Rule + '_> {
    match kind {
        RuleKind::PreferReadonlyParameterTypes(options) => {
            Box::new(PreferReadonlyParameterTypes::new(options))
        }
        RuleKind::NoUnsafeAssignment => Box::new(NoUnsafeAssignment::new()),
        RuleKind::NoUnsafeArgument => Box::new(NoUnsafeArgument::new()),
        RuleKind::NoUnsafeReturn => Box::new(NoUnsafeReturn::new()),
    }
}
