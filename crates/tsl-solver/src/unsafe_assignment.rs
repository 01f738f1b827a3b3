//! Assignment safety comparison.
//!
//! Decides whether a value of a sender type flowing into a receiver position
//! lets `any` escape into otherwise typed structure, e.g. a `Set<any>` stored
//! in a `Set<string>` binding. The host checker accepts such assignments, so
//! the leak is only visible by walking both types side by side.
//!
//! Corresponding positions are compared pairwise through [`VisitState`]
//! keyed by `(sender, receiver)`, with "no leak" as the optimistic default,
//! so recursive generic instantiations terminate.

use tracing::trace;

use crate::oracle::{OracleAdapter, TypeOracle};
use crate::types::{TypeId, TypeShape};
use crate::visit::VisitState;

/// Which unconstrained flow was found.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LeakKind {
    /// The sender itself is `any`.
    Direct,
    /// An `any[]` destructured by an array pattern.
    ArrayPattern,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ComparisonVerdict {
    Safe,
    UnconstrainedLeak(LeakKind),
    /// `any` reached a typed position somewhere inside the two types. The
    /// descriptions are of the outer types, never of the offending pair.
    StructuralMismatch { sender: String, receiver: String },
}

impl ComparisonVerdict {
    #[inline]
    pub fn is_safe(&self) -> bool {
        matches!(self, Self::Safe)
    }
}

/// The position a value is assigned into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AssignmentTarget {
    pub ty: TypeId,
    /// `false` when the receiver's type was inferred from the sender.
    pub has_annotation: bool,
    /// The receiver is an array destructuring pattern.
    pub is_array_pattern: bool,
}

impl AssignmentTarget {
    pub fn annotated(ty: TypeId) -> Self {
        Self {
            ty,
            has_annotation: true,
            is_array_pattern: false,
        }
    }

    pub fn inferred(ty: TypeId) -> Self {
        Self {
            ty,
            has_annotation: false,
            is_array_pattern: false,
        }
    }

    pub fn array_pattern(mut self) -> Self {
        self.is_array_pattern = true;
        self
    }
}

/// Per-run memo for [`AssignmentComparator`]: `(sender, receiver)` to
/// "leaks".
pub type AssignmentState = VisitState<(TypeId, TypeId), bool>;

pub struct AssignmentComparator<'a> {
    oracle: OracleAdapter<'a>,
}

impl<'a> AssignmentComparator<'a> {
    pub fn new(oracle: &'a dyn TypeOracle) -> Self {
        Self {
            oracle: OracleAdapter::new(oracle),
        }
    }

    pub fn compare(
        &self,
        sender: TypeId,
        target: &AssignmentTarget,
        state: &mut AssignmentState,
    ) -> ComparisonVerdict {
        if self.oracle.is_unconstrained_dynamic(sender) {
            return ComparisonVerdict::UnconstrainedLeak(LeakKind::Direct);
        }
        if target.is_array_pattern && self.oracle.is_dynamic_array(sender) {
            return ComparisonVerdict::UnconstrainedLeak(LeakKind::ArrayPattern);
        }
        // Inferred from the sender, so equal by construction.
        if !target.has_annotation {
            return ComparisonVerdict::Safe;
        }

        if self.leaks(sender, target.ty, state) {
            ComparisonVerdict::StructuralMismatch {
                sender: self.oracle.type_to_string(sender),
                receiver: self.oracle.type_to_string(target.ty),
            }
        } else {
            ComparisonVerdict::Safe
        }
    }

    /// Whether `any` in `sender` lands on a typed position of `receiver`.
    pub fn leaks(&self, sender: TypeId, receiver: TypeId, state: &mut AssignmentState) -> bool {
        if sender == receiver {
            return false;
        }
        state.walk((sender, receiver), false, |state| {
            self.visit(sender, receiver, state)
        })
    }

    fn visit(&self, sender: TypeId, receiver: TypeId, state: &mut AssignmentState) -> bool {
        let (Some(sender_shape), Some(receiver_shape)) =
            (self.oracle.shape_of(sender), self.oracle.shape_of(receiver))
        else {
            return false;
        };

        if sender_shape.is_unconstrained_dynamic() {
            return !receiver_shape.is_escape_hatch();
        }

        match (&sender_shape, &receiver_shape) {
            (
                TypeShape::GenericInstance {
                    constructor: sender_ctor,
                    ..
                },
                TypeShape::GenericInstance {
                    constructor: receiver_ctor,
                    ..
                },
            ) if sender_ctor == receiver_ctor => {
                let sender_args = self.oracle.type_arguments_of(sender);
                let receiver_args = self.oracle.type_arguments_of(receiver);
                self.any_pair_leaks(&sender_args, &receiver_args, state)
            }
            (
                TypeShape::Array {
                    element: sender_elem,
                    ..
                },
                TypeShape::Array {
                    element: receiver_elem,
                    ..
                },
            ) => self.leaks(*sender_elem, *receiver_elem, state),
            (
                TypeShape::Tuple {
                    elements: sender_elems,
                    ..
                },
                TypeShape::Tuple {
                    elements: receiver_elems,
                    ..
                },
            ) => self.any_pair_leaks(sender_elems, receiver_elems, state),
            (TypeShape::Object { .. }, TypeShape::Object { .. }) => {
                let receiver_props = self.oracle.properties_of(receiver);
                self.oracle.properties_of(sender).iter().any(|sent| {
                    receiver_props
                        .iter()
                        .find(|received| received.name == sent.name)
                        .is_some_and(|received| {
                            self.leaks(sent.value_type, received.value_type, state)
                        })
                })
            }
            _ => {
                // Plain incompatibilities are the checker's to report.
                let assignable = self.oracle.is_assignable(sender, receiver);
                trace!(
                    sender = sender.0,
                    receiver = receiver.0,
                    assignable,
                    "deferring to checker assignability"
                );
                false
            }
        }
    }

    fn any_pair_leaks(
        &self,
        senders: &[TypeId],
        receivers: &[TypeId],
        state: &mut AssignmentState,
    ) -> bool {
        senders
            .iter()
            .zip(receivers)
            .any(|(&sender, &receiver)| self.leaks(sender, receiver, state))
    }
}

/// Compare in a one-off run.
pub fn compare_assignment(
    oracle: &dyn TypeOracle,
    sender: TypeId,
    target: &AssignmentTarget,
) -> ComparisonVerdict {
    let mut state = AssignmentState::new();
    AssignmentComparator::new(oracle).compare(sender, target, &mut state)
}

#[cfg(test)]
#[path = "../tests/unsafe_assignment_tests.rs"]
mod unsafe_assignment_tests;
