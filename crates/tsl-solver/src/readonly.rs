//! Deep readonlyness classification.
//!
//! A type is [`Verdict::Immutable`] when no value of it can be mutated through
//! it: every reachable property, index signature and element is marked
//! `readonly` and is itself immutable.
//!
//! Recursion goes through [`VisitState`] with `Immutable` as the optimistic
//! default, so self-referential and mutually recursive declarations terminate
//! and are judged by their other reachable members.
//!
//! `any` and `unknown` are not this classifier's concern at the top level;
//! callers report them separately. Reached inside another type they carry no
//! structure and classify as `Immutable`.

use tracing::trace;

use crate::oracle::{OracleAdapter, TypeOracle};
use crate::policy::Policy;
use crate::types::{TypeId, TypeShape};
use crate::visit::VisitState;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Verdict {
    Immutable,
    Mutable,
}

impl Verdict {
    #[inline]
    pub fn is_immutable(self) -> bool {
        self == Self::Immutable
    }

    fn all(verdicts: impl IntoIterator<Item = Verdict>) -> Verdict {
        if verdicts.into_iter().all(Verdict::is_immutable) {
            Self::Immutable
        } else {
            Self::Mutable
        }
    }

    fn any(verdicts: impl IntoIterator<Item = Verdict>) -> Verdict {
        if verdicts.into_iter().any(Verdict::is_immutable) {
            Self::Immutable
        } else {
            Self::Mutable
        }
    }
}

/// Per-run memo for [`ReadonlyClassifier`]. Results depend on the policy, so
/// one state must only ever be used with one policy.
pub type ReadonlyState = VisitState<TypeId, Verdict>;

pub struct ReadonlyClassifier<'a> {
    oracle: OracleAdapter<'a>,
    policy: &'a Policy,
}

impl<'a> ReadonlyClassifier<'a> {
    pub fn new(oracle: &'a dyn TypeOracle, policy: &'a Policy) -> Self {
        Self {
            oracle: OracleAdapter::new(oracle),
            policy,
        }
    }

    pub fn classify(&self, ty: TypeId, state: &mut ReadonlyState) -> Verdict {
        state.walk(ty, Verdict::Immutable, |state| self.visit(ty, state))
    }

    fn visit(&self, ty: TypeId, state: &mut ReadonlyState) -> Verdict {
        if let Some(origin) = self.oracle.origin_of(ty)
            && self.policy.is_allowlisted(&origin)
        {
            trace!(type_id = ty.0, name = %origin.name, "allowlisted");
            return Verdict::Immutable;
        }

        let Some(shape) = self.oracle.shape_of(ty) else {
            return Verdict::Immutable;
        };

        match shape {
            TypeShape::Primitive { .. } | TypeShape::NeverType => Verdict::Immutable,
            TypeShape::UnconstrainedDynamic | TypeShape::TopType => Verdict::Immutable,
            TypeShape::Array { mutable: true, .. } | TypeShape::Tuple { mutable: true, .. } => {
                Verdict::Mutable
            }
            TypeShape::Array {
                element,
                mutable: false,
            } => self.classify(element, state),
            TypeShape::Tuple {
                elements,
                mutable: false,
            } => Verdict::all(elements.iter().map(|&element| self.classify(element, state))),
            TypeShape::Object { .. } | TypeShape::GenericInstance { .. } => {
                self.classify_members(ty, state)
            }
            TypeShape::FunctionLike { .. } => self.classify_callable(ty, state),
            TypeShape::Union { members } => {
                Verdict::all(members.iter().map(|&member| self.classify(member, state)))
            }
            TypeShape::Intersection { members } => self.classify_intersection(ty, &members, state),
        }
    }

    /// Object rule over `ty`'s properties and index signatures.
    fn classify_members(&self, ty: TypeId, state: &mut ReadonlyState) -> Verdict {
        let properties = self.oracle.properties_of(ty);
        let index_signatures = self.oracle.index_signatures_of(ty);

        let unmarked = properties.iter().find(|prop| {
            !prop.is_immutable_marked
                && !prop.is_private
                && !(prop.is_method && self.policy.treat_methods_as_immutable)
        });
        if let Some(prop) = unmarked {
            trace!(type_id = ty.0, property = %prop.name, "property is not readonly");
            return Verdict::Mutable;
        }

        for sig in &index_signatures {
            if !sig.is_immutable_marked || !self.classify(sig.value_type, state).is_immutable() {
                return Verdict::Mutable;
            }
        }

        Verdict::all(
            properties
                .iter()
                .map(|prop| self.classify(prop.value_type, state)),
        )
    }

    /// Signatures carry no state; only data members can make a callable mutable.
    fn classify_callable(&self, ty: TypeId, state: &mut ReadonlyState) -> Verdict {
        if self.has_data_members(ty) {
            self.classify_members(ty, state)
        } else {
            Verdict::Immutable
        }
    }

    fn has_data_members(&self, ty: TypeId) -> bool {
        self.oracle
            .properties_of(ty)
            .iter()
            .any(|prop| !prop.is_method)
            || !self.oracle.index_signatures_of(ty).is_empty()
    }

    /// Any immutable constituent makes the value unmutatable through it.
    ///
    /// A callable constituent has no view of its own once other constituents
    /// contribute data: it is judged by the object rule over the merged
    /// members of the whole intersection.
    fn classify_intersection(
        &self,
        ty: TypeId,
        members: &[TypeId],
        state: &mut ReadonlyState,
    ) -> Verdict {
        let mut merged = None;
        Verdict::any(members.iter().map(|&member| {
            if matches!(
                self.oracle.shape_of(member),
                Some(TypeShape::FunctionLike { .. })
            ) {
                *merged.get_or_insert_with(|| self.classify_callable(ty, state))
            } else {
                self.classify(member, state)
            }
        }))
    }
}

/// Classify `ty` in a one-off run.
pub fn classify_readonlyness(oracle: &dyn TypeOracle, ty: TypeId, policy: &Policy) -> Verdict {
    let mut state = ReadonlyState::new();
    ReadonlyClassifier::new(oracle, policy).classify(ty, &mut state)
}

#[cfg(test)]
#[path = "../tests/readonly_tests.rs"]
mod readonly_tests;
