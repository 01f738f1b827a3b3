//! Boundary to the external type checker.
//!
//! [`TypeOracle`] is the query surface the analyses consume; the host's
//! type checker implements it. [`OracleAdapter`] is the thin layer the
//! analyses actually call: it logs queries the oracle cannot answer so the
//! callers can fail open.

use tracing::trace;
use tsl_common::NodeId;

use crate::types::{IndexSignatureDescriptor, PropertyDescriptor, TypeId, TypeOrigin, TypeShape};

/// Synchronous, side-effect-free type queries answered by the host checker.
///
/// `TypeId` doubles as the identity key: two handles denote the same type
/// exactly when their ids are equal.
pub trait TypeOracle {
    /// Type of an expression, parameter or binding. `None` if unresolved.
    fn type_of_node(&self, node: NodeId) -> Option<TypeId>;

    /// Type the context expects at `node` (parameter type for an argument,
    /// declared return type for a returned expression).
    fn contextual_type_of(&self, _node: NodeId) -> Option<TypeId> {
        None
    }

    /// Structural shape. `None` if the oracle cannot resolve `ty`.
    fn shape_of(&self, ty: TypeId) -> Option<TypeShape>;

    /// Ordered property list, including members of function-like and
    /// generic instances and the merged members of intersections.
    fn properties_of(&self, ty: TypeId) -> Vec<PropertyDescriptor> {
        match self.shape_of(ty) {
            Some(TypeShape::Object { properties, .. }) => properties,
            _ => Vec::new(),
        }
    }

    fn index_signatures_of(&self, ty: TypeId) -> Vec<IndexSignatureDescriptor> {
        match self.shape_of(ty) {
            Some(TypeShape::Object {
                index_signatures, ..
            }) => index_signatures,
            _ => Vec::new(),
        }
    }

    fn type_arguments_of(&self, ty: TypeId) -> Vec<TypeId> {
        match self.shape_of(ty) {
            Some(TypeShape::GenericInstance { type_arguments, .. }) => {
                type_arguments.into_iter().collect()
            }
            _ => Vec::new(),
        }
    }

    /// Declared origin of a named type.
    fn origin_of(&self, ty: TypeId) -> Option<TypeOrigin>;

    /// The checker's own compatibility judgment.
    fn is_assignable(&self, source: TypeId, target: TypeId) -> bool;

    /// Display text, as the checker would print the type.
    fn type_to_string(&self, ty: TypeId) -> String;
}

/// Fail-open view over a [`TypeOracle`].
#[derive(Clone, Copy)]
pub struct OracleAdapter<'a> {
    oracle: &'a dyn TypeOracle,
}

impl<'a> OracleAdapter<'a> {
    pub fn new(oracle: &'a dyn TypeOracle) -> Self {
        Self { oracle }
    }

    #[inline]
    pub fn oracle(&self) -> &'a dyn TypeOracle {
        self.oracle
    }

    pub fn type_of_node(&self, node: NodeId) -> Option<TypeId> {
        let ty = self.oracle.type_of_node(node);
        if ty.is_none() {
            trace!(%node, "oracle has no type for node");
        }
        ty
    }

    pub fn contextual_type_of(&self, node: NodeId) -> Option<TypeId> {
        self.oracle.contextual_type_of(node)
    }

    pub fn shape_of(&self, ty: TypeId) -> Option<TypeShape> {
        let shape = self.oracle.shape_of(ty);
        if shape.is_none() {
            trace!(type_id = ty.0, "unresolved type, failing open");
        }
        shape
    }

    pub fn properties_of(&self, ty: TypeId) -> Vec<PropertyDescriptor> {
        self.oracle.properties_of(ty)
    }

    pub fn index_signatures_of(&self, ty: TypeId) -> Vec<IndexSignatureDescriptor> {
        self.oracle.index_signatures_of(ty)
    }

    pub fn type_arguments_of(&self, ty: TypeId) -> Vec<TypeId> {
        self.oracle.type_arguments_of(ty)
    }

    pub fn origin_of(&self, ty: TypeId) -> Option<TypeOrigin> {
        self.oracle.origin_of(ty)
    }

    pub fn is_assignable(&self, source: TypeId, target: TypeId) -> bool {
        self.oracle.is_assignable(source, target)
    }

    pub fn type_to_string(&self, ty: TypeId) -> String {
        self.oracle.type_to_string(ty)
    }

    /// `true` only for a resolved `any`.
    pub fn is_unconstrained_dynamic(&self, ty: TypeId) -> bool {
        matches!(self.oracle.shape_of(ty), Some(TypeShape::UnconstrainedDynamic))
    }

    /// `true` only for a resolved `unknown`.
    pub fn is_top_type(&self, ty: TypeId) -> bool {
        matches!(self.oracle.shape_of(ty), Some(TypeShape::TopType))
    }

    /// `any[]` or `readonly any[]`.
    pub fn is_dynamic_array(&self, ty: TypeId) -> bool {
        match self.oracle.shape_of(ty) {
            Some(TypeShape::Array { element, .. }) => self.is_unconstrained_dynamic(element),
            _ => false,
        }
    }
}
