//! In-memory type oracle.
//!
//! `TypeTable` holds a resolved type graph as plain data. Tests build graphs
//! through its builder methods; hosts that run out of process serialize their
//! checker's answers into it and hand the JSON to the CLI.
//!
//! Recursive shapes are built with [`TypeTable::declare`] followed by
//! [`TypeTable::define`]. A declared type that is never defined stays
//! unresolved, which the analyses treat as fail-open.

use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use tsl_common::NodeId;

use crate::oracle::TypeOracle;
use crate::types::{
    DefId, IndexSignatureDescriptor, LiteralValue, PrimitiveKind, PropertyDescriptor, Signature,
    SignatureKind, TypeId, TypeList, TypeOrigin, TypeShape,
};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeEntry {
    /// `None` while only declared (or when the host could not resolve it).
    #[serde(default)]
    pub shape: Option<TypeShape>,
    /// Declared name, used for display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<TypeOrigin>,
    /// Members of function-like and generic instances.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<PropertyDescriptor>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub index_signatures: Vec<IndexSignatureDescriptor>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeTable {
    types: Vec<TypeEntry>,
    /// Generic constructor names, indexed by `DefId`.
    #[serde(default)]
    constructors: Vec<String>,
    #[serde(default)]
    nodes: FxHashMap<NodeId, TypeId>,
    #[serde(default)]
    contextual: FxHashMap<NodeId, TypeId>,
    /// Pairs the checker considers assignable beyond the built-in rules.
    #[serde(default)]
    assignable: FxHashSet<(TypeId, TypeId)>,
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn entry(&self, ty: TypeId) -> Option<&TypeEntry> {
        self.types.get(ty.0 as usize)
    }

    fn entry_mut(&mut self, ty: TypeId) -> Option<&mut TypeEntry> {
        self.types.get_mut(ty.0 as usize)
    }

    fn push(&mut self, shape: Option<TypeShape>) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(TypeEntry {
            shape,
            ..TypeEntry::default()
        });
        id
    }

    // =========================================================================
    // Builders
    // =========================================================================

    pub fn intern(&mut self, shape: TypeShape) -> TypeId {
        self.push(Some(shape))
    }

    pub fn primitive(&mut self, primitive: PrimitiveKind) -> TypeId {
        self.intern(TypeShape::Primitive { primitive })
    }

    pub fn string(&mut self) -> TypeId {
        self.primitive(PrimitiveKind::String)
    }

    pub fn number(&mut self) -> TypeId {
        self.primitive(PrimitiveKind::Number)
    }

    pub fn boolean(&mut self) -> TypeId {
        self.primitive(PrimitiveKind::Boolean)
    }

    pub fn literal(&mut self, value: LiteralValue) -> TypeId {
        self.primitive(PrimitiveKind::Literal(value))
    }

    /// `any`
    pub fn dynamic(&mut self) -> TypeId {
        self.intern(TypeShape::UnconstrainedDynamic)
    }

    /// `unknown`
    pub fn top(&mut self) -> TypeId {
        self.intern(TypeShape::TopType)
    }

    pub fn never(&mut self) -> TypeId {
        self.intern(TypeShape::NeverType)
    }

    pub fn array(&mut self, element: TypeId) -> TypeId {
        self.intern(TypeShape::Array {
            element,
            mutable: true,
        })
    }

    pub fn readonly_array(&mut self, element: TypeId) -> TypeId {
        self.intern(TypeShape::Array {
            element,
            mutable: false,
        })
    }

    pub fn tuple(&mut self, elements: &[TypeId]) -> TypeId {
        self.intern(TypeShape::Tuple {
            elements: TypeList::from_slice(elements),
            mutable: true,
        })
    }

    pub fn readonly_tuple(&mut self, elements: &[TypeId]) -> TypeId {
        self.intern(TypeShape::Tuple {
            elements: TypeList::from_slice(elements),
            mutable: false,
        })
    }

    pub fn object(&mut self, properties: Vec<PropertyDescriptor>) -> TypeId {
        self.object_with_index(properties, Vec::new())
    }

    pub fn object_with_index(
        &mut self,
        properties: Vec<PropertyDescriptor>,
        index_signatures: Vec<IndexSignatureDescriptor>,
    ) -> TypeId {
        self.intern(TypeShape::Object {
            properties,
            index_signatures,
        })
    }

    pub fn union(&mut self, members: &[TypeId]) -> TypeId {
        self.intern(TypeShape::Union {
            members: TypeList::from_slice(members),
        })
    }

    pub fn intersection(&mut self, members: &[TypeId]) -> TypeId {
        self.intern(TypeShape::Intersection {
            members: TypeList::from_slice(members),
        })
    }

    /// `(params) => return_type`
    pub fn function(&mut self, parameters: &[TypeId], return_type: TypeId) -> TypeId {
        self.intern(TypeShape::FunctionLike {
            signatures: vec![Signature {
                kind: SignatureKind::Call,
                parameters: TypeList::from_slice(parameters),
                return_type,
            }],
        })
    }

    /// Register a generic constructor such as `Set` or `Promise`.
    pub fn constructor(&mut self, name: impl Into<String>) -> DefId {
        let id = DefId(self.constructors.len() as u32);
        self.constructors.push(name.into());
        id
    }

    pub fn constructor_name(&self, def: DefId) -> Option<&str> {
        self.constructors.get(def.0 as usize).map(String::as_str)
    }

    pub fn generic(&mut self, constructor: DefId, type_arguments: &[TypeId]) -> TypeId {
        self.intern(TypeShape::GenericInstance {
            constructor,
            type_arguments: TypeList::from_slice(type_arguments),
        })
    }

    /// Attach members to a function-like or generic instance.
    pub fn set_members(
        &mut self,
        ty: TypeId,
        properties: Vec<PropertyDescriptor>,
        index_signatures: Vec<IndexSignatureDescriptor>,
    ) {
        if let Some(entry) = self.entry_mut(ty) {
            entry.properties = properties;
            entry.index_signatures = index_signatures;
        }
    }

    /// Reserve an id for a type whose shape refers back to itself.
    pub fn declare(&mut self, name: impl Into<String>) -> TypeId {
        let id = self.push(None);
        self.set_name(id, name);
        id
    }

    /// Fill in the shape of a declared type.
    pub fn define(&mut self, ty: TypeId, shape: TypeShape) {
        if let Some(entry) = self.entry_mut(ty) {
            entry.shape = Some(shape);
        }
    }

    pub fn set_name(&mut self, ty: TypeId, name: impl Into<String>) {
        if let Some(entry) = self.entry_mut(ty) {
            entry.name = Some(name.into());
        }
    }

    pub fn set_origin(&mut self, ty: TypeId, origin: TypeOrigin) {
        if let Some(entry) = self.entry_mut(ty) {
            if entry.name.is_none() {
                entry.name = Some(origin.name.clone());
            }
            entry.origin = Some(origin);
        }
    }

    pub fn bind_node(&mut self, node: NodeId, ty: TypeId) {
        self.nodes.insert(node, ty);
    }

    pub fn bind_contextual(&mut self, node: NodeId, ty: TypeId) {
        self.contextual.insert(node, ty);
    }

    pub fn allow_assignment(&mut self, source: TypeId, target: TypeId) {
        self.assignable.insert((source, target));
    }

    // =========================================================================
    // Display
    // =========================================================================

    fn write_type(&self, ty: TypeId, out: &mut String, visiting: &mut FxHashSet<TypeId>) {
        let Some(entry) = self.entry(ty) else {
            out.push_str("error");
            return;
        };
        if let Some(name) = &entry.name
            && !matches!(entry.shape, Some(TypeShape::GenericInstance { .. }))
        {
            out.push_str(name);
            return;
        }
        let Some(shape) = &entry.shape else {
            out.push_str("error");
            return;
        };
        if !visiting.insert(ty) {
            out.push_str("...");
            return;
        }
        match shape {
            TypeShape::Primitive { primitive } => out.push_str(&primitive.to_string()),
            TypeShape::UnconstrainedDynamic => out.push_str("any"),
            TypeShape::TopType => out.push_str("unknown"),
            TypeShape::NeverType => out.push_str("never"),
            TypeShape::Array { element, mutable } => {
                if !mutable {
                    out.push_str("readonly ");
                }
                let needs_parens = matches!(
                    self.shape(*element),
                    Some(
                        TypeShape::Union { .. }
                            | TypeShape::Intersection { .. }
                            | TypeShape::FunctionLike { .. }
                    )
                ) && self.entry(*element).is_some_and(|e| e.name.is_none());
                if needs_parens {
                    out.push('(');
                }
                self.write_type(*element, out, visiting);
                if needs_parens {
                    out.push(')');
                }
                out.push_str("[]");
            }
            TypeShape::Tuple { elements, mutable } => {
                if !mutable {
                    out.push_str("readonly ");
                }
                out.push('[');
                self.write_list(elements, ", ", out, visiting);
                out.push(']');
            }
            TypeShape::Object {
                properties,
                index_signatures,
            } => {
                if properties.is_empty() && index_signatures.is_empty() {
                    out.push_str("{}");
                } else {
                    out.push_str("{ ");
                    for sig in index_signatures {
                        if sig.is_immutable_marked {
                            out.push_str("readonly ");
                        }
                        out.push_str(&format!("[key: {}]: ", sig.key_kind));
                        self.write_type(sig.value_type, out, visiting);
                        out.push_str("; ");
                    }
                    for prop in properties {
                        if prop.is_immutable_marked {
                            out.push_str("readonly ");
                        }
                        out.push_str(&prop.name);
                        out.push_str(": ");
                        self.write_type(prop.value_type, out, visiting);
                        out.push_str("; ");
                    }
                    out.push('}');
                }
            }
            TypeShape::Union { members } => self.write_list(members, " | ", out, visiting),
            TypeShape::Intersection { members } => self.write_list(members, " & ", out, visiting),
            TypeShape::FunctionLike { signatures } => match signatures.first() {
                Some(sig) => {
                    if sig.kind == SignatureKind::Construct {
                        out.push_str("new ");
                    }
                    out.push('(');
                    for (i, param) in sig.parameters.iter().enumerate() {
                        if i > 0 {
                            out.push_str(", ");
                        }
                        out.push_str(&format!("arg{i}: "));
                        self.write_type(*param, out, visiting);
                    }
                    out.push_str(") => ");
                    self.write_type(sig.return_type, out, visiting);
                }
                None => out.push_str("Function"),
            },
            TypeShape::GenericInstance {
                constructor,
                type_arguments,
            } => {
                let name = self
                    .constructor_name(*constructor)
                    .map(str::to_string)
                    .or_else(|| entry.name.clone())
                    .unwrap_or_else(|| format!("Generic{}", constructor.0));
                out.push_str(&name);
                if !type_arguments.is_empty() {
                    out.push('<');
                    self.write_list(type_arguments, ", ", out, visiting);
                    out.push('>');
                }
            }
        }
        visiting.remove(&ty);
    }

    fn write_list(
        &self,
        list: &[TypeId],
        separator: &str,
        out: &mut String,
        visiting: &mut FxHashSet<TypeId>,
    ) {
        for (i, member) in list.iter().enumerate() {
            if i > 0 {
                out.push_str(separator);
            }
            self.write_type(*member, out, visiting);
        }
    }

    // =========================================================================
    // Intersection members
    // =========================================================================

    /// A member is readonly in the intersection if any constituent declares
    /// it readonly; the first constituent fixes its type. Constituents
    /// already seen contribute nothing, so self-referential intersections
    /// terminate.
    fn merge_properties(
        &self,
        ty: TypeId,
        merged: &mut IndexMap<String, PropertyDescriptor>,
        seen: &mut FxHashSet<TypeId>,
    ) {
        if !seen.insert(ty) {
            return;
        }
        let Some(entry) = self.entry(ty) else {
            return;
        };
        let props = match &entry.shape {
            Some(TypeShape::Intersection { members }) => {
                for member in members {
                    self.merge_properties(*member, merged, seen);
                }
                return;
            }
            Some(TypeShape::Object { properties, .. }) => properties,
            _ => &entry.properties,
        };
        for prop in props {
            match merged.get_mut(&prop.name) {
                Some(existing) => existing.is_immutable_marked |= prop.is_immutable_marked,
                None => {
                    merged.insert(prop.name.clone(), prop.clone());
                }
            }
        }
    }

    fn collect_index_signatures(
        &self,
        ty: TypeId,
        out: &mut Vec<IndexSignatureDescriptor>,
        seen: &mut FxHashSet<TypeId>,
    ) {
        if !seen.insert(ty) {
            return;
        }
        let Some(entry) = self.entry(ty) else {
            return;
        };
        match &entry.shape {
            Some(TypeShape::Intersection { members }) => {
                for member in members {
                    self.collect_index_signatures(*member, out, seen);
                }
            }
            Some(TypeShape::Object {
                index_signatures, ..
            }) => out.extend(index_signatures.iter().cloned()),
            _ => out.extend(entry.index_signatures.iter().cloned()),
        }
    }

    fn shape(&self, ty: TypeId) -> Option<&TypeShape> {
        self.entry(ty).and_then(|entry| entry.shape.as_ref())
    }

    // =========================================================================
    // Assignability
    // =========================================================================

    fn assignable(&self, source: TypeId, target: TypeId, depth: u32) -> bool {
        if source == target || self.assignable.contains(&(source, target)) {
            return true;
        }
        if depth > 32 {
            return false;
        }
        let (Some(source_shape), Some(target_shape)) = (self.shape(source), self.shape(target))
        else {
            return true;
        };
        match (source_shape, target_shape) {
            (_, TypeShape::TopType | TypeShape::UnconstrainedDynamic) => true,
            (TypeShape::NeverType | TypeShape::UnconstrainedDynamic, _) => true,
            (TypeShape::Union { members }, _) => members
                .iter()
                .all(|member| self.assignable(*member, target, depth + 1)),
            (_, TypeShape::Union { members }) => members
                .iter()
                .any(|member| self.assignable(source, *member, depth + 1)),
            (TypeShape::Primitive { primitive: a }, TypeShape::Primitive { primitive: b }) => {
                a == b || literal_widens_to(a, b)
            }
            _ => false,
        }
    }
}

fn literal_widens_to(literal: &PrimitiveKind, primitive: &PrimitiveKind) -> bool {
    matches!(
        (literal, primitive),
        (
            PrimitiveKind::Literal(LiteralValue::String(_)),
            PrimitiveKind::String
        ) | (
            PrimitiveKind::Literal(LiteralValue::Number(_)),
            PrimitiveKind::Number
        ) | (
            PrimitiveKind::Literal(LiteralValue::BigInt(_)),
            PrimitiveKind::BigInt
        ) | (
            PrimitiveKind::Literal(LiteralValue::Boolean(_)),
            PrimitiveKind::Boolean
        )
    )
}

impl TypeOracle for TypeTable {
    fn type_of_node(&self, node: NodeId) -> Option<TypeId> {
        self.nodes.get(&node).copied()
    }

    fn contextual_type_of(&self, node: NodeId) -> Option<TypeId> {
        self.contextual.get(&node).copied()
    }

    fn shape_of(&self, ty: TypeId) -> Option<TypeShape> {
        self.shape(ty).cloned()
    }

    fn properties_of(&self, ty: TypeId) -> Vec<PropertyDescriptor> {
        let Some(entry) = self.entry(ty) else {
            return Vec::new();
        };
        match &entry.shape {
            Some(TypeShape::Object { properties, .. }) => properties.clone(),
            Some(TypeShape::Intersection { .. }) => {
                let mut merged = IndexMap::new();
                self.merge_properties(ty, &mut merged, &mut FxHashSet::default());
                merged.into_values().collect()
            }
            _ => entry.properties.clone(),
        }
    }

    fn index_signatures_of(&self, ty: TypeId) -> Vec<IndexSignatureDescriptor> {
        let Some(entry) = self.entry(ty) else {
            return Vec::new();
        };
        match &entry.shape {
            Some(TypeShape::Object {
                index_signatures, ..
            }) => index_signatures.clone(),
            Some(TypeShape::Intersection { .. }) => {
                let mut out = Vec::new();
                self.collect_index_signatures(ty, &mut out, &mut FxHashSet::default());
                out
            }
            _ => entry.index_signatures.clone(),
        }
    }

    fn origin_of(&self, ty: TypeId) -> Option<TypeOrigin> {
        self.entry(ty).and_then(|entry| entry.origin.clone())
    }

    fn is_assignable(&self, source: TypeId, target: TypeId) -> bool {
        self.assignable(source, target, 0)
    }

    fn type_to_string(&self, ty: TypeId) -> String {
        let mut out = String::new();
        self.write_type(ty, &mut out, &mut FxHashSet::default());
        out
    }
}

#[cfg(test)]
#[path = "../tests/table_tests.rs"]
mod table_tests;
