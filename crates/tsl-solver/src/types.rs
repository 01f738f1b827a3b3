//! Structural type model handed over by the type oracle.
//!
//! A [`TypeId`] is the oracle's identity for a resolved type. It is only
//! meaningful within one type-checking session, so nothing keyed by it may
//! outlive an analysis run.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// Identity of a resolved type. Equal ids denote the same type.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeId(pub u32);

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeId({})", self.0)
    }
}

/// Identity of a generic (parametrised) type constructor such as `Set` or `Promise`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DefId(pub u32);

pub type TypeList = SmallVec<[TypeId; 4]>;

/// Literal value of a unit type. Numbers keep their source text.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LiteralValue {
    String(String),
    Number(String),
    BigInt(String),
    Boolean(bool),
}

impl fmt::Display for LiteralValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "\"{s}\""),
            Self::Number(n) => f.write_str(n),
            Self::BigInt(n) => write!(f, "{n}n"),
            Self::Boolean(b) => write!(f, "{b}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PrimitiveKind {
    String,
    Number,
    Boolean,
    BigInt,
    Symbol,
    UniqueSymbol,
    Null,
    Undefined,
    Void,
    Literal(LiteralValue),
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => f.write_str("string"),
            Self::Number => f.write_str("number"),
            Self::Boolean => f.write_str("boolean"),
            Self::BigInt => f.write_str("bigint"),
            Self::Symbol => f.write_str("symbol"),
            Self::UniqueSymbol => f.write_str("unique symbol"),
            Self::Null => f.write_str("null"),
            Self::Undefined => f.write_str("undefined"),
            Self::Void => f.write_str("void"),
            Self::Literal(value) => value.fmt(f),
        }
    }
}

/// One member of an object-like type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDescriptor {
    pub name: String,
    pub value_type: TypeId,
    /// Declared `readonly` (or a getter without a setter).
    #[serde(default)]
    pub is_immutable_marked: bool,
    #[serde(default)]
    pub is_method: bool,
    /// A `#private` member; not reachable from outside the class body.
    #[serde(default)]
    pub is_private: bool,
}

impl PropertyDescriptor {
    pub fn new(name: impl Into<String>, value_type: TypeId) -> Self {
        Self {
            name: name.into(),
            value_type,
            is_immutable_marked: false,
            is_method: false,
            is_private: false,
        }
    }

    #[must_use]
    pub fn readonly(mut self) -> Self {
        self.is_immutable_marked = true;
        self
    }

    #[must_use]
    pub fn method(mut self) -> Self {
        self.is_method = true;
        self
    }

    #[must_use]
    pub fn private(mut self) -> Self {
        self.is_private = true;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IndexKeyKind {
    String,
    Number,
}

impl fmt::Display for IndexKeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => f.write_str("string"),
            Self::Number => f.write_str("number"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexSignatureDescriptor {
    pub key_kind: IndexKeyKind,
    pub value_type: TypeId,
    #[serde(default)]
    pub is_immutable_marked: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SignatureKind {
    Call,
    Construct,
}

/// A call or construct signature of a function-like type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signature {
    pub kind: SignatureKind,
    #[serde(default)]
    pub parameters: TypeList,
    pub return_type: TypeId,
}

/// Structural shape of a resolved type.
///
/// One exhaustive sum type: analyses match on it once instead of chaining
/// shape predicates, so a new shape cannot silently fall through.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TypeShape {
    /// Primitive and literal (unit) types.
    Primitive { primitive: PrimitiveKind },
    /// `any`: could be anything, defeats static checking wherever it flows.
    UnconstrainedDynamic,
    /// `unknown`: safe to hold, not to operate on without narrowing.
    TopType,
    /// `never`
    NeverType,
    /// `T[]` (`mutable`) or `readonly T[]`.
    Array { element: TypeId, mutable: bool },
    /// `[A, B]` (`mutable`) or `readonly [A, B]`.
    Tuple { elements: TypeList, mutable: bool },
    Object {
        #[serde(default)]
        properties: Vec<PropertyDescriptor>,
        #[serde(default, rename = "indexSignatures")]
        index_signatures: Vec<IndexSignatureDescriptor>,
    },
    Union { members: TypeList },
    Intersection { members: TypeList },
    FunctionLike { signatures: Vec<Signature> },
    /// `Constructor<Args>`; structural members are answered by the oracle.
    GenericInstance {
        constructor: DefId,
        #[serde(rename = "typeArguments")]
        type_arguments: TypeList,
    },
}

impl TypeShape {
    #[inline]
    pub fn is_unconstrained_dynamic(&self) -> bool {
        matches!(self, Self::UnconstrainedDynamic)
    }

    #[inline]
    pub fn is_top_type(&self) -> bool {
        matches!(self, Self::TopType)
    }

    /// `any` or `unknown`.
    #[inline]
    pub fn is_escape_hatch(&self) -> bool {
        matches!(self, Self::UnconstrainedDynamic | Self::TopType)
    }
}

/// Where a named type was declared.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "from", rename_all = "camelCase")]
pub enum OriginSource {
    /// A source file of the program under analysis.
    File { path: String },
    /// A default library file such as `lib.es5.d.ts`.
    Lib { file: String },
    /// A declaration file shipped by an installed package.
    Package { package: String },
}

/// Declared name plus declaring location, used for allowlist matching.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeOrigin {
    pub name: String,
    pub source: OriginSource,
}

impl TypeOrigin {
    pub fn file(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: OriginSource::File { path: path.into() },
        }
    }

    pub fn lib(name: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: OriginSource::Lib { file: file.into() },
        }
    }

    pub fn package(name: impl Into<String>, package: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: OriginSource::Package {
                package: package.into(),
            },
        }
    }
}
