//! Type Mutability and Assignment Safety Analysis
//!
//! This crate classifies and compares types that an external checker has
//! already resolved. It does not infer or check types itself.
//!
//! - **Readonlyness**: is a type deeply immutable under a [`Policy`]?
//! - **Assignment safety**: does assigning one type into another let `any`
//!   escape into typed structure?
//!
//! Both analyses walk possibly cyclic type graphs through [`VisitState`],
//! which memoizes per identity and answers re-entries with an optimistic
//! default. Anything the [`TypeOracle`] cannot resolve fails open.
pub mod oracle;
pub mod policy;
pub mod readonly;
pub mod table;
pub mod types;
pub mod unsafe_assignment;
pub mod visit;

pub use oracle::{OracleAdapter, TypeOracle};
pub use policy::{OriginMatcher, Policy};
pub use readonly::{ReadonlyClassifier, ReadonlyState, Verdict, classify_readonlyness};
pub use table::{TypeEntry, TypeTable};
pub use types::{
    DefId, IndexKeyKind, IndexSignatureDescriptor, LiteralValue, OriginSource, PrimitiveKind,
    PropertyDescriptor, Signature, SignatureKind, TypeId, TypeList, TypeOrigin, TypeShape,
};
pub use unsafe_assignment::{
    AssignmentComparator, AssignmentState, AssignmentTarget, ComparisonVerdict, LeakKind,
    compare_assignment,
};
pub use visit::{VisitEntry, VisitState, VisitStats};
