//! Syntax boundary: the nodes the host parser hands to the rules.
//!
//! The host flattens each file into the nodes the type-aware rules care
//! about, in pre-order. Every node and sub-expression carries the `NodeId`
//! the type oracle is keyed by. Kinds the rules do not inspect deserialize
//! as [`NodeKind::Other`] and are skipped.

use serde::{Deserialize, Serialize};
use tsl_common::{NodeId, SourceRange};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceFile {
    pub file_name: String,
    /// Source text, used only to turn byte offsets into line/column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default)]
    pub nodes: Vec<SyntaxNode>,
}

impl SourceFile {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn push(&mut self, id: NodeId, range: SourceRange, kind: NodeKind) {
        self.nodes.push(SyntaxNode { id, range, kind });
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SyntaxNode {
    pub id: NodeId,
    pub range: SourceRange,
    #[serde(flatten)]
    pub kind: NodeKind,
}

/// Special expression forms some rules treat differently.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExprForm {
    #[default]
    Other,
    /// A `this` expression.
    This,
    /// `new Map()` with no arguments and no type arguments.
    BareMapConstruction,
}

/// An expression operand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expr {
    pub id: NodeId,
    pub range: SourceRange,
    #[serde(default)]
    pub form: ExprForm,
}

impl Expr {
    pub fn new(id: NodeId, range: SourceRange) -> Self {
        Self {
            id,
            range,
            form: ExprForm::Other,
        }
    }

    #[must_use]
    pub fn with_form(mut self, form: ExprForm) -> Self {
        self.form = form;
        self
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BindingPattern {
    #[default]
    Identifier,
    ArrayPattern,
    ObjectPattern,
    /// A member access such as `obj.prop` on the left of an assignment.
    Member,
}

/// The receiving side of an assignment: a declared name, pattern, class
/// field or assignment target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Binding {
    pub id: NodeId,
    pub range: SourceRange,
    #[serde(default)]
    pub pattern: BindingPattern,
    /// The binding's type is written out rather than inferred from its
    /// initializer. Assignment targets are always treated as annotated.
    #[serde(default)]
    pub has_annotation: bool,
}

impl Binding {
    pub fn annotated(id: NodeId, range: SourceRange) -> Self {
        Self {
            id,
            range,
            pattern: BindingPattern::Identifier,
            has_annotation: true,
        }
    }

    pub fn inferred(id: NodeId, range: SourceRange) -> Self {
        Self {
            has_annotation: false,
            ..Self::annotated(id, range)
        }
    }

    #[must_use]
    pub fn with_pattern(mut self, pattern: BindingPattern) -> Self {
        self.pattern = pattern;
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    pub id: NodeId,
    pub range: SourceRange,
    #[serde(default)]
    pub has_annotation: bool,
    /// A constructor parameter with an accessibility or `readonly`
    /// modifier, which also declares a class field.
    #[serde(default)]
    pub is_parameter_property: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    pub value: Expr,
    #[serde(default)]
    pub spread: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum NodeKind {
    /// Function declaration or expression, arrow, method, constructor,
    /// accessor, or a call/construct signature.
    Function { parameters: Vec<Parameter> },
    /// `let x = init`, `const [a, b] = init`
    VariableDeclarator {
        binding: Binding,
        #[serde(default)]
        init: Option<Expr>,
    },
    /// `target = value`
    Assignment { target: Binding, value: Expr },
    /// Class field with an initializer.
    PropertyDefinition {
        key: Binding,
        #[serde(default)]
        value: Option<Expr>,
    },
    /// `...argument` inside an array literal.
    ArraySpread { argument: Expr },
    /// Call or `new` expression.
    Call { arguments: Vec<Argument> },
    /// `return argument`
    Return { argument: Expr },
    /// Expression body of an arrow function.
    ArrowBody { body: Expr },
    #[serde(other)]
    Other,
}
