//! Leaf scalar model for the configuration tree.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::tree::ConfigTree;

/// Scalar value stored at a terminal position in a [`ConfigTree`].
///
/// Integers carry a `wide` marker instead of being a distinct wrapper
/// kind: the flag only changes the rendered literal (`17L` vs `17`) so
/// the downstream native consumer picks the 64-bit representation.
/// Comparison ignores it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Scalar {
    /// Quoted string literal.
    Str(String),
    /// `true` / `false` literal.
    Bool(bool),
    /// Integer literal, optionally rendered with the wide `L` suffix.
    Int {
        /// The integer value.
        value: i64,
        /// Render with the trailing width marker.
        wide: bool,
    },
    /// Floating point literal; always rendered with a decimal point.
    Float(f64),
}

impl Scalar {
    /// Plain integer scalar.
    pub fn int(value: i64) -> Self {
        Scalar::Int { value, wide: false }
    }

    /// Integer scalar rendered with the wide literal suffix.
    pub fn wide_int(value: i64) -> Self {
        Scalar::Int { value, wide: true }
    }

    /// Returns the integer value for either integer form.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Scalar::Int { value, .. } => Some(*value),
            _ => None,
        }
    }

    /// Returns the float value for float scalars.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Scalar::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the string slice for string scalars.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(value) => Some(value),
            _ => None,
        }
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Scalar::Str(a), Scalar::Str(b)) => a == b,
            (Scalar::Bool(a), Scalar::Bool(b)) => a == b,
            // Width is a rendering concern only.
            (Scalar::Int { value: a, .. }, Scalar::Int { value: b, .. }) => a == b,
            (Scalar::Float(a), Scalar::Float(b)) => a == b,
            _ => false,
        }
    }
}

impl Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Str(value) => write!(f, "\"{value}\""),
            Scalar::Bool(value) => write!(f, "{value}"),
            Scalar::Int { value, wide: true } => write!(f, "{value}L"),
            Scalar::Int { value, wide: false } => write!(f, "{value}"),
            Scalar::Float(value) => write!(f, "{}", float_literal(*value)),
        }
    }
}

/// Renders a float so the literal always carries a decimal point and the
/// scalar kind survives a round trip through the grammar.
fn float_literal(value: f64) -> String {
    let repr = format!("{value}");
    if repr.contains('.') {
        repr
    } else {
        format!("{repr}.0")
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::int(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Float(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Str(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Str(value)
    }
}

/// A position in a [`ConfigTree`]: either a nested node or a leaf scalar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Entry {
    /// Nested configuration scope.
    Node(ConfigTree),
    /// Terminal scalar value.
    Leaf(Scalar),
}

impl Entry {
    /// Returns the scalar when this entry is a leaf.
    pub fn as_leaf(&self) -> Option<&Scalar> {
        match self {
            Entry::Leaf(scalar) => Some(scalar),
            Entry::Node(_) => None,
        }
    }

    /// Returns the nested tree when this entry is a node.
    pub fn as_node(&self) -> Option<&ConfigTree> {
        match self {
            Entry::Node(node) => Some(node),
            Entry::Leaf(_) => None,
        }
    }
}
