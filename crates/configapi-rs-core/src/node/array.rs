//! Primitive array nodes.

use super::Node;
use std::hash::{Hash, Hasher};

/// A homogeneous array of primitives.
///
/// Formats that cannot tell arrays from lists (YAML, JSON) write these as
/// ordinary sequences and read them back as [`super::ListNode`]s.
#[derive(Debug, Clone)]
pub enum ArrayNode {
    Bool(Vec<bool>),
    Byte(Vec<i8>),
    Char(Vec<char>),
    Short(Vec<i16>),
    Int(Vec<i32>),
    Long(Vec<i64>),
    Float(Vec<f32>),
    Double(Vec<f64>),
}

impl ArrayNode {
    pub fn len(&self) -> usize {
        match self {
            Self::Bool(values) => values.len(),
            Self::Byte(values) => values.len(),
            Self::Char(values) => values.len(),
            Self::Short(values) => values.len(),
            Self::Int(values) => values.len(),
            Self::Long(values) => values.len(),
            Self::Float(values) => values.len(),
            Self::Double(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element kind, matching [`Node::kind`] of each element.
    pub fn element_kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Byte(_) => "byte",
            Self::Char(_) => "char",
            Self::Short(_) => "short",
            Self::Int(_) => "int",
            Self::Long(_) => "long",
            Self::Float(_) => "float",
            Self::Double(_) => "double",
        }
    }

    /// Element at `index` as a scalar node.
    pub fn element(&self, index: usize) -> Option<Node> {
        match self {
            Self::Bool(values) => values.get(index).copied().map(Node::Bool),
            Self::Byte(values) => values.get(index).copied().map(Node::Byte),
            Self::Char(values) => values.get(index).copied().map(Node::Char),
            Self::Short(values) => values.get(index).copied().map(Node::Short),
            Self::Int(values) => values.get(index).copied().map(Node::Int),
            Self::Long(values) => values.get(index).copied().map(Node::Long),
            Self::Float(values) => values.get(index).copied().map(Node::Float),
            Self::Double(values) => values.get(index).copied().map(Node::Double),
        }
    }

    /// Every element as a scalar node.
    pub fn elements(&self) -> Vec<Node> {
        (0..self.len())
            .filter_map(|index| self.element(index))
            .collect()
    }
}

impl PartialEq for ArrayNode {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Byte(a), Self::Byte(b)) => a == b,
            (Self::Char(a), Self::Char(b)) => a == b,
            (Self::Short(a), Self::Short(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Long(a), Self::Long(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.to_bits() == y.to_bits())
            }
            (Self::Double(a), Self::Double(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.to_bits() == y.to_bits())
            }
            _ => false,
        }
    }
}

impl Eq for ArrayNode {}

impl Hash for ArrayNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Bool(values) => values.hash(state),
            Self::Byte(values) => values.hash(state),
            Self::Char(values) => values.hash(state),
            Self::Short(values) => values.hash(state),
            Self::Int(values) => values.hash(state),
            Self::Long(values) => values.hash(state),
            Self::Float(values) => values.iter().for_each(|v| v.to_bits().hash(state)),
            Self::Double(values) => values.iter().for_each(|v| v.to_bits().hash(state)),
        }
    }
}
