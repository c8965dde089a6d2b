//! Typed configuration tree.

mod array;
mod list;
mod map;
mod serde_impl;
pub mod visitor;

pub use array::ArrayNode;
pub use list::ListNode;
pub use map::MapNode;

use crate::comment::Comment;
use std::hash::{Hash, Hasher};

/// A unit of the configuration tree.
#[derive(Debug, Clone, Default)]
pub enum Node {
    #[default]
    Null,
    Bool(bool),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Char(char),
    String(String),
    Enum(EnumValue),
    List(ListNode),
    Map(MapNode),
    Array(ArrayNode),
    Commented(CommentedNode),
}

/// A constant of a Rust enum, stored by type and variant name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnumValue {
    pub type_name: &'static str,
    pub name: &'static str,
}

impl EnumValue {
    pub fn new(type_name: &'static str, name: &'static str) -> Self {
        Self { type_name, name }
    }
}

/// A node paired with a comment.
///
/// Maps and lists carry their own comment slot, so this wrapper is only
/// needed for the other node kinds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommentedNode {
    node: Box<Node>,
    comment: Comment,
}

impl CommentedNode {
    pub fn new(node: Node, comment: Comment) -> Self {
        Self {
            node: Box::new(node),
            comment,
        }
    }

    pub fn node(&self) -> &Node {
        &self.node
    }

    pub fn comment(&self) -> &Comment {
        &self.comment
    }

    pub fn into_parts(self) -> (Node, Comment) {
        (*self.node, self.comment)
    }
}

impl Node {
    /// Short name of the node kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Byte(_) => "byte",
            Self::Short(_) => "short",
            Self::Int(_) => "int",
            Self::Long(_) => "long",
            Self::Float(_) => "float",
            Self::Double(_) => "double",
            Self::Char(_) => "char",
            Self::String(_) => "string",
            Self::Enum(_) => "enum",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::Array(_) => "array",
            Self::Commented(node) => node.node().kind(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self.unwrap_comment(), Self::Null)
    }

    /// Look through any comment wrappers.
    pub fn unwrap_comment(&self) -> &Node {
        match self {
            Self::Commented(commented) => commented.node().unwrap_comment(),
            node => node,
        }
    }

    /// Owned variant of [`Node::unwrap_comment`].
    pub fn into_uncommented(self) -> Node {
        match self {
            Self::Commented(commented) => commented.into_parts().0.into_uncommented(),
            node => node,
        }
    }

    /// Attach a comment. Maps and lists keep it in their own slot; other
    /// nodes are wrapped in a [`CommentedNode`]. `None` clears the comment.
    pub fn with_comment(self, comment: Option<Comment>) -> Node {
        match self {
            Self::Map(mut map) => {
                map.set_comment(comment);
                Self::Map(map)
            }
            Self::List(mut list) => {
                list.set_comment(comment);
                Self::List(list)
            }
            Self::Commented(commented) => commented.into_parts().0.with_comment(comment),
            node => match comment {
                Some(comment) => Self::Commented(CommentedNode::new(node, comment)),
                None => node,
            },
        }
    }

    pub fn comment(&self) -> Option<&Comment> {
        match self {
            Self::Map(map) => map.comment(),
            Self::List(list) => list.comment(),
            Self::Commented(commented) => Some(commented.comment()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.unwrap_comment() {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_i8(&self) -> Option<i8> {
        self.as_i64().map(|value| value as i8)
    }

    pub fn as_i16(&self) -> Option<i16> {
        self.as_i64().map(|value| value as i16)
    }

    pub fn as_i32(&self) -> Option<i32> {
        self.as_i64().map(|value| value as i32)
    }

    /// Any numeric node as `i64`; floats are truncated.
    pub fn as_i64(&self) -> Option<i64> {
        match self.unwrap_comment() {
            Self::Byte(value) => Some(i64::from(*value)),
            Self::Short(value) => Some(i64::from(*value)),
            Self::Int(value) => Some(i64::from(*value)),
            Self::Long(value) => Some(*value),
            Self::Float(value) => Some(*value as i64),
            Self::Double(value) => Some(*value as i64),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        self.as_f64().map(|value| value as f32)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self.unwrap_comment() {
            Self::Byte(value) => Some(f64::from(*value)),
            Self::Short(value) => Some(f64::from(*value)),
            Self::Int(value) => Some(f64::from(*value)),
            Self::Long(value) => Some(*value as f64),
            Self::Float(value) => Some(f64::from(*value)),
            Self::Double(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_char(&self) -> Option<char> {
        match self.unwrap_comment() {
            Self::Char(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self.unwrap_comment() {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    /// Text form of a string-representable scalar: strings, numbers,
    /// booleans, chars and enum names.
    pub fn as_scalar_string(&self) -> Option<String> {
        match self.unwrap_comment() {
            Self::Bool(value) => Some(value.to_string()),
            Self::Byte(value) => Some(value.to_string()),
            Self::Short(value) => Some(value.to_string()),
            Self::Int(value) => Some(value.to_string()),
            Self::Long(value) => Some(value.to_string()),
            Self::Float(value) => Some(value.to_string()),
            Self::Double(value) => Some(value.to_string()),
            Self::Char(value) => Some(value.to_string()),
            Self::String(value) => Some(value.clone()),
            Self::Enum(value) => Some(value.name.to_string()),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&MapNode> {
        match self.unwrap_comment() {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut MapNode> {
        match self {
            Self::Map(map) => Some(map),
            Self::Commented(commented) => commented.node.as_map_mut(),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&ListNode> {
        match self.unwrap_comment() {
            Self::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut ListNode> {
        match self {
            Self::List(list) => Some(list),
            Self::Commented(commented) => commented.node.as_list_mut(),
            _ => None,
        }
    }

    /// The list this node holds, replacing the node with an empty list when
    /// it holds anything else.
    pub(crate) fn ensure_list(&mut self) -> &mut ListNode {
        let keep = match self {
            Self::List(_) => true,
            Self::Commented(commented) => commented.node.as_list().is_some(),
            _ => false,
        };
        if !keep {
            *self = Self::List(ListNode::new());
        }
        match self {
            Self::List(list) => list,
            Self::Commented(commented) => commented.node.ensure_list(),
            _ => unreachable!(),
        }
    }

    /// Map counterpart of [`Node::ensure_list`].
    pub(crate) fn ensure_map(&mut self) -> &mut MapNode {
        let keep = match self {
            Self::Map(_) => true,
            Self::Commented(commented) => commented.node.as_map().is_some(),
            _ => false,
        };
        if !keep {
            *self = Self::Map(MapNode::new());
        }
        match self {
            Self::Map(map) => map,
            Self::Commented(commented) => commented.node.ensure_map(),
            _ => unreachable!(),
        }
    }

    pub fn as_array(&self) -> Option<&ArrayNode> {
        match self.unwrap_comment() {
            Self::Array(array) => Some(array),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<EnumValue> {
        match self.unwrap_comment() {
            Self::Enum(value) => Some(*value),
            _ => None,
        }
    }

    /// Deep copy. Nodes own their children, so this is a clone.
    pub fn copy(&self) -> Node {
        self.clone()
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Byte(a), Self::Byte(b)) => a == b,
            (Self::Short(a), Self::Short(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Long(a), Self::Long(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::Double(a), Self::Double(b)) => a.to_bits() == b.to_bits(),
            (Self::Char(a), Self::Char(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Enum(a), Self::Enum(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Commented(a), Self::Commented(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Self::Null => {}
            Self::Bool(value) => value.hash(state),
            Self::Byte(value) => value.hash(state),
            Self::Short(value) => value.hash(state),
            Self::Int(value) => value.hash(state),
            Self::Long(value) => value.hash(state),
            Self::Float(value) => value.to_bits().hash(state),
            Self::Double(value) => value.to_bits().hash(state),
            Self::Char(value) => value.hash(state),
            Self::String(value) => value.hash(state),
            Self::Enum(value) => value.hash(state),
            Self::List(list) => list.hash(state),
            Self::Map(map) => map.hash(state),
            Self::Array(array) => array.hash(state),
            Self::Commented(commented) => commented.hash(state),
        }
    }
}

macro_rules! node_from {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$ty> for Node {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )+
    };
}

node_from! {
    bool => Bool,
    i8 => Byte,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    char => Char,
    String => String,
    EnumValue => Enum,
    ListNode => List,
    MapNode => Map,
    ArrayNode => Array,
    CommentedNode => Commented,
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<Vec<Node>> for Node {
    fn from(values: Vec<Node>) -> Self {
        Self::List(ListNode::from(values))
    }
}

impl<T: Into<Node>> From<Option<T>> for Node {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comment::Comment;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    #[test]
    fn numeric_accessors_cast_between_widths() {
        let node = Node::Long(i64::from(i32::MAX) + 1);
        assert_eq!(node.as_i32(), Some(i32::MIN));
        assert_eq!(Node::Double(3.9).as_i32(), Some(3));
        assert_eq!(Node::Byte(-1).as_f64(), Some(-1.0));
        assert_eq!(Node::from("1").as_i32(), None);
        assert_eq!(Node::Bool(true).as_i64(), None);
    }

    #[test]
    fn with_comment_wraps_scalars_only() {
        let comment = Comment::simple("test");
        let scalar = Node::Int(1).with_comment(Some(comment.clone()));
        assert_eq!(
            scalar,
            Node::Commented(CommentedNode::new(Node::Int(1), comment.clone()))
        );
        assert_eq!(scalar.as_i32(), Some(1));

        let map = Node::Map(MapNode::new()).with_comment(Some(comment.clone()));
        assert!(matches!(&map, Node::Map(map) if map.comment() == Some(&comment)));

        let cleared = scalar.with_comment(None);
        assert_eq!(cleared, Node::Int(1));
    }

    #[test]
    fn float_equality_uses_bit_patterns() {
        assert_eq!(Node::Double(f64::NAN), Node::Double(f64::NAN));
        assert_ne!(Node::Double(0.0), Node::Double(-0.0));
        assert_ne!(Node::Int(1), Node::Long(1));

        let mut set = HashSet::new();
        set.insert(Node::Float(1.5));
        assert!(set.contains(&Node::Float(1.5)));
    }

    #[test]
    fn scalar_strings_cover_representable_kinds() {
        assert_eq!(Node::Bool(false).as_scalar_string().as_deref(), Some("false"));
        assert_eq!(Node::Char('x').as_scalar_string().as_deref(), Some("x"));
        assert_eq!(
            Node::Enum(EnumValue::new("Mode", "FAST"))
                .as_scalar_string()
                .as_deref(),
            Some("FAST")
        );
        assert_eq!(Node::Map(MapNode::new()).as_scalar_string(), None);
        assert_eq!(Node::Null.as_scalar_string(), None);
    }
}
