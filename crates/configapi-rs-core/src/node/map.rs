//! Ordered string-keyed map node.

use super::{ListNode, Node};
use crate::comment::Comment;
use crate::serialization::NodeEnum;
use indexmap::IndexMap;
use indexmap::map::Entry;
use std::hash::{Hash, Hasher};

/// Ordered mapping from key to child node.
///
/// Keys keep their insertion position; replacing the value of an existing
/// key does not move it.
#[derive(Debug, Clone, Default)]
pub struct MapNode {
    entries: IndexMap<String, Node>,
    comment: Option<Comment>,
}

impl MapNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value at `key`, or [`Node::Null`] when absent.
    pub fn get(&self, key: &str) -> &Node {
        static NULL: Node = Node::Null;
        self.entries.get(key).unwrap_or(&NULL)
    }

    pub fn get_node(&self, key: &str) -> Option<&Node> {
        self.entries.get(key)
    }

    pub fn get_node_mut(&mut self, key: &str) -> Option<&mut Node> {
        self.entries.get_mut(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Set `key` to `value`, returning the previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Node>) -> Option<Node> {
        self.entries.insert(key.into(), value.into())
    }

    /// Set `key` only if it has no value yet. Returns the value now stored.
    pub fn set_if_absent(&mut self, key: impl Into<String>, value: impl Into<Node>) -> &Node {
        self.entries.entry(key.into()).or_insert_with(|| value.into())
    }

    /// Remove `key`, keeping the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Node> {
        self.entries.shift_remove(key)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Node)> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&String, &mut Node)> {
        self.entries.iter_mut()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &Node> {
        self.entries.values()
    }

    /// Deep copy, comment included.
    pub fn copy(&self) -> MapNode {
        self.clone()
    }

    pub fn comment(&self) -> Option<&Comment> {
        self.comment.as_ref()
    }

    pub fn set_comment(&mut self, comment: Option<Comment>) {
        self.comment = comment;
    }

    pub fn with_comment(mut self, comment: Comment) -> Self {
        self.comment = Some(comment);
        self
    }

    /// List at `key`, if the value is a list.
    pub fn get_list(&self, key: &str) -> Option<&ListNode> {
        self.get(key).as_list()
    }

    /// Replace the value at `key` with a new empty list.
    pub fn create_list(&mut self, key: impl Into<String>) -> &mut ListNode {
        let slot = self.slot(key.into());
        *slot = Node::List(ListNode::new());
        slot.ensure_list()
    }

    /// List at `key`, creating it when the key is absent or holds another kind.
    pub fn get_or_create_list(&mut self, key: impl Into<String>) -> &mut ListNode {
        self.slot(key.into()).ensure_list()
    }

    /// Map at `key`, if the value is a map.
    pub fn get_map(&self, key: &str) -> Option<&MapNode> {
        self.get(key).as_map()
    }

    /// Replace the value at `key` with a new empty map.
    pub fn create_map(&mut self, key: impl Into<String>) -> &mut MapNode {
        let slot = self.slot(key.into());
        *slot = Node::Map(MapNode::new());
        slot.ensure_map()
    }

    /// Map at `key`, creating it when the key is absent or holds another kind.
    pub fn get_or_create_map(&mut self, key: impl Into<String>) -> &mut MapNode {
        self.slot(key.into()).ensure_map()
    }

    /// String form of the value at `key`, or `default` when the value is
    /// missing or not a string-representable scalar.
    pub fn get_string(&self, key: &str, default: &str) -> String {
        self.get_string_or_none(key)
            .unwrap_or_else(|| default.to_string())
    }

    pub fn get_string_or_none(&self, key: &str) -> Option<String> {
        self.get(key).as_scalar_string()
    }

    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.get(key).as_bool().unwrap_or(default)
    }

    pub fn get_i8(&self, key: &str, default: i8) -> i8 {
        self.get(key).as_i8().unwrap_or(default)
    }

    pub fn get_i16(&self, key: &str, default: i16) -> i16 {
        self.get(key).as_i16().unwrap_or(default)
    }

    pub fn get_i32(&self, key: &str, default: i32) -> i32 {
        self.get(key).as_i32().unwrap_or(default)
    }

    pub fn get_i64(&self, key: &str, default: i64) -> i64 {
        self.get(key).as_i64().unwrap_or(default)
    }

    pub fn get_f32(&self, key: &str, default: f32) -> f32 {
        self.get(key).as_f32().unwrap_or(default)
    }

    pub fn get_f64(&self, key: &str, default: f64) -> f64 {
        self.get(key).as_f64().unwrap_or(default)
    }

    pub fn get_char(&self, key: &str, default: char) -> char {
        self.get(key).as_char().unwrap_or(default)
    }

    /// Enum constant at `key`. Accepts an enum node of the same type or a
    /// string naming a variant (exact match first, then case-insensitive).
    pub fn get_enum<E: NodeEnum>(&self, key: &str, default: E) -> E {
        E::from_enum_node(self.get(key)).unwrap_or(default)
    }

    fn slot(&mut self, key: String) -> &mut Node {
        match self.entries.entry(key) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(Node::Null),
        }
    }
}

impl PartialEq for MapNode {
    fn eq(&self, other: &Self) -> bool {
        self.comment == other.comment
            && self.entries.len() == other.entries.len()
            && self.entries.iter().eq(other.entries.iter())
    }
}

impl Eq for MapNode {}

impl Hash for MapNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.entries.len().hash(state);
        for (key, value) in &self.entries {
            key.hash(state);
            value.hash(state);
        }
        self.comment.hash(state);
    }
}

impl<K: Into<String>, V: Into<Node>> FromIterator<(K, V)> for MapNode {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
            comment: None,
        }
    }
}

impl IntoIterator for MapNode {
    type Item = (String, Node);
    type IntoIter = indexmap::map::IntoIter<String, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a MapNode {
    type Item = (&'a String, &'a Node);
    type IntoIter = indexmap::map::Iter<'a, String, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
