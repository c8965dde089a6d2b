//! Ordered list node.

use super::{MapNode, Node};
use crate::comment::Comment;

/// Ordered sequence of child nodes with an optional comment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ListNode {
    elements: Vec<Node>,
    comment: Option<Comment>,
}

impl ListNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, value: impl Into<Node>) {
        self.elements.push(value.into());
    }

    pub fn add_all<I, T>(&mut self, values: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<Node>,
    {
        self.elements.extend(values.into_iter().map(Into::into));
    }

    /// Append a new empty map and return it.
    pub fn add_map(&mut self) -> &mut MapNode {
        let index = self.elements.len();
        self.elements.push(Node::Map(MapNode::new()));
        self.elements[index].ensure_map()
    }

    /// Append a new empty list and return it.
    pub fn add_list(&mut self) -> &mut ListNode {
        let index = self.elements.len();
        self.elements.push(Node::List(ListNode::new()));
        self.elements[index].ensure_list()
    }

    pub fn get(&self, index: usize) -> Option<&Node> {
        self.elements.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Node> {
        self.elements.get_mut(index)
    }

    pub fn remove(&mut self, index: usize) -> Option<Node> {
        (index < self.elements.len()).then(|| self.elements.remove(index))
    }

    pub fn clear(&mut self) {
        self.elements.clear();
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.elements.iter()
    }

    pub fn as_slice(&self) -> &[Node] {
        &self.elements
    }

    pub fn copy(&self) -> ListNode {
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
}

impl From<Vec<Node>> for ListNode {
    fn from(elements: Vec<Node>) -> Self {
        Self {
            elements,
            comment: None,
        }
    }
}

impl<T: Into<Node>> FromIterator<T> for ListNode {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from(iter.into_iter().map(Into::into).collect::<Vec<_>>())
    }
}

impl IntoIterator for ListNode {
    type Item = Node;
    type IntoIter = std::vec::IntoIter<Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}

impl<'a> IntoIterator for &'a ListNode {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}
