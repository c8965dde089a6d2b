//! Depth-first traversal over a node tree.

use super::{ArrayNode, CommentedNode, ListNode, MapNode, Node};

/// Outcome of a single visitor callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitResult {
    /// Keep walking.
    Continue,
    /// Stop iterating the elements or entries of the current list or map.
    Break,
    /// Skip the current element or entry (or, from `start_*`, the container).
    Skip,
    /// Stop the whole walk.
    Stop,
}

/// Callbacks invoked by [`Node::accept`]. Every method defaults to
/// [`VisitResult::Continue`].
pub trait NodeVisitor {
    /// Scalars, enum constants and null.
    fn visit_value(&mut self, _node: &Node) -> VisitResult {
        VisitResult::Continue
    }

    fn visit_array(&mut self, _array: &ArrayNode) -> VisitResult {
        VisitResult::Continue
    }

    /// Called before the wrapped node is visited.
    fn visit_commented(&mut self, _node: &CommentedNode) -> VisitResult {
        VisitResult::Continue
    }

    fn start_list(&mut self, _list: &ListNode) -> VisitResult {
        VisitResult::Continue
    }

    fn visit_element(&mut self, _index: usize, _node: &Node) -> VisitResult {
        VisitResult::Continue
    }

    fn end_list(&mut self, _list: &ListNode) -> VisitResult {
        VisitResult::Continue
    }

    fn start_map(&mut self, _map: &MapNode) -> VisitResult {
        VisitResult::Continue
    }

    fn visit_entry(&mut self, _index: usize, _key: &str, _node: &Node) -> VisitResult {
        VisitResult::Continue
    }

    fn end_map(&mut self, _map: &MapNode) -> VisitResult {
        VisitResult::Continue
    }
}

impl Node {
    /// Walk this node depth-first.
    pub fn accept<V: NodeVisitor + ?Sized>(&self, visitor: &mut V) -> VisitResult {
        match self {
            Node::List(list) => list.accept(visitor),
            Node::Map(map) => map.accept(visitor),
            Node::Array(array) => visitor.visit_array(array),
            Node::Commented(commented) => match visitor.visit_commented(commented) {
                VisitResult::Continue => commented.node().accept(visitor),
                result => result,
            },
            scalar => visitor.visit_value(scalar),
        }
    }
}

impl ListNode {
    pub fn accept<V: NodeVisitor + ?Sized>(&self, visitor: &mut V) -> VisitResult {
        match visitor.start_list(self) {
            VisitResult::Skip => return VisitResult::Skip,
            VisitResult::Stop => return VisitResult::Stop,
            _ => {}
        }

        for (index, element) in self.iter().enumerate() {
            let result = match visitor.visit_element(index, element) {
                VisitResult::Continue => element.accept(visitor),
                result => result,
            };
            match result {
                VisitResult::Break => break,
                VisitResult::Stop => return VisitResult::Stop,
                _ => {}
            }
        }

        visitor.end_list(self)
    }
}

impl MapNode {
    pub fn accept<V: NodeVisitor + ?Sized>(&self, visitor: &mut V) -> VisitResult {
        match visitor.start_map(self) {
            VisitResult::Skip => return VisitResult::Skip,
            VisitResult::Stop => return VisitResult::Stop,
            _ => {}
        }

        for (index, (key, value)) in self.iter().enumerate() {
            let result = match visitor.visit_entry(index, key, value) {
                VisitResult::Continue => value.accept(visitor),
                result => result,
            };
            match result {
                VisitResult::Break => break,
                VisitResult::Stop => return VisitResult::Stop,
                _ => {}
            }
        }

        visitor.end_map(self)
    }
}
