//! Quadtree nodes.

use crate::object::ObjectId;
use crate::rect::Rectangle;

/// Index of a node inside its tree's node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub(crate) const ROOT: NodeId = NodeId(0);

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// A member of a leaf: the object's id and the bounds it was inserted with.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Entry {
    pub(crate) id: ObjectId,
    pub(crate) bound: Rectangle,
}

/// A node of the quadtree.
///
/// A leaf holds members directly. An internal node has four children that
/// partition its bound (left-top, right-top, right-bottom, left-bottom) and
/// no members of its own.
#[derive(Debug, Clone)]
pub struct TreeNode {
    bound: Rectangle,
    depth: u32,
    parent: Option<NodeId>,
    pub(crate) children: Option<[NodeId; 4]>,
    pub(crate) entries: Vec<Entry>,
}

impl TreeNode {
    pub(crate) fn new(bound: Rectangle, depth: u32, parent: Option<NodeId>) -> Self {
        Self {
            bound,
            depth,
            parent,
            children: None,
            entries: Vec::new(),
        }
    }

    /// Turn a pooled slot back into a fresh empty leaf, keeping the
    /// membership allocation.
    pub(crate) fn reset(&mut self, bound: Rectangle, depth: u32, parent: Option<NodeId>) {
        self.bound = bound;
        self.depth = depth;
        self.parent = parent;
        self.children = None;
        self.entries.clear();
    }

    #[inline]
    pub fn bound(&self) -> Rectangle {
        self.bound
    }

    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Parent node, `None` for the root.
    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in left-top, right-top, right-bottom, left-bottom order.
    #[inline]
    pub fn children(&self) -> Option<[NodeId; 4]> {
        self.children
    }

    /// Number of members.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Member ids in insertion order.
    pub fn members(&self) -> impl ExactSizeIterator<Item = ObjectId> + '_ {
        self.entries.iter().map(|e| e.id)
    }

    #[inline]
    pub fn contains(&self, id: ObjectId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// Append a member unless one with the same id is already present.
    pub fn add(&mut self, id: ObjectId, bound: Rectangle) -> bool {
        if self.contains(id) {
            return false;
        }
        self.entries.push(Entry { id, bound });
        true
    }

    /// Remove a member by id, keeping the order of the rest.
    pub fn remove(&mut self, id: ObjectId) -> bool {
        match self.entries.iter().position(|e| e.id == id) {
            Some(pos) => {
                self.entries.remove(pos);
                true
            }
            None => false,
        }
    }
}
