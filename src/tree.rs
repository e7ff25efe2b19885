use nohash::BuildNoHashHasher;
use std::collections::HashMap;

use crate::error::ReconciliationError;
use crate::error::Result;

/// Identifies one edge (branch) of a [`Tree`].
///
/// The value is the edge's index in the tree's arena.
#[repr(transparent)]
#[derive(Debug, Default, Copy, Clone, Hash, Eq, PartialEq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeId(usize);

impl EdgeId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn as_index(&self) -> usize {
        self.0
    }
}

impl nohash::IsEnabled for EdgeId {}

/// Maps keyed by edge use the identity hash.
pub type EdgeMap<T> = HashMap<EdgeId, T, BuildNoHashHasher<usize>>;

/// One branch of a rooted binary tree.
///
/// The child vertex is the lower end of the branch.
/// A tip edge has neither child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub parent_vertex: String,
    pub child_vertex: String,
    pub left: Option<EdgeId>,
    pub right: Option<EdgeId>,
}

impl Edge {
    pub fn tip<S: Into<String>>(label: S) -> Self {
        Self {
            parent_vertex: String::new(),
            child_vertex: label.into(),
            left: None,
            right: None,
        }
    }

    pub fn internal<S: Into<String>>(label: S, left: EdgeId, right: EdgeId) -> Self {
        Self {
            parent_vertex: String::new(),
            child_vertex: label.into(),
            left: Some(left),
            right: Some(right),
        }
    }

    pub fn is_tip(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

/// A rooted binary tree stored as an arena of edges.
///
/// Children are referred to by [`EdgeId`], never by owning links.
/// Trees built with [`Tree::add_tip`] and [`Tree::add_internal`]
/// are well formed by construction. Trees assembled by
/// [`Tree::from_edges`] are checked by [`Tree::validate`] before
/// any reconciliation touches them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    edges: Vec<Edge>,
    root: EdgeId,
}

// Constructors
impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble a tree from raw edges.
    ///
    /// No checks are done here; see [`Tree::validate`].
    pub fn from_edges(edges: Vec<Edge>, root: EdgeId) -> Self {
        Self { edges, root }
    }

    /// Add a tip edge.
    ///
    /// The most recently added edge becomes the root.
    pub fn add_tip<S: Into<String>>(&mut self, label: S) -> EdgeId {
        self.push(Edge::tip(label))
    }

    /// Add an internal edge above two existing, unattached edges.
    ///
    /// # Panics
    ///
    /// If either child does not exist, or if `left == right`.
    pub fn add_internal<S: Into<String>>(
        &mut self,
        label: S,
        left: EdgeId,
        right: EdgeId,
    ) -> EdgeId {
        assert!(left.0 < self.edges.len() && right.0 < self.edges.len());
        assert_ne!(left, right);
        let edge = Edge::internal(label, left, right);
        for child in [left, right] {
            self.edges[child.0].parent_vertex = edge.child_vertex.clone();
        }
        self.push(edge)
    }

    pub fn set_root(&mut self, root: EdgeId) {
        self.root = root;
    }

    fn push(&mut self, edge: Edge) -> EdgeId {
        self.edges.push(edge);
        self.root = EdgeId(self.edges.len() - 1);
        self.root
    }
}

// Queries
impl Tree {
    pub fn root(&self) -> EdgeId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    // NOTE: panics if edge is out of bounds
    pub fn edge(&self, edge: EdgeId) -> &Edge {
        &self.edges[edge.0]
    }

    pub fn contains(&self, edge: EdgeId) -> bool {
        edge.0 < self.edges.len()
    }

    pub fn label(&self, edge: EdgeId) -> &str {
        &self.edges[edge.0].child_vertex
    }

    pub fn is_tip(&self, edge: EdgeId) -> bool {
        self.edges[edge.0].is_tip()
    }

    /// The `(left, right)` children of an internal edge.
    pub fn children(&self, edge: EdgeId) -> Option<(EdgeId, EdgeId)> {
        let e = &self.edges[edge.0];
        match (e.left, e.right) {
            (Some(left), Some(right)) => Some((left, right)),
            _ => None,
        }
    }

    /// Edges ordered so that every edge comes before its children.
    pub fn preorder(&self) -> Vec<EdgeId> {
        self.subtree_preorder(self.root)
    }

    /// Edges ordered so that every edge comes after its children.
    pub fn postorder(&self) -> Vec<EdgeId> {
        let mut order = Vec::with_capacity(self.edges.len());
        if self.edges.is_empty() {
            return order;
        }
        let mut stack = vec![(self.root, false)];
        while let Some((edge, expanded)) = stack.pop() {
            match self.children(edge) {
                Some((left, right)) if !expanded => {
                    stack.push((edge, true));
                    stack.push((right, false));
                    stack.push((left, false));
                }
                _ => order.push(edge),
            }
        }
        order
    }

    pub fn tips(&self) -> Vec<EdgeId> {
        self.tips_below(self.root)
    }

    /// The tip edges of the subtree hanging from `edge`, `edge` included.
    pub fn tips_below(&self, edge: EdgeId) -> Vec<EdgeId> {
        self.subtree_preorder(edge)
            .into_iter()
            .filter(|&e| self.is_tip(e))
            .collect()
    }

    fn subtree_preorder(&self, top: EdgeId) -> Vec<EdgeId> {
        let mut order = vec![];
        if self.edges.is_empty() {
            return order;
        }
        let mut stack = vec![top];
        while let Some(edge) = stack.pop() {
            order.push(edge);
            if let Some((left, right)) = self.children(edge) {
                stack.push(right);
                stack.push(left);
            }
        }
        order
    }
}

// Validation
impl Tree {
    /// Check that the arena describes a single rooted binary tree.
    ///
    /// `tree` names the tree in the error ("host" or "parasite").
    pub fn validate(&self, tree: &'static str) -> Result<()> {
        if self.edges.is_empty() {
            return Err(ReconciliationError::malformed(tree, "tree has no edges"));
        }
        if !self.contains(self.root) {
            return Err(ReconciliationError::malformed(
                tree,
                format!("root {:?} is not an edge of the tree", self.root),
            ));
        }
        for (index, edge) in self.edges.iter().enumerate() {
            match (edge.left, edge.right) {
                (None, None) => (),
                (Some(left), Some(right)) => {
                    for child in [left, right] {
                        if !self.contains(child) {
                            let edge = EdgeId(index);
                            return Err(ReconciliationError::malformed(
                                tree,
                                format!("edge {edge:?} references missing child {child:?}"),
                            ));
                        }
                    }
                }
                _ => {
                    return Err(ReconciliationError::malformed(
                        tree,
                        format!("edge {:?} has exactly one child", EdgeId(index)),
                    ))
                }
            }
        }

        // Every edge must be reached exactly once from the root.
        // A second visit means a cycle or a shared child.
        let mut visited = vec![false; self.edges.len()];
        let mut stack = vec![self.root];
        while let Some(edge) = stack.pop() {
            if visited[edge.0] {
                return Err(ReconciliationError::malformed(
                    tree,
                    format!("edge {edge:?} is reachable along more than one path"),
                ));
            }
            visited[edge.0] = true;
            if let Some((left, right)) = self.children(edge) {
                stack.push(left);
                stack.push(right);
            }
        }
        if let Some(index) = visited.iter().position(|&v| !v) {
            return Err(ReconciliationError::malformed(
                tree,
                format!("edge {:?} is not reachable from the root", EdgeId(index)),
            ));
        }
        Ok(())
    }
}
