use std::collections::HashMap;
use std::collections::HashSet;

use crate::node::Node;
use crate::node::NodeKind;

/// The DAG of every optimal reconciliation.
///
/// Maps each ALL/CHOOSE node to its children. Terminal nodes
/// have no entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciliationGraph {
    entries: HashMap<Node, Vec<Node>>,
}

impl ReconciliationGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the children of `node`, replacing any earlier entry.
    pub fn insert(&mut self, node: Node, children: Vec<Node>) {
        debug_assert!(!matches!(node.kind(), NodeKind::Terminal));
        self.entries.insert(node, children);
    }

    pub fn get(&self, node: &Node) -> Option<&[Node]> {
        self.entries.get(node).map(|c| c.as_slice())
    }

    /// Children of `node`; empty for terminal or unknown nodes.
    pub fn children(&self, node: &Node) -> &[Node] {
        self.get(node).unwrap_or(&[])
    }

    pub fn contains(&self, node: &Node) -> bool {
        self.entries.contains_key(node)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Node, &[Node])> + '_ {
        self.entries.iter().map(|(n, c)| (n, c.as_slice()))
    }

    /// The nodes with an entry, sorted.
    pub fn nodes(&self) -> Vec<Node> {
        let mut nodes: Vec<Node> = self.entries.keys().copied().collect();
        nodes.sort_unstable();
        nodes
    }

    /// Keep only the entries reachable from `root`.
    ///
    /// # Complexity
    ///
    /// `O(E)` where `E` is the number of reachable parent/child links.
    pub fn prune(&self, root: Node) -> Self {
        let mut pruned = Self::new();
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            if matches!(node.kind(), NodeKind::Terminal) || pruned.contains(&node) {
                continue;
            }
            if let Some(children) = self.entries.get(&node) {
                stack.extend(children.iter().copied());
                pruned.entries.insert(node, children.clone());
            }
        }
        pruned
    }

    /// Every node reachable from `root`, terminals included, ordered
    /// so that each node comes after all of its parents.
    pub fn topological_order(&self, root: Node) -> Vec<Node> {
        let mut in_degree: HashMap<Node, usize> = HashMap::new();
        let mut seen: HashSet<Node> = HashSet::new();
        let mut stack = vec![root];
        seen.insert(root);
        while let Some(node) = stack.pop() {
            for child in self.children(&node) {
                *in_degree.entry(*child).or_insert(0) += 1;
                if seen.insert(*child) {
                    stack.push(*child);
                }
            }
        }

        let mut order = Vec::with_capacity(seen.len());
        let mut ready = vec![root];
        while let Some(node) = ready.pop() {
            order.push(node);
            for child in self.children(&node) {
                let d = in_degree
                    .get_mut(child)
                    .expect("child was counted during the sweep");
                *d -= 1;
                if *d == 0 {
                    ready.push(*child);
                }
            }
        }
        debug_assert_eq!(order.len(), seen.len(), "graph has a cycle");
        order
    }
}

impl FromIterator<(Node, Vec<Node>)> for ReconciliationGraph {
    fn from_iter<I: IntoIterator<Item = (Node, Vec<Node>)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
