//! Frequency-weighted consensus of all optimal reconciliations.

use std::collections::HashMap;

use crate::flags::MedianOptions;
use crate::graph::ReconciliationGraph;
use crate::mpr::count_scenarios;
use crate::node::Node;
use crate::node::NodeKind;

/// A reconciliation graph with the fraction of optimal scenarios
/// passing through each of its nodes.
#[derive(Debug, Clone, Default)]
pub struct MedianGraph {
    graph: ReconciliationGraph,
    frequencies: HashMap<Node, f64>,
}

impl MedianGraph {
    pub fn graph(&self) -> &ReconciliationGraph {
        &self.graph
    }

    /// Zero for nodes outside the graph.
    pub fn frequency(&self, node: &Node) -> f64 {
        self.frequencies.get(node).copied().unwrap_or(0.0)
    }

    pub fn node_frequencies(&self) -> &HashMap<Node, f64> {
        &self.frequencies
    }

    /// Event nodes with their frequencies, sorted by node.
    pub fn event_frequencies(&self) -> Vec<(Node, f64)> {
        let mut events: Vec<(Node, f64)> = self
            .frequencies
            .iter()
            .filter(|(node, _)| node.is_event())
            .map(|(&node, &f)| (node, f))
            .collect();
        events.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        events
    }

    /// Events present in more than half of the optimal scenarios.
    pub fn median_events(&self) -> Vec<Node> {
        self.event_frequencies()
            .into_iter()
            .filter(|&(_, f)| f > 0.5)
            .map(|(node, _)| node)
            .collect()
    }
}

/// Score every node reachable from `Node::Root`.
///
/// Scores flow from parents to children in topological order.
/// An ALL node passes its whole score to each child. A CHOOSE node
/// splits it among its children, evenly or, with
/// [`MedianOptions::with_count_weighting`], by scenario count.
/// Scores are then normalised so that the root has frequency one.
pub fn build_median_graph(graph: &ReconciliationGraph, options: MedianOptions) -> MedianGraph {
    let mut frequencies: HashMap<Node, f64> = HashMap::new();
    if !graph.contains(&Node::Root) {
        return MedianGraph::default();
    }
    let counts = if options.count_weighting() {
        count_scenarios(graph)
    } else {
        HashMap::new()
    };
    let root_score = if options.count_weighting() {
        counts[&Node::Root] as f64
    } else {
        1.0
    };

    frequencies.insert(Node::Root, root_score);
    for node in graph.topological_order(Node::Root) {
        let score = frequencies.get(&node).copied().unwrap_or(0.0);
        let children = graph.children(&node);
        match node.kind() {
            NodeKind::All => {
                for child in children {
                    *frequencies.entry(*child).or_insert(0.0) += score;
                }
            }
            NodeKind::Choose => {
                for child in children {
                    let share = if options.count_weighting() {
                        counts[child] as f64 / counts[&node] as f64
                    } else {
                        1.0 / children.len() as f64
                    };
                    *frequencies.entry(*child).or_insert(0.0) += score * share;
                }
            }
            NodeKind::Terminal => (),
        }
    }

    for f in frequencies.values_mut() {
        *f /= root_score;
    }
    MedianGraph {
        graph: graph.clone(),
        frequencies,
    }
}
