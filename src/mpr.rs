//! Reading maximum-parsimony reconciliations out of a graph.

use rand::Rng;
use std::collections::HashMap;

use crate::costs::Cost;
use crate::costs::CostWeights;
use crate::graph::ReconciliationGraph;
use crate::node::Node;
use crate::node::NodeKind;

/// Picks one alternative at a CHOOSE node.
pub trait TieBreak {
    /// Index into `alternatives`, which is never empty.
    fn choose(&mut self, alternatives: &[Node]) -> usize;
}

/// Always takes the first alternative.
#[derive(Debug, Default, Copy, Clone)]
pub struct FirstAlternative;

impl TieBreak for FirstAlternative {
    fn choose(&mut self, _alternatives: &[Node]) -> usize {
        0
    }
}

/// Takes an alternative uniformly at random.
#[derive(Debug, Clone)]
pub struct UniformRandom<R> {
    rng: R,
}

impl<R: Rng> UniformRandom<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> TieBreak for UniformRandom<R> {
    fn choose(&mut self, alternatives: &[Node]) -> usize {
        self.rng.gen_range(0..alternatives.len())
    }
}

/// What a scenario does at one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScenarioStep {
    /// The alternative taken at a CHOOSE node.
    Chosen(Node),
    /// The joint children of an ALL node.
    All(Vec<Node>),
    Leaf,
}

/// One optimal reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scenario {
    steps: HashMap<Node, ScenarioStep>,
}

impl Scenario {
    pub fn get(&self, node: &Node) -> Option<&ScenarioStep> {
        self.steps.get(node)
    }

    pub fn contains(&self, node: &Node) -> bool {
        self.steps.contains_key(node)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Node, &ScenarioStep)> + '_ {
        self.steps.iter()
    }

    /// The evolutionary events of the scenario, sorted.
    pub fn events(&self) -> Vec<Node> {
        let mut events: Vec<Node> = self
            .steps
            .keys()
            .filter(|node| node.is_event())
            .copied()
            .collect();
        events.sort_unstable();
        events
    }

    /// Score the scenario from scratch.
    pub fn cost(&self, weights: &CostWeights) -> Cost {
        self.steps.keys().map(|node| node.event_cost(weights)).sum()
    }
}

/// Walk one scenario down from `Node::Root`.
///
/// An empty graph gives an empty scenario.
///
/// # Panics
///
/// If a CHOOSE node reached from the root has no alternatives.
pub fn find_one_scenario<T: TieBreak>(graph: &ReconciliationGraph, tie_break: &mut T) -> Scenario {
    let mut scenario = Scenario::default();
    if !graph.contains(&Node::Root) {
        return scenario;
    }
    let mut stack = vec![Node::Root];
    while let Some(node) = stack.pop() {
        if scenario.contains(&node) {
            continue;
        }
        let children = graph.children(&node);
        let step = match node.kind() {
            NodeKind::Choose => {
                assert!(!children.is_empty(), "{node:?} has no alternatives");
                let chosen = children[tie_break.choose(children)];
                stack.push(chosen);
                ScenarioStep::Chosen(chosen)
            }
            NodeKind::All => {
                stack.extend(children.iter().rev().copied());
                ScenarioStep::All(children.to_vec())
            }
            NodeKind::Terminal => ScenarioStep::Leaf,
        };
        scenario.steps.insert(node, step);
    }
    scenario
}

/// The number of scenarios below every node reachable from the root.
///
/// CHOOSE nodes sum their children, ALL nodes multiply them and
/// terminal nodes count one. Counts saturate at `u128::MAX`.
pub fn count_scenarios(graph: &ReconciliationGraph) -> HashMap<Node, u128> {
    let mut counts: HashMap<Node, u128> = HashMap::new();
    if !graph.contains(&Node::Root) {
        return counts;
    }
    let mut stack = vec![(Node::Root, false)];
    while let Some((node, expanded)) = stack.pop() {
        if counts.contains_key(&node) {
            continue;
        }
        let children = graph.children(&node);
        let kind = node.kind();
        if !expanded && !matches!(kind, NodeKind::Terminal) {
            stack.push((node, true));
            stack.extend(
                children
                    .iter()
                    .filter(|c| !counts.contains_key(c))
                    .map(|&c| (c, false)),
            );
            continue;
        }
        let count = match kind {
            NodeKind::Terminal => 1,
            NodeKind::Choose => children
                .iter()
                .fold(0_u128, |acc, c| acc.saturating_add(counts[c])),
            NodeKind::All => children
                .iter()
                .fold(1_u128, |acc, c| acc.saturating_mul(counts[c])),
        };
        counts.insert(node, count);
    }
    counts
}
