//! Deciding where parasite lineages acquire a host placement and a
//! location.
//!
//! A lineage is either `Origin`, placed and located at cost
//! `C_star + S_star + O`, or `Null`, still unassigned, in which case each
//! of its children independently stays `Null` or originates.

use crate::costs::best_of;
use crate::costs::Candidates;
use crate::costs::Cost;
use crate::costs::CostWeights;
use crate::costs::INFINITY;
use crate::graph::ReconciliationGraph;
use crate::node::Lineage;
use crate::node::Node;
use crate::tree::EdgeMap;
use crate::EdgeId;
use crate::Tree;

fn lineage_node(edge: EdgeId, lineage: Lineage) -> Node {
    match lineage {
        Lineage::Null => Node::Null(edge),
        Lineage::Origin => Node::Origin(edge),
    }
}

/// Combine the per-edge optima of both layers, registering the
/// `Origin`, `Null`, `NullSplit` and `Root` nodes.
///
/// Returns the optimal cost of the whole reconciliation.
pub(crate) fn combine_layers(
    parasite: &Tree,
    best_placement: &EdgeMap<Cost>,
    best_location: &EdgeMap<Cost>,
    weights: &CostWeights,
    graph: &mut ReconciliationGraph,
) -> Cost {
    let mut origin: EdgeMap<Cost> = EdgeMap::default();
    let mut null: EdgeMap<Cost> = EdgeMap::default();

    for p in parasite.postorder() {
        let origin_cost = best_placement[&p] + best_location[&p] + weights.origin;
        graph.insert(
            Node::Origin(p),
            vec![Node::SpeciesList(p), Node::LocationList(p)],
        );
        origin.insert(p, origin_cost);

        let null_cost = match parasite.children(p) {
            None => INFINITY,
            Some((p1, p2)) => {
                let cost_of = |edge: EdgeId, lineage: Lineage| match lineage {
                    Lineage::Null => null[&edge],
                    Lineage::Origin => origin[&edge],
                };
                let splits = best_of(
                    [
                        (Lineage::Null, Lineage::Null),
                        (Lineage::Null, Lineage::Origin),
                        (Lineage::Origin, Lineage::Null),
                        (Lineage::Origin, Lineage::Origin),
                    ]
                    .map(|(left, right)| {
                        Candidates::single(
                            cost_of(p1, left) + cost_of(p2, right),
                            Node::NullSplit {
                                parasite: p,
                                left,
                                right,
                            },
                        )
                    }),
                );
                for &split in &splits.alternatives {
                    if let Node::NullSplit { left, right, .. } = split {
                        graph.insert(split, vec![lineage_node(p1, left), lineage_node(p2, right)]);
                    }
                }
                graph.insert(Node::Null(p), splits.alternatives);
                splits.cost
            }
        };
        null.insert(p, null_cost);
    }

    let root = parasite.root();
    let best = best_of([
        Candidates::single(null[&root], Node::Null(root)),
        Candidates::single(origin[&root], Node::Origin(root)),
    ]);
    graph.insert(Node::Root, best.alternatives);
    best.cost
}
