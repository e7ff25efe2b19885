//! Mapping parasite edges onto host edges under the
//! duplication-transfer-loss cost model.
//!
//! For every pair `(p, h)`, taken in parasite postorder and host
//! postorder, this module fills:
//!
//! * `C(p, h)`: the cheapest way to map `p` onto `h`, stored in the
//!   graph as the alternatives of `SpeciesMapping(p, h)`.
//! * `O(p, h)`: the cheapest `C(p, h')` over `h' ` at or below `h`,
//!   together with the attaining edges.
//! * `best_switch(p, h)`: the cheapest `C(p, h')` over edges `h'`
//!   unrelated to `h`. It is filled by a preorder sweep once the
//!   whole `O(p, .)` row is known.

use crate::costs::best_of;
use crate::costs::Candidates;
use crate::costs::Cost;
use crate::costs::CostWeights;
use crate::costs::INFINITY;
use crate::graph::ReconciliationGraph;
use crate::node::Node;
use crate::node::NodeKind;
use crate::table::PairTable;
use crate::tree::EdgeMap;
use crate::EdgeId;
use crate::TipMap;
use crate::Tree;

#[inline]
fn at(table: &PairTable<Cost>, p: EdgeId, h: EdgeId) -> Cost {
    *table.get(p.as_index(), h.as_index())
}

fn mapping(parasite: EdgeId, host: EdgeId) -> Node {
    Node::SpeciesMapping { parasite, host }
}

// The sub-mappings every event node requires.
// `split` is the pair of children of the event's parasite edge.
fn event_children(event: Node, split: Option<(EdgeId, EdgeId)>) -> Vec<Node> {
    match (event, split) {
        (
            Node::Cospeciation {
                left_host,
                right_host,
                ..
            },
            Some((p1, p2)),
        ) => vec![mapping(p1, left_host), mapping(p2, right_host)],
        (Node::Duplication { host, .. }, Some((p1, p2))) => {
            vec![mapping(p1, host), mapping(p2, host)]
        }
        (
            Node::Transfer {
                host,
                moving,
                target,
                ..
            },
            Some((p1, p2)),
        ) => {
            let stay = if moving == p1 { p2 } else { p1 };
            vec![mapping(stay, host), mapping(moving, target)]
        }
        (
            Node::Loss {
                parasite, survivor, ..
            },
            _,
        ) => vec![mapping(parasite, survivor)],
        _ => vec![],
    }
}

/// Fill the DTL tables, registering `SpeciesMapping`, event and
/// `SpeciesList` nodes in `graph`.
///
/// Returns `C_star(p)`, the best placement cost of every parasite edge.
pub(crate) fn reconcile_species(
    host: &Tree,
    parasite: &Tree,
    tip_map: &TipMap,
    weights: &CostWeights,
    graph: &mut ReconciliationGraph,
) -> EdgeMap<Cost> {
    let host_postorder = host.postorder();
    let host_preorder = host.preorder();
    let mut c = PairTable::new(parasite.len(), host.len(), INFINITY);
    let mut best_switch = PairTable::new(parasite.len(), host.len(), Candidates::infinite());
    let mut best_placement = EdgeMap::default();

    for p in parasite.postorder() {
        let split = parasite.children(p);
        // O(p, .) is only needed while p is the current row.
        let mut below: Vec<Candidates<EdgeId>> = vec![Candidates::infinite(); host.len()];

        for &h in &host_postorder {
            let ancestral = match host.children(h) {
                None => match (split, tip_map.get(&p)) {
                    (None, Some(&target)) if target == h => {
                        Candidates::single(0.0, Node::Contemporaneous { parasite: p, host: h })
                    }
                    _ => Candidates::infinite(),
                },
                Some((h1, h2)) => {
                    let cospeciation = match split {
                        Some((p1, p2)) => best_of([
                            Candidates::single(
                                at(&c, p1, h1) + at(&c, p2, h2),
                                Node::Cospeciation {
                                    parasite: p,
                                    host: h,
                                    left_host: h1,
                                    right_host: h2,
                                },
                            ),
                            Candidates::single(
                                at(&c, p1, h2) + at(&c, p2, h1),
                                Node::Cospeciation {
                                    parasite: p,
                                    host: h,
                                    left_host: h2,
                                    right_host: h1,
                                },
                            ),
                        ]),
                        None => Candidates::infinite(),
                    };
                    let loss = best_of([h1, h2].map(|survivor| {
                        Candidates::single(
                            at(&c, p, survivor),
                            Node::Loss {
                                parasite: p,
                                host: h,
                                survivor,
                            },
                        )
                    }))
                    .plus(weights.loss);
                    best_of([cospeciation, loss])
                }
            };

            let (duplication, transfer) = match split {
                Some((p1, p2)) => {
                    let duplication = Candidates::single(
                        weights.duplication + at(&c, p1, h) + at(&c, p2, h),
                        Node::Duplication { parasite: p, host: h },
                    );
                    let transfer = best_of([(p1, p2), (p2, p1)].map(|(stay, moving)| {
                        let switch = best_switch.get(moving.as_index(), h.as_index());
                        Candidates::new(
                            at(&c, stay, h) + switch.cost,
                            switch
                                .alternatives
                                .iter()
                                .map(|&target| Node::Transfer {
                                    parasite: p,
                                    host: h,
                                    moving,
                                    target,
                                })
                                .collect(),
                        )
                    }))
                    .plus(weights.transfer);
                    (duplication, transfer)
                }
                None => (Candidates::infinite(), Candidates::infinite()),
            };

            let optimal = best_of([ancestral, duplication, transfer]);
            c.set(p.as_index(), h.as_index(), optimal.cost);
            for &event in &optimal.alternatives {
                if !matches!(event.kind(), NodeKind::Terminal) {
                    graph.insert(event, event_children(event, split));
                }
            }
            graph.insert(mapping(p, h), optimal.alternatives);

            below[h.as_index()] = match host.children(h) {
                None => Candidates::single(at(&c, p, h), h),
                Some((h1, h2)) => best_of([
                    Candidates::single(at(&c, p, h), h),
                    below[h1.as_index()].clone(),
                    below[h2.as_index()].clone(),
                ]),
            };
        }

        // Going down into one child of h, the other child's
        // subtree becomes a valid transfer destination.
        best_switch.set(p.as_index(), host.root().as_index(), Candidates::infinite());
        for &h in &host_preorder {
            if let Some((h1, h2)) = host.children(h) {
                let above = best_switch.get(p.as_index(), h.as_index()).clone();
                best_switch.set(
                    p.as_index(),
                    h1.as_index(),
                    best_of([above.clone(), below[h2.as_index()].clone()]),
                );
                best_switch.set(
                    p.as_index(),
                    h2.as_index(),
                    best_of([above, below[h1.as_index()].clone()]),
                );
            }
        }

        let placement = best_of(
            host_postorder
                .iter()
                .map(|&h| Candidates::single(at(&c, p, h), h)),
        );
        log::trace!(
            "parasite edge {p:?}: best placement cost {} on {:?}",
            placement.cost,
            placement.alternatives
        );
        graph.insert(
            Node::SpeciesList(p),
            placement
                .alternatives
                .iter()
                .map(|&h| mapping(p, h))
                .collect(),
        );
        best_placement.insert(p, placement.cost);
    }

    best_placement
}
