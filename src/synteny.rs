//! Keeping or rearranging syntenic locations along the parasite tree.
//!
//! `S(p, l)` is the cheapest way for the subtree below `p` to have `p`
//! sitting at location `l`. Each child either keeps `l` or rearranges
//! to one of its own optimal locations at cost `R`.

use std::collections::BTreeSet;
use std::collections::HashMap;

use crate::costs::best_of;
use crate::costs::Candidates;
use crate::costs::Cost;
use crate::costs::CostWeights;
use crate::costs::INFINITY;
use crate::flags::ReconciliationOptions;
use crate::graph::ReconciliationGraph;
use crate::node::Location;
use crate::node::LocationStep;
use crate::node::Node;
use crate::table::PairTable;
use crate::tree::EdgeMap;
use crate::EdgeId;
use crate::LocationMap;
use crate::Tree;

/// The distinct locations of the parasite tips, sorted.
pub(crate) fn tip_locations(parasite: &Tree, location_map: &LocationMap) -> Vec<Location> {
    let locations: BTreeSet<Location> = parasite
        .tips()
        .iter()
        .filter_map(|tip| location_map.get(tip).copied())
        .collect();
    locations.into_iter().collect()
}

/// For every parasite edge, the locations of the tips below it.
pub(crate) fn synteny_clades(
    parasite: &Tree,
    location_map: &LocationMap,
) -> EdgeMap<BTreeSet<Location>> {
    let mut clades: EdgeMap<BTreeSet<Location>> = EdgeMap::default();
    for p in parasite.postorder() {
        let clade = match parasite.children(p) {
            None => location_map.get(&p).copied().into_iter().collect(),
            Some((p1, p2)) => clades[&p1].union(&clades[&p2]).copied().collect(),
        };
        clades.insert(p, clade);
    }
    clades
}

fn step_node(child: EdgeId, location: Location, step: LocationStep) -> Node {
    match step {
        LocationStep::Keep => Node::SyntenyMapping {
            parasite: child,
            location,
        },
        LocationStep::Rearrange(to) => Node::Rearrangement {
            parasite: child,
            from: location,
            to,
        },
    }
}

struct SyntenyTables<'a> {
    weights: &'a CostWeights,
    columns: HashMap<Location, usize>,
    s: PairTable<Cost>,
    best: EdgeMap<Candidates<Location>>,
}

impl SyntenyTables<'_> {
    fn s(&self, p: EdgeId, location: Location) -> Cost {
        *self.s.get(p.as_index(), self.columns[&location])
    }

    // Optimal steps for `child` when its parent sits at `location`.
    fn steps(
        &self,
        child: EdgeId,
        location: Location,
        graph: &mut ReconciliationGraph,
    ) -> Candidates<LocationStep> {
        let keep = Candidates::single(
            self.s(child, location) + self.weights.location_delta(location, location),
            LocationStep::Keep,
        );
        let best = &self.best[&child];
        let rearrange = best_of(
            best.alternatives
                .iter()
                .filter(|&&to| to != location)
                .map(|&to| {
                    Candidates::single(
                        best.cost + self.weights.location_delta(location, to),
                        LocationStep::Rearrange(to),
                    )
                }),
        );
        let steps = best_of([keep, rearrange]);
        for &step in &steps.alternatives {
            if let LocationStep::Rearrange(to) = step {
                graph.insert(
                    step_node(child, location, step),
                    vec![Node::SyntenyMapping {
                        parasite: child,
                        location: to,
                    }],
                );
            }
        }
        steps
    }
}

/// Fill the synteny tables, registering `SyntenyMapping`,
/// `LocationAssignment`, `Rearrangement` and `LocationList`
/// nodes in `graph`.
///
/// Returns `S_star(p)`, the best location cost of every parasite edge.
pub(crate) fn reconcile_synteny(
    parasite: &Tree,
    location_map: &LocationMap,
    weights: &CostWeights,
    options: ReconciliationOptions,
    graph: &mut ReconciliationGraph,
) -> EdgeMap<Cost> {
    let locations = tip_locations(parasite, location_map);
    let clades = if options.clade_locations() {
        Some(synteny_clades(parasite, location_map))
    } else {
        None
    };
    let mut tables = SyntenyTables {
        weights,
        columns: locations
            .iter()
            .enumerate()
            .map(|(i, &l)| (l, i))
            .collect(),
        s: PairTable::new(parasite.len(), locations.len(), INFINITY),
        best: EdgeMap::default(),
    };

    for p in parasite.postorder() {
        let candidates: Vec<Location> = match &clades {
            Some(clades) => clades[&p].iter().copied().collect(),
            None => locations.clone(),
        };
        for &location in &candidates {
            let optimal = match parasite.children(p) {
                None => {
                    if location_map.get(&p) == Some(&location) {
                        Candidates::single(
                            0.0,
                            Node::TipLocation {
                                parasite: p,
                                location,
                            },
                        )
                    } else {
                        Candidates::infinite()
                    }
                }
                Some((p1, p2)) => {
                    let left = tables.steps(p1, location, graph);
                    let right = tables.steps(p2, location, graph);
                    // Steps on each side are distinct, so the cross
                    // product has no repeated pairs.
                    let mut assignments =
                        Vec::with_capacity(left.alternatives.len() * right.alternatives.len());
                    for &l in &left.alternatives {
                        for &r in &right.alternatives {
                            let node = Node::LocationAssignment {
                                parasite: p,
                                location,
                                left: l,
                                right: r,
                            };
                            graph.insert(
                                node,
                                vec![step_node(p1, location, l), step_node(p2, location, r)],
                            );
                            assignments.push(node);
                        }
                    }
                    Candidates::new(left.cost + right.cost, assignments)
                }
            };
            tables
                .s
                .set(p.as_index(), tables.columns[&location], optimal.cost);
            graph.insert(
                Node::SyntenyMapping {
                    parasite: p,
                    location,
                },
                optimal.alternatives,
            );
        }

        let best = best_of(
            candidates
                .iter()
                .map(|&location| Candidates::single(tables.s(p, location), location)),
        );
        log::trace!(
            "parasite edge {p:?}: best location cost {} at {:?}",
            best.cost,
            best.alternatives
        );
        graph.insert(
            Node::LocationList(p),
            best.alternatives
                .iter()
                .map(|&location| Node::SyntenyMapping {
                    parasite: p,
                    location,
                })
                .collect(),
        );
        tables.best.insert(p, best);
    }

    tables
        .best
        .iter()
        .map(|(&p, best)| (p, best.cost))
        .collect()
}
