//! Maximum-parsimony reconciliation of a parasite (gene) tree with a
//! host (species) tree under duplication, transfer, loss, origin and
//! rearrangement costs.
//!
//! The result is not one scenario but a [`ReconciliationGraph`] holding
//! every optimal scenario at once. Scenarios can then be sampled,
//! counted, or summarised as a frequency-weighted median.
//!
//! ```
//! use dtlor_graph::compute_reconciliation_graph;
//! use dtlor_graph::{CostWeights, Location, LocationMap, TipMap, Tree};
//!
//! let mut host = Tree::new();
//! let a = host.add_tip("A");
//! let b = host.add_tip("B");
//! host.add_internal("AB", a, b);
//!
//! let mut gene = Tree::new();
//! let x = gene.add_tip("x");
//! let y = gene.add_tip("y");
//! gene.add_internal("xy", x, y);
//!
//! let tip_map: TipMap = [(x, a), (y, b)].into_iter().collect();
//! let location_map: LocationMap = [(x, Location::new(7)), (y, Location::new(7))]
//!     .into_iter()
//!     .collect();
//!
//! let reconciliation = compute_reconciliation_graph(
//!     &host,
//!     &gene,
//!     &tip_map,
//!     &location_map,
//!     &CostWeights::default(),
//! )?;
//! // one origin, then a cospeciation on AB
//! assert_eq!(reconciliation.cost, 1.0);
//! assert_eq!(reconciliation.count(), 1);
//! # Ok::<(), dtlor_graph::ReconciliationError>(())
//! ```

mod costs;
mod error;
mod flags;
mod graph;
mod median;
mod mpr;
mod node;
mod origin;
mod species;
mod synteny;
mod table;
mod tree;

#[cfg(test)]
mod test_fixtures;

pub use costs::best_of;
pub use costs::same_cost;
pub use costs::Candidates;
pub use costs::Cost;
pub use costs::CostWeights;
pub use costs::INFINITY;
pub use error::ReconciliationError;
pub use error::Result;
pub use flags::MedianOptions;
pub use flags::ReconciliationOptions;
pub use graph::ReconciliationGraph;
pub use median::build_median_graph;
pub use median::MedianGraph;
pub use mpr::count_scenarios;
pub use mpr::find_one_scenario;
pub use mpr::FirstAlternative;
pub use mpr::Scenario;
pub use mpr::ScenarioStep;
pub use mpr::TieBreak;
pub use mpr::UniformRandom;
pub use node::Lineage;
pub use node::Location;
pub use node::LocationStep;
pub use node::Node;
pub use node::NodeKind;
pub use tree::Edge;
pub use tree::EdgeId;
pub use tree::EdgeMap;
pub use tree::Tree;

/// Parasite tip edge to the host tip edge it is found in.
pub type TipMap = EdgeMap<EdgeId>;
/// Parasite tip edge to its syntenic location.
pub type LocationMap = EdgeMap<Location>;

/// The optimal cost together with the graph of every scenario
/// attaining it.
///
/// An infeasible reconciliation has an infinite cost and an empty
/// graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    pub cost: Cost,
    pub graph: ReconciliationGraph,
}

impl Reconciliation {
    pub fn is_feasible(&self) -> bool {
        self.cost < INFINITY
    }

    /// The number of optimal scenarios.
    pub fn count(&self) -> u128 {
        count_scenarios(&self.graph)
            .get(&Node::Root)
            .copied()
            .unwrap_or(0)
    }

    pub fn sample<T: TieBreak>(&self, tie_break: &mut T) -> Scenario {
        find_one_scenario(&self.graph, tie_break)
    }

    pub fn median(&self, options: MedianOptions) -> MedianGraph {
        build_median_graph(&self.graph, options)
    }
}

fn validate_mappings(
    host: &Tree,
    parasite: &Tree,
    tip_map: &TipMap,
    location_map: &LocationMap,
) -> Result<()> {
    for tip in parasite.tips() {
        let target = *tip_map
            .get(&tip)
            .ok_or(ReconciliationError::IncompleteMapping {
                mapping: "tip map",
                edge: tip,
            })?;
        if !host.contains(target) || !host.is_tip(target) {
            return Err(ReconciliationError::UnreachableTarget {
                parasite: tip,
                host: target,
            });
        }
        if !location_map.contains_key(&tip) {
            return Err(ReconciliationError::IncompleteMapping {
                mapping: "location map",
                edge: tip,
            });
        }
    }
    Ok(())
}

/// Build the reconciliation graph with default options.
///
/// See [`compute_reconciliation_graph_with_options`].
pub fn compute_reconciliation_graph(
    host: &Tree,
    parasite: &Tree,
    tip_map: &TipMap,
    location_map: &LocationMap,
    weights: &CostWeights,
) -> Result<Reconciliation> {
    compute_reconciliation_graph_with_options(
        host,
        parasite,
        tip_map,
        location_map,
        weights,
        ReconciliationOptions::default(),
    )
}

/// Build the graph of every minimum-cost reconciliation of `parasite`
/// with `host`.
///
/// Both trees, both mappings and the weights are checked before any
/// table is filled. Entries of the maps that are not parasite tips
/// are ignored.
///
/// # Errors
///
/// * [`ReconciliationError::InvalidCost`] for a negative or NaN weight.
/// * [`ReconciliationError::MalformedTree`] if either tree is not a
///   rooted binary tree.
/// * [`ReconciliationError::IncompleteMapping`] if a parasite tip has
///   no host or no location.
/// * [`ReconciliationError::UnreachableTarget`] if a parasite tip maps
///   to something other than a host tip.
pub fn compute_reconciliation_graph_with_options(
    host: &Tree,
    parasite: &Tree,
    tip_map: &TipMap,
    location_map: &LocationMap,
    weights: &CostWeights,
    options: ReconciliationOptions,
) -> Result<Reconciliation> {
    weights.validate()?;
    host.validate("host")?;
    parasite.validate("parasite")?;
    validate_mappings(host, parasite, tip_map, location_map)?;

    log::debug!(
        "reconciling {} parasite edges with {} host edges, weights {:?}",
        parasite.len(),
        host.len(),
        weights
    );

    let mut graph = ReconciliationGraph::new();
    let best_placement = species::reconcile_species(host, parasite, tip_map, weights, &mut graph);
    let best_location =
        synteny::reconcile_synteny(parasite, location_map, weights, options, &mut graph);
    let cost = origin::combine_layers(
        parasite,
        &best_placement,
        &best_location,
        weights,
        &mut graph,
    );

    if cost == INFINITY {
        log::debug!("no finite-cost reconciliation");
        return Ok(Reconciliation {
            cost,
            graph: ReconciliationGraph::new(),
        });
    }

    let unpruned = graph.len();
    if !options.unpruned_graph() {
        graph = graph.prune(Node::Root);
    }
    log::debug!(
        "optimal cost {cost}: {} graph entries ({unpruned} before pruning)",
        graph.len()
    );
    Ok(Reconciliation { cost, graph })
}

/// Keep only the entries of `location_map` that belong to tips of
/// `parasite`.
pub fn restrict_locations(parasite: &Tree, location_map: &LocationMap) -> LocationMap {
    parasite
        .tips()
        .into_iter()
        .filter_map(|tip| location_map.get(&tip).map(|&l| (tip, l)))
        .collect()
}

/// Reconcile each candidate rooting of one gene tree and keep those
/// of minimum cost.
///
/// Rootings must agree on the [`EdgeId`]s of their tips, since they
/// share `tip_map` and `location_map`. Returns the minimum cost and
/// every `(index, reconciliation)` attaining it, in input order.
/// If no rooting is feasible the cost is infinite and the list empty.
pub fn reconcile_rootings(
    host: &Tree,
    rootings: &[Tree],
    tip_map: &TipMap,
    location_map: &LocationMap,
    weights: &CostWeights,
) -> Result<Candidates<(usize, Reconciliation)>> {
    let mut reconciled = Vec::with_capacity(rootings.len());
    for (index, rooting) in rootings.iter().enumerate() {
        let locations = restrict_locations(rooting, location_map);
        let reconciliation =
            compute_reconciliation_graph(host, rooting, tip_map, &locations, weights)?;
        log::debug!("rooting {index}: cost {}", reconciliation.cost);
        reconciled.push(Candidates::single(
            reconciliation.cost,
            (index, reconciliation),
        ));
    }
    Ok(best_of(reconciled))
}

#[cfg(test)]
fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[cfg(test)]
mod test_scenarios {
    use super::*;
    use crate::test_fixtures::*;

    fn reconcile(
        host: &HostFixture,
        parasite: &ParasiteFixture,
        weights: &CostWeights,
    ) -> Reconciliation {
        init_logging();
        compute_reconciliation_graph(
            &host.tree,
            &parasite.tree,
            &parasite.tip_map,
            &parasite.location_map,
            weights,
        )
        .unwrap()
    }

    fn count_events(scenario: &Scenario, wanted: fn(&Node) -> bool) -> usize {
        scenario.events().iter().filter(|node| wanted(node)).count()
    }

    #[test]
    fn test_congruent_cherry() {
        let host = three_taxon_host();
        let cherry = cherry_on(&host, host.a, host.b);
        let reconciliation = reconcile(&host, &cherry, &unit_weights());
        // a single origin, then cospeciation
        assert_eq!(reconciliation.cost, 1.0);
        assert_eq!(reconciliation.count(), 1);
        let scenario = reconciliation.sample(&mut FirstAlternative);
        assert!(scenario.contains(&Node::Origin(cherry.root)));
        assert!(scenario.contains(&Node::Cospeciation {
            parasite: cherry.root,
            host: host.ab,
            left_host: host.a,
            right_host: host.b
        }));
        assert_eq!(
            count_events(&scenario, |node| matches!(
                node,
                Node::Duplication { .. }
                    | Node::Transfer { .. }
                    | Node::Loss { .. }
                    | Node::Rearrangement { .. }
            )),
            0
        );
        assert_eq!(scenario.cost(&unit_weights()), 1.0);
    }

    #[test]
    fn test_free_origins() {
        let host = three_taxon_host();
        let cherry = cherry_on(&host, host.a, host.b);
        let reconciliation = reconcile(&host, &cherry, &unit_weights().with_origin(0.0));
        assert_eq!(reconciliation.cost, 0.0);
        // origin at the root, or one origin per tip
        assert_eq!(reconciliation.count(), 2);
    }

    #[test]
    fn test_one_duplication() {
        let host = three_taxon_host();
        let cherry = cherry_on(&host, host.a, host.a);
        let weights = unit_weights().with_origin(2.0);
        let reconciliation = reconcile(&host, &cherry, &weights);
        assert_eq!(reconciliation.cost, 3.0);
        assert_eq!(reconciliation.count(), 1);
        let scenario = reconciliation.sample(&mut FirstAlternative);
        assert_eq!(
            count_events(&scenario, |node| matches!(node, Node::Duplication { .. })),
            1
        );
        assert!(scenario.contains(&Node::Duplication {
            parasite: cherry.root,
            host: host.a
        }));
        assert_eq!(scenario.cost(&weights), 3.0);
    }

    #[test]
    fn test_rearrangement_ties_with_separate_origins() {
        let host = three_taxon_host();
        let cherry = cherry_on(&host, host.a, host.b).with_locations(1, 2);
        let reconciliation = reconcile(&host, &cherry, &unit_weights());
        assert_eq!(reconciliation.cost, 2.0);
        // origin at the root at either location, or an origin per tip
        assert_eq!(reconciliation.count(), 3);
        assert_eq!(
            reconciliation.graph.children(&Node::Root),
            &[Node::Null(cherry.root), Node::Origin(cherry.root)]
        );
    }

    //  Duplicate on A, then rearrange one tip: 0.1 + 0.2 + 0.3.
    //  Originate each tip separately:           0.3 + 0.3.
    #[test]
    fn test_decimal_weights_keep_rounded_ties() {
        let host = three_taxon_host();
        let cherry = cherry_on(&host, host.a, host.a).with_locations(1, 2);
        let weights = unit_weights()
            .with_duplication(0.1)
            .with_rearrangement(0.2)
            .with_origin(0.3);
        let reconciliation = reconcile(&host, &cherry, &weights);
        assert!(same_cost(reconciliation.cost, 0.6));
        assert_eq!(
            reconciliation.graph.children(&Node::Root),
            &[Node::Null(cherry.root), Node::Origin(cherry.root)]
        );
        // one root origin per location, or an origin per tip
        assert_eq!(reconciliation.count(), 3);
    }

    #[test]
    fn test_transfer_in_both_directions() {
        let host = three_taxon_host();
        let cherry = cherry_on(&host, host.a, host.c);
        let weights = unit_weights().with_transfer(0.5);
        let reconciliation = reconcile(&host, &cherry, &weights);
        assert_eq!(reconciliation.cost, 1.5);
        assert_eq!(reconciliation.count(), 2);
        let median = reconciliation.median(MedianOptions::default());
        assert_eq!(median.frequency(&Node::Origin(cherry.root)), 1.0);
        let transfers: Vec<(Node, f64)> = median
            .event_frequencies()
            .into_iter()
            .filter(|(node, _)| matches!(node, Node::Transfer { .. }))
            .collect();
        assert_eq!(transfers.len(), 2);
        assert!(transfers.iter().all(|&(_, f)| f == 0.5));
    }

    #[test]
    fn test_single_tips() {
        init_logging();
        let mut host = Tree::new();
        let h = host.add_tip("H");
        let mut parasite = Tree::new();
        let t = parasite.add_tip("t");
        let tip_map: TipMap = [(t, h)].into_iter().collect();
        let location_map: LocationMap = [(t, Location::new(5))].into_iter().collect();
        let weights = unit_weights().with_origin(0.0);
        let reconciliation =
            compute_reconciliation_graph(&host, &parasite, &tip_map, &location_map, &weights)
                .unwrap();
        assert_eq!(reconciliation.cost, 0.0);
        assert_eq!(reconciliation.count(), 1);
        assert_eq!(reconciliation.graph.len(), 6);
        assert_eq!(
            reconciliation.graph.children(&Node::SpeciesMapping {
                parasite: t,
                host: h
            }),
            &[Node::Contemporaneous {
                parasite: t,
                host: h
            }]
        );
        assert_eq!(
            reconciliation.graph.children(&Node::SyntenyMapping {
                parasite: t,
                location: Location::new(5)
            }),
            &[Node::TipLocation {
                parasite: t,
                location: Location::new(5)
            }]
        );
    }

    #[test]
    fn test_contemporaneous_never_pairs_unmapped_tips() {
        let host = three_taxon_host();
        let cherry = cherry_on(&host, host.a, host.a).with_locations(1, 2);
        init_logging();
        let reconciliation = compute_reconciliation_graph_with_options(
            &host.tree,
            &cherry.tree,
            &cherry.tip_map,
            &cherry.location_map,
            &unit_weights(),
            ReconciliationOptions::default().with_unpruned_graph(),
        )
        .unwrap();
        assert!(reconciliation.cost > 0.0);
        for (_, children) in reconciliation.graph.iter() {
            for child in children {
                if let Node::Contemporaneous { parasite, host: h } = *child {
                    assert_eq!(h, host.a);
                    assert!(cherry.tips.contains(&parasite));
                }
            }
        }
    }

    #[test]
    fn test_infeasible() {
        let host = three_taxon_host();
        let cherry = cherry_on(&host, host.a, host.b);
        let reconciliation = reconcile(&host, &cherry, &unit_weights().with_origin(INFINITY));
        assert!(!reconciliation.is_feasible());
        assert!(reconciliation.graph.is_empty());
        assert_eq!(reconciliation.count(), 0);
        assert!(reconciliation.sample(&mut FirstAlternative).is_empty());
        assert!(reconciliation
            .median(MedianOptions::default())
            .node_frequencies()
            .is_empty());
    }

    #[test]
    fn test_pruning_option() {
        let host = three_taxon_host();
        let tree = caterpillar_on(&host, [host.a, host.b, host.c], [1, 2, 1]);
        init_logging();
        let run = |options| {
            compute_reconciliation_graph_with_options(
                &host.tree,
                &tree.tree,
                &tree.tip_map,
                &tree.location_map,
                &unit_weights(),
                options,
            )
            .unwrap()
        };
        let pruned = run(ReconciliationOptions::default());
        let unpruned = run(ReconciliationOptions::default().with_unpruned_graph());
        assert_eq!(pruned.cost, unpruned.cost);
        assert!(unpruned.graph.len() > pruned.graph.len());
        assert_eq!(unpruned.graph.prune(Node::Root), pruned.graph);
        assert_eq!(pruned.count(), unpruned.count());

        let clades = run(ReconciliationOptions::default().with_clade_locations());
        assert_eq!(clades.cost, pruned.cost);
        assert!(clades.count() <= pruned.count());
    }

    #[test]
    fn test_restrict_locations() {
        let host = three_taxon_host();
        let cherry = cherry_on(&host, host.a, host.b);
        let mut locations = cherry.location_map.clone();
        locations.insert(cherry.root, Location::new(9));
        locations.insert(EdgeId::new(40), Location::new(9));
        assert_eq!(restrict_locations(&cherry.tree, &locations), cherry.location_map);
    }

    #[test]
    fn test_best_rootings_are_kept() {
        init_logging();
        let host = three_taxon_host();
        //  ((x,y),z), ((x,z),y) and ((x,y),z) again
        let rooting = |first: usize, second: usize| {
            let mut tree = Tree::new();
            let tips = [tree.add_tip("x"), tree.add_tip("y"), tree.add_tip("z")];
            let third = 3 - first - second;
            let inner = tree.add_internal("in", tips[first], tips[second]);
            tree.add_internal("out", inner, tips[third]);
            tree
        };
        let rootings = [rooting(0, 1), rooting(0, 2), rooting(0, 1)];
        let tips = rootings[0].tips();
        let tip_map: TipMap = tips.iter().copied().zip([host.a, host.b, host.c]).collect();
        let mut location_map: LocationMap =
            tips.iter().map(|&t| (t, Location::new(1))).collect();
        // restricted away for every rooting
        location_map.insert(EdgeId::new(4), Location::new(3));
        let best =
            reconcile_rootings(&host.tree, &rootings, &tip_map, &location_map, &unit_weights())
                .unwrap();
        assert_eq!(best.cost, 1.0);
        let indexes: Vec<usize> = best.alternatives.iter().map(|(i, _)| *i).collect();
        assert_eq!(indexes, vec![0, 2]);
        assert!(best.alternatives.iter().all(|(_, r)| r.count() == 1));
    }
}
