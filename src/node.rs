use crate::costs::Cost;
use crate::costs::CostWeights;
use crate::EdgeId;

/// An opaque syntenic location.
#[repr(transparent)]
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Location(u64);

impl Location {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

/// How a child lineage inherits its parent's location.
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub enum LocationStep {
    Keep,
    Rearrange(Location),
}

/// Whether a child lineage is still unassigned or originates.
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub enum Lineage {
    Null,
    Origin,
}

/// How the children of a graph node combine.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Every child occurs in each scenario using the node.
    All,
    /// Exactly one child occurs; all of them are optimal.
    Choose,
    /// No children.
    Terminal,
}

/// A vertex of the reconciliation graph.
///
/// Nodes are plain values. Two nodes are the same vertex iff they
/// compare equal.
#[derive(Debug, Copy, Clone, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub enum Node {
    Root,
    /// The parasite lineage has no host placement or location yet.
    Null(EdgeId),
    /// One way of splitting an unassigned lineage between its children.
    NullSplit {
        parasite: EdgeId,
        left: Lineage,
        right: Lineage,
    },
    /// The lineage gets a host placement and a location here.
    Origin(EdgeId),
    /// Optimal host edges for a lineage.
    SpeciesList(EdgeId),
    /// Optimal ways to map `parasite` onto `host`.
    SpeciesMapping { parasite: EdgeId, host: EdgeId },
    /// The children of `parasite` follow the two children of `host`.
    /// The left parasite child lands on `left_host`.
    Cospeciation {
        parasite: EdgeId,
        host: EdgeId,
        left_host: EdgeId,
        right_host: EdgeId,
    },
    Duplication { parasite: EdgeId, host: EdgeId },
    /// The child `moving` jumps from `host` to the unrelated `target`;
    /// the other child stays on `host`.
    Transfer {
        parasite: EdgeId,
        host: EdgeId,
        moving: EdgeId,
        target: EdgeId,
    },
    /// `parasite` survives only along the host child `survivor`.
    Loss {
        parasite: EdgeId,
        host: EdgeId,
        survivor: EdgeId,
    },
    Contemporaneous { parasite: EdgeId, host: EdgeId },
    /// Optimal locations for a lineage.
    LocationList(EdgeId),
    /// Optimal ways for `parasite` to sit at `location`.
    SyntenyMapping { parasite: EdgeId, location: Location },
    /// One pairing of optimal steps for the two children of `parasite`.
    LocationAssignment {
        parasite: EdgeId,
        location: Location,
        left: LocationStep,
        right: LocationStep,
    },
    Rearrangement {
        parasite: EdgeId,
        from: Location,
        to: Location,
    },
    TipLocation { parasite: EdgeId, location: Location },
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Root
            | Node::Null(_)
            | Node::SpeciesList(_)
            | Node::SpeciesMapping { .. }
            | Node::LocationList(_)
            | Node::SyntenyMapping { .. } => NodeKind::Choose,
            Node::NullSplit { .. }
            | Node::Origin(_)
            | Node::Cospeciation { .. }
            | Node::Duplication { .. }
            | Node::Transfer { .. }
            | Node::Loss { .. }
            | Node::LocationAssignment { .. }
            | Node::Rearrangement { .. } => NodeKind::All,
            Node::Contemporaneous { .. } | Node::TipLocation { .. } => NodeKind::Terminal,
        }
    }

    /// The parasite edge the node is about, if any.
    pub fn parasite(&self) -> Option<EdgeId> {
        match *self {
            Node::Root => None,
            Node::Null(p) | Node::Origin(p) | Node::SpeciesList(p) | Node::LocationList(p) => {
                Some(p)
            }
            Node::NullSplit { parasite, .. }
            | Node::SpeciesMapping { parasite, .. }
            | Node::Cospeciation { parasite, .. }
            | Node::Duplication { parasite, .. }
            | Node::Transfer { parasite, .. }
            | Node::Loss { parasite, .. }
            | Node::Contemporaneous { parasite, .. }
            | Node::SyntenyMapping { parasite, .. }
            | Node::LocationAssignment { parasite, .. }
            | Node::Rearrangement { parasite, .. }
            | Node::TipLocation { parasite, .. } => Some(parasite),
        }
    }

    /// Evolutionary events, as opposed to bookkeeping nodes.
    pub fn is_event(&self) -> bool {
        matches!(
            self,
            Node::Origin(_)
                | Node::Cospeciation { .. }
                | Node::Duplication { .. }
                | Node::Transfer { .. }
                | Node::Loss { .. }
                | Node::Contemporaneous { .. }
                | Node::Rearrangement { .. }
        )
    }

    /// What this node adds to the cost of a scenario that uses it.
    pub fn event_cost(&self, weights: &CostWeights) -> Cost {
        match self {
            Node::Duplication { .. } => weights.duplication,
            Node::Transfer { .. } => weights.transfer,
            Node::Loss { .. } => weights.loss,
            Node::Origin(_) => weights.origin,
            Node::Rearrangement { .. } => weights.rearrangement,
            _ => 0.0,
        }
    }
}
