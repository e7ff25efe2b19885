use crate::error::ReconciliationError;
use crate::error::Result;
use crate::node::Location;

pub type Cost = f64;

pub const INFINITY: Cost = f64::INFINITY;

/// A cost together with every alternative that attains it.
///
/// An infinite cost never carries alternatives.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidates<T> {
    pub cost: Cost,
    pub alternatives: Vec<T>,
}

impl<T> Candidates<T> {
    pub fn new(cost: Cost, alternatives: Vec<T>) -> Self {
        if cost == INFINITY || alternatives.is_empty() {
            Self::infinite()
        } else {
            Self { cost, alternatives }
        }
    }

    pub fn single(cost: Cost, alternative: T) -> Self {
        Self::new(cost, vec![alternative])
    }

    pub fn infinite() -> Self {
        Self {
            cost: INFINITY,
            alternatives: vec![],
        }
    }

    pub fn is_finite(&self) -> bool {
        self.cost < INFINITY
    }

    /// Add a constant to the cost, keeping the alternatives.
    pub fn plus(mut self, extra: Cost) -> Self {
        self.cost += extra;
        self
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Candidates<U> {
        Candidates {
            cost: self.cost,
            alternatives: self.alternatives.into_iter().map(f).collect(),
        }
    }
}

/// Relative tolerance under which two costs count as equal.
pub const TIE_TOLERANCE: f64 = 1e-9;

/// Whether `a` and `b` are the same cost up to rounding error.
pub fn same_cost(a: Cost, b: Cost) -> bool {
    if !a.is_finite() || !b.is_finite() {
        return a == b;
    }
    (a - b).abs() <= TIE_TOLERANCE * a.abs().max(b.abs()).max(1.0)
}

/// Merge candidate derivations into the optimal ones.
///
/// Returns the minimum cost and the alternatives of *every* candidate
/// attaining it, in input order. Costs within [`same_cost`] of each
/// other are ties. Infinite candidates are dropped; if nothing is
/// finite the result is infinite with no alternatives.
pub fn best_of<T, I>(candidates: I) -> Candidates<T>
where
    I: IntoIterator<Item = Candidates<T>>,
{
    let mut best = Candidates::infinite();
    for candidate in candidates {
        if !candidate.is_finite() {
            continue;
        }
        if !best.is_finite() {
            best = candidate;
        } else if same_cost(candidate.cost, best.cost) {
            best.cost = best.cost.min(candidate.cost);
            best.alternatives.extend(candidate.alternatives);
        } else if candidate.cost < best.cost {
            best = candidate;
        }
    }
    best
}

/// The five event weights of a DTLOR reconciliation.
///
/// Cospeciation is free. The defaults match the usual
/// unit-cost setting.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CostWeights {
    pub duplication: Cost,
    pub transfer: Cost,
    pub loss: Cost,
    pub origin: Cost,
    pub rearrangement: Cost,
}

impl Default for CostWeights {
    fn default() -> Self {
        Self {
            duplication: 1.0,
            transfer: 1.0,
            loss: 1.0,
            origin: 1.0,
            rearrangement: 1.0,
        }
    }
}

impl CostWeights {
    pub fn new(
        duplication: Cost,
        transfer: Cost,
        loss: Cost,
        origin: Cost,
        rearrangement: Cost,
    ) -> Self {
        Self {
            duplication,
            transfer,
            loss,
            origin,
            rearrangement,
        }
    }

    pub fn with_duplication(self, duplication: Cost) -> Self {
        Self {
            duplication,
            ..self
        }
    }

    pub fn with_transfer(self, transfer: Cost) -> Self {
        Self { transfer, ..self }
    }

    pub fn with_loss(self, loss: Cost) -> Self {
        Self { loss, ..self }
    }

    pub fn with_origin(self, origin: Cost) -> Self {
        Self { origin, ..self }
    }

    pub fn with_rearrangement(self, rearrangement: Cost) -> Self {
        Self {
            rearrangement,
            ..self
        }
    }

    /// Weights must be non-negative numbers. Infinity is allowed
    /// and forbids the event.
    pub fn validate(&self) -> Result<()> {
        for (event, value) in [
            ("duplication", self.duplication),
            ("transfer", self.transfer),
            ("loss", self.loss),
            ("origin", self.origin),
            ("rearrangement", self.rearrangement),
        ] {
            if value.is_nan() || value < 0.0 {
                return Err(ReconciliationError::InvalidCost { event, value });
            }
        }
        Ok(())
    }

    /// Cost of moving a lineage from location `from` to `to`.
    ///
    /// Entering the first location of a lineage is an origin, charged
    /// on the `Origin` node, never here.
    pub fn location_delta(&self, from: Location, to: Location) -> Cost {
        if from == to {
            0.0
        } else {
            self.rearrangement
        }
    }
}
