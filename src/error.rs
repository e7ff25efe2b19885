use thiserror::Error;

use crate::EdgeId;

pub type Result<T> = std::result::Result<T, ReconciliationError>;

/// Structural problems with the inputs to a reconciliation.
///
/// These are all detected before any table is filled in.
/// An infeasible reconciliation is not an error: it is reported
/// as an infinite cost with an empty graph.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReconciliationError {
    #[error("malformed {tree} tree: {reason}")]
    MalformedTree { tree: &'static str, reason: String },

    #[error("{mapping} has no entry for parasite tip {edge:?}")]
    IncompleteMapping { mapping: &'static str, edge: EdgeId },

    #[error("parasite tip {parasite:?} maps to host edge {host:?}, which is not a host tip")]
    UnreachableTarget { parasite: EdgeId, host: EdgeId },

    #[error("invalid {event} cost: {value}")]
    InvalidCost { event: &'static str, value: f64 },
}

impl ReconciliationError {
    pub(crate) fn malformed<S: Into<String>>(tree: &'static str, reason: S) -> Self {
        Self::MalformedTree {
            tree,
            reason: reason.into(),
        }
    }
}
