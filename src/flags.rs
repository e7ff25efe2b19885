// Option sets for the public API.
// The bitflags types stay private; callers only see the newtypes.

use bitflags::bitflags;

bitflags! {
    #[repr(transparent)]
    #[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
    struct ReconciliationBitFlags: u32 {
        const EMPTY = 0;
        const CLADE_LOCATIONS = 1 << 1;
        const UNPRUNED_GRAPH = 1 << 2;
    }
}

bitflags! {
    #[repr(transparent)]
    #[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
    struct MedianBitFlags: u32 {
        const EMPTY = 0;
        const COUNT_WEIGHTING = 1 << 1;
    }
}

#[repr(transparent)]
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub struct ReconciliationOptions(ReconciliationBitFlags);

impl ReconciliationOptions {
    /// Only consider, for each parasite edge, the locations found
    /// at the tips below it.
    ///
    /// This never raises the optimal cost, but it drops tied
    /// scenarios in which a lineage passes through a location that
    /// none of its descendants use.
    pub fn with_clade_locations(self) -> Self {
        Self(self.0 | ReconciliationBitFlags::CLADE_LOCATIONS)
    }

    /// Return every table entry instead of only those reachable
    /// from the root.
    pub fn with_unpruned_graph(self) -> Self {
        Self(self.0 | ReconciliationBitFlags::UNPRUNED_GRAPH)
    }

    pub fn clade_locations(&self) -> bool {
        self.0.contains(ReconciliationBitFlags::CLADE_LOCATIONS)
    }

    pub fn unpruned_graph(&self) -> bool {
        self.0.contains(ReconciliationBitFlags::UNPRUNED_GRAPH)
    }
}

#[repr(transparent)]
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub struct MedianOptions(MedianBitFlags);

impl MedianOptions {
    /// Split a CHOOSE node's frequency among its alternatives in
    /// proportion to how many scenarios each one leads to, instead
    /// of evenly.
    pub fn with_count_weighting(self) -> Self {
        Self(self.0 | MedianBitFlags::COUNT_WEIGHTING)
    }

    pub fn count_weighting(&self) -> bool {
        self.0.contains(MedianBitFlags::COUNT_WEIGHTING)
    }
}
