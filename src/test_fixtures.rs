// Small trees shared by the unit tests.

use crate::CostWeights;
use crate::EdgeId;
use crate::Location;
use crate::LocationMap;
use crate::TipMap;
use crate::Tree;

pub struct HostFixture {
    pub tree: Tree,
    pub a: EdgeId,
    pub b: EdgeId,
    pub ab: EdgeId,
    pub c: EdgeId,
    pub root: EdgeId,
}

//        ABC
//       /   \
//      AB    \
//     /  \    \
//    A    B    C
pub fn three_taxon_host() -> HostFixture {
    let mut tree = Tree::new();
    let a = tree.add_tip("A");
    let b = tree.add_tip("B");
    let ab = tree.add_internal("AB", a, b);
    let c = tree.add_tip("C");
    let root = tree.add_internal("ABC", ab, c);
    HostFixture {
        tree,
        a,
        b,
        ab,
        c,
        root,
    }
}

pub struct ParasiteFixture {
    pub tree: Tree,
    /// Tips in insertion order.
    pub tips: Vec<EdgeId>,
    /// The internal edge below the root, if any.
    pub inner: Option<EdgeId>,
    pub left: EdgeId,
    pub right: EdgeId,
    pub root: EdgeId,
    pub tip_map: TipMap,
    pub location_map: LocationMap,
}

impl ParasiteFixture {
    /// Relocate the root's two children. Both must be tips.
    pub fn with_locations(mut self, left: u64, right: u64) -> Self {
        self.location_map.insert(self.left, Location::new(left));
        self.location_map.insert(self.right, Location::new(right));
        self
    }
}

//      p
//     / \
//    a   b
//
// a -> host_a, b -> host_b, both at location 1.
pub fn cherry_on(host: &HostFixture, host_a: EdgeId, host_b: EdgeId) -> ParasiteFixture {
    assert!(host.tree.is_tip(host_a) && host.tree.is_tip(host_b));
    let mut tree = Tree::new();
    let left = tree.add_tip("a");
    let right = tree.add_tip("b");
    let root = tree.add_internal("p", left, right);
    ParasiteFixture {
        tree,
        tips: vec![left, right],
        inner: None,
        left,
        right,
        root,
        tip_map: [(left, host_a), (right, host_b)].into_iter().collect(),
        location_map: [(left, Location::new(1)), (right, Location::new(1))]
            .into_iter()
            .collect(),
    }
}

//        p
//       / \
//      q   \
//     / \   \
//    a   b   c
pub fn caterpillar_on(
    host: &HostFixture,
    host_tips: [EdgeId; 3],
    locations: [u64; 3],
) -> ParasiteFixture {
    assert!(host_tips.iter().all(|&h| host.tree.is_tip(h)));
    let mut tree = Tree::new();
    let a = tree.add_tip("a");
    let b = tree.add_tip("b");
    let q = tree.add_internal("q", a, b);
    let c = tree.add_tip("c");
    let root = tree.add_internal("p", q, c);
    let tips = vec![a, b, c];
    ParasiteFixture {
        tree,
        tip_map: tips.iter().copied().zip(host_tips).collect(),
        location_map: tips
            .iter()
            .copied()
            .zip(locations.map(Location::new))
            .collect(),
        tips,
        inner: Some(q),
        left: q,
        right: c,
        root,
    }
}

pub fn unit_weights() -> CostWeights {
    CostWeights::default()
}

/// A binary tree over `ntips` tips, shaped by repeatedly merging the
/// two pool entries that `picks` points at.
pub fn random_tree(prefix: &str, ntips: usize, picks: &[usize]) -> Tree {
    assert!(ntips > 0);
    let mut tree = Tree::new();
    let mut pool: Vec<EdgeId> = (0..ntips)
        .map(|i| tree.add_tip(format!("{prefix}{i}")))
        .collect();
    let mut pick = picks.iter().copied().chain(std::iter::repeat(0));
    let mut merged = 0;
    while pool.len() > 1 {
        let left = pool.swap_remove(pick.next().unwrap_or(0) % pool.len());
        let right = pool.swap_remove(pick.next().unwrap_or(0) % pool.len());
        pool.push(tree.add_internal(format!("{prefix}_{merged}"), left, right));
        merged += 1;
    }
    tree
}
