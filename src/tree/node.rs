//! Segment-tree nodes: elementary intervals, shape construction, and
//! stab-insertion.
//!
//! Nodes live in a flat arena indexed by `u32`; children are created before
//! their parent, so the subtree root is always the highest index in its
//! slice of the arena and the tree carries no parent pointers.

use smallvec::SmallVec;

use crate::interval::Interval;

/// Index of a node in the arena.
pub(crate) type NodeIndex = u32;

/// A node covering a closed range of abbreviated keys.
///
/// The range is the union of the node's leaves; each child's range is a
/// subset of its parent's. `overlap` holds the ids of stored intervals that
/// cover this node's range without covering the parent's (the canonical
/// segment-tree decomposition).
#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub from: u64,
    pub to: u64,
    pub left: Option<NodeIndex>,
    pub right: Option<NodeIndex>,
    pub overlap: SmallVec<[u32; 4]>,
}

/// Relation of a stored interval to a node's range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Relation {
    /// No shared point.
    Disjoint,
    /// The interval covers the node's whole range.
    Subset,
    /// Partial overlap, or the node's range strictly contains the interval.
    Intersects,
}

impl Node {
    fn leaf(from: u64, to: u64) -> Self {
        Self {
            from,
            to,
            left: None,
            right: None,
            overlap: SmallVec::new(),
        }
    }

    /// True if the node's range shares no point with `[from, to]`.
    pub fn disjoint(&self, from: u64, to: u64) -> bool {
        from > self.to || to < self.from
    }

    fn relation_to(&self, interval: &Interval) -> Relation {
        if interval.from > self.to || interval.to < self.from {
            return Relation::Disjoint;
        }
        if interval.from <= self.from && interval.to >= self.to {
            return Relation::Subset;
        }
        Relation::Intersects
    }
}

/// Elementary atoms tiling the sorted unique endpoints `P`: alternating
/// point atoms `[p_i, p_i]` and gap atoms `[p_i, p_{i+1}]`, `2M - 1` in
/// total (a single degenerate atom when `M == 1`).
pub(crate) fn elementary_intervals(endpoints: &[u64]) -> Vec<(u64, u64)> {
    if endpoints.len() == 1 {
        return vec![(endpoints[0], endpoints[0])];
    }

    let mut atoms = Vec::with_capacity(endpoints.len() * 2 - 1);
    for (i, &point) in endpoints.iter().enumerate() {
        atoms.push((point, point));
        if i + 1 < endpoints.len() {
            atoms.push((point, endpoints[i + 1]));
        }
    }
    atoms
}

/// Recursively build the subtree covering `atoms`, returning its root index.
///
/// The split is by atom count, not by key midpoint, which keeps the tree
/// balanced regardless of how the endpoints are distributed. The atom at
/// the split index becomes the first atom of the right subtree; the two
/// subtrees meet at that endpoint value without sharing atoms.
pub(crate) fn build_nodes(arena: &mut Vec<Node>, atoms: &[(u64, u64)]) -> NodeIndex {
    if atoms.len() == 1 {
        arena.push(Node::leaf(atoms[0].0, atoms[0].1));
        return (arena.len() - 1) as NodeIndex;
    }

    let center = atoms.len() / 2;
    let left = build_nodes(arena, &atoms[..center]);
    let right = build_nodes(arena, &atoms[center..]);
    arena.push(Node {
        from: atoms[0].0,
        to: atoms[atoms.len() - 1].1,
        left: Some(left),
        right: Some(right),
        overlap: SmallVec::new(),
    });
    (arena.len() - 1) as NodeIndex
}

/// Stab-insert a stored interval from `idx` downward.
///
/// A node whose range the interval fully covers records the id and stops
/// the descent; partial overlap descends into every non-disjoint child.
pub(crate) fn insert_interval(arena: &mut [Node], idx: NodeIndex, interval: &Interval) {
    match arena[idx as usize].relation_to(interval) {
        Relation::Subset => arena[idx as usize].overlap.push(interval.id),
        Relation::Intersects => {
            let (left, right) = {
                let node = &arena[idx as usize];
                (node.left, node.right)
            };
            if let Some(left) = left {
                if !arena[left as usize].disjoint(interval.from, interval.to) {
                    insert_interval(arena, left, interval);
                }
            }
            if let Some(right) = right {
                if !arena[right as usize].disjoint(interval.from, interval.to) {
                    insert_interval(arena, right, interval);
                }
            }
        }
        Relation::Disjoint => {}
    }
}
