//! Segment tree over elementary intervals of abbreviated byte-string keys.
//!
//! [`SpanTree`] is the tree-backed index variant: intervals are pushed with
//! byte-string endpoints, `build` derives the elementary intervals from the
//! unique endpoints and stab-inserts every stored interval, and queries
//! answer overlap probes either by a linear scan or a pruned tree walk,
//! whichever the cardinality estimate favors.

pub(crate) mod node;
pub(crate) mod query;

use std::fmt;
use std::mem;

use crate::encoding::abbreviated_key;
use crate::interval::{Interval, IntervalTable};
use node::{Node, NodeIndex};
use query::BitmapPool;

/// Errors surfaced by tree construction and validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// `build` was invoked with no pushed intervals.
    EmptyBase,
    /// A structural invariant does not hold; the payload names it.
    BrokenInvariant(&'static str),
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeError::EmptyBase => write!(f, "no intervals pushed; nothing to build"),
            TreeError::BrokenInvariant(what) => write!(f, "broken tree invariant: {}", what),
        }
    }
}

impl std::error::Error for TreeError {}

/// Interval-overlap index backed by a segment tree.
///
/// Lifecycle: [`push`](Self::push) intervals, [`build`](Self::build) once,
/// then query freely; [`clear`](Self::clear) returns to the empty state.
/// Queries on a built tree are pure reads and may run concurrently through
/// a shared reference. Interleaving queries with `push`, `build`, or
/// `clear` on the same instance is not supported.
#[derive(Debug)]
pub struct SpanTree {
    table: IntervalTable,
    arena: Vec<Node>,
    root: Option<NodeIndex>,
    pool: BitmapPool,
}

impl SpanTree {
    /// Create an empty index.
    pub fn new() -> Self {
        Self {
            table: IntervalTable::new(),
            arena: Vec::new(),
            root: None,
            pool: BitmapPool::default(),
        }
    }

    /// Push the interval `[from, to]` onto the stack; it takes effect at
    /// the next [`build`](Self::build).
    ///
    /// The caller supplies endpoints already sorted
    /// (`lex(from) <= lex(to)`); violations are not detected.
    pub fn push(&mut self, from: &[u8], to: &[u8]) {
        self.table.push(from, to);
    }

    /// Push each paired `[from[i], to[i]]`; extra elements on the longer
    /// side are ignored.
    pub fn push_array<F, T>(&mut self, from: &[F], to: &[T])
    where
        F: AsRef<[u8]>,
        T: AsRef<[u8]>,
    {
        self.table.push_array(from, to);
    }

    /// Build the segment tree over the pushed intervals.
    ///
    /// One-shot: a rebuild replaces the previous tree entirely. Returns
    /// [`TreeError::EmptyBase`] if nothing was pushed.
    pub fn build(&mut self) -> Result<(), TreeError> {
        if self.table.is_empty() {
            return Err(TreeError::EmptyBase);
        }

        let endpoints = self.table.endpoints();
        self.table
            .set_bounds(endpoints[0], endpoints[endpoints.len() - 1]);

        let atoms = node::elementary_intervals(&endpoints);
        self.arena.clear();
        self.arena.reserve(atoms.len() * 2);
        let root = node::build_nodes(&mut self.arena, &atoms);

        for interval in self.table.intervals() {
            node::insert_interval(&mut self.arena, root, interval);
        }
        self.root = Some(root);
        Ok(())
    }

    /// Ids of every stored interval overlapping `[from, to]`, both probe
    /// endpoints inclusive.
    ///
    /// Only the returned *set* is contractual; the order depends on the
    /// strategy chosen. Comparisons happen on abbreviated keys, which
    /// preserve `<`/`>` but not `==`: keys longer than 8 bytes sharing a
    /// prefix can widen the result, never narrow it. No full-key
    /// re-verification is performed.
    ///
    /// # Panics
    ///
    /// Panics if the tree has not been built.
    pub fn query(&self, from: &[u8], to: &[u8]) -> Vec<u32> {
        let root = self.root.expect("query on an unbuilt tree; call build() first");
        query::run(
            &self.table,
            &self.arena,
            root,
            &self.pool,
            abbreviated_key(from),
            abbreviated_key(to),
        )
    }

    /// Ids of every stored interval containing the point `p`.
    ///
    /// # Panics
    ///
    /// Panics if the tree has not been built.
    pub fn query_point(&self, p: &[u8]) -> Vec<u32> {
        self.query(p, p)
    }

    /// Drop all intervals and the built tree, returning to the empty state.
    pub fn clear(&mut self) {
        self.table.clear();
        self.arena.clear();
        self.root = None;
    }

    /// Snapshot of the stored intervals, in push order.
    pub fn get_all(&self) -> Vec<Interval> {
        self.table.get_all()
    }

    /// Number of stored intervals.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// True if no interval has been pushed.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// True once `build` has succeeded and no `clear` followed it.
    pub fn is_built(&self) -> bool {
        self.root.is_some()
    }

    /// Structural statistics, mostly useful for tuning and debugging.
    pub fn stats(&self) -> SpanTreeStats {
        let leaf_count = self
            .arena
            .iter()
            .filter(|node| node.left.is_none())
            .count();
        SpanTreeStats {
            interval_count: self.table.len(),
            endpoint_count: (leaf_count + 1) / 2,
            node_count: self.arena.len(),
            memory_usage: self.arena.capacity() * mem::size_of::<Node>()
                + self.table.len() * mem::size_of::<Interval>(),
        }
    }

    /// Check the structural invariants of a built tree.
    ///
    /// Verifies that every node's range is ordered and contained in its
    /// parent's, that interior nodes have both children, that the root
    /// spans the full key range, and that recorded ids are in range. An
    /// unbuilt tree trivially validates.
    pub fn validate(&self) -> Result<(), TreeError> {
        let root = match self.root {
            Some(root) => root,
            None => return Ok(()),
        };

        let rootnode = &self.arena[root as usize];
        if rootnode.from != self.table.min() || rootnode.to != self.table.max() {
            return Err(TreeError::BrokenInvariant("root does not span the key range"));
        }
        self.validate_node(root)
    }

    fn validate_node(&self, idx: NodeIndex) -> Result<(), TreeError> {
        let node = &self.arena[idx as usize];
        if node.from > node.to {
            return Err(TreeError::BrokenInvariant("inverted node range"));
        }
        if node.left.is_some() != node.right.is_some() {
            return Err(TreeError::BrokenInvariant("interior node missing a child"));
        }
        for &id in &node.overlap {
            if (id as usize) >= self.table.len() {
                return Err(TreeError::BrokenInvariant("overlap id out of range"));
            }
        }
        for child in [node.left, node.right].into_iter().flatten() {
            let childnode = &self.arena[child as usize];
            if childnode.from < node.from || childnode.to > node.to {
                return Err(TreeError::BrokenInvariant("child range escapes parent"));
            }
            self.validate_node(child)?;
        }
        Ok(())
    }
}

impl Default for SpanTree {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for SpanTree {
    /// Clone into the pre-build state: the interval table and statistics
    /// are copied, the tree is not. The clone must be built before it can
    /// answer queries.
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            arena: Vec::new(),
            root: None,
            pool: BitmapPool::default(),
        }
    }
}

/// Structural statistics for a [`SpanTree`].
#[derive(Debug, Clone)]
pub struct SpanTreeStats {
    /// Stored intervals.
    pub interval_count: usize,
    /// Unique endpoints under the built tree (0 when unbuilt).
    pub endpoint_count: usize,
    /// Nodes in the arena (0 when unbuilt).
    pub node_count: usize,
    /// Approximate heap footprint in bytes.
    pub memory_usage: usize,
}
