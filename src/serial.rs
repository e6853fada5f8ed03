//! Reference serial variant: the interval table with no tree on top.
//!
//! [`SerialIndex`] answers every query with the linear overlap scan. It is
//! the ground truth the tree variant is tested against, and a reasonable
//! choice in its own right for small interval sets.

use crate::encoding::abbreviated_key;
use crate::interval::{Interval, IntervalTable};
use crate::tree::TreeError;

/// Interval-overlap index that scans the table on every query.
///
/// Unlike [`SpanTree`](crate::SpanTree), the serial variant has no built
/// state: queries are valid at any point in the lifecycle.
#[derive(Debug, Clone, Default)]
pub struct SerialIndex {
    table: IntervalTable,
}

impl SerialIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self {
            table: IntervalTable::new(),
        }
    }

    /// Push the interval `[from, to]`, with `lex(from) <= lex(to)` supplied
    /// by the caller.
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

    /// No-op; the serial variant needs no build step.
    pub fn build(&mut self) -> Result<(), TreeError> {
        Ok(())
    }

    /// Ids of every stored interval overlapping `[from, to]`, in push
    /// order.
    pub fn query(&self, from: &[u8], to: &[u8]) -> Vec<u32> {
        self.table
            .scan_overlapping(abbreviated_key(from), abbreviated_key(to))
    }

    /// Ids of every stored interval containing the point `p`, in push
    /// order.
    pub fn query_point(&self, p: &[u8]) -> Vec<u32> {
        self.query(p, p)
    }

    /// Drop every stored interval.
    pub fn clear(&mut self) {
        self.table.clear();
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

    /// Always true: the serial variant has no built state and is
    /// query-ready from creation.
    pub fn is_built(&self) -> bool {
        true
    }
}
