//! Interval table: the append-only record store behind both index variants.
//!
//! Intervals are pushed with byte-string endpoints, abbreviated on entry,
//! and assigned sequential ids. The table also accumulates the running
//! statistics that drive the adaptive query strategy, and owns the two
//! derived operations every build needs: endpoint extraction and the
//! linear overlap scan.

use crate::encoding::abbreviated_key;

/// A stored interval with abbreviated endpoints, both inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    /// Sequential id in push order, starting at 0.
    pub id: u32,
    /// Abbreviated lower endpoint.
    pub from: u64,
    /// Abbreviated upper endpoint.
    pub to: u64,
}

impl Interval {
    pub fn new(id: u32, from: u64, to: u64) -> Self {
        Self { id, from, to }
    }

    /// True if this interval shares no point with `[from, to]`.
    pub fn disjoint(&self, from: u64, to: u64) -> bool {
        from > self.to || to < self.from
    }

    /// True if this interval shares at least one point with `[from, to]`.
    pub fn overlaps(&self, from: u64, to: u64) -> bool {
        !self.disjoint(from, to)
    }
}

/// Append-only sequence of intervals plus push-time statistics.
///
/// The statistics (`min`, `max`, `total_deltas`, `disjoint_point`) feed the
/// cardinality estimator; `min`/`max` are overwritten with the definitive
/// endpoint bounds when a tree is built over the table.
#[derive(Debug, Clone)]
pub struct IntervalTable {
    base: Vec<Interval>,
    min: u64,
    max: u64,
    total_deltas: u64,
    disjoint_point: f64,
}

impl IntervalTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            base: Vec::new(),
            min: u64::MAX,
            max: 0,
            total_deltas: 0,
            disjoint_point: 0.0,
        }
    }

    /// Number of stored intervals.
    pub fn len(&self) -> usize {
        self.base.len()
    }

    /// True if no interval has been pushed since creation or `clear`.
    pub fn is_empty(&self) -> bool {
        self.base.is_empty()
    }

    /// Smallest abbreviated endpoint seen so far (`u64::MAX` when empty).
    pub fn min(&self) -> u64 {
        self.min
    }

    /// Largest abbreviated endpoint seen so far (0 when empty).
    pub fn max(&self) -> u64 {
        self.max
    }

    /// The stored intervals, in push order.
    pub fn intervals(&self) -> &[Interval] {
        &self.base
    }

    /// Snapshot of the stored intervals.
    pub fn get_all(&self) -> Vec<Interval> {
        self.base.clone()
    }

    /// Append the interval `[from, to]`.
    ///
    /// The caller supplies endpoints already sorted (`lex(from) <= lex(to)`);
    /// a violated precondition is not detected and degrades to an
    /// implementation-defined result set, never a crash.
    pub fn push(&mut self, from: &[u8], to: &[u8]) {
        let fa = abbreviated_key(from);
        let ta = abbreviated_key(to);

        let id = self.base.len() as u32;
        self.base.push(Interval::new(id, fa, ta));

        if fa < self.min {
            self.min = fa;
        }
        if ta > self.max {
            self.max = ta;
        }
        self.total_deltas = self.total_deltas.saturating_add(ta.saturating_sub(fa));
        self.recompute_disjoint_point();
    }

    /// Push each paired `[from[i], to[i]]`; extra elements on the longer
    /// side are ignored.
    pub fn push_array<F, T>(&mut self, from: &[F], to: &[T])
    where
        F: AsRef<[u8]>,
        T: AsRef<[u8]>,
    {
        for (f, t) in from.iter().zip(to) {
            self.push(f.as_ref(), t.as_ref());
        }
    }

    /// Drop every interval and zero the statistics.
    pub fn clear(&mut self) {
        self.base.clear();
        self.min = u64::MAX;
        self.max = 0;
        self.total_deltas = 0;
        self.disjoint_point = 0.0;
    }

    /// All endpoints, sorted ascending with duplicates removed.
    ///
    /// The result is strictly increasing with `1 <= len <= 2 * self.len()`
    /// for a non-empty table; its first and last elements are the
    /// definitive bounds of the key range.
    pub fn endpoints(&self) -> Vec<u64> {
        let mut points = Vec::with_capacity(self.base.len() * 2);
        for interval in &self.base {
            points.push(interval.from);
        }
        for interval in &self.base {
            points.push(interval.to);
        }
        points.sort_unstable();
        points.dedup();
        points
    }

    /// Overwrite the running bounds with the definitive values derived from
    /// the endpoint set.
    pub(crate) fn set_bounds(&mut self, min: u64, max: u64) {
        self.min = min;
        self.max = max;
        self.recompute_disjoint_point();
    }

    /// Linear overlap scan, emitting ids in stored order.
    pub(crate) fn scan_overlapping(&self, from: u64, to: u64) -> Vec<u32> {
        let mut result = Vec::new();
        for interval in &self.base {
            if interval.overlaps(from, to) {
                result.push(interval.id);
            }
        }
        result
    }

    /// Estimate how many stored intervals overlap the clamped `[from, to]`.
    ///
    /// `from`/`to` must already be clamped into `[self.min, self.max]`. The
    /// estimate assumes uniform interval density: a point probe expects
    /// `1 / disjoint_point` covering intervals, a range probe expects a
    /// share of the table proportional to its width. Always in `[1, len]`.
    pub(crate) fn estimate(&self, from: u64, to: u64) -> usize {
        debug_assert!(!self.base.is_empty());
        if self.min == self.max {
            return 1;
        }

        let count = self.base.len();
        let delta = to.saturating_sub(from) as f64;
        let expected = if delta == 0.0 && self.disjoint_point != 0.0 {
            round(1.0 / self.disjoint_point, 0)
        } else {
            (delta * count as f64 / (self.max - self.min) as f64).trunc() + 1.0
        };

        (expected as usize).clamp(1, count)
    }

    fn recompute_disjoint_point(&mut self) {
        let spread = self.max.saturating_sub(self.min);
        self.disjoint_point = if spread != 0 && self.total_deltas != 0 {
            spread as f64 / self.total_deltas as f64
        } else {
            0.0
        };
    }
}

impl Default for IntervalTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Round-half-up at `n` decimal places.
///
/// e.g. `round(1.005, 2) == 1.01`, `round(2.5, 0) == 3.0`.
fn round(f: f64, n: i32) -> f64 {
    let pow10n = 10f64.powi(n);
    (f * pow10n + 0.5).trunc() / pow10n
}
