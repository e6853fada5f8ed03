//! Adaptive query driver: serial cutover or recursive tree walk.
//!
//! Every query starts with a cardinality estimate. Dense answers over small
//! tables are cheaper to produce by scanning the interval table than by
//! walking the tree, and a tight estimate of one lets the walk skip the
//! dedup bitmap entirely and patch up duplicates afterwards.

use parking_lot::Mutex;

use crate::bitmap::Bitmap;
use crate::interval::IntervalTable;
use crate::tree::node::{Node, NodeIndex};

/// Estimated answers at or above this size prefer the serial scan.
pub(crate) const SERIAL_CUTOVER: usize = 48;

/// Largest table for which a dense answer still takes the serial scan.
pub(crate) const SERIAL_MAX_BASE: usize = 1024;

/// Keep at most this many bitmaps parked between queries.
const POOL_LIMIT: usize = 4;

/// True if the estimated answer should come from the serial scan.
///
/// Tables of `SERIAL_CUTOVER` intervals or fewer always scan, whatever the
/// estimate says.
pub(crate) fn prefers_serial(estimate: usize, base_len: usize) -> bool {
    (estimate >= SERIAL_CUTOVER && base_len <= SERIAL_MAX_BASE) || base_len <= SERIAL_CUTOVER
}

/// Pool of dedup bitmaps reused across queries on one index.
///
/// `try_lock` on both sides: a contended pool falls back to a fresh
/// allocation rather than ever blocking a concurrent reader.
#[derive(Debug, Default)]
pub(crate) struct BitmapPool {
    parked: Mutex<Vec<Bitmap>>,
}

impl BitmapPool {
    /// A cleared bitmap with capacity for at least `bits` bits.
    fn acquire(&self, bits: usize) -> Bitmap {
        let reused = self.parked.try_lock().and_then(|mut parked| parked.pop());
        match reused {
            Some(mut bitmap) => {
                bitmap.reset(bits);
                bitmap
            }
            None => Bitmap::with_capacity(bits),
        }
    }

    fn release(&self, mut bitmap: Bitmap) {
        if let Some(mut parked) = self.parked.try_lock() {
            if parked.len() < POOL_LIMIT {
                bitmap.clear_all();
                parked.push(bitmap);
            }
        }
    }
}

/// Walk the subtree at `idx`, emitting every overlap id in any node that is
/// not disjoint from `[from, to]`. Right child before left.
pub(crate) fn walk<F: FnMut(u32)>(
    arena: &[Node],
    idx: NodeIndex,
    from: u64,
    to: u64,
    emit: &mut F,
) {
    let node = &arena[idx as usize];
    if node.disjoint(from, to) {
        return;
    }
    for &id in &node.overlap {
        emit(id);
    }
    if let Some(right) = node.right {
        walk(arena, right, from, to, emit);
    }
    if let Some(left) = node.left {
        walk(arena, left, from, to, emit);
    }
}

/// Run one query against a built tree.
///
/// `qf`/`qt` are raw abbreviated probe endpoints; they are clamped into the
/// table's key range first, which never changes the answer set.
pub(crate) fn run(
    table: &IntervalTable,
    arena: &[Node],
    root: NodeIndex,
    pool: &BitmapPool,
    mut qf: u64,
    mut qt: u64,
) -> Vec<u32> {
    if qt > table.max() {
        qt = table.max();
    }
    if qf < table.min() {
        qf = table.min();
    }

    let base_len = table.len();
    let estimate = table.estimate(qf, qt);
    if prefers_serial(estimate, base_len) {
        return table.scan_overlapping(qf, qt);
    }

    let mut result = Vec::with_capacity(estimate);
    if estimate == 1 {
        walk(arena, root, qf, qt, &mut |id| result.push(id));
        return dedup_small(result, base_len, pool);
    }

    let mut seen = pool.acquire(base_len);
    walk(arena, root, qf, qt, &mut |id| {
        if seen.insert(id as usize) {
            result.push(id);
        }
    });
    pool.release(seen);
    result
}

/// Dedup for the no-bitmap walk of a tight estimate.
///
/// Up to three ids are checked by direct inequality; anything longer, or a
/// detected duplicate, reflows through a bitmap and comes back in ascending
/// id order.
fn dedup_small(result: Vec<u32>, base_len: usize, pool: &BitmapPool) -> Vec<u32> {
    match result.as_slice() {
        [] | [_] => result,
        [a, b] if a != b => result,
        [a, b, c] if a != b && a != c && b != c => result,
        _ => {
            let mut seen = pool.acquire(base_len);
            for &id in &result {
                seen.set(id as usize);
            }
            let deduped = seen.ones().map(|id| id as u32).collect();
            pool.release(seen);
            deduped
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::SpanTree;

    fn be(value: u64) -> [u8; 8] {
        value.to_be_bytes()
    }

    #[test]
    fn test_prefers_serial_boundaries() {
        // Small tables always scan.
        assert!(prefers_serial(1, SERIAL_CUTOVER));
        assert!(prefers_serial(usize::MAX, SERIAL_CUTOVER));

        // Dense answers scan up to the base-size limit.
        assert!(prefers_serial(SERIAL_CUTOVER, SERIAL_MAX_BASE));
        assert!(!prefers_serial(SERIAL_CUTOVER, SERIAL_MAX_BASE + 1));
        assert!(!prefers_serial(SERIAL_CUTOVER - 1, SERIAL_MAX_BASE));
    }

    #[test]
    fn test_walk_matches_scan_on_small_tree() {
        // Small datasets never reach the walk through the public API, so
        // drive it directly against the linear scan.
        let mut tree = SpanTree::new();
        let data = [(1u64, 1u64), (2, 3), (5, 7), (4, 6), (6, 9)];
        for &(from, to) in &data {
            tree.push(&be(from), &be(to));
        }
        tree.build().unwrap();
        let root = tree.root.unwrap();

        for qf in 0u64..=10 {
            for qt in qf..=10 {
                let mut walked = Vec::new();
                walk(&tree.arena, root, qf, qt, &mut |id| walked.push(id));
                walked.sort_unstable();
                walked.dedup();

                let mut scanned = tree.table.scan_overlapping(qf, qt);
                scanned.sort_unstable();
                assert_eq!(walked, scanned, "probe [{qf}, {qt}]");
            }
        }
    }

    #[test]
    fn test_walk_prunes_disjoint_subtrees() {
        let mut tree = SpanTree::new();
        tree.push(&be(10), &be(20));
        tree.push(&be(30), &be(40));
        tree.build().unwrap();
        let root = tree.root.unwrap();

        let mut emitted = Vec::new();
        walk(&tree.arena, root, 50, 60, &mut |id| emitted.push(id));
        assert!(emitted.is_empty());
    }

    #[test]
    fn test_dedup_small_passthrough() {
        let pool = BitmapPool::default();

        assert_eq!(dedup_small(vec![], 10, &pool), Vec::<u32>::new());
        assert_eq!(dedup_small(vec![3], 10, &pool), vec![3]);
        assert_eq!(dedup_small(vec![5, 2], 10, &pool), vec![5, 2]);
        assert_eq!(dedup_small(vec![5, 2, 8], 10, &pool), vec![5, 2, 8]);
    }

    #[test]
    fn test_dedup_small_reflow_sorts_ascending() {
        let pool = BitmapPool::default();

        assert_eq!(dedup_small(vec![7, 7], 10, &pool), vec![7]);
        assert_eq!(dedup_small(vec![5, 2, 5], 10, &pool), vec![2, 5]);
        // Four or more ids reflow even when already distinct.
        assert_eq!(dedup_small(vec![9, 1, 4, 2], 10, &pool), vec![1, 2, 4, 9]);
    }

    #[test]
    fn test_bitmap_pool_reuse() {
        let pool = BitmapPool::default();

        let mut first = pool.acquire(100);
        first.set(3);
        pool.release(first);

        // The parked bitmap comes back cleared and large enough.
        let second = pool.acquire(200);
        assert!(second.capacity() >= 200);
        assert!(!second.get(3));
        assert_eq!(second.ones().count(), 0);
    }
}
