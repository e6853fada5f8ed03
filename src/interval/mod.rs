//! Interval records and the append-only interval table.
//!
//! Both index variants share this layer: the tree builds its node structure
//! over the table's endpoints, and the serial variant queries the table
//! directly.

pub mod table;

pub use table::{Interval, IntervalTable};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::abbreviated_key;

    #[test]
    fn test_table_stores_abbreviated_endpoints() {
        let mut table = IntervalTable::new();
        table.push(b"apple", b"banana");

        let stored = table.intervals()[0];
        assert_eq!(stored.from, abbreviated_key(b"apple"));
        assert_eq!(stored.to, abbreviated_key(b"banana"));
        assert_eq!(table.min(), abbreviated_key(b"apple"));
        assert_eq!(table.max(), abbreviated_key(b"banana"));
    }

    #[test]
    fn test_endpoints_collapse_shared_keys() {
        let mut table = IntervalTable::new();
        table.push(b"a", b"m");
        table.push(b"m", b"z");
        table.push(b"a", b"z");

        // Three intervals, six endpoint slots, three unique values.
        let endpoints = table.endpoints();
        assert_eq!(
            endpoints,
            vec![
                abbreviated_key(b"a"),
                abbreviated_key(b"m"),
                abbreviated_key(b"z"),
            ]
        );
    }
}
