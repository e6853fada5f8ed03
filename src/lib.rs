//! spantree: an interval-overlap index over byte-string keys.
//!
//! Bulk-load closed intervals whose endpoints are arbitrary-length byte
//! strings, build once, then ask for the ids of every stored interval that
//! overlaps a probe range. Two design choices keep queries cheap:
//! - Keys are reduced to an order-preserving 64-bit abbreviation on entry,
//!   so all interior comparisons are primitive integer compares.
//! - Each query picks between a linear table scan and a pruned segment-tree
//!   walk, driven by a cardinality estimate of the answer.
//!
//! # Examples
//!
//! ```
//! use spantree::SpanTree;
//!
//! let mut tree = SpanTree::new();
//! tree.push(b"apple", b"banana");
//! tree.push(b"cherry", b"grape");
//! tree.build().unwrap();
//!
//! assert_eq!(tree.query(b"act", b"apricot"), vec![0]);
//! assert_eq!(tree.query_point(b"date"), vec![1]);
//! assert!(tree.query(b"melon", b"pear").is_empty());
//! ```

pub mod encoding;
pub mod interval;
pub mod serial;
pub mod tree;

mod bitmap;

pub use encoding::abbreviated_key;
pub use interval::{Interval, IntervalTable};
pub use serial::SerialIndex;
pub use tree::{SpanTree, SpanTreeStats, TreeError};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_basics() {
        let mut tree = SpanTree::new();
        tree.push(b"user:alice", b"user:dave");
        tree.build().unwrap();

        assert_eq!(tree.query_point(b"user:bob"), vec![0]);
    }

    #[test]
    fn test_version_info() {
        assert!(!VERSION.is_empty());
        assert_eq!(NAME, "spantree");
    }
}
