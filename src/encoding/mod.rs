//! Key encoding for the index.
//!
//! All keys entering the index are byte strings compared lexicographically;
//! this module reduces them to the fixed-width abbreviated form the rest of
//! the crate operates on.

pub mod abbrev;

pub use abbrev::abbreviated_key;

#[cfg(test)]
mod integration_tests {
    use super::*;

    // The index compares nothing but abbreviations, so a sorted run of full
    // keys must abbreviate to a non-decreasing run of u64 values.
    #[test]
    fn test_sorted_keys_abbreviate_monotonically() {
        let mut keys: Vec<&[u8]> = vec![
            b"order:12345",
            b"user:alice",
            b"user:bob",
            b"user:charlie",
            b"user",
            b"zz",
            b"\x00tombstone",
            b"caf\xc3\xa9",
        ];
        keys.sort();

        let abbrs: Vec<u64> = keys.iter().map(|k| abbreviated_key(k)).collect();
        for pair in abbrs.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
    }
}
