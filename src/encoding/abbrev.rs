//! Abbreviated key reduction.
//!
//! Reduces arbitrary-length byte-string keys to fixed-width 64-bit values
//! whose ordering matches the lexicographic ordering of the full keys, so
//! every interior comparison in the index is a primitive integer compare.

use byteorder::{BigEndian, ByteOrder};

/// Reduce a byte-string key to an order-preserving 64-bit value.
///
/// Keys of 8 bytes or more map to the big-endian interpretation of their
/// first 8 bytes; shorter keys are padded with trailing zero bytes before
/// the same read. The empty key maps to 0.
///
/// For any two keys `a` and `b`, `a <= b` lexicographically implies
/// `abbreviated_key(a) <= abbreviated_key(b)`. Equal abbreviations do NOT
/// imply equal keys: distinct keys sharing an 8-byte prefix collide, and a
/// short key collides with itself extended by zero bytes. The index only
/// relies on ordering, never on equality, so collisions can only widen a
/// result set.
pub fn abbreviated_key(key: &[u8]) -> u64 {
    if key.len() >= 8 {
        return BigEndian::read_u64(key);
    }
    let mut padded = [0u8; 8];
    padded[..key.len()].copy_from_slice(key);
    BigEndian::read_u64(&padded)
}
