// SPDX-License-Identifier: Apache-2.0

//! 64-bit key hash used to order and search table key indexes.
//!
//! MurmurHash64A with seed 0. Blocks are read little-endian so the hash is
//! the same on every target.

const M: u64 = 0xc6a4a7935bd1e995;
const R: u32 = 47;

/// Hashes a key's raw bytes.
pub fn key_hash(key: &[u8]) -> u64 {
    let mut h = (key.len() as u64).wrapping_mul(M);

    let mut blocks = key.chunks_exact(8);
    for block in &mut blocks {
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(block);
        let mut k = u64::from_le_bytes(bytes);
        k = k.wrapping_mul(M);
        k ^= k >> R;
        k = k.wrapping_mul(M);
        h ^= k;
        h = h.wrapping_mul(M);
    }

    let tail = blocks.remainder();
    if !tail.is_empty() {
        for (i, &byte) in tail.iter().enumerate() {
            h ^= u64::from(byte) << (8 * i);
        }
        h = h.wrapping_mul(M);
    }

    h ^= h >> R;
    h = h.wrapping_mul(M);
    h ^= h >> R;
    h
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_key_hashes_to_zero() {
        assert_eq!(key_hash(b""), 0);
    }

    #[test]
    fn matches_reference_values() {
        // MurmurHash64A, seed 0: tail only, full tail, one block, block + tail.
        let cases: [(&[u8], u64); 6] = [
            (b"a", 0x071717d2d36b6b11),
            (b"abcdefg", 0x241aa52b0a62005d),
            (b"abcdefgh", 0xafdb0257ff41aa98),
            (b"abcdefghi", 0xc9b9d84356146ac2),
            (b"nested_table", 0xa46c245fda740a3c),
            (b"7b09c1a7-01bf-45c0-be19-753e1faecdde", 0x2cd25e7ed784f26f),
        ];
        for (key, expected) in cases {
            assert_eq!(key_hash(key), expected, "{key:?}");
        }
    }

    #[test]
    fn deterministic_and_distinct() {
        let keys: [&[u8]; 6] = [
            b"a",
            b"b",
            b"nested_table",
            b"things",
            b"mysterious_words_by_id",
            b"7b09c1a7-01bf-45c0-be19-753e1faecdde",
        ];
        for (i, a) in keys.iter().enumerate() {
            assert_eq!(key_hash(a), key_hash(a));
            for b in &keys[i + 1..] {
                assert_ne!(key_hash(a), key_hash(b), "{a:?} vs {b:?}");
            }
        }
    }

    #[test]
    fn block_boundary_lengths_differ() {
        // Same prefix, lengths straddling the 8-byte block size.
        let long = b"abcdefghijklmnop";
        let hashes: std::vec::Vec<u64> = (6..=10).map(|n| key_hash(&long[..n])).collect();
        for (i, a) in hashes.iter().enumerate() {
            for b in &hashes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
