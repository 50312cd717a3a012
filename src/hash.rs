//! DJB2 hashing used for bucket placement and the default partitioner.

use std::hash::Hasher;

const DJB2_SEED: u64 = 5381;

/// Streaming DJB2 hasher: `h = h * 33 + byte` for every byte written.
#[derive(Clone, Copy, Debug)]
pub struct Djb2Hasher {
    state: u64,
}

impl Default for Djb2Hasher {
    fn default() -> Self {
        Self { state: DJB2_SEED }
    }
}

impl Hasher for Djb2Hasher {
    fn finish(&self) -> u64 {
        self.state
    }

    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.state = self.state.wrapping_mul(33).wrapping_add(byte as u64);
        }
    }
}

impl hash32::Hasher for Djb2Hasher {
    fn finish32(&self) -> u32 {
        self.state as u32
    }
}

/// DJB2 over the raw bytes of `key`.
///
/// This deliberately does not go through `Hash for str`, which appends a
/// terminator byte and would change every bucket assignment.
pub fn default_hash(key: &str) -> u64 {
    let mut hasher = Djb2Hasher::default();
    hasher.write(key.as_bytes());
    hasher.finish()
}

/// Maps `key` onto `0..num_buckets`.
///
/// # Panics
///
/// If `num_buckets` is zero.
pub fn default_hash_partition(key: &str, num_buckets: usize) -> usize {
    assert!(num_buckets > 0, "cannot hash {key:?} into zero buckets");
    (default_hash(key) % num_buckets as u64) as usize
}

/// The partition function used when the caller has no preference.
pub fn default_partition(key: &str, num_partitions: usize) -> usize {
    default_hash_partition(key, num_partitions)
}
