//! The partitioned, bucketed multimap that mappers write into.
//!
//! Every partition owns [`NUM_BUCKETS`] independently locked bucket chains and a
//! separately locked distinct-key counter. The counter lock is only ever taken
//! while the bucket lock is already held.

use crate::error::StoreError;
use crate::hash::default_hash_partition;
use parking_lot::Mutex;

/// Buckets per partition. Fixed regardless of the partition count.
pub const NUM_BUCKETS: usize = 1000;

/// Upper bound on the number of partitions (and therefore reducers) in one run.
pub const MAX_PARTITIONS: usize = 64;

/// All values emitted for one key within one partition.
///
/// `values` is used as a stack: the last element is the list head, so the
/// most recent emit is the first value handed back during reduction.
#[derive(Debug)]
pub struct KeyRecord {
    pub key: String,
    pub values: Vec<String>,
}

#[derive(Default)]
struct Bucket {
    chain: Mutex<Vec<KeyRecord>>,
}

pub struct Partition {
    buckets: Box<[Bucket]>,
    key_count: Mutex<usize>,
}

impl Partition {
    fn new() -> Self {
        Self {
            buckets: (0..NUM_BUCKETS).map(|_| Bucket::default()).collect(),
            key_count: Mutex::new(0),
        }
    }

    pub fn distinct_keys(&self) -> usize {
        *self.key_count.lock()
    }

    fn insert(&self, key: &str, value: String) -> Result<(), StoreError> {
        let bucket = &self.buckets[default_hash_partition(key, NUM_BUCKETS)];
        let mut chain = bucket.chain.lock();

        if let Some(record) = chain.iter_mut().find(|record| record.key == key) {
            record.values.try_reserve(1)?;
            record.values.push(value);
            return Ok(());
        }

        let mut values = Vec::new();
        values.try_reserve_exact(1)?;
        values.push(value);
        let record = KeyRecord {
            key: try_owned(key)?,
            values,
        };
        chain.try_reserve(1)?;
        chain.push(record);

        *self.key_count.lock() += 1;
        Ok(())
    }

    /// Drains every bucket chain into one flat list, in bucket order.
    pub fn into_records(self) -> Vec<KeyRecord> {
        let count = self.key_count.into_inner();
        let mut records = Vec::with_capacity(count);
        for bucket in self.buckets.into_vec() {
            records.append(&mut bucket.chain.into_inner());
        }
        records
    }
}

pub struct IntermediateStore {
    partitions: Vec<Partition>,
    #[cfg(test)]
    fail_key: Option<String>,
}

impl IntermediateStore {
    pub fn new(num_partitions: usize) -> Self {
        Self {
            partitions: (0..num_partitions).map(|_| Partition::new()).collect(),
            #[cfg(test)]
            fail_key: None,
        }
    }

    /// A store whose inserts for `key` fail as if allocation had run out.
    #[cfg(test)]
    pub(crate) fn failing_on(num_partitions: usize, key: &str) -> Self {
        Self {
            fail_key: Some(key.to_string()),
            ..Self::new(num_partitions)
        }
    }

    pub fn num_partitions(&self) -> usize {
        self.partitions.len()
    }

    pub fn partition(&self, index: usize) -> Option<&Partition> {
        self.partitions.get(index)
    }

    /// Appends `value` under `key` in partition `partition`.
    ///
    /// On failure nothing is inserted. Panics if `partition` is out of range.
    pub fn insert(&self, partition: usize, key: &str, value: &str) -> Result<(), StoreError> {
        let partition = &self.partitions[partition];
        #[cfg(test)]
        if self.fail_key.as_deref() == Some(key) {
            // usize::MAX bytes exceeds isize::MAX, so this fails without allocating.
            return Err(Vec::<u8>::new().try_reserve(usize::MAX).unwrap_err().into());
        }
        let value = try_owned(value)?;
        partition.insert(key, value)
    }

    pub fn into_partitions(self) -> Vec<Partition> {
        self.partitions
    }
}

fn try_owned(s: &str) -> Result<String, StoreError> {
    let mut owned = String::new();
    owned.try_reserve_exact(s.len())?;
    owned.push_str(s);
    Ok(owned)
}
