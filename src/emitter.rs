use crate::store::IntermediateStore;
use std::sync::atomic::{AtomicU64, Ordering};

pub type Partitioner<'a> = dyn Fn(&str, usize) -> usize + Sync + 'a;

/// The write path handed to every Map invocation.
///
/// An `Emitter` only exists for the duration of the map phase, so nothing can
/// emit once reducers have started.
pub struct Emitter<'a> {
    store: &'a IntermediateStore,
    partitioner: &'a Partitioner<'a>,
    emitted: AtomicU64,
    dropped: AtomicU64,
}

impl<'a> Emitter<'a> {
    pub(crate) fn new(store: &'a IntermediateStore, partitioner: &'a Partitioner<'a>) -> Self {
        Self {
            store,
            partitioner,
            emitted: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
        }
    }

    /// Records `value` under `key`.
    ///
    /// A record that cannot be allocated is logged and dropped; the caller is
    /// never told. Panics if the partitioner returns an index outside
    /// `0..num_partitions`.
    pub fn emit(&self, key: &str, value: &str) {
        let num_partitions = self.store.num_partitions();
        let partition = (self.partitioner)(key, num_partitions);
        assert!(
            partition < num_partitions,
            "partitioner returned {partition} for key {key:?}, expected a value below {num_partitions}"
        );

        match self.store.insert(partition, key, value) {
            Ok(()) => {
                self.emitted.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                tracing::error!(error = %e, partition, key_len = key.len(), "dropping emit");
            }
        }
    }

    pub(crate) fn emitted(&self) -> u64 {
        self.emitted.load(Ordering::Relaxed)
    }

    pub(crate) fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}
