//! Reduce phase: one worker per partition, each driving the user callback
//! key by key through a [`PullIterator`].

use crate::error::{Phase, RunError};
use crate::stats::PartitionStats;
use crate::store::{KeyRecord, Partition};
use std::thread;

/// Pull-based access to the values of a partition's keys during reduction.
///
/// The iterator owns the partition's sorted snapshot and a cursor that only
/// moves forward. Keys must be requested in ascending order; the framework
/// guarantees this when it drives the Reduce callback.
pub struct PullIterator {
    snapshot: Vec<KeyRecord>,
    cursor: usize,
    partition: usize,
    pulled: u64,
}

impl PullIterator {
    fn new(snapshot: Vec<KeyRecord>, partition: usize) -> Self {
        Self {
            snapshot,
            cursor: 0,
            partition,
            pulled: 0,
        }
    }

    pub fn partition(&self) -> usize {
        self.partition
    }

    /// Pops the next value for `key`, newest emit first. Returns `None` once
    /// the key is exhausted, and keeps returning `None` on later calls.
    ///
    /// # Panics
    ///
    /// If `partition` is not the partition being reduced, or `key` is behind
    /// the cursor or missing from the snapshot.
    pub fn get_next(&mut self, key: &str, partition: usize) -> Option<String> {
        assert_eq!(
            partition, self.partition,
            "value requested from partition {partition} while reducing partition {}",
            self.partition
        );

        while self
            .snapshot
            .get(self.cursor)
            .is_some_and(|record| record.key.as_str() < key)
        {
            self.cursor += 1;
        }

        match self.snapshot.get_mut(self.cursor) {
            Some(record) if record.key == key => {
                let value = record.values.pop();
                if value.is_some() {
                    self.pulled += 1;
                }
                value
            }
            Some(record) => panic!(
                "key {key:?} is not at the cursor of partition {} (cursor holds {:?})",
                self.partition, record.key
            ),
            None => panic!(
                "key {key:?} is past the end of partition {} ({} keys)",
                self.partition,
                self.snapshot.len()
            ),
        }
    }

    /// Iterator adapter over [`get_next`](Self::get_next) for one key.
    pub fn values<'s>(&'s mut self, key: &'s str) -> Values<'s> {
        Values { inner: self, key }
    }

    fn key_at(&self, index: usize) -> &str {
        &self.snapshot[index].key
    }

    fn len(&self) -> usize {
        self.snapshot.len()
    }

    fn residual(&self) -> u64 {
        self.snapshot.iter().map(|r| r.values.len() as u64).sum()
    }
}

pub struct Values<'s> {
    inner: &'s mut PullIterator,
    key: &'s str,
}

impl Iterator for Values<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let partition = self.inner.partition();
        self.inner.get_next(self.key, partition)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ReducerState {
    Idle,
    Collecting,
    Sorting,
    Reducing,
    Releasing,
    Done,
}

struct ReduceWorker {
    partition: usize,
    state: ReducerState,
}

impl ReduceWorker {
    fn new(partition: usize) -> Self {
        Self {
            partition,
            state: ReducerState::Idle,
        }
    }

    fn enter(&mut self, next: ReducerState) {
        tracing::trace!(partition = self.partition, from = ?self.state, to = ?next, "reducer state");
        self.state = next;
    }

    fn run<R>(mut self, partition: Partition, reduce: &R) -> PartitionStats
    where
        R: Fn(&str, &mut PullIterator, usize),
    {
        let mut stats = PartitionStats::new(self.partition);

        self.enter(ReducerState::Collecting);
        stats.distinct_keys = partition.distinct_keys();
        if stats.distinct_keys == 0 {
            self.enter(ReducerState::Done);
            return stats;
        }
        let mut snapshot = partition.into_records();
        debug_assert_eq!(snapshot.len(), stats.distinct_keys);

        self.enter(ReducerState::Sorting);
        snapshot.sort_unstable_by(|a, b| a.key.as_bytes().cmp(b.key.as_bytes()));

        self.enter(ReducerState::Reducing);
        let mut pull = PullIterator::new(snapshot, self.partition);
        for index in 0..pull.len() {
            let key = pull.key_at(index).to_owned();
            reduce(&key, &mut pull, self.partition);
            stats.keys_reduced += 1;
        }

        self.enter(ReducerState::Releasing);
        stats.values_pulled = pull.pulled;
        stats.residual_values = pull.residual();
        if stats.residual_values > 0 {
            tracing::debug!(
                partition = self.partition,
                residual = stats.residual_values,
                "discarding values left unread by reduce"
            );
        }
        drop(pull);

        self.enter(ReducerState::Done);
        stats
    }
}

/// Reduces every partition on its own thread and blocks until all are done.
pub(crate) fn run_reducers<R>(
    partitions: Vec<Partition>,
    reduce: &R,
) -> Result<Vec<PartitionStats>, RunError>
where
    R: Fn(&str, &mut PullIterator, usize) + Sync,
{
    thread::scope(|scope| {
        let mut handles = Vec::with_capacity(partitions.len());
        let mut spawn_error = None;
        for (index, partition) in partitions.into_iter().enumerate() {
            let spawned = thread::Builder::new()
                .name(format!("reducer-{index}"))
                .spawn_scoped(scope, move || ReduceWorker::new(index).run(partition, reduce));
            match spawned {
                Ok(handle) => handles.push(handle),
                Err(source) => {
                    spawn_error = Some(RunError::Spawn {
                        phase: Phase::Reduce,
                        worker: index,
                        source,
                    });
                    break;
                }
            }
        }

        let mut stats = Vec::with_capacity(handles.len());
        let mut panicked = None;
        for (worker, handle) in handles.into_iter().enumerate() {
            match handle.join() {
                Ok(partition_stats) => stats.push(partition_stats),
                Err(_) => {
                    tracing::error!(worker, "reducer panicked");
                    panicked.get_or_insert(RunError::WorkerPanicked {
                        phase: Phase::Reduce,
                        worker,
                    });
                }
            }
        }

        match spawn_error.or(panicked) {
            Some(e) => Err(e),
            None => Ok(stats),
        }
    })
}
