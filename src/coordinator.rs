use crate::config::RunConfig;
use crate::emitter::Emitter;
use crate::error::RunError;
use crate::mapper::run_mappers;
use crate::queue::WorkQueue;
use crate::reducer::{run_reducers, PullIterator};
use crate::stats::RunStats;
use crate::store::IntermediateStore;
use std::time::Instant;

/// A configured MapReduce run. Holds no state between runs, so one `Job`
/// can be run repeatedly or from several threads at once.
#[derive(Clone, Debug, Default)]
pub struct Job {
    config: RunConfig,
}

impl Job {
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Maps every unit, waits for all mappers to finish, then reduces every
    /// partition. Blocks until both phases are done.
    pub fn run<S, M, R, P>(
        &self,
        units: &[S],
        map: M,
        reduce: R,
        partition: P,
    ) -> Result<RunStats, RunError>
    where
        S: AsRef<str> + Sync,
        M: Fn(&str, &Emitter<'_>) + Sync,
        R: Fn(&str, &mut PullIterator, usize) + Sync,
        P: Fn(&str, usize) -> usize + Sync,
    {
        self.config.validate()?;
        let store = IntermediateStore::new(self.config.num_reducers);
        self.run_with_store(store, units, map, reduce, partition)
    }

    fn run_with_store<S, M, R, P>(
        &self,
        store: IntermediateStore,
        units: &[S],
        map: M,
        reduce: R,
        partition: P,
    ) -> Result<RunStats, RunError>
    where
        S: AsRef<str> + Sync,
        M: Fn(&str, &Emitter<'_>) + Sync,
        R: Fn(&str, &mut PullIterator, usize) + Sync,
        P: Fn(&str, usize) -> usize + Sync,
    {
        let RunConfig {
            num_mappers,
            num_reducers,
        } = self.config;

        let started_at = chrono::Local::now();
        let queue = WorkQueue::new(units);
        tracing::debug!(
            units = queue.len(),
            num_mappers,
            num_reducers,
            "starting map phase"
        );

        let map_start = Instant::now();
        let emitter = Emitter::new(&store, &partition);
        let units_per_mapper = run_mappers(&queue, &map, &emitter, num_mappers)?;
        let (emits, dropped_emits) = (emitter.emitted(), emitter.dropped());
        drop(emitter);
        let map_elapsed = map_start.elapsed();
        tracing::debug!(
            emits,
            dropped_emits,
            elapsed_ms = map_elapsed.as_millis() as u64,
            "map phase complete"
        );

        let reduce_start = Instant::now();
        let partitions = run_reducers(store.into_partitions(), &reduce)?;
        let reduce_elapsed = reduce_start.elapsed();
        tracing::debug!(
            elapsed_ms = reduce_elapsed.as_millis() as u64,
            "reduce phase complete"
        );

        Ok(RunStats {
            started_at,
            units: queue.len(),
            units_per_mapper,
            emits,
            dropped_emits,
            map_elapsed_ms: map_elapsed.as_millis(),
            reduce_elapsed_ms: reduce_elapsed.as_millis(),
            partitions,
        })
    }
}

/// Runs `map` over `units` on `num_mappers` threads, then `reduce` over
/// `num_reducers` partitions chosen by `partition`.
pub fn run<S, M, R, P>(
    units: &[S],
    map: M,
    num_mappers: usize,
    reduce: R,
    num_reducers: usize,
    partition: P,
) -> Result<RunStats, RunError>
where
    S: AsRef<str> + Sync,
    M: Fn(&str, &Emitter<'_>) + Sync,
    R: Fn(&str, &mut PullIterator, usize) + Sync,
    P: Fn(&str, usize) -> usize + Sync,
{
    Job::new(RunConfig::new(num_mappers, num_reducers)).run(units, map, reduce, partition)
}
