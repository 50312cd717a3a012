use crate::emitter::Emitter;
use crate::error::{Phase, RunError};
use crate::queue::WorkQueue;
use std::thread;

/// Runs `num_mappers` workers over `queue` and blocks until every one of them
/// has exited. Returns how many units each worker processed.
pub(crate) fn run_mappers<S, M>(
    queue: &WorkQueue<'_, S>,
    map: &M,
    emitter: &Emitter<'_>,
    num_mappers: usize,
) -> Result<Vec<usize>, RunError>
where
    S: AsRef<str> + Sync,
    M: Fn(&str, &Emitter<'_>) + Sync,
{
    thread::scope(|scope| {
        let mut handles = Vec::with_capacity(num_mappers);
        let mut spawn_error = None;
        for worker in 0..num_mappers {
            let spawned = thread::Builder::new()
                .name(format!("mapper-{worker}"))
                .spawn_scoped(scope, move || {
                    let mut processed = 0;
                    while let Some(unit) = queue.claim_next() {
                        tracing::trace!(worker, unit, "mapping unit");
                        map(unit, emitter);
                        processed += 1;
                    }
                    processed
                });
            match spawned {
                Ok(handle) => handles.push(handle),
                Err(source) => {
                    spawn_error = Some(RunError::Spawn {
                        phase: Phase::Map,
                        worker,
                        source,
                    });
                    break;
                }
            }
        }

        let mut processed = Vec::with_capacity(handles.len());
        let mut panicked = None;
        for (worker, handle) in handles.into_iter().enumerate() {
            match handle.join() {
                Ok(count) => processed.push(count),
                Err(_) => {
                    tracing::error!(worker, "mapper panicked");
                    panicked.get_or_insert(RunError::WorkerPanicked {
                        phase: Phase::Map,
                        worker,
                    });
                }
            }
        }

        match spawn_error.or(panicked) {
            Some(e) => Err(e),
            None => Ok(processed),
        }
    })
}
