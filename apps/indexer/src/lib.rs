//! Inverted index, built as a dynamic library for `mrrun --app`.

use local_map_reduce::apps::indexer;
use local_map_reduce::{Emitter, PullIterator};

#[no_mangle]
pub fn map(unit: &str, emitter: &Emitter<'_>) {
    indexer::map(unit, emitter)
}

#[no_mangle]
pub fn reduce(key: &str, pull: &mut PullIterator, partition: usize) {
    indexer::reduce(key, pull, partition)
}
