//! Word count, built as a dynamic library for `mrrun --app`.

use local_map_reduce::apps::wc;
use local_map_reduce::{Emitter, PullIterator};

#[no_mangle]
pub fn map(unit: &str, emitter: &Emitter<'_>) {
    wc::map(unit, emitter)
}

#[no_mangle]
pub fn reduce(key: &str, pull: &mut PullIterator, partition: usize) {
    wc::reduce(key, pull, partition)
}
