//! Word count: every word is emitted with the value `1`.

use crate::emitter::Emitter;
use crate::reducer::PullIterator;

pub fn map(unit: &str, emitter: &Emitter<'_>) {
    if let Some(contents) = super::read_unit(unit) {
        map_contents(&contents, emitter);
    }
}

pub fn map_contents(contents: &str, emitter: &Emitter<'_>) {
    for word in super::words(contents) {
        emitter.emit(word, "1");
    }
}

pub fn reduce(key: &str, pull: &mut PullIterator, partition: usize) {
    let count = count(key, pull, partition);
    println!("{key} {count}");
}

/// Drains `key` and returns how many values it had.
pub fn count(key: &str, pull: &mut PullIterator, partition: usize) -> usize {
    let mut count = 0;
    while pull.get_next(key, partition).is_some() {
        count += 1;
    }
    count
}
