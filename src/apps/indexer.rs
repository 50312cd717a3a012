//! Inverted index: maps every word to the sorted list of files containing it.

use crate::emitter::Emitter;
use crate::reducer::PullIterator;
use std::collections::HashSet;

pub fn map(unit: &str, emitter: &Emitter<'_>) {
    if let Some(contents) = super::read_unit(unit) {
        map_contents(unit, &contents, emitter);
    }
}

pub fn map_contents(unit: &str, contents: &str, emitter: &Emitter<'_>) {
    for word in super::words(contents).collect::<HashSet<_>>() {
        emitter.emit(word, unit);
    }
}

pub fn reduce(key: &str, pull: &mut PullIterator, partition: usize) {
    println!("{key} {}", postings(key, pull, partition));
}

/// Drains `key` and renders `count file1,file2,...` with files sorted.
pub fn postings(key: &str, pull: &mut PullIterator, partition: usize) -> String {
    let mut files = Vec::new();
    while let Some(file) = pull.get_next(key, partition) {
        files.push(file);
    }
    files.sort();
    format!("{} {}", files.len(), files.join(","))
}
