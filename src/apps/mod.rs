//! Ready-made applications usable with [`crate::run`] or the `mrrun` binary.
//!
//! Both treat an input unit as a path and read the whole file.

pub mod indexer;
pub mod wc;

use crate::hash::default_partition;
use crate::models::{MapFunction, PartitionFunction, ReduceFunction};

/// The three callbacks of one application.
#[derive(Clone, Copy)]
pub struct App {
    pub map: MapFunction,
    pub reduce: ReduceFunction,
    pub partition: PartitionFunction,
}

pub(crate) fn words(contents: &str) -> impl Iterator<Item = &str> {
    contents
        .split(|c: char| !c.is_alphabetic())
        .filter(|word| !word.is_empty())
}

pub(crate) fn read_unit(unit: &str) -> Option<String> {
    match std::fs::read_to_string(unit) {
        Ok(contents) => Some(contents),
        Err(e) => {
            tracing::warn!(unit, error = %e, "skipping unreadable input");
            None
        }
    }
}

/// Looks up a built-in application by name.
pub fn builtin(name: &str) -> Option<App> {
    let (map, reduce) = match name {
        "wc" => (wc::map as MapFunction, wc::reduce as ReduceFunction),
        "indexer" => (indexer::map as MapFunction, indexer::reduce as ReduceFunction),
        _ => return None,
    };
    Some(App {
        map,
        reduce,
        partition: default_partition,
    })
}
