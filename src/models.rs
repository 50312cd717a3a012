use crate::emitter::Emitter;
use crate::reducer::PullIterator;

/// Map callback: receives one input unit and emits zero or more pairs.
pub type MapFunction = fn(&str, &Emitter<'_>);

/// Reduce callback: receives a key, the partition's pull iterator and the
/// partition index, and pulls that key's values until exhausted.
pub type ReduceFunction = fn(&str, &mut PullIterator, usize);

/// Partition callback: must return a value in `0..num_partitions`.
pub type PartitionFunction = fn(&str, usize) -> usize;
