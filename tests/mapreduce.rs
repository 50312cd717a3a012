use local_map_reduce::{
    default_partition, run, Emitter, Job, Phase, PullIterator, RunConfig, RunError,
};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

fn drain(key: &str, pull: &mut PullIterator, partition: usize) -> Vec<String> {
    let mut values = Vec::new();
    while let Some(value) = pull.get_next(key, partition) {
        values.push(value);
    }
    values
}

#[test]
fn cat_and_dog_come_back_newest_first() {
    let units = vec!["only"];
    let seen = Mutex::new(Vec::new());

    run(
        &units,
        |_: &str, emitter: &Emitter<'_>| {
            emitter.emit("cat", "1");
            emitter.emit("dog", "2");
            emitter.emit("cat", "3");
        },
        1,
        |key: &str, pull: &mut PullIterator, partition: usize| {
            let values = drain(key, pull, partition);
            assert_eq!(pull.get_next(key, partition), None);
            seen.lock().push((key.to_string(), values));
        },
        1,
        |_: &str, _: usize| 0,
    )
    .unwrap();

    assert_eq!(
        seen.into_inner(),
        vec![
            ("cat".to_string(), vec!["3".to_string(), "1".to_string()]),
            ("dog".to_string(), vec!["2".to_string()]),
        ]
    );
}

#[test]
fn disjoint_keys_from_two_mappers_land_in_one_partition() {
    let units = vec!["0", "1"];
    let keys = Mutex::new(Vec::new());

    let stats = run(
        &units,
        |unit: &str, emitter: &Emitter<'_>| {
            for i in 0..10_000 {
                emitter.emit(&format!("{unit}-{i}"), "v");
            }
        },
        2,
        |key: &str, pull: &mut PullIterator, partition: usize| {
            assert_eq!(partition, 0);
            assert_eq!(drain(key, pull, partition).len(), 1);
            keys.lock().push(key.to_string());
        },
        4,
        |_: &str, _: usize| 0,
    )
    .unwrap();

    assert_eq!(stats.partitions[0].distinct_keys, 20_000);
    let keys = keys.into_inner();
    let unique: HashSet<&String> = keys.iter().collect();
    assert_eq!(keys.len(), 20_000);
    assert_eq!(unique.len(), 20_000);
    for partition in &stats.partitions[1..] {
        assert_eq!(partition.distinct_keys, 0);
        assert_eq!(partition.keys_reduced, 0);
    }
}

#[test]
fn every_emitted_value_is_pulled_exactly_once() {
    let units: Vec<String> = (0..40).map(|i| i.to_string()).collect();
    let pulled = Mutex::new(HashMap::<String, usize>::new());

    let stats = run(
        &units,
        |unit: &str, emitter: &Emitter<'_>| {
            let n: usize = unit.parse().unwrap();
            for i in 0..=n {
                emitter.emit(&format!("key-{}", i % 7), unit);
            }
        },
        6,
        |key: &str, pull: &mut PullIterator, partition: usize| {
            let count = drain(key, pull, partition).len();
            *pulled.lock().entry(key.to_string()).or_default() += count;
        },
        5,
        default_partition,
    )
    .unwrap();

    let expected_total: u64 = (1..=40).sum();
    assert_eq!(stats.emits, expected_total);
    assert_eq!(stats.dropped_emits, 0);
    assert_eq!(stats.values_pulled(), expected_total);
    assert_eq!(stats.residual_values(), 0);
    assert_eq!(stats.units_per_mapper.iter().sum::<usize>(), 40);

    let pulled = pulled.into_inner();
    assert_eq!(pulled.len(), 7);
    assert_eq!(pulled.values().sum::<usize>() as u64, expected_total);
    for partition in &stats.partitions {
        assert_eq!(partition.distinct_keys, partition.keys_reduced);
    }
}

#[test]
fn each_partition_reduces_its_keys_in_sorted_order() {
    let units: Vec<String> = ["pear apple fig", "kiwi apple banana", "fig date cherry"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let order = Mutex::new(BTreeMap::<usize, Vec<String>>::new());

    run(
        &units,
        |unit: &str, emitter: &Emitter<'_>| {
            for word in unit.split_whitespace() {
                emitter.emit(word, "1");
            }
        },
        3,
        |key: &str, pull: &mut PullIterator, partition: usize| {
            drain(key, pull, partition);
            order.lock().entry(partition).or_default().push(key.to_string());
        },
        3,
        default_partition,
    )
    .unwrap();

    let order = order.into_inner();
    let mut all = Vec::new();
    for (partition, keys) in &order {
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, &sorted, "partition {partition} out of order");
        for key in keys {
            assert_eq!(default_partition(key, 3), *partition);
        }
        all.extend(keys.iter().cloned());
    }
    all.sort();
    assert_eq!(
        all,
        vec!["apple", "banana", "cherry", "date", "fig", "kiwi", "pear"]
    );
}

#[test]
fn no_reduce_runs_while_a_mapper_is_active() {
    let units: Vec<String> = (0..16).map(|i| i.to_string()).collect();
    let active_mappers = AtomicUsize::new(0);
    let overlap = AtomicBool::new(false);

    run(
        &units,
        |unit: &str, emitter: &Emitter<'_>| {
            active_mappers.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(Duration::from_millis(5));
            emitter.emit(unit, "v");
            active_mappers.fetch_sub(1, Ordering::SeqCst);
        },
        4,
        |key: &str, pull: &mut PullIterator, partition: usize| {
            if active_mappers.load(Ordering::SeqCst) != 0 {
                overlap.store(true, Ordering::SeqCst);
            }
            drain(key, pull, partition);
        },
        4,
        default_partition,
    )
    .unwrap();

    assert!(!overlap.load(Ordering::SeqCst));
}

#[test]
fn empty_partitions_never_invoke_reduce() {
    let units = vec!["x"];
    let calls = Mutex::new(Vec::new());

    let stats = run(
        &units,
        |_: &str, emitter: &Emitter<'_>| emitter.emit("only-key", "1"),
        1,
        |key: &str, pull: &mut PullIterator, partition: usize| {
            drain(key, pull, partition);
            calls.lock().push(partition);
        },
        8,
        |_: &str, _: usize| 5,
    )
    .unwrap();

    assert_eq!(calls.into_inner(), vec![5]);
    assert_eq!(stats.partitions.len(), 8);
    assert_eq!(stats.partitions.iter().filter(|p| p.keys_reduced > 0).count(), 1);
}

#[test]
fn unread_values_are_discarded_without_affecting_later_keys() {
    let units = vec!["u"];
    let seen = Mutex::new(Vec::new());

    let stats = run(
        &units,
        |_: &str, emitter: &Emitter<'_>| {
            for value in ["1", "2", "3"] {
                emitter.emit("a", value);
                emitter.emit("b", value);
            }
        },
        1,
        |key: &str, pull: &mut PullIterator, partition: usize| {
            if key == "a" {
                pull.get_next(key, partition);
            } else {
                seen.lock().extend(drain(key, pull, partition));
            }
        },
        1,
        default_partition,
    )
    .unwrap();

    assert_eq!(seen.into_inner(), vec!["3", "2", "1"]);
    assert_eq!(stats.values_pulled(), 4);
    assert_eq!(stats.residual_values(), 2);
}

#[test]
fn independent_runs_can_execute_concurrently() {
    let results: Vec<BTreeMap<String, usize>> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..3)
            .map(|run_id| {
                scope.spawn(move || {
                    let units: Vec<String> = (0..10).map(|i| format!("{run_id}:{i}")).collect();
                    let counts = Mutex::new(BTreeMap::new());
                    Job::new(RunConfig::new(3, 4))
                        .run(
                            &units,
                            |unit: &str, emitter: &Emitter<'_>| {
                                let (prefix, _) = unit.split_once(':').unwrap();
                                emitter.emit(prefix, unit);
                            },
                            |key: &str, pull: &mut PullIterator, partition: usize| {
                                let n = drain(key, pull, partition).len();
                                counts.lock().insert(key.to_string(), n);
                            },
                            default_partition,
                        )
                        .unwrap();
                    counts.into_inner()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for (run_id, counts) in results.iter().enumerate() {
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[&run_id.to_string()], 10);
    }
}

#[test]
fn failed_map_phase_skips_reduce() {
    let units = vec!["ok", "bad", "ok"];
    let reduced = AtomicBool::new(false);

    let err = run(
        &units,
        |unit: &str, emitter: &Emitter<'_>| {
            if unit == "bad" {
                panic!("cannot map {unit}");
            }
            emitter.emit(unit, "1");
        },
        1,
        |_: &str, _: &mut PullIterator, _: usize| reduced.store(true, Ordering::SeqCst),
        2,
        default_partition,
    )
    .unwrap_err();

    assert!(matches!(
        err,
        RunError::WorkerPanicked {
            phase: Phase::Map,
            ..
        }
    ));
    assert!(!reduced.load(Ordering::SeqCst));
}

#[test]
fn out_of_range_partitioner_fails_the_run() {
    let units = vec!["u"];
    let err = run(
        &units,
        |_: &str, emitter: &Emitter<'_>| emitter.emit("k", "v"),
        1,
        |_: &str, _: &mut PullIterator, _: usize| {},
        2,
        |_: &str, n: usize| n,
    )
    .unwrap_err();

    assert!(matches!(
        err,
        RunError::WorkerPanicked {
            phase: Phase::Map,
            worker: 0
        }
    ));
}
