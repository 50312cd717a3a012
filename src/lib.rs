//! Single-process MapReduce over OS threads.
//!
//! Mappers claim input units from a shared queue and [`Emitter::emit`] pairs
//! into an in-memory store split into partitions and lock-striped buckets.
//! Once every mapper has exited, one reducer per partition sorts its keys and
//! drives the Reduce callback key by key through a [`PullIterator`].
//!
//! ```no_run
//! use local_map_reduce::{default_partition, run, Emitter, PullIterator};
//!
//! let units = vec!["a b a", "b c"];
//! run(
//!     &units,
//!     |unit: &str, emitter: &Emitter<'_>| {
//!         for word in unit.split_whitespace() {
//!             emitter.emit(word, "1");
//!         }
//!     },
//!     2,
//!     |key: &str, pull: &mut PullIterator, _: usize| {
//!         println!("{key} {}", pull.values(key).count());
//!     },
//!     4,
//!     default_partition,
//! )
//! .unwrap();
//! ```

pub mod apps;
pub mod config;
pub mod coordinator;
pub mod emitter;
pub mod error;
pub mod hash;
mod mapper;
pub mod models;
pub mod plugin;
pub mod queue;
pub mod reducer;
pub mod stats;
pub mod store;
pub mod telemetry;

pub use config::RunConfig;
pub use coordinator::{run, Job};
pub use emitter::Emitter;
pub use apps::App;
pub use error::{ConfigError, Phase, PluginError, RunError, StoreError};
pub use hash::{default_hash, default_hash_partition, default_partition, Djb2Hasher};
pub use reducer::{PullIterator, Values};
pub use stats::{PartitionStats, RunStats};
pub use store::{MAX_PARTITIONS, NUM_BUCKETS};
