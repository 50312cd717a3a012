use std::collections::TryReserveError;
use std::fmt;
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Map,
    Reduce,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Map => f.write_str("map"),
            Phase::Reduce => f.write_str("reduce"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("at least one mapper is required")]
    NoMappers,
    #[error("reducer count must be between 1 and {max}, got {requested}")]
    InvalidReducerCount { requested: usize, max: usize },
    #[error("failed to spawn {phase} worker {worker}")]
    Spawn {
        phase: Phase,
        worker: usize,
        #[source]
        source: std::io::Error,
    },
    #[error("{phase} worker {worker} panicked")]
    WorkerPanicked { phase: Phase, worker: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to allocate intermediate record")]
    Alloc(#[from] TryReserveError),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file `{}`", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file `{}`", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Invalid(#[from] RunError),
}

#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    #[error("failed to load app library `{path}`")]
    Load {
        path: String,
        #[source]
        source: libloading::Error,
    },
    #[error("app library `{path}` does not export `{symbol}`")]
    MissingSymbol {
        path: String,
        symbol: &'static str,
        #[source]
        source: libloading::Error,
    },
}
