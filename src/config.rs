use crate::error::{ConfigError, RunError};
use crate::store::MAX_PARTITIONS;
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_REDUCERS: usize = 10;

/// Worker counts for one run. Missing fields take their defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub num_mappers: usize,
    /// Also the partition count.
    pub num_reducers: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            num_mappers: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            num_reducers: DEFAULT_REDUCERS,
        }
    }
}

impl RunConfig {
    pub fn new(num_mappers: usize, num_reducers: usize) -> Self {
        Self {
            num_mappers,
            num_reducers,
        }
    }

    pub fn validate(&self) -> Result<(), RunError> {
        if self.num_mappers == 0 {
            return Err(RunError::NoMappers);
        }
        if !(1..=MAX_PARTITIONS).contains(&self.num_reducers) {
            return Err(RunError::InvalidReducerCount {
                requested: self.num_reducers,
                max: MAX_PARTITIONS,
            });
        }
        Ok(())
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }
}
