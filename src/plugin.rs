//! Loads applications built as dynamic libraries.
//!
//! A library exports `map` and `reduce` with the [`MapFunction`] and
//! [`ReduceFunction`] signatures, and may export `partition`
//! ([`PartitionFunction`]); without it keys go through [`default_partition`].
//! The library has to be built by the same compiler as the host, since the
//! functions use the Rust ABI.

use crate::apps::App;
use crate::error::PluginError;
use crate::hash::default_partition;
use crate::models::{MapFunction, PartitionFunction, ReduceFunction};
use libloading::Library;

pub struct AppLibrary {
    app: App,
    _library: Library,
}

impl AppLibrary {
    pub fn load(path: &str) -> Result<Self, PluginError> {
        unsafe {
            let library = Library::new(path).map_err(|source| PluginError::Load {
                path: path.to_string(),
                source,
            })?;
            let map = *library
                .get::<MapFunction>(b"map")
                .map_err(missing(path, "map"))?;
            let reduce = *library
                .get::<ReduceFunction>(b"reduce")
                .map_err(missing(path, "reduce"))?;
            let partition = library
                .get::<PartitionFunction>(b"partition")
                .map(|f| *f)
                .unwrap_or(default_partition as PartitionFunction);
            tracing::debug!(path, "loaded app library");

            Ok(Self {
                app: App {
                    map,
                    reduce,
                    partition,
                },
                _library: library,
            })
        }
    }

    /// The loaded callbacks. They must not be called after `self` is dropped.
    pub fn app(&self) -> App {
        self.app
    }
}

fn missing<'a>(
    path: &'a str,
    symbol: &'static str,
) -> impl FnOnce(libloading::Error) -> PluginError + 'a {
    move |source| PluginError::MissingSymbol {
        path: path.to_string(),
        symbol,
        source,
    }
}
