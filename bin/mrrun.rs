use anyhow::Context;
use clap::Parser;
use local_map_reduce::apps;
use local_map_reduce::plugin::AppLibrary;
use local_map_reduce::telemetry::init_tracing;
use local_map_reduce::{Job, RunConfig};
use std::path::PathBuf;

#[derive(Parser, Debug)]
struct CliArgs {
    /// Built-in app (`wc`, `indexer`) or path to a dynamic library exporting `map` and `reduce`
    #[arg(short, long)]
    app: String,
    #[arg(short, long)]
    mappers: Option<usize>,
    #[arg(short, long)]
    reducers: Option<usize>,
    /// JSON file with `num_mappers` / `num_reducers`; flags take precedence
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Write run statistics as JSON to this path
    #[arg(short, long)]
    stats: Option<PathBuf>,
    #[arg(short, long, num_args = 1.., value_delimiter = ' ')]
    input: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    init_tracing("info")?;
    let args = CliArgs::parse();

    let mut config = match &args.config {
        Some(path) => RunConfig::from_json_file(path)?,
        None => RunConfig::default(),
    };
    if let Some(mappers) = args.mappers {
        config.num_mappers = mappers;
    }
    if let Some(reducers) = args.reducers {
        config.num_reducers = reducers;
    }

    // Keeps a dynamically loaded app mapped for as long as its functions run.
    let library;
    let app = match apps::builtin(&args.app) {
        Some(app) => app,
        None => {
            library = AppLibrary::load(&args.app)?;
            library.app()
        }
    };

    let stats = Job::new(config)
        .run(&args.input, app.map, app.reduce, app.partition)
        .context("map reduce run failed")?;
    tracing::info!(
        units = stats.units,
        emits = stats.emits,
        dropped_emits = stats.dropped_emits,
        keys = stats.distinct_keys(),
        "Map Reduce task complete"
    );

    if let Some(path) = &args.stats {
        let json = stats.to_json().context("Error while serializing run stats")?;
        std::fs::write(path, json)
            .with_context(|| format!("Couldn't write stats file `{}`", path.display()))?;
    }
    Ok(())
}
