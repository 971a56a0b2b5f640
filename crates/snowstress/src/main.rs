//! SnowStress - concurrent stress driver for snowcache

mod worker;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use snowcache::{CacheConfig, LruCache};
use tracing::{error, info};

use crate::worker::Workload;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of worker threads
    #[arg(short, long, default_value_t = 8)]
    threads: usize,

    /// Operations per thread
    #[arg(short, long, default_value_t = 100_000)]
    ops: u64,

    /// Cache capacity (number of items); overrides --config
    #[arg(short, long)]
    capacity: Option<usize>,

    /// JSON cache config file, e.g. {"capacity": 1024}
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of distinct keys
    #[arg(short, long, default_value_t = 4096)]
    keys: u64,

    /// Fraction of operations that are reads
    #[arg(short, long, default_value_t = 0.8)]
    read_ratio: f64,

    /// RNG seed
    #[arg(short, long, default_value_t = 0)]
    seed: u64,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

fn load_config(args: &Args) -> Result<CacheConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            CacheConfig::from_json(&text)?
        }
        None => CacheConfig::default(),
    };

    if let Some(capacity) = args.capacity {
        config.capacity = capacity;
    }
    Ok(config)
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;
    let cache = Arc::new(LruCache::from_config(&config)?);

    info!("Starting SnowStress v{}", env!("CARGO_PKG_VERSION"));
    info!("Cache capacity: {}", config.capacity);
    info!(
        "Threads: {}, ops/thread: {}, keys: {}, read ratio: {}",
        args.threads, args.ops, args.keys, args.read_ratio
    );

    let workload = Workload {
        threads: args.threads,
        ops_per_thread: args.ops,
        key_space: args.keys,
        read_ratio: args.read_ratio,
        seed: args.seed,
    };
    let report = worker::run(cache, &workload)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        info!(
            "{} ops in {} ms ({:.0} ops/sec)",
            report.total_ops, report.elapsed_ms, report.ops_per_sec
        );
        info!(
            "Hits: {}, misses: {}, hit ratio: {:.3}, evictions: {}",
            report.stats.hits, report.stats.misses, report.stats.hit_ratio, report.stats.evictions
        );
        info!("Final size: {}/{}", report.final_len, report.capacity);
    }

    if !report.passed() {
        error!(
            "Check failed: torn reads {}, consistent {}",
            report.torn_reads, report.consistent
        );
        bail!("stress check failed");
    }

    info!("Stress check passed");
    Ok(())
}
