//! Stress workload: threads hammering one shared cache

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use serde::Serialize;
use snowcache::{LruCache, StatsSnapshot};
use tracing::{debug, error};

/// Workload parameters
#[derive(Debug, Clone)]
pub struct Workload {
    pub threads: usize,
    pub ops_per_thread: u64,
    pub key_space: u64,
    /// Fraction of operations that are reads (0.0 to 1.0)
    pub read_ratio: f64,
    pub seed: u64,
}

/// Value written by workers; the fields must always agree with each other
#[derive(Debug, Clone)]
pub struct Stamp {
    key: u64,
    writer: u64,
    seq: u64,
    check: u64,
}

impl Stamp {
    pub fn new(key: u64, writer: u64, seq: u64) -> Self {
        Self {
            key,
            writer,
            seq,
            check: Self::checksum(key, writer, seq),
        }
    }

    /// True when this value is exactly one write's output for `key`
    pub fn is_intact_for(&self, key: u64) -> bool {
        self.key == key && self.check == Self::checksum(self.key, self.writer, self.seq)
    }

    fn checksum(key: u64, writer: u64, seq: u64) -> u64 {
        key.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ writer.rotate_left(17) ^ seq.rotate_left(39)
    }
}

/// Outcome of a stress run
#[derive(Debug, Serialize)]
pub struct Report {
    pub threads: usize,
    pub total_ops: u64,
    pub elapsed_ms: u64,
    pub ops_per_sec: f64,
    pub torn_reads: u64,
    pub final_len: usize,
    pub capacity: usize,
    pub consistent: bool,
    pub stats: StatsSnapshot,
}

impl Report {
    /// True if no torn reads were seen and the cache ended consistent
    pub fn passed(&self) -> bool {
        self.torn_reads == 0 && self.consistent && self.final_len <= self.capacity
    }
}

/// Run `workload` against `cache` and check it afterwards
pub fn run(cache: Arc<LruCache<u64, Stamp>>, workload: &Workload) -> Result<Report> {
    if workload.key_space == 0 {
        return Err(anyhow!("key space must be at least 1"));
    }
    if !(0.0..=1.0).contains(&workload.read_ratio) {
        return Err(anyhow!("read ratio must be between 0 and 1, got {}", workload.read_ratio));
    }

    let torn = Arc::new(AtomicU64::new(0));
    let start = Instant::now();

    let handles: Vec<_> = (0..workload.threads as u64)
        .map(|writer| {
            let cache = Arc::clone(&cache);
            let torn = Arc::clone(&torn);
            let workload = workload.clone();
            thread::spawn(move || worker(writer, &cache, &torn, &workload))
        })
        .collect();

    for handle in handles {
        handle
            .join()
            .map_err(|_| anyhow!("stress worker panicked"))?;
    }

    let elapsed = start.elapsed();
    let total_ops = workload.threads as u64 * workload.ops_per_thread;

    Ok(Report {
        threads: workload.threads,
        total_ops,
        elapsed_ms: elapsed.as_millis() as u64,
        ops_per_sec: rate(total_ops, elapsed),
        torn_reads: torn.load(Ordering::Relaxed),
        final_len: cache.len(),
        capacity: cache.capacity(),
        consistent: cache.is_consistent(),
        stats: cache.stats().snapshot(),
    })
}

fn worker(writer: u64, cache: &LruCache<u64, Stamp>, torn: &AtomicU64, workload: &Workload) {
    let mut rng = fastrand::Rng::with_seed(workload.seed.wrapping_add(writer));

    for seq in 0..workload.ops_per_thread {
        let key = rng.u64(0..workload.key_space);
        if rng.f64() < workload.read_ratio {
            if let Some(stamp) = cache.get(&key) {
                if !stamp.is_intact_for(key) {
                    error!(key, ?stamp, "torn read");
                    torn.fetch_add(1, Ordering::Relaxed);
                }
            }
        } else {
            cache.set(key, Stamp::new(key, writer, seq));
        }
    }

    debug!(writer, "worker finished");
}

fn rate(ops: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs == 0.0 {
        0.0
    } else {
        ops as f64 / secs
    }
}
