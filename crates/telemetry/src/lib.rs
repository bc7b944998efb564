//! Logging and search statistics for Viberyte tools
//!
//! Libraries only emit `tracing` events; binaries call [`init_logging`]
//! once at startup to decide where those events go. [`SearchStats`]
//! keeps per-process counters and latency samples for smart searches.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Global search statistics
static STATS: Lazy<SearchStats> = Lazy::new(SearchStats::new);

/// Number of most recent latency samples kept for percentiles
pub const LATENCY_WINDOW: usize = 1024;

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `info` or `viberyte_search=debug`
    pub level: String,
    /// Emit JSON lines instead of compact text
    pub json: bool,
    /// Append to this file instead of stderr
    pub file: Option<PathBuf>,
    /// Include the event target in each line
    pub show_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json: false,
            file: None,
            show_target: false,
        }
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `config.level`. When logging to a file
/// the returned guard flushes pending lines on drop and must be held until
/// the process exits.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)
            .map_err(|e| anyhow::anyhow!("Invalid log level '{}': {}", config.level, e))?,
    };

    let (writer, guard) = match &config.file {
        Some(path) => {
            let (writer, guard) = file_writer(path)?;
            (writer, Some(guard))
        }
        None => (BoxMakeWriter::new(std::io::stderr), None),
    };

    let registry = tracing_subscriber::registry().with(filter);
    let installed = if config.json {
        registry
            .with(fmt::layer().json().with_target(config.show_target).with_writer(writer))
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .compact()
                    .with_target(config.show_target)
                    .with_ansi(config.file.is_none())
                    .with_writer(writer),
            )
            .try_init()
    };
    installed.map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {}", e))?;

    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        level = %config.level,
        json = config.json,
        "Logging initialized"
    );

    Ok(guard)
}

fn file_writer(path: &Path) -> anyhow::Result<(BoxMakeWriter, WorkerGuard)> {
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Log file path has no file name: {}", path.display()))?;
    let directory = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name.to_string_lossy().into_owned())
        .build(directory)
        .map_err(|e| anyhow::anyhow!("Failed to open log file {}: {}", path.display(), e))?;
    let (writer, guard) = tracing_appender::non_blocking(appender);
    Ok((BoxMakeWriter::new(writer), guard))
}

/// Counters and latency samples for smart searches
///
/// Counters cover the whole process lifetime; latency statistics cover the
/// last [`LATENCY_WINDOW`] searches.
pub struct SearchStats {
    searches: RwLock<BTreeMap<String, AtomicU64>>,
    results: AtomicU64,
    latencies_ms: RwLock<VecDeque<f64>>,
    start_time: Instant,
}

impl SearchStats {
    fn new() -> Self {
        Self {
            searches: RwLock::new(BTreeMap::new()),
            results: AtomicU64::new(0),
            latencies_ms: RwLock::new(VecDeque::with_capacity(LATENCY_WINDOW)),
            start_time: Instant::now(),
        }
    }

    /// Record one completed search
    pub fn record(&self, mode: &str, elapsed: Duration, venue_count: usize) {
        let known = {
            let searches = self.searches.read().unwrap_or_else(|e| e.into_inner());
            searches
                .get(mode)
                .map(|counter| counter.fetch_add(1, Ordering::Relaxed))
                .is_some()
        };
        if !known {
            let mut searches = self.searches.write().unwrap_or_else(|e| e.into_inner());
            searches
                .entry(mode.to_string())
                .or_insert_with(|| AtomicU64::new(0))
                .fetch_add(1, Ordering::Relaxed);
        }

        self.results.fetch_add(venue_count as u64, Ordering::Relaxed);
        let mut latencies = self.latencies_ms.write().unwrap_or_else(|e| e.into_inner());
        if latencies.len() == LATENCY_WINDOW {
            latencies.pop_front();
        }
        latencies.push_back(elapsed.as_secs_f64() * 1000.0);
    }

    /// Number of searches recorded for a mode
    pub fn count(&self, mode: &str) -> u64 {
        self.searches
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(mode)
            .map_or(0, |counter| counter.load(Ordering::Relaxed))
    }

    /// Point-in-time copy of all statistics
    pub fn snapshot(&self) -> StatsSnapshot {
        let searches: BTreeMap<String, u64> = self
            .searches
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(|(mode, counter)| (mode.clone(), counter.load(Ordering::Relaxed)))
            .collect();
        let samples: Vec<f64> = self
            .latencies_ms
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .copied()
            .collect();
        let latency = LatencyStats::from_values(&samples);

        StatsSnapshot {
            total_searches: searches.values().sum(),
            searches,
            venues_returned: self.results.load(Ordering::Relaxed),
            latency_ms: latency,
            uptime_secs: self.start_time.elapsed().as_secs(),
        }
    }
}

/// Serializable view of [`SearchStats`]
#[derive(Debug, Clone, Serialize)]
pub struct StatsSnapshot {
    pub total_searches: u64,
    pub searches: BTreeMap<String, u64>,
    pub venues_returned: u64,
    pub latency_ms: LatencyStats,
    pub uptime_secs: u64,
}

/// Latency distribution in milliseconds
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LatencyStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub p50: f64,
    pub p95: f64,
}

impl LatencyStats {
    fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let count = sorted.len();
        let sum: f64 = sorted.iter().sum();

        Self {
            count,
            min: sorted[0],
            max: sorted[count - 1],
            mean: sum / count as f64,
            p50: percentile(&sorted, 50.0),
            p95: percentile(&sorted, 95.0),
        }
    }
}

fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let idx = ((p / 100.0) * (sorted.len() - 1) as f64).round() as usize;
    sorted[idx.min(sorted.len() - 1)]
}

/// Get the global search statistics
pub fn stats() -> &'static SearchStats {
    &STATS
}

/// Measures one search
///
/// Nothing is recorded unless [`SearchTimer::finish`] is called.
pub struct SearchTimer {
    start: Instant,
}

impl SearchTimer {
    /// Start timing
    pub fn start() -> Self {
        Self { start: Instant::now() }
    }

    /// Stop timing and record the search in the global statistics
    pub fn finish(self, mode: &str, venue_count: usize) -> Duration {
        let elapsed = self.start.elapsed();
        stats().record(mode, elapsed, venue_count);
        tracing::debug!(
            mode,
            venues = venue_count,
            duration_us = elapsed.as_micros() as u64,
            "Search timed"
        );
        elapsed
    }
}
