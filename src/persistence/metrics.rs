//! Latency and outcome metrics for repository operations

use crate::config::TelemetryConfig;
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Default number of duration samples kept per operation
pub const DEFAULT_MAX_SAMPLES: usize = 1000;

/// Metrics collector shared by telemetry stages
///
/// Clones share the same underlying state.
#[derive(Debug, Clone)]
pub struct OperationMetrics {
    calls: Arc<RwLock<HashMap<String, u64>>>,
    errors: Arc<RwLock<HashMap<String, u64>>>,
    durations: Arc<RwLock<HashMap<String, VecDeque<Duration>>>>,
    max_samples: usize,
}

impl Default for OperationMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl OperationMetrics {
    /// Create a collector keeping [`DEFAULT_MAX_SAMPLES`] durations per operation
    pub fn new() -> Self {
        Self::with_max_samples(DEFAULT_MAX_SAMPLES)
    }

    /// Create a collector keeping at most `max_samples` durations per operation
    pub fn with_max_samples(max_samples: usize) -> Self {
        Self {
            calls: Arc::new(RwLock::new(HashMap::new())),
            errors: Arc::new(RwLock::new(HashMap::new())),
            durations: Arc::new(RwLock::new(HashMap::new())),
            max_samples: max_samples.max(1),
        }
    }

    /// Create a collector sized by the telemetry configuration
    pub fn from_config(config: &TelemetryConfig) -> Self {
        Self::with_max_samples(config.max_samples)
    }

    /// Record one finished call
    pub async fn record(&self, operation: &str, elapsed: Duration, failed: bool) {
        *self
            .calls
            .write()
            .await
            .entry(operation.to_string())
            .or_insert(0) += 1;

        if failed {
            *self
                .errors
                .write()
                .await
                .entry(operation.to_string())
                .or_insert(0) += 1;
        }

        let mut durations = self.durations.write().await;
        let samples = durations.entry(operation.to_string()).or_default();
        samples.push_back(elapsed);
        while samples.len() > self.max_samples {
            samples.pop_front();
        }
    }

    /// Number of calls recorded for an operation
    pub async fn call_count(&self, operation: &str) -> u64 {
        self.calls.read().await.get(operation).copied().unwrap_or(0)
    }

    /// Number of failed calls recorded for an operation
    pub async fn error_count(&self, operation: &str) -> u64 {
        self.errors.read().await.get(operation).copied().unwrap_or(0)
    }

    /// Average duration for an operation
    pub async fn avg_duration(&self, operation: &str) -> Option<Duration> {
        let durations = self.durations.read().await;
        let samples = durations.get(operation).filter(|s| !s.is_empty())?;
        let sum: Duration = samples.iter().sum();
        Some(sum / samples.len() as u32)
    }

    /// Percentile duration for an operation, `percentile` in 0..=100
    pub async fn percentile_duration(&self, operation: &str, percentile: f64) -> Option<Duration> {
        let durations = self.durations.read().await;
        let samples = durations.get(operation).filter(|s| !s.is_empty())?;
        let mut sorted: Vec<Duration> = samples.iter().copied().collect();
        sorted.sort();
        Some(sorted[percentile_index(sorted.len(), percentile / 100.0)])
    }

    /// Snapshot of every recorded operation
    pub async fn summary(&self) -> MetricsSummary {
        let calls = self.calls.read().await.clone();
        let errors = self.errors.read().await.clone();
        let durations = self.durations.read().await;

        let mut stats = HashMap::new();
        for (operation, samples) in durations.iter() {
            let mut sorted: Vec<Duration> = samples.iter().copied().collect();
            sorted.sort();
            let (Some(&min), Some(&max)) = (sorted.first(), sorted.last()) else {
                continue;
            };
            let sum: Duration = sorted.iter().sum();
            stats.insert(
                operation.clone(),
                DurationStats {
                    count: sorted.len(),
                    avg: sum / sorted.len() as u32,
                    p50: sorted[percentile_index(sorted.len(), 0.50)],
                    p95: sorted[percentile_index(sorted.len(), 0.95)],
                    p99: sorted[percentile_index(sorted.len(), 0.99)],
                    min,
                    max,
                },
            );
        }

        MetricsSummary {
            calls,
            errors,
            durations: stats,
        }
    }

    /// Forget everything recorded so far
    pub async fn reset(&self) {
        self.calls.write().await.clear();
        self.errors.write().await.clear();
        self.durations.write().await.clear();
    }
}

fn percentile_index(len: usize, fraction: f64) -> usize {
    let index = ((len as f64 - 1.0) * fraction.clamp(0.0, 1.0)) as usize;
    index.min(len - 1)
}

/// Snapshot of recorded metrics
#[derive(Debug, Clone, Default, Serialize)]
pub struct MetricsSummary {
    /// Calls per operation
    pub calls: HashMap<String, u64>,
    /// Failed calls per operation
    pub errors: HashMap<String, u64>,
    /// Duration statistics per operation
    pub durations: HashMap<String, DurationStats>,
}

/// Duration statistics for an operation
#[derive(Debug, Clone, Serialize)]
pub struct DurationStats {
    /// Number of samples in the window
    pub count: usize,
    /// Average duration
    pub avg: Duration,
    /// 50th percentile
    pub p50: Duration,
    /// 95th percentile
    pub p95: Duration,
    /// 99th percentile
    pub p99: Duration,
    /// Minimum duration
    pub min: Duration,
    /// Maximum duration
    pub max: Duration,
}

/// Measures one call from creation until [`finish`](MetricsTimer::finish)
pub struct MetricsTimer {
    operation: &'static str,
    start: Instant,
}

impl MetricsTimer {
    /// Start timing an operation
    pub fn start(operation: &'static str) -> Self {
        Self {
            operation,
            start: Instant::now(),
        }
    }

    /// Operation label
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// Stop the timer and return the elapsed time
    pub fn finish(self) -> Duration {
        self.start.elapsed()
    }
}
