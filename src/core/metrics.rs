use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use super::event::Callback;
use super::listener::{ChannelListener, Status};

/// Snapshot of listener metrics at a point in time
#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub listener_name: String,
    pub connects: u64,
    pub reads: u64,
    pub writes: u64,
    pub closes: u64,
    pub total_callbacks: u64,
    pub last_status: Option<Status>,
    pub average_callback_ms: f64,
    pub p95_callback_ms: f64,
    pub p99_callback_ms: f64,
    pub last_callback_time: Option<Instant>,
}

/// Thread-safe callback counters and timings for one listener
#[derive(Debug)]
pub struct ListenerMetrics {
    listener_name: String,

    // Callback counters
    connects: AtomicU64,
    reads: AtomicU64,
    writes: AtomicU64,
    closes: AtomicU64,

    // Last status seen by connect/read/write
    last_status: AtomicI64,
    has_status: AtomicBool,

    // Latency tracking
    latency_tracker: Mutex<LatencyTracker>,

    // Last activity tracking
    last_callback_time: Mutex<Option<Instant>>,
}

impl ListenerMetrics {
    pub fn new(listener_name: impl Into<String>) -> Self {
        Self {
            listener_name: listener_name.into(),
            connects: AtomicU64::new(0),
            reads: AtomicU64::new(0),
            writes: AtomicU64::new(0),
            closes: AtomicU64::new(0),
            last_status: AtomicI64::new(0),
            has_status: AtomicBool::new(false),
            latency_tracker: Mutex::new(LatencyTracker::new()),
            last_callback_time: Mutex::new(None),
        }
    }

    /// Record one callback and how long the listener took to handle it
    pub fn record(&self, callback: Callback, status: Option<Status>, elapsed: Duration) {
        let counter = match callback {
            Callback::Connect => &self.connects,
            Callback::Read => &self.reads,
            Callback::Write => &self.writes,
            Callback::Close => &self.closes,
        };
        counter.fetch_add(1, Ordering::Relaxed);

        if let Some(status) = status {
            self.last_status.store(status, Ordering::Relaxed);
            self.has_status.store(true, Ordering::Relaxed);
        }

        *relock(&self.last_callback_time) = Some(Instant::now());
        relock(&self.latency_tracker).record_latency(elapsed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let connects = self.connects.load(Ordering::Relaxed);
        let reads = self.reads.load(Ordering::Relaxed);
        let writes = self.writes.load(Ordering::Relaxed);
        let closes = self.closes.load(Ordering::Relaxed);

        let last_status = self
            .has_status
            .load(Ordering::Relaxed)
            .then(|| self.last_status.load(Ordering::Relaxed));

        let (average, p95, p99) = {
            let tracker = relock(&self.latency_tracker);
            (
                tracker.average_latency_ms(),
                tracker.percentile_latency_ms(95.0),
                tracker.percentile_latency_ms(99.0),
            )
        };

        MetricsSnapshot {
            listener_name: self.listener_name.clone(),
            connects,
            reads,
            writes,
            closes,
            total_callbacks: connects + reads + writes + closes,
            last_status,
            average_callback_ms: average,
            p95_callback_ms: p95,
            p99_callback_ms: p99,
            last_callback_time: *relock(&self.last_callback_time),
        }
    }

    /// Reset all metrics (useful for testing)
    pub fn reset(&self) {
        self.connects.store(0, Ordering::Relaxed);
        self.reads.store(0, Ordering::Relaxed);
        self.writes.store(0, Ordering::Relaxed);
        self.closes.store(0, Ordering::Relaxed);
        self.last_status.store(0, Ordering::Relaxed);
        self.has_status.store(false, Ordering::Relaxed);
        relock(&self.latency_tracker).reset();
        *relock(&self.last_callback_time) = None;
    }

    pub fn listener_name(&self) -> &str {
        &self.listener_name
    }
}

fn relock<V>(mutex: &Mutex<V>) -> MutexGuard<'_, V> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Times each callback of the inner listener into shared [`ListenerMetrics`].
pub struct MeteredListener<L> {
    inner: L,
    metrics: Arc<ListenerMetrics>,
}

impl<L> MeteredListener<L> {
    pub fn new(inner: L, metrics: Arc<ListenerMetrics>) -> Self {
        Self { inner, metrics }
    }

    pub fn metrics(&self) -> Arc<ListenerMetrics> {
        Arc::clone(&self.metrics)
    }

    // A panicking callback still counts; the panic is rethrown for outer layers.
    fn timed(&self, callback: Callback, status: Option<Status>, call: impl FnOnce()) {
        let started = Instant::now();
        let outcome = panic::catch_unwind(AssertUnwindSafe(call));
        self.metrics.record(callback, status, started.elapsed());
        if let Err(payload) = outcome {
            panic::resume_unwind(payload);
        }
    }
}

impl<T: ?Sized, L: ChannelListener<T>> ChannelListener<T> for MeteredListener<L> {
    fn on_close(&self, data: &mut T) {
        self.timed(Callback::Close, None, || self.inner.on_close(data));
    }

    fn on_connect(&self, status: Status, data: &mut T) {
        self.timed(Callback::Connect, Some(status), || {
            self.inner.on_connect(status, data)
        });
    }

    fn on_read(&self, status: Status, data: &mut T) {
        self.timed(Callback::Read, Some(status), || self.inner.on_read(status, data));
    }

    fn on_write(&self, status: Status, data: &mut T) {
        self.timed(Callback::Write, Some(status), || {
            self.inner.on_write(status, data)
        });
    }
}

/// Latency tracking with sliding window for percentiles
#[derive(Debug)]
struct LatencyTracker {
    latencies: Vec<Duration>,
    max_samples: usize,
    next_index: usize,
}

impl LatencyTracker {
    fn new() -> Self {
        Self {
            latencies: Vec::with_capacity(1000),
            max_samples: 1000, // Keep last 1000 samples for percentile calculation
            next_index: 0,
        }
    }

    fn record_latency(&mut self, latency: Duration) {
        if self.latencies.len() < self.max_samples {
            self.latencies.push(latency);
        } else {
            self.latencies[self.next_index] = latency;
            self.next_index = (self.next_index + 1) % self.max_samples;
        }
    }

    fn average_latency_ms(&self) -> f64 {
        if self.latencies.is_empty() {
            return 0.0;
        }

        let total_ms: f64 = self.latencies.iter().map(|d| d.as_secs_f64() * 1000.0).sum();

        total_ms / self.latencies.len() as f64
    }

    fn percentile_latency_ms(&self, percentile: f64) -> f64 {
        if self.latencies.is_empty() {
            return 0.0;
        }

        let mut sorted = self.latencies.clone();
        sorted.sort();

        let index = ((percentile / 100.0) * sorted.len() as f64) as usize;
        let index = index.min(sorted.len() - 1);

        sorted[index].as_secs_f64() * 1000.0
    }

    fn reset(&mut self) {
        self.latencies.clear();
        self.next_index = 0;
    }
}
