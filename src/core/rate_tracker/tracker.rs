//! Core rate tracker implementation

use std::collections::{BTreeMap, VecDeque};

/// Width of one arrival bucket
pub const BUCKET_WIDTH_MS: i64 = 1_000;

/// Second-granularity arrival counter with a bounded smoothing history
///
/// Memory is O(window) regardless of request volume: at most one bucket per
/// second of the window plus one history sample per second.
#[derive(Debug, Clone)]
pub struct RateTracker {
    /// Smoothing window in seconds
    pub(super) window_secs: u32,
    /// Request counts keyed by bucket start (ms since epoch)
    pub(super) buckets: BTreeMap<i64, u64>,
    /// Recent non-zero per-second rates, oldest first
    pub(super) history: VecDeque<u64>,
}

impl RateTracker {
    /// Create a tracker keeping `window_secs` seconds of data
    ///
    /// A zero window is treated as one second.
    pub fn new(window_secs: u32) -> Self {
        let window_secs = window_secs.max(1);
        Self {
            window_secs,
            buckets: BTreeMap::new(),
            history: VecDeque::with_capacity(window_secs as usize),
        }
    }

    /// Record one request arriving at `now_ms`
    pub fn record(&mut self, now_ms: i64) {
        *self.buckets.entry(bucket_key(now_ms)).or_insert(0) += 1;
        self.purge(now_ms);
    }

    /// Sample the current rate, feeding the smoothing history
    ///
    /// Returns the raw count of the trailing second when it is non-zero.
    /// During a quiet second the mean of the history is returned instead, so
    /// the estimate decays rather than dropping straight to zero between
    /// bursts.
    pub fn current_rate(&mut self, now_ms: i64) -> f64 {
        self.purge(now_ms);

        let live = self.trailing_second(now_ms);
        if live == 0 {
            return self.history_mean();
        }

        let is_new_sample = self
            .history
            .back()
            .is_none_or(|&last| last.abs_diff(live) > 1);
        if is_new_sample {
            if self.history.len() >= self.window_secs as usize {
                self.history.pop_front();
            }
            self.history.push_back(live);
        }

        live as f64
    }

    /// The value [`current_rate`](Self::current_rate) would return, without
    /// purging buckets or sampling into the history
    pub fn peek_rate(&self, now_ms: i64) -> f64 {
        match self.trailing_second(now_ms) {
            0 => self.history_mean(),
            live => live as f64,
        }
    }

    /// Requests counted in buckets that are still inside the window
    pub fn request_count(&self, now_ms: i64) -> u64 {
        self.buckets.range(self.cutoff(now_ms)..).map(|(_, count)| count).sum()
    }

    /// Number of seconds inside the window that saw at least one request
    pub fn active_seconds(&self, now_ms: i64) -> usize {
        self.buckets.range(self.cutoff(now_ms)..).count()
    }

    /// Number of samples in the smoothing history
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Smoothing window in seconds
    pub fn window_secs(&self) -> u32 {
        self.window_secs
    }

    /// Resize the window, dropping the oldest samples that no longer fit
    ///
    /// A zero window is treated as one second, as in [`new`](Self::new).
    pub fn set_window(&mut self, window_secs: u32) {
        self.window_secs = window_secs.max(1);
        while self.history.len() > self.window_secs as usize {
            self.history.pop_front();
        }
    }

    /// Forget all buckets and samples
    pub fn reset(&mut self) {
        self.buckets.clear();
        self.history.clear();
    }

    fn trailing_second(&self, now_ms: i64) -> u64 {
        self.buckets
            .range(now_ms.saturating_sub(BUCKET_WIDTH_MS)..)
            .map(|(_, count)| count)
            .sum()
    }

    fn history_mean(&self) -> f64 {
        if self.history.is_empty() {
            return 0.0;
        }
        self.history.iter().sum::<u64>() as f64 / self.history.len() as f64
    }

    fn cutoff(&self, now_ms: i64) -> i64 {
        now_ms.saturating_sub(i64::from(self.window_secs).saturating_mul(BUCKET_WIDTH_MS))
    }

    /// Remove buckets older than the window
    fn purge(&mut self, now_ms: i64) {
        let cutoff = self.cutoff(now_ms);
        if self.buckets.first_key_value().is_some_and(|(&oldest, _)| oldest < cutoff) {
            self.buckets = self.buckets.split_off(&cutoff);
        }
    }
}

fn bucket_key(now_ms: i64) -> i64 {
    now_ms.div_euclid(BUCKET_WIDTH_MS).saturating_mul(BUCKET_WIDTH_MS)
}
