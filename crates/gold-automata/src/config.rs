// Search configuration for nondeterministic and pushdown queries

use std::time::Duration;

/// Default bounded wait of an idle worker before it re-checks termination.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5);

/// How acceptance queries explore branches.
///
/// The verdict never depends on these settings; only the cost of reaching
/// it and, when several runs accept, which witness path comes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Worker threads. `1` drains the task queue on the calling thread.
    pub workers: usize,
    /// How long an idle worker waits for new tasks before re-checking
    /// whether the query has finished.
    pub poll_interval: Duration,
    /// Skip configurations (branch, tape position) already explored in the
    /// same query. Besides saving work this makes epsilon cycles longer than
    /// a self-loop terminate.
    pub deduplicate: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            workers: 1,
            poll_interval: DEFAULT_POLL_INTERVAL,
            deduplicate: true,
        }
    }
}

impl SearchConfig {
    /// Single-threaded search.
    pub fn sequential() -> Self {
        Self::default()
    }

    /// Search on a pool of `workers` threads (at least one).
    pub fn parallel(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
            ..Self::default()
        }
    }

    /// Pool sized to the machine's available parallelism.
    pub fn available_parallelism() -> Self {
        let workers = std::thread::available_parallelism()
            .map(usize::from)
            .unwrap_or(1);
        Self::parallel(workers)
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_deduplication(mut self, deduplicate: bool) -> Self {
        self.deduplicate = deduplicate;
        self
    }

    #[inline]
    pub fn is_parallel(&self) -> bool {
        self.workers > 1
    }
}
