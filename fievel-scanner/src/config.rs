use std::time::Duration;

pub const DEFAULT_MAX_DEPTH: usize = 3;
pub const DEFAULT_WORKERS: usize = 4;
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(5);
pub const HTTPS_PORT: u16 = 443;

/// Settings shared by the crawler, its workers and the TLS fetcher.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    pub max_depth: usize,
    pub workers: usize,
    pub verbose: bool,
    pub read_timeout: Duration,
    pub port: u16,
}

impl CrawlConfig {
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Zero workers would never make progress, so the count is clamped to at least one.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            workers: DEFAULT_WORKERS,
            verbose: false,
            read_timeout: DEFAULT_READ_TIMEOUT,
            port: HTTPS_PORT,
        }
    }
}
