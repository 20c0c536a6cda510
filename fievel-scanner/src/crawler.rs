use crate::config::CrawlConfig;
use crate::error::{Result, ScanError};
use crate::fetch::{Fetcher, TlsFetcher};
use crate::model::{DepthRecord, VisitedIndex, WorkerResult};
use crate::worker::Worker;
use futures::future::join_all;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

/// Called with `(worker_id, address)` just before a worker fetches an address.
pub type ProgressCallback = Arc<dyn Fn(usize, String) + Send + Sync>;

/// Breadth-first crawler that runs one fork-join round of workers per depth level.
pub struct Crawler<F: Fetcher = TlsFetcher> {
    fetcher: Arc<F>,
    config: CrawlConfig,
    progress_callback: Option<ProgressCallback>,
}

impl Crawler<TlsFetcher> {
    pub fn new() -> Result<Self> {
        Self::with_config(CrawlConfig::default())
    }

    pub fn with_config(config: CrawlConfig) -> Result<Self> {
        let fetcher = TlsFetcher::from_config(&config)?;
        Ok(Self {
            fetcher: Arc::new(fetcher),
            config,
            progress_callback: None,
        })
    }
}

impl<F: Fetcher> Crawler<F> {
    pub fn with_fetcher(fetcher: F) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            config: CrawlConfig::default(),
            progress_callback: None,
        }
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.config = self.config.with_max_depth(depth);
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.config = self.config.with_workers(workers);
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.config = self.config.with_verbose(verbose);
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    /// Crawl outward from `seed` and return one visited record per depth reached.
    ///
    /// The crawl stops when the next frontier lies beyond `max_depth` or is empty. Nothing in
    /// here fails: bad addresses, failed fetches and crashed workers are logged and skipped.
    pub async fn crawl(&self, seed: &str) -> Vec<DepthRecord> {
        info!(
            "Starting crawl of {} with {} workers (max depth {})",
            seed, self.config.workers, self.config.max_depth
        );

        let mut index = Arc::new(VisitedIndex::new());
        let mut frontier = DepthRecord::new(0, vec![seed.to_string()]);

        while frontier.depth <= self.config.max_depth && !frontier.is_empty() {
            if frontier.depth != 0 {
                info!("Crawling at a depth of : {}", frontier.depth);
            }

            let results = self.dispatch(&frontier, &index).await;
            let (visited, next) = merge(frontier.depth, results);
            debug!(
                "Depth {} finished: {} visited, {} queued for depth {}",
                visited.depth,
                visited.len(),
                next.len(),
                next.depth
            );

            // Every worker of the round has been joined, so nobody else holds the index.
            Arc::make_mut(&mut index).push(visited);
            frontier = next;
        }

        if !frontier.is_empty() {
            debug!(
                "Discarding {} addresses at depth {} (max depth {})",
                frontier.len(),
                frontier.depth,
                self.config.max_depth
            );
        }

        let records = Arc::unwrap_or_clone(index).into_records();
        info!(
            "Crawl complete. Visited {} pages across {} depths",
            records.iter().map(DepthRecord::len).sum::<usize>(),
            records.len()
        );
        records
    }

    /// Spawn one worker per batch and wait for all of them before returning.
    async fn dispatch(&self, frontier: &DepthRecord, index: &Arc<VisitedIndex>) -> Vec<WorkerResult> {
        let batches: Vec<Vec<String>> = if frontier.len() == 1 {
            vec![frontier.addresses.clone()]
        } else {
            partition(&frontier.addresses, self.config.workers)
                .into_iter()
                .map(<[String]>::to_vec)
                .collect()
        };

        let mut handles = Vec::with_capacity(batches.len());
        for (worker_id, batch) in batches.into_iter().enumerate() {
            if batch.is_empty() {
                continue;
            }
            debug!("Dispatching {} addresses to worker {}", batch.len(), worker_id);
            let worker = Worker::new(worker_id, batch, index.clone(), self.fetcher.clone())
                .with_verbose(self.config.verbose)
                .with_progress_callback(self.progress_callback.clone());
            handles.push(tokio::spawn(worker.run()));
        }

        let mut results = Vec::with_capacity(handles.len());
        for outcome in join_all(handles).await {
            match outcome {
                Ok(result) => results.push(result),
                Err(e) => {
                    let err = ScanError::from(e);
                    diagnostic!(self.config.verbose, "A worker unexpectedly failed: {}", err);
                }
            }
        }
        results
    }
}

/// Split `items` into exactly `workers` contiguous batches.
///
/// Every batch holds `len / workers` items except the last, which runs to the end of the
/// slice. When there are fewer items than workers the leading batches are empty.
pub fn partition<T>(items: &[T], workers: usize) -> Vec<&[T]> {
    let workers = workers.max(1);
    let split = items.len() / workers;

    (0..workers)
        .map(|i| {
            let start = split * i;
            let end = if i == workers - 1 { items.len() } else { split * (i + 1) };
            &items[start..end]
        })
        .collect()
}

/// Drop repeated addresses, keeping the first occurrence of each.
pub fn dedup(addresses: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(addresses.len());
    addresses
        .into_iter()
        .filter(|address| seen.insert(address.clone()))
        .collect()
}

/// Fold a round's worker results into the visited record for `depth` and the next frontier.
fn merge(depth: usize, results: Vec<WorkerResult>) -> (DepthRecord, DepthRecord) {
    let mut visited = Vec::new();
    let mut discovered = Vec::new();
    for result in results {
        visited.extend(result.visited);
        discovered.extend(result.discovered);
    }

    (
        DepthRecord::new(depth, dedup(visited)),
        DepthRecord::new(depth + 1, dedup(discovered)),
    )
}
