use crate::address::Address;
use crate::crawler::ProgressCallback;
use crate::fetch::Fetcher;
use crate::links::extract_links;
use crate::model::{VisitedIndex, WorkerResult};
use std::sync::Arc;
use tracing::debug;

/// Visits one batch of addresses for a single round.
///
/// A worker only reads the shared [`VisitedIndex`]; what it finds stays in its own
/// [`WorkerResult`] until the crawler joins it.
pub struct Worker<F: Fetcher> {
    id: usize,
    batch: Vec<String>,
    visited_index: Arc<VisitedIndex>,
    fetcher: Arc<F>,
    verbose: bool,
    progress_callback: Option<ProgressCallback>,
}

impl<F: Fetcher> Worker<F> {
    pub fn new(
        id: usize,
        batch: Vec<String>,
        visited_index: Arc<VisitedIndex>,
        fetcher: Arc<F>,
    ) -> Self {
        Self {
            id,
            batch,
            visited_index,
            fetcher,
            verbose: false,
            progress_callback: None,
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_progress_callback(mut self, callback: Option<ProgressCallback>) -> Self {
        self.progress_callback = callback;
        self
    }

    pub async fn run(self) -> WorkerResult {
        debug!("Worker {} started with {} addresses", self.id, self.batch.len());
        let mut result = WorkerResult::default();

        for raw in &self.batch {
            let address = match Address::parse(raw) {
                Ok(address) => address,
                Err(e) => {
                    diagnostic!(self.verbose, "Worker {}: {}, skipping", self.id, e);
                    continue;
                }
            };

            if let Some(ref callback) = self.progress_callback {
                callback(self.id, raw.clone());
            }

            match self.fetcher.fetch(&address).await {
                Ok(body) => {
                    for candidate in extract_links(&body) {
                        let Ok(link) = Address::parse(candidate) else {
                            diagnostic!(self.verbose, "Malformed link {} on {}, skipping", candidate, address);
                            continue;
                        };
                        if self.visited_index.contains(&link.key()) {
                            continue;
                        }
                        result.discovered.push(candidate.to_string());
                    }
                }
                Err(e) => {
                    diagnostic!(self.verbose, "Worker {}: {}, skipping", self.id, e);
                }
            }

            // Attempted counts as visited, even when the fetch failed.
            result.visited.push(address.key());
        }

        debug!(
            "Worker {} finished: {} visited, {} discovered",
            self.id,
            result.visited.len(),
            result.discovered.len()
        );
        result
    }
}
