use colored::Colorize;
use fievel_scanner::{CrawlConfig, Crawler, DepthRecord, Fetcher, ProgressCallback};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Options for configuring a crawl operation
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    pub url: String,
    pub threads: usize,
    pub max_depth: usize,
    pub verbose: bool,
    pub show_progress_bars: bool,
}

impl CrawlOptions {
    pub fn to_config(&self) -> CrawlConfig {
        CrawlConfig::default()
            .with_max_depth(self.max_depth)
            .with_workers(self.threads)
            .with_verbose(self.verbose)
    }
}

/// Callback for reporting crawl progress
pub type CrawlProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Execute a crawl over TLS with the given options
/// Returns one visited record per depth reached
pub async fn execute_crawl(
    options: CrawlOptions,
    progress_callback: Option<CrawlProgressCallback>,
) -> Result<Vec<DepthRecord>, String> {
    let crawler = Crawler::with_config(options.to_config())
        .map_err(|e| format!("Failed to set up TLS client: {}", e))?;
    Ok(run_crawl(crawler, &options, progress_callback).await)
}

/// Drive an already-built crawler, wiring up the spinner and progress messages.
pub async fn run_crawl<F: Fetcher>(
    crawler: Crawler<F>,
    options: &CrawlOptions,
    progress_callback: Option<CrawlProgressCallback>,
) -> Vec<DepthRecord> {
    // Set up single progress bar for overall crawl progress (only if enabled)
    let progress_bar = if options.show_progress_bars {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message("Starting crawl...");
        Some(Arc::new(pb))
    } else {
        None
    };

    let processed_count = Arc::new(AtomicUsize::new(0));

    let count_clone = processed_count.clone();
    let pb_clone = progress_bar.clone();
    let message_cb = progress_callback.clone();
    let internal_progress_callback: ProgressCallback = Arc::new(move |worker_id, url| {
        let count = count_clone.fetch_add(1, Ordering::Relaxed) + 1;
        if let Some(ref pb) = pb_clone {
            pb.set_message(format!("Crawling... {} URLs processed", count));
            pb.tick();
        } else if let Some(ref callback) = message_cb {
            callback(format!("[worker {}] {}", worker_id, url));
        }
    });

    let crawler = crawler
        .with_max_depth(options.max_depth)
        .with_workers(options.threads)
        .with_verbose(options.verbose)
        .with_progress_callback(internal_progress_callback);

    let records = crawler.crawl(&options.url).await;

    if let Some(ref pb) = progress_bar {
        let total = processed_count.load(Ordering::Relaxed);
        pb.finish_with_message(format!("Crawl complete! {} URLs processed", total));
    }

    records
}

/// Total number of visited addresses across all depths
pub fn count_visited(records: &[DepthRecord]) -> usize {
    records.iter().map(DepthRecord::len).sum()
}

/// Render one depth record the way the terminal report shows it.
pub fn format_depth_record(record: &DepthRecord) -> String {
    if record.is_empty() {
        return format!("{}", "Nothing to see here!".purple());
    }

    let mut addresses = String::new();
    for address in &record.addresses {
        addresses.push_str(address);
        addresses.push('\n');
    }

    format!(
        "{}\n\n{}",
        format!("----- DEPTH: {} -----", record.depth).purple(),
        addresses.cyan()
    )
}

/// Generate a crawl report from results
pub fn generate_crawl_report(records: &[DepthRecord]) -> String {
    let mut report = String::new();
    for record in records {
        report.push_str(&format_depth_record(record));
        report.push('\n');
    }
    report
}
