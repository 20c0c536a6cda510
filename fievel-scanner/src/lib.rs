/// Emit a non-fatal diagnostic: `warn` when the crawl is verbose, `debug` otherwise.
macro_rules! diagnostic {
    ($verbose:expr, $($arg:tt)+) => {
        if $verbose {
            tracing::warn!($($arg)+);
        } else {
            tracing::debug!($($arg)+);
        }
    };
}

pub mod address;
pub mod config;
pub mod crawler;
pub mod error;
pub mod fetch;
pub mod links;
pub mod model;
pub mod worker;

pub use address::Address;
pub use config::CrawlConfig;
pub use crawler::{Crawler, ProgressCallback};
pub use error::ScanError;
pub use fetch::{Fetcher, TlsFetcher};
pub use model::{DepthRecord, VisitedIndex, WorkerResult};
pub use worker::Worker;
