pub mod commands;
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{CrawlRequest, build_crawl_request, handle_crawl, init_tracing, validate_seed};

// Re-export crawl functionality from fievel-core
pub use fievel_core::crawl::{CrawlOptions, execute_crawl, generate_crawl_report};
