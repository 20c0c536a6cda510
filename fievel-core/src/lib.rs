pub mod crawl;
pub mod report;

use colored::Colorize;

/// Print the startup line shown before a crawl begins.
pub fn print_banner(threads: usize) {
    println!(
        "{}",
        format!("Successfully started the web crawler with {} threads!", threads).green()
    );
}
