// Report generation from crawl results

use crate::crawl::{CrawlOptions, count_visited, generate_crawl_report};
use fievel_scanner::DepthRecord;
use std::fs::File;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }
}

pub fn generate_json_report(
    records: &[DepthRecord],
    options: &CrawlOptions,
) -> Result<String, serde_json::Error> {
    let json_report = serde_json::json!({
        "report": {
            "metadata": {
                "generator": "Fievel",
                "version": env!("CARGO_PKG_VERSION"),
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "format": "json",
            },
            "crawl": {
                "seed": options.url,
                "max_depth": options.max_depth,
                "workers": options.threads,
            },
            "summary": {
                "depths_reached": records.len(),
                "total_visited": count_visited(records),
            },
            "depths": records,
        }
    });

    serde_json::to_string_pretty(&json_report)
}

/// Render `records` in the requested format.
pub fn generate_report(
    records: &[DepthRecord],
    options: &CrawlOptions,
    format: ReportFormat,
) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Text => Ok(generate_crawl_report(records)),
        ReportFormat::Json => generate_json_report(records, options),
    }
}

pub fn save_report(content: &str, path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}
