use anyhow::{Context, Result, anyhow};
use clap::ArgMatches;
use colored::Colorize;
use fievel_core::crawl::{CrawlOptions, count_visited, execute_crawl};
use fievel_core::print_banner;
use fievel_core::report::{ReportFormat, generate_report, save_report};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Everything `handle_crawl` needs, pulled out of the parsed command line.
#[derive(Debug, Clone)]
pub struct CrawlRequest {
    pub options: CrawlOptions,
    pub format: ReportFormat,
    pub output: Option<PathBuf>,
    pub quiet: bool,
}

/// Install the fmt subscriber. `RUST_LOG` wins; otherwise `--verbose` selects `info`.
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// The seed must be an absolute URL with a host; the crawler cannot start from anything else.
pub fn validate_seed(raw: &str) -> Result<Url, String> {
    let invalid = || format!("URL should be in the form 'https://www.<hostname>/<path>', got '{}'", raw);

    let url = Url::parse(raw).map_err(|_| invalid())?;
    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(invalid()),
    }
}

pub fn build_crawl_request(matches: &ArgMatches) -> Result<CrawlRequest, String> {
    let raw_url = matches
        .get_one::<String>("url")
        .map(String::as_str)
        .unwrap_or(crate::commands::DEFAULT_SEED);
    let seed = validate_seed(raw_url)?;

    let max_depth = *matches.get_one::<usize>("depth").unwrap_or(&3);
    let threads = usize::from(*matches.get_one::<u16>("parallel").unwrap_or(&4));
    let verbose = matches.get_flag("verbose");
    let quiet = matches.get_flag("quiet");

    let format_name = matches
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("text");
    let format = ReportFormat::from_str(format_name)
        .ok_or_else(|| format!("Unknown report format '{}'", format_name))?;

    Ok(CrawlRequest {
        options: CrawlOptions {
            url: seed.to_string(),
            threads,
            max_depth,
            verbose,
            // The spinner would fight with log lines for the terminal.
            show_progress_bars: !quiet && !verbose,
        },
        format,
        output: matches.get_one::<PathBuf>("output").cloned(),
        quiet,
    })
}

pub async fn handle_crawl(matches: &ArgMatches) -> Result<()> {
    let request = build_crawl_request(matches).map_err(|e| anyhow!(e))?;
    init_tracing(request.options.verbose);
    debug!("Crawl options: {:?}", request.options);

    if !request.quiet {
        print_banner(request.options.threads);
    }

    let records = execute_crawl(request.options.clone(), None)
        .await
        .map_err(|e| anyhow!(e))?;

    let report = generate_report(&records, &request.options, request.format)
        .context("Failed to render report")?;

    match request.output {
        Some(ref path) => {
            save_report(&report, path)
                .with_context(|| format!("Failed to save report to {}", path.display()))?;
            if !request.quiet {
                println!(
                    "{} Visited {} addresses across {} depths",
                    "✓".green().bold(),
                    count_visited(&records),
                    records.len()
                );
                println!("{} Report saved to {}", "✓".green().bold(), path.display());
            }
        }
        None => {
            println!();
            println!("{}", report);
        }
    }

    Ok(())
}
