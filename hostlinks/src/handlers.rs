use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;
use hostlinks_core::crawl::{CrawlOptions, execute_crawl, generate_host_listing};
use hostlinks_scanner::CancellationToken;
use std::sync::Arc;
use std::time::Duration;
use tracing::Level;

/// Build crawl options from parsed command-line arguments
pub fn crawl_options_from_matches(matches: &ArgMatches) -> Result<CrawlOptions> {
    let seed = matches
        .get_one::<String>("URL")
        .cloned()
        .context("no seed URL given")?;
    let threads = *matches
        .get_one::<usize>("threads")
        .context("missing --threads")?;
    let timeout = *matches
        .get_one::<u64>("timeout")
        .context("missing --timeout")?;
    let drain_timeout = *matches
        .get_one::<u64>("drain-timeout")
        .context("missing --drain-timeout")?;
    let cancel_timeout = *matches
        .get_one::<u64>("cancel-timeout")
        .context("missing --cancel-timeout")?;

    Ok(CrawlOptions {
        seed,
        threads,
        request_timeout: Duration::from_secs(timeout),
        drain_timeout: Duration::from_secs(drain_timeout),
        cancel_timeout: Duration::from_secs(cancel_timeout),
        show_progress_bars: !matches.get_flag("quiet"),
        interrupt: None,
    })
}

/// Operational logs go to stderr so stdout carries only the listing
pub fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

pub async fn handle_crawl(matches: &ArgMatches) {
    init_logging(matches.get_flag("verbose"));
    let quiet = matches.get_flag("quiet");

    let mut options = match crawl_options_from_matches(matches) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("{} {:#}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    };

    // Ctrl-C stops the wait and prints whatever has been collected
    let interrupt = CancellationToken::new();
    let ctrl_c = interrupt.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });
    options.interrupt = Some(interrupt);

    let progress_callback = if quiet {
        None
    } else {
        let callback: hostlinks_core::CrawlProgressCallback = Arc::new(|msg: String| {
            eprintln!("{}", msg.bright_blue());
        });
        Some(callback)
    };

    match execute_crawl(options, progress_callback).await {
        Ok(report) => print!("{}", generate_host_listing(&report)),
        Err(e) => {
            eprintln!("{} Crawl failed: {}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    }
}
