//! Download command - fetch historical klines from Bybit and save to CSV

use anyhow::{Context, Result};
use clap::Args;
use kline_downloader::data;
use kline_downloader::{
    BybitClient, Config, FetchError, FetchRequest, HistoricalPriceFetcher, KlineSource,
};
use std::path::{Path, PathBuf};
use tracing::{error, info};

#[derive(Args, Debug, Default)]
pub struct DownloadArgs {
    /// Path to JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Market category, e.g. "inverse", "linear", "spot"
    #[arg(long)]
    pub category: Option<String>,

    /// Trading symbol, e.g. "BTCUSD"
    #[arg(short, long)]
    pub symbol: Option<String>,

    /// Interval code: 1,3,5,15,30,60,120,240,360,720,D,W,M
    #[arg(short, long)]
    pub interval: Option<String>,

    /// Start time, "YYYY-MM-DD HH:MM:SS" (local)
    #[arg(long)]
    pub start: Option<String>,

    /// End time, "YYYY-MM-DD HH:MM:SS" (local)
    #[arg(long)]
    pub end: Option<String>,

    /// Output directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Maximum candles per request
    #[arg(long)]
    pub page_limit: Option<i64>,
}

impl DownloadArgs {
    /// Config file (or defaults), then environment, then command-line overrides
    fn resolve_config<F>(&self, env: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match &self.config {
            Some(path) => {
                let config = Config::from_file(path)?;
                info!("Loaded configuration from: {}", path.display());
                config
            }
            None => Config::default(),
        };
        config.apply_env(env)?;

        if let Some(category) = &self.category {
            config.job.category = category.clone();
        }
        if let Some(symbol) = &self.symbol {
            config.job.symbol = symbol.clone();
        }
        if let Some(interval) = &self.interval {
            config.job.interval = interval.clone();
        }
        if let Some(start) = &self.start {
            config.job.start = start.clone();
        }
        if let Some(end) = &self.end {
            config.job.end = end.clone();
        }
        if let Some(output) = &self.output {
            config.output.directory = output.clone();
        }
        if let Some(page_limit) = self.page_limit {
            config.api.page_limit = page_limit;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Log prefix for a failed job
fn failure_label(err: &FetchError) -> &'static str {
    if err.is_invalid_input() {
        "Invalid job parameters"
    } else {
        "Download failed"
    }
}

/// Fetch one job and write it, returning the file and its row count
fn download_job<S: KlineSource>(
    fetcher: &HistoricalPriceFetcher<S>,
    request: &FetchRequest,
    directory: &Path,
) -> Result<(PathBuf, usize)> {
    let filename = data::output_filename(request);

    let candles = fetcher
        .fetch(request)
        .inspect_err(|e| error!("{}: {}", failure_label(e), e))
        .with_context(|| format!("Failed to download {}", filename))?;

    let filepath = data::save_to_csv(&candles, directory, &filename)
        .inspect_err(|e| error!("Failed to save {}: {}", filename, e))?;

    Ok((filepath, candles.len()))
}

pub fn run(args: DownloadArgs) -> Result<()> {
    let config = args.resolve_config(|key| std::env::var(key).ok())?;
    let request = config.fetch_request()?;

    info!(
        "Downloading {} {} ({}) klines from {} to {}",
        request.symbol(),
        request.interval(),
        request.category(),
        request.start(),
        request.end()
    );

    let client = BybitClient::with_config(config.client_config())
        .context("Failed to create HTTP client")?;
    let fetcher = HistoricalPriceFetcher::new(client).with_page_limit(config.api.page_limit)?;

    let (filepath, count) = download_job(&fetcher, &request, &config.output.directory)?;

    println!("\n{}", "=".repeat(60));
    println!("DOWNLOAD COMPLETE");
    println!("{}", "=".repeat(60));
    println!("  Symbol:   {} ({})", request.symbol(), request.category());
    println!("  Interval: {}", request.interval());
    println!("  Range:    {} -> {}", request.start(), request.end());
    println!("  Candles:  {}", count);
    println!("  File:     {}", filepath.display());
    println!("{}", "=".repeat(60));

    info!("Success");
    Ok(())
}
