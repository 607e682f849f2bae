//! CSV output for fetched klines
//!
//! Writes one row per candle under a fixed header, fields in upstream order
//! and untouched, and reads such files back.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::error::FetchResult;
use crate::types::{Candle, FetchRequest};

/// Header row of every output file
pub const CSV_HEADER: [&str; 7] = [
    "timestamp", "open", "high", "low", "close", "volume", "turnover",
];

/// Deterministic file name for a fetch job
///
/// `{symbol}_{interval}_{start}_{end}.csv`, with spaces in the dates turned
/// into `_` and colons into `-`.
pub fn output_filename(request: &FetchRequest) -> String {
    let clean = |s: &str| s.trim().replace(' ', "_").replace(':', "-");
    format!(
        "{}_{}_{}_{}.csv",
        request.symbol(),
        request.interval(),
        clean(request.start()),
        clean(request.end())
    )
}

/// Save candles to `directory/filename`, creating the directory if needed
pub fn save_to_csv(
    candles: &[Candle],
    directory: impl AsRef<Path>,
    filename: &str,
) -> FetchResult<PathBuf> {
    let directory = directory.as_ref();
    fs::create_dir_all(directory)?;
    let filepath = directory.join(filename);

    write_csv(candles, &filepath).inspect_err(|e| {
        error!("Failed to write data to {}: {}", filepath.display(), e);
    })?;

    info!("Saved {} rows to {}", candles.len(), filepath.display());
    Ok(filepath)
}

fn write_csv(candles: &[Candle], filepath: &Path) -> FetchResult<()> {
    let mut writer = csv::Writer::from_path(filepath)?;

    // Written explicitly so an empty result still gets a header
    writer.write_record(CSV_HEADER)?;
    for candle in candles {
        writer.write_record([
            &candle.open_time,
            &candle.open,
            &candle.high,
            &candle.low,
            &candle.close,
            &candle.volume,
            &candle.turnover,
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Load candles from a file written by [`save_to_csv`]
pub fn load_csv(path: impl AsRef<Path>) -> FetchResult<Vec<Candle>> {
    let mut reader = csv::Reader::from_path(path.as_ref())?;

    let mut candles = Vec::new();
    for result in reader.deserialize() {
        let candle: Candle = result?;
        candles.push(candle);
    }

    Ok(candles)
}
