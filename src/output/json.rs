//! JSON results file
//!
//! The file holds one object with `total_count`, `counts` and `status`, the
//! serialized form of `ScrapeStats`.

use crate::storage::ScrapeStats;
use crate::Result;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Writes crawl results to `path`, replacing any existing file
pub fn write_results(stats: &ScrapeStats, path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, stats)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Reads crawl results previously written by [`write_results`]
pub fn read_results(path: &Path) -> Result<ScrapeStats> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}
