//! Persistent log file
//!
//! Besides the console, every run appends its log lines to
//! `./logs/logfile.log`. Writes go through a background thread so that
//! logging never blocks a crawl worker on disk I/O.

use crate::Result;
use std::path::Path;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};

/// Directory holding the log file, relative to the working directory
pub const LOG_DIR: &str = "logs";

/// Name of the log file inside [`LOG_DIR`]
pub const LOG_FILE: &str = "logfile.log";

/// Opens `dir/logfile.log` for appending behind a non-blocking writer
///
/// `dir` is created if needed. Buffered lines are flushed when the returned
/// guard is dropped, so it must live as long as logging does.
pub fn file_writer(dir: &Path) -> Result<(NonBlocking, WorkerGuard)> {
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_FILE)
        .build(dir)?;

    Ok(tracing_appender::non_blocking(appender))
}
