//! Optional CSV log of rate samples.
//!
//! One row per successful sample, rates always in bytes/packets per second
//! regardless of the display unit. The first column is seconds since the
//! sink was opened (monotonic clock).

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::debug;

use crate::collector::RateSample;

pub const CSV_HEADER: &str = "time_s,rx_Bps,tx_Bps,rx_pps,tx_pps";

/// Write side of the CSV log. The file is closed on drop.
#[derive(Debug)]
pub struct CsvSink {
    writer: BufWriter<File>,
    path: PathBuf,
    started: Instant,
}

impl CsvSink {
    /// Opens (truncating, or appending when `append` is set) the CSV file.
    ///
    /// The header row is written unless appending without `force_header`.
    pub fn open(
        path: impl AsRef<Path>,
        append: bool,
        force_header: bool,
        started: Instant,
    ) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = if append {
            OpenOptions::new().create(true).append(true).open(&path)?
        } else {
            File::create(&path)?
        };
        let mut sink = Self {
            writer: BufWriter::new(file),
            path,
            started,
        };
        if !append || force_header {
            writeln!(sink.writer, "{}", CSV_HEADER)?;
            sink.writer.flush()?;
        }
        debug!(append, "opened CSV log {}", sink.path.display());
        Ok(sink)
    }

    /// Appends one row and flushes it to disk.
    pub fn write_sample(&mut self, at: Instant, sample: &RateSample) -> io::Result<()> {
        let time_s = at.saturating_duration_since(self.started).as_secs_f64();
        writeln!(
            self.writer,
            "{:.6},{:.0},{:.0},{:.0},{:.0}",
            time_s,
            sample.rx_bytes_per_sec,
            sample.tx_bytes_per_sec,
            sample.rx_packets_per_sec,
            sample.tx_packets_per_sec
        )?;
        self.writer.flush()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
