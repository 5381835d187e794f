//! Counter sampling and rate computation.
//!
//! Counters are cumulative `u64` totals that wrap at 2^64. A delta between
//! two readings assumes at most one wrap happened in between; with sampling
//! intervals of seconds this holds for any realistic link speed, but a very
//! long pause can hide extra wraps. No sequence numbers are available from
//! sysfs, so this cannot be detected.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use super::counters::CounterPaths;
use super::traits::FileSystem;

/// Lower bound on elapsed time used for rate conversion (1 ns).
pub const MIN_ELAPSED_SECS: f64 = 1e-9;

/// Bytes per word for word-granularity data counters.
pub const WORD_BYTES: u64 = 4;

/// Transient failure reading a counter.
#[derive(Debug)]
pub enum ReadError {
    /// The counter file could not be read.
    Io { path: PathBuf, source: io::Error },
    /// The file did not start with an unsigned decimal integer.
    Malformed { path: PathBuf, content: String },
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadError::Io { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            ReadError::Malformed { path, content } => {
                write!(f, "malformed counter in {}: {:?}", path.display(), content)
            }
        }
    }
}

impl std::error::Error for ReadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ReadError::Io { source, .. } => Some(source),
            ReadError::Malformed { .. } => None,
        }
    }
}

/// One reading of the four required counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawSnapshot {
    /// Bytes or words, see [`CounterPaths::data_is_words`].
    pub tx_data: u64,
    pub rx_data: u64,
    pub tx_packets: u64,
    pub rx_packets: u64,
    pub taken_at: Instant,
}

/// Rates derived from two consecutive snapshots, per second.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RateSample {
    pub tx_bytes_per_sec: f64,
    pub rx_bytes_per_sec: f64,
    pub tx_packets_per_sec: f64,
    pub rx_packets_per_sec: f64,
}

/// Wrap-safe difference between two readings of a 64-bit counter.
///
/// Equals `cur - prev` when `cur >= prev`, otherwise `(cur + 2^64) - prev`.
pub fn delta(prev: u64, cur: u64) -> u64 {
    cur.wrapping_sub(prev)
}

/// Converts a delta into a per-second rate.
pub fn to_rate(delta: u64, elapsed_secs: f64) -> f64 {
    delta as f64 / elapsed_secs.max(MIN_ELAPSED_SECS)
}

/// Computes the rate sample between two snapshots.
///
/// Data deltas (not packet deltas) are scaled to bytes when the counters are
/// word-granular.
pub fn rate_between(prev: &RawSnapshot, cur: &RawSnapshot, data_is_words: bool) -> RateSample {
    let elapsed = cur
        .taken_at
        .saturating_duration_since(prev.taken_at)
        .as_secs_f64();
    let scale = if data_is_words { WORD_BYTES } else { 1 };

    let tx_bytes = delta(prev.tx_data, cur.tx_data).saturating_mul(scale);
    let rx_bytes = delta(prev.rx_data, cur.rx_data).saturating_mul(scale);

    RateSample {
        tx_bytes_per_sec: to_rate(tx_bytes, elapsed),
        rx_bytes_per_sec: to_rate(rx_bytes, elapsed),
        tx_packets_per_sec: to_rate(delta(prev.tx_packets, cur.tx_packets), elapsed),
        rx_packets_per_sec: to_rate(delta(prev.rx_packets, cur.rx_packets), elapsed),
    }
}

/// Parses the first whitespace-delimited token as an unsigned integer.
pub fn parse_counter(content: &str) -> Option<u64> {
    content.split_whitespace().next()?.parse().ok()
}

/// Reads a single counter file.
pub fn read_counter<F: FileSystem>(fs: &F, path: &Path) -> Result<u64, ReadError> {
    let content = fs.read_to_string(path).map_err(|source| ReadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_counter(&content).ok_or_else(|| ReadError::Malformed {
        path: path.to_path_buf(),
        content: content.trim().chars().take(32).collect(),
    })
}

/// Reads all four required counters, stamped with `now`.
pub fn read_snapshot<F: FileSystem>(
    fs: &F,
    paths: &CounterPaths,
    now: Instant,
) -> Result<RawSnapshot, ReadError> {
    Ok(RawSnapshot {
        tx_data: read_counter(fs, &paths.tx_data)?,
        rx_data: read_counter(fs, &paths.rx_data)?,
        tx_packets: read_counter(fs, &paths.tx_packets)?,
        rx_packets: read_counter(fs, &paths.rx_packets)?,
        taken_at: now,
    })
}

/// Owns the previous snapshot and the most recent rates.
///
/// A failed read leaves both untouched, so the display keeps showing the
/// last good values.
#[derive(Debug, Clone)]
pub struct Sampler {
    paths: CounterPaths,
    previous: RawSnapshot,
    current: RateSample,
}

impl Sampler {
    /// Reads the baseline snapshot.
    pub fn prime<F: FileSystem>(fs: &F, paths: CounterPaths) -> Result<Self, ReadError> {
        Self::prime_at(fs, paths, Instant::now())
    }

    pub fn prime_at<F: FileSystem>(
        fs: &F,
        paths: CounterPaths,
        now: Instant,
    ) -> Result<Self, ReadError> {
        let previous = read_snapshot(fs, &paths, now)?;
        Ok(Self {
            paths,
            previous,
            current: RateSample::default(),
        })
    }

    /// Takes a new reading and updates the current rates.
    pub fn sample<F: FileSystem>(&mut self, fs: &F) -> Result<RateSample, ReadError> {
        self.sample_at(fs, Instant::now())
    }

    pub fn sample_at<F: FileSystem>(
        &mut self,
        fs: &F,
        now: Instant,
    ) -> Result<RateSample, ReadError> {
        let snapshot = read_snapshot(fs, &self.paths, now)?;
        let rates = rate_between(&self.previous, &snapshot, self.paths.data_is_words);
        self.previous = snapshot;
        self.current = rates;
        Ok(rates)
    }

    /// Last successfully read snapshot.
    pub fn last_snapshot(&self) -> &RawSnapshot {
        &self.previous
    }

    /// Rates from the last successful sample (zero before the first one).
    pub fn current(&self) -> RateSample {
        self.current
    }
}
