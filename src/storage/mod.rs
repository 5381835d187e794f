//! In-memory rate history and the optional CSV log.

pub mod csv;
pub mod history;

pub use csv::{CSV_HEADER, CsvSink};
pub use history::{DEFAULT_HISTORY_CAPACITY, RateHistory, RatePoint};
