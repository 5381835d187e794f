//! ibmon - live throughput monitor for InfiniBand and RoCE ports.
//!
//! - [`collector`] resolves and samples the per-port sysfs counters
//! - [`storage`] keeps the rate history and the optional CSV log
//! - [`tui`] draws the live view
//! - [`fmt`] formats rates for display

pub mod collector;
pub mod fmt;
pub mod storage;
pub mod tui;
