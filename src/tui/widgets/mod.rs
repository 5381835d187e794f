//! TUI widgets for ibmon.

mod address;
mod chart;
mod header;
mod raw;

pub use address::render_addresses;
pub use chart::{Direction, render_rate_panel};
pub use header::render_header;
pub use raw::render_raw;
