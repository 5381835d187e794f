//! Terminal User Interface for ibmon.
//!
//! A live view of one port: scrolling RX/TX rate charts, the raw counter
//! values, or the port's GID table. Rendering is a pure function of the
//! [`App`] state and the frame size.

mod app;
mod event;
#[cfg(test)]
mod fixture;
mod input;
pub mod layout;
mod render;
mod state;
mod style;
mod widgets;

pub use app::{App, AppConfig, CsvConfig, MIN_INTERVAL, install_panic_hook};
pub use state::{Background, ViewMode, ViewState};
