//! Main rendering logic for TUI.

use std::time::Duration;

use chrono::{DateTime, Local};
use ratatui::Frame;
use ratatui::widgets::Block;

use crate::collector::{AddressEntry, OptionalCounter, PortCounters, RateSample, RawSnapshot};
use crate::storage::RateHistory;

use super::layout::compute_layout;
use super::state::{ViewMode, ViewState};
use super::style::Styles;
use super::widgets::{Direction, render_addresses, render_header, render_rate_panel, render_raw};

/// Everything a frame needs, borrowed from the app for one draw.
pub struct RenderContext<'a> {
    pub view: &'a ViewState,
    pub port: &'a PortCounters,
    pub interval: Duration,
    /// Rates from the last good sample.
    pub rates: RateSample,
    pub history: &'a RateHistory,
    /// Last good raw reading.
    pub snapshot: &'a RawSnapshot,
    /// Optional counters read for this frame (raw view only).
    pub optional: &'a [(OptionalCounter, u64)],
    pub addresses: &'a [AddressEntry],
    pub styles: Styles,
    pub now: DateTime<Local>,
}

/// Main render function.
pub fn render(frame: &mut Frame, ctx: &RenderContext) {
    let area = frame.area();
    frame.render_widget(Block::default().style(ctx.styles.default()), area);

    let layout = compute_layout(area, ctx.view.view);
    render_header(frame, layout.header, ctx);

    match ctx.view.view {
        ViewMode::Plot => {
            render_rate_panel(frame, layout.panels[0], Direction::Rx, ctx);
            render_rate_panel(frame, layout.panels[1], Direction::Tx, ctx);
        }
        ViewMode::Raw => render_raw(frame, &layout.panels, ctx),
        ViewMode::Address => render_addresses(frame, layout.panels[0], ctx),
    }
}
