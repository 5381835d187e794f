//! Shared fixtures for render tests.

use std::path::Path;
use std::time::Duration;

use chrono::Local;
use ratatui::Terminal;
use ratatui::backend::TestBackend;

use crate::collector::{
    AddressEntry, MOCK_DEVICE, MockFs, OptionalCounter, PortCounters, RateSample, RawSnapshot,
    SYSFS_IB_ROOT, Sampler, read_addresses, resolve_port,
};
use crate::fmt::Units;
use crate::storage::RateHistory;

use super::render::{RenderContext, render};
use super::state::{Background, ViewState};
use super::style::Styles;

/// Resolved mock port with some history.
pub struct Fixture {
    pub port: PortCounters,
    pub snapshot: RawSnapshot,
    pub rates: RateSample,
    pub history: RateHistory,
    pub view: ViewState,
    pub optional: Vec<(OptionalCounter, u64)>,
    pub addresses: Vec<AddressEntry>,
}

impl Fixture {
    pub fn new() -> Self {
        let fs = MockFs::infiniband_port();
        let port = resolve_port(&fs, Path::new(SYSFS_IB_ROOT), MOCK_DEVICE, 1).unwrap();
        let sampler = Sampler::prime(&fs, port.paths.clone()).unwrap();

        let mut history = RateHistory::new(64);
        for i in 0..40 {
            history.append(i as f64 * 1e6, (40 - i) as f64 * 1e6);
        }

        Self {
            snapshot: *sampler.last_snapshot(),
            rates: RateSample {
                tx_bytes_per_sec: 1e6,
                rx_bytes_per_sec: 39e6,
                tx_packets_per_sec: 100.0,
                rx_packets_per_sec: 3900.0,
            },
            history,
            view: ViewState::new(Units::Bits, port.link.rate_gbps()),
            optional: port.optional.read_all(&fs),
            addresses: read_addresses(&fs, &port.port_dir),
            port,
        }
    }

    pub fn context(&self) -> RenderContext<'_> {
        RenderContext {
            view: &self.view,
            port: &self.port,
            interval: Duration::from_secs(1),
            rates: self.rates,
            history: &self.history,
            snapshot: &self.snapshot,
            optional: &self.optional,
            addresses: &self.addresses,
            styles: Styles::new(Background::Black),
            now: Local::now(),
        }
    }
}

/// Draws one frame into a test backend and returns its rows joined by
/// newlines.
pub fn render_to_string(width: u16, height: u16, ctx: &RenderContext) -> String {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal.draw(|frame| render(frame, ctx)).unwrap();
    let buffer = terminal.backend().buffer();
    (0..buffer.area.height)
        .map(|y| {
            (0..buffer.area.width)
                .map(|x| buffer[(x, y)].symbol())
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
