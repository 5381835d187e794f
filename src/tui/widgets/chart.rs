//! Scrolling rate chart for one direction.
//!
//! The newest sample sits at the right edge of the plot; older samples
//! scroll left and drop off once they no longer fit.

use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders};

use crate::fmt::{format_pps, format_rate};
use crate::storage::RatePoint;
use crate::tui::layout::{
    AXIS_LABEL_WIDTH, ChartArea, MIN_SAMPLES, axis_labels, bar_height, chart_area, scale_max,
};
use crate::tui::render::RenderContext;

/// Which side of the port a panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Rx,
    Tx,
}

impl Direction {
    pub fn name(&self) -> &'static str {
        match self {
            Direction::Rx => "RX",
            Direction::Tx => "TX",
        }
    }

    fn pick(&self, point: &RatePoint) -> f64 {
        match self {
            Direction::Rx => point.rx,
            Direction::Tx => point.tx,
        }
    }
}

/// Renders a bordered rate panel.
///
/// Falls back to the title alone when the panel is too small or fewer than
/// two samples have been collected.
pub fn render_rate_panel(frame: &mut Frame, area: Rect, direction: Direction, ctx: &RenderContext) {
    let styles = ctx.styles;
    let (style, bytes, packets) = match direction {
        Direction::Rx => (
            styles.rx(),
            ctx.rates.rx_bytes_per_sec,
            ctx.rates.rx_packets_per_sec,
        ),
        Direction::Tx => (
            styles.tx(),
            ctx.rates.tx_bytes_per_sec,
            ctx.rates.tx_packets_per_sec,
        ),
    };
    let title = format!(
        " {} {} {} ",
        direction.name(),
        format_rate(bytes, ctx.view.units),
        format_pps(packets)
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles.border())
        .title(title)
        .title_style(style);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(chart) = chart_area(inner) else {
        return;
    };
    if ctx.history.len() < MIN_SAMPLES {
        return;
    }

    let samples: Vec<f64> = ctx
        .history
        .recent(chart.plot.width as usize)
        .map(|p| direction.pick(p))
        .collect();
    let units = ctx.view.units;
    let max = scale_max(samples.iter().copied(), units, ctx.view.link_gbps);

    let buf = frame.buffer_mut();
    draw_axis(buf, &chart, &axis_labels(max, units), styles.dim());
    draw_background(buf, &chart, styles.dim());
    for (i, bytes) in samples.iter().enumerate() {
        let x = chart.plot.right() - samples.len() as u16 + i as u16;
        let height = bar_height(units.from_bytes(*bytes), max, chart.plot.height);
        for row in 0..height {
            if let Some(cell) = buf.cell_mut((x, chart.plot.bottom() - 1 - row)) {
                cell.set_char('|').set_style(style);
            }
        }
    }
}

/// Right-aligned labels at the top, middle and bottom rows, then `" |"`.
fn draw_axis(buf: &mut Buffer, chart: &ChartArea, labels: &[String; 3], style: Style) {
    let gutter = chart.gutter;
    let last = gutter.height - 1;
    let rows = [0, last / 2, last];
    for (row, label) in rows.iter().zip(labels) {
        let text = format!("{:>width$}", label, width = AXIS_LABEL_WIDTH as usize);
        buf.set_stringn(
            gutter.x,
            gutter.y + row,
            text,
            AXIS_LABEL_WIDTH as usize,
            style,
        );
    }
    for y in gutter.top()..gutter.bottom() {
        buf.set_string(gutter.x + AXIS_LABEL_WIDTH, y, " |", style);
    }
}

fn draw_background(buf: &mut Buffer, chart: &ChartArea, style: Style) {
    for y in chart.plot.top()..chart.plot.bottom() {
        for x in chart.plot.left()..chart.plot.right() {
            if let Some(cell) = buf.cell_mut((x, y)) {
                cell.set_char('.').set_style(style);
            }
        }
    }
    let baseline = chart.baseline;
    for x in baseline.left()..baseline.right() {
        if let Some(cell) = buf.cell_mut((x, baseline.y)) {
            cell.set_char('-').set_style(style);
        }
    }
}
