//! Screen geometry and chart scaling.
//!
//! Everything here is pure: the renderer calls these functions every frame
//! with the current frame area, so a resize simply produces a different
//! layout on the next draw.

use ratatui::layout::Rect;

use crate::fmt::{Units, format_axis_label};

use super::state::ViewMode;

/// Rows reserved for the header.
pub const HEADER_HEIGHT: u16 = 4;
/// Minimum body height of the plot view (two panels).
pub const MIN_PLOT_ROWS: u16 = 6;
/// Minimum body height of the raw view (three panels).
pub const MIN_RAW_ROWS: u16 = 9;
/// Below this many chart rows a panel draws labels only.
pub const MIN_CHART_HEIGHT: u16 = 3;
/// Below this many chart columns a panel draws labels only.
pub const MIN_CHART_WIDTH: u16 = 10;
/// Samples needed before a chart is drawn.
pub const MIN_SAMPLES: usize = 2;
/// Width of the right-aligned y-axis labels.
pub const AXIS_LABEL_WIDTH: u16 = 11;
/// Label column plus the `" |"` separator.
pub const GUTTER_WIDTH: u16 = AXIS_LABEL_WIDTH + 2;

/// Terminal size, compared frame to frame to detect resizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Geometry {
    pub width: u16,
    pub height: u16,
}

impl From<Rect> for Geometry {
    fn from(area: Rect) -> Self {
        Self {
            width: area.width,
            height: area.height,
        }
    }
}

/// Header plus body panels, top to bottom.
///
/// Plot: `[rx, tx]`. Raw: `[rx, tx, other]`. Address: `[table]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenLayout {
    pub header: Rect,
    pub panels: Vec<Rect>,
}

/// Splits `area` for the given view.
///
/// The body height is floored at the view's minimum; panels that fall
/// outside a smaller terminal are clipped to `area` (possibly to nothing).
pub fn compute_layout(area: Rect, view: ViewMode) -> ScreenLayout {
    let header = Rect {
        height: HEADER_HEIGHT.min(area.height),
        ..area
    };
    let body_y = area.y.saturating_add(HEADER_HEIGHT);
    let available = area.height.saturating_sub(HEADER_HEIGHT);

    let heights = match view {
        ViewMode::Plot => {
            let (rx, tx) = split_plot_rows(available.max(MIN_PLOT_ROWS));
            vec![rx, tx]
        }
        ViewMode::Raw => {
            let rows = available.max(MIN_RAW_ROWS);
            let third = rows / 3;
            vec![third, third, rows - 2 * third]
        }
        ViewMode::Address => vec![available],
    };

    let mut y = body_y;
    let panels = heights
        .into_iter()
        .map(|height| {
            let panel = Rect {
                x: area.x,
                y,
                width: area.width,
                height,
            };
            y = y.saturating_add(height);
            panel.intersection(area)
        })
        .collect();

    ScreenLayout { header, panels }
}

/// Receive gets the lower half, transmit the rest.
pub fn split_plot_rows(rows: u16) -> (u16, u16) {
    let rx = rows / 2;
    (rx, rows - rx)
}

/// Regions of a panel interior used by the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartArea {
    /// Y-axis labels and `|` separator.
    pub gutter: Rect,
    /// Bar region; one column per sample.
    pub plot: Rect,
    /// Bottom row drawn as a `-` baseline under the plot.
    pub baseline: Rect,
}

/// Carves a chart out of a panel interior, or `None` when it is too small
/// to draw one.
pub fn chart_area(inner: Rect) -> Option<ChartArea> {
    let height = inner.height.saturating_sub(1);
    let width = inner.width.saturating_sub(GUTTER_WIDTH);
    if height < MIN_CHART_HEIGHT || width < MIN_CHART_WIDTH {
        return None;
    }
    Some(ChartArea {
        gutter: Rect::new(inner.x, inner.y, GUTTER_WIDTH, height),
        plot: Rect::new(inner.x + GUTTER_WIDTH, inner.y, width, height),
        baseline: Rect::new(inner.x + GUTTER_WIDTH, inner.y + height, width, 1),
    })
}

/// Top of the y axis in display units.
///
/// At least 1.0 and at least the largest visible sample. In bit mode a
/// known link rate below the observed peak caps the axis at the link rate.
pub fn scale_max<I>(samples: I, units: Units, link_gbps: Option<f64>) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let observed = samples
        .into_iter()
        .map(|bytes| units.from_bytes(bytes))
        .filter(|v| v.is_finite())
        .fold(1.0_f64, f64::max);

    if units == Units::Bits
        && let Some(gbps) = link_gbps
        && gbps > 0.0
    {
        let ceiling = gbps * 1e9;
        if ceiling < observed {
            return ceiling;
        }
    }
    observed
}

/// Bar height in rows for `value` (display units), within `[0, height]`.
pub fn bar_height(value: f64, scale_max: f64, height: u16) -> u16 {
    if !value.is_finite() || !scale_max.is_finite() || scale_max <= 0.0 {
        return 0;
    }
    let rows = (value / scale_max * f64::from(height)).round();
    rows.clamp(0.0, f64::from(height)) as u16
}

/// Top, middle and bottom y-axis labels.
pub fn axis_labels(scale_max: f64, units: Units) -> [String; 3] {
    [
        format_axis_label(scale_max, units),
        format_axis_label(scale_max / 2.0, units),
        format_axis_label(0.0, units),
    ]
}
