//! Header widget: clock, port identity, status and key legend.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::fmt::utilization_pct;
use crate::tui::render::RenderContext;

const KEY_LEGEND: &str = "q quit  p pause  u units  d raw  i addr";

/// Renders the four-row header.
pub fn render_header(frame: &mut Frame, area: Rect, ctx: &RenderContext) {
    let styles = ctx.styles;
    let port = ctx.port;

    let title = Line::from(vec![
        Span::styled("ibmon", styles.title()),
        Span::styled("  ", styles.default()),
        Span::styled(
            ctx.now.format("%B-%d-%Y %H:%M:%S").to_string(),
            styles.default(),
        ),
    ]);

    let mut link = format!("{} port {}", port.device, port.port);
    if let Some(layer) = &port.link.link_layer {
        link.push_str("  ");
        link.push_str(layer);
    }
    if let Some(rate) = &port.link.rate {
        link.push_str("  ");
        link.push_str(rate);
    }
    let identity = Line::from(Span::styled(link, styles.default()));

    let mut status = vec![Span::styled(
        format!(
            "interval {} ms  units: {}",
            ctx.interval.as_millis(),
            ctx.view.units.name()
        ),
        styles.default(),
    )];
    if let Some(gbps) = ctx.view.link_gbps {
        status.push(Span::styled(
            format!(
                "  util RX {:5.1}%  TX {:5.1}%",
                utilization_pct(ctx.rates.rx_bytes_per_sec, gbps),
                utilization_pct(ctx.rates.tx_bytes_per_sec, gbps)
            ),
            styles.default(),
        ));
    }
    if ctx.view.paused {
        status.push(Span::styled("  [PAUSED]", styles.paused()));
    }
    if let Some(tag) = ctx.view.view.tag() {
        status.push(Span::styled(format!("  {}", tag), styles.view_tag()));
    }

    let legend = Line::from(Span::styled(KEY_LEGEND, styles.dim()));

    let header = Paragraph::new(vec![title, identity, Line::from(status), legend])
        .style(styles.default());
    frame.render_widget(header, area);
}

#[cfg(test)]
mod tests {
    use crate::tui::fixture::{Fixture, render_to_string};

    #[test]
    fn test_header_contents() {
        let fixture = Fixture::new();
        let screen = render_to_string(100, 30, &fixture.context());
        let rows: Vec<&str> = screen.lines().collect();

        assert!(rows[0].starts_with("ibmon  "));
        assert!(rows[1].contains("mlx5_0 port 1  InfiniBand  100 Gb/sec (4X EDR)"));
        assert!(rows[2].contains("interval 1000 ms  units: bits"));
        // 39 MB/s of a 100 Gb/s link.
        assert!(rows[2].contains("util RX   0.3%"));
        assert!(rows[3].contains("q quit"));
    }

    #[test]
    fn test_header_status_flags() {
        let mut fixture = Fixture::new();
        fixture.view.paused = true;
        fixture.view.link_gbps = None;
        let screen = render_to_string(100, 30, &fixture.context());
        let status = screen.lines().nth(2).unwrap();

        assert!(status.contains("[PAUSED]"));
        assert!(!status.contains("util"));
    }
}
