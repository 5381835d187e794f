//! GID table view.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::tui::render::RenderContext;

fn row(index: &str, gid_type: &str, ndev: &str, gid: &str) -> String {
    format!("{:<5}{:<12}{:<18}{}", index, gid_type, ndev, gid)
}

/// Renders the address table. Rows that do not fit are dropped; long rows
/// are cut at the panel edge.
pub fn render_addresses(frame: &mut Frame, area: Rect, ctx: &RenderContext) {
    let styles = ctx.styles;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles.border())
        .title(format!(" {} port {} GIDs ", ctx.port.device, ctx.port.port));
    let inner = block.inner(area);

    let mut lines = vec![Line::styled(
        row("Idx", "Type", "Ndev", "GID"),
        styles.table_header(),
    )];
    if ctx.addresses.is_empty() {
        lines.push(Line::styled("no GIDs found", styles.dim()));
    }
    lines.extend(
        ctx.addresses
            .iter()
            .take((inner.height as usize).saturating_sub(1))
            .map(|entry| {
                Line::styled(
                    row(
                        &entry.index.to_string(),
                        &entry.gid_type,
                        &entry.ndev,
                        &entry.gid,
                    ),
                    styles.default(),
                )
            }),
    );

    frame.render_widget(
        Paragraph::new(lines).style(styles.default()).block(block),
        area,
    );
}
