//! Raw counter panels (RX, TX, other).

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::collector::CounterGroup;
use crate::tui::render::RenderContext;

fn counter_line(name: &str, value: u64, note: &str, style: Style) -> Line<'static> {
    Line::styled(format!("{:<18}{:>22}{}", name, value, note), style)
}

/// Renders the three raw panels into `panels` (`[rx, tx, other]`).
pub fn render_raw(frame: &mut Frame, panels: &[Rect], ctx: &RenderContext) {
    let styles = ctx.styles;
    let words = if ctx.port.paths.data_is_words {
        " (words)"
    } else {
        ""
    };

    let mut rx = vec![
        counter_line("rcv_data", ctx.snapshot.rx_data, words, styles.rx()),
        counter_line("rcv_packets", ctx.snapshot.rx_packets, "", styles.rx()),
    ];
    let mut tx = vec![
        counter_line("xmit_data", ctx.snapshot.tx_data, words, styles.tx()),
        counter_line("xmit_packets", ctx.snapshot.tx_packets, "", styles.tx()),
    ];
    let mut other = Vec::new();

    for (counter, value) in ctx.optional {
        let line = counter_line(counter.label(), *value, "", styles.default());
        match counter.group() {
            CounterGroup::Rx => rx.push(line),
            CounterGroup::Tx => tx.push(line),
            CounterGroup::Other => other.push(line),
        }
    }
    if other.is_empty() {
        other.push(Line::styled("no counters available", styles.dim()));
    }

    let titled = [(" RX counters ", rx), (" TX counters ", tx), (" Other ", other)];
    for (area, (title, lines)) in panels.iter().zip(titled) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(styles.border())
            .title(title);
        frame.render_widget(
            Paragraph::new(lines).style(styles.default()).block(block),
            *area,
        );
    }
}
