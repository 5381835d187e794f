//! Color scheme and styles.

use ratatui::style::{Color, Modifier, Style};

use super::state::Background;

/// Color palette.
pub struct Theme;

impl Theme {
    // Background colors
    pub const BG_BLACK: Color = Color::Black;
    pub const BG_TERMINAL: Color = Color::Reset;

    // Foreground colors
    pub const FG: Color = Color::White;
    pub const FG_DIM: Color = Color::DarkGray;
    pub const BORDER: Color = Color::Gray;

    // Direction colors
    pub const RX_COLOR: Color = Color::Cyan;
    pub const TX_COLOR: Color = Color::Red;

    // Status colors
    pub const PAUSED: Color = Color::Yellow;
    pub const VIEW_TAG: Color = Color::Green;
}

/// Pre-defined styles for the chosen background.
#[derive(Debug, Clone, Copy)]
pub struct Styles {
    bg: Color,
}

impl Styles {
    pub fn new(background: Background) -> Self {
        let bg = match background {
            Background::Black => Theme::BG_BLACK,
            Background::Terminal => Theme::BG_TERMINAL,
        };
        Self { bg }
    }

    /// Default text style.
    pub fn default(&self) -> Style {
        Style::default().fg(Theme::FG).bg(self.bg)
    }

    /// Header title.
    pub fn title(&self) -> Style {
        self.default().add_modifier(Modifier::BOLD)
    }

    /// Secondary text (legend, axis labels, plot dots).
    pub fn dim(&self) -> Style {
        self.default().fg(Theme::FG_DIM)
    }

    pub fn border(&self) -> Style {
        self.default().fg(Theme::BORDER)
    }

    pub fn rx(&self) -> Style {
        self.default().fg(Theme::RX_COLOR)
    }

    pub fn tx(&self) -> Style {
        self.default().fg(Theme::TX_COLOR)
    }

    pub fn paused(&self) -> Style {
        self.default()
            .fg(Theme::PAUSED)
            .add_modifier(Modifier::BOLD)
    }

    pub fn view_tag(&self) -> Style {
        self.default()
            .fg(Theme::VIEW_TAG)
            .add_modifier(Modifier::BOLD)
    }

    /// Column header of the address table.
    pub fn table_header(&self) -> Style {
        self.default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_background_modes() {
        assert_eq!(Styles::new(Background::Black).default().bg, Some(Color::Black));
        assert_eq!(
            Styles::new(Background::Terminal).default().bg,
            Some(Color::Reset)
        );
    }

    #[test]
    fn test_direction_colors() {
        let styles = Styles::new(Background::Black);
        assert_eq!(styles.rx().fg, Some(Color::Cyan));
        assert_eq!(styles.tx().fg, Some(Color::Red));
        assert_eq!(styles.rx().bg, Some(Color::Black));
    }
}
