//! View state shared between input handling and rendering.

use crate::fmt::Units;

/// Mutually exclusive body views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Scrolling RX/TX rate charts.
    #[default]
    Plot,
    /// Raw counter values grouped by direction.
    Raw,
    /// GID table of the port.
    Address,
}

impl ViewMode {
    /// Header tag shown while the view is active.
    pub fn tag(&self) -> Option<&'static str> {
        match self {
            ViewMode::Plot => None,
            ViewMode::Raw => Some("[RAW]"),
            ViewMode::Address => Some("[ADDR]"),
        }
    }
}

/// Background colour mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Background {
    /// Explicit black background.
    #[default]
    Black,
    /// Whatever the terminal uses.
    Terminal,
}

/// UI state driven by key presses.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub paused: bool,
    pub units: Units,
    pub view: ViewMode,
    /// Advertised link rate in Gb/s, if known.
    pub link_gbps: Option<f64>,
}

impl ViewState {
    pub fn new(units: Units, link_gbps: Option<f64>) -> Self {
        Self {
            units,
            link_gbps,
            ..Self::default()
        }
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    pub fn toggle_units(&mut self) {
        self.units = self.units.toggled();
    }

    /// Activates `view`, or returns to [`ViewMode::Plot`] if it is already
    /// active.
    pub fn toggle_view(&mut self, view: ViewMode) {
        self.view = if self.view == view {
            ViewMode::Plot
        } else {
            view
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_view_is_exclusive() {
        let mut state = ViewState::default();
        assert_eq!(state.view, ViewMode::Plot);

        state.toggle_view(ViewMode::Raw);
        assert_eq!(state.view, ViewMode::Raw);

        // Switching directly deactivates the raw view.
        state.toggle_view(ViewMode::Address);
        assert_eq!(state.view, ViewMode::Address);

        state.toggle_view(ViewMode::Address);
        assert_eq!(state.view, ViewMode::Plot);
    }

    #[test]
    fn test_toggle_pause_and_units() {
        let mut state = ViewState::new(Units::Bytes, Some(100.0));
        state.toggle_pause();
        assert!(state.paused);
        state.toggle_pause();
        assert!(!state.paused);

        state.toggle_units();
        assert_eq!(state.units, Units::Bits);
        assert_eq!(state.link_gbps, Some(100.0));
    }

    #[test]
    fn test_view_tags() {
        assert_eq!(ViewMode::Plot.tag(), None);
        assert_eq!(ViewMode::Raw.tag(), Some("[RAW]"));
        assert_eq!(ViewMode::Address.tag(), Some("[ADDR]"));
    }
}
