//! Shared formatting helpers.
//!
//! All pure formatting functions (no ratatui styles, no layout) live here.
//! Rates use decimal (SI) prefixes as link speeds do.

/// Unit used to display data rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Units {
    /// Bits per second.
    #[default]
    Bits,
    /// Bytes per second.
    Bytes,
}

impl Units {
    /// The other unit.
    pub fn toggled(self) -> Self {
        match self {
            Units::Bits => Units::Bytes,
            Units::Bytes => Units::Bits,
        }
    }

    /// Converts a bytes-per-second rate into this unit.
    pub fn from_bytes(self, bytes_per_sec: f64) -> f64 {
        match self {
            Units::Bits => bytes_per_sec * 8.0,
            Units::Bytes => bytes_per_sec,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Units::Bits => "bits",
            Units::Bytes => "bytes",
        }
    }

    /// Per-second suffix without a magnitude prefix (`b/s`, `B/s`).
    pub fn suffix(self) -> &'static str {
        match self {
            Units::Bits => "b/s",
            Units::Bytes => "B/s",
        }
    }
}

/// Decimal magnitude prefixes, smallest first.
pub const MAGNITUDE_PREFIXES: [&str; 6] = ["", "K", "M", "G", "T", "P"];

/// Divides by 1000 until the magnitude is below 1000 or the ladder runs out
/// at `max_step`. Returns the scaled value and the ladder index.
pub fn scale_magnitude(value: f64, max_step: usize) -> (f64, usize) {
    let max_step = max_step.min(MAGNITUDE_PREFIXES.len() - 1);
    let mut v = value;
    let mut step = 0;
    while v.abs() >= 1000.0 && step < max_step {
        v /= 1000.0;
        step += 1;
    }
    (v, step)
}

/// Formats a bytes-per-second rate in the given unit: `" 12.50 Gb/s"`.
///
/// A missing prefix is padded with a space so columns stay aligned.
pub fn format_rate(bytes_per_sec: f64, units: Units) -> String {
    let (v, step) = scale_magnitude(units.from_bytes(bytes_per_sec), 5);
    let prefix = if step == 0 { " " } else { MAGNITUDE_PREFIXES[step] };
    format!("{:6.2} {}{}", v, prefix, units.suffix())
}

/// Formats a packets-per-second rate: `"  1.20 Kpps"`.
pub fn format_pps(pps: f64) -> String {
    let (v, step) = scale_magnitude(pps, 4);
    let prefix = if step == 0 { " " } else { MAGNITUDE_PREFIXES[step] };
    format!("{:6.2} {}pps", v, prefix)
}

/// Formats a y-axis label. `value` is already in display units.
pub fn format_axis_label(value: f64, units: Units) -> String {
    let (v, step) = scale_magnitude(value, 5);
    format!("{:6.2} {}{}", v, MAGNITUDE_PREFIXES[step], units.suffix())
}

/// Link utilization of a bytes-per-second rate, in percent, capped at 100.
pub fn utilization_pct(bytes_per_sec: f64, link_gbps: f64) -> f64 {
    if link_gbps <= 0.0 {
        return 0.0;
    }
    (bytes_per_sec * 8.0 / (link_gbps * 1e9) * 100.0).clamp(0.0, 100.0)
}
