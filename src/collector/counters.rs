//! Counter file resolution for one device/port.
//!
//! Different drivers expose the same metric under different file names, so
//! each metric has an ordered alias list and the first file that exists wins.
//! Resolution happens once at startup; the result is immutable afterwards.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::sampler::read_counter;
use super::traits::FileSystem;

/// The four counters required for rate computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    TxData,
    RxData,
    TxPackets,
    RxPackets,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::TxData,
        Metric::RxData,
        Metric::TxPackets,
        Metric::RxPackets,
    ];

    /// Name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Metric::TxData => "tx_data",
            Metric::RxData => "rx_data",
            Metric::TxPackets => "tx_pkts",
            Metric::RxPackets => "rx_pkts",
        }
    }

    /// Accepted file names, most preferred first.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Metric::TxData => &["port_xmit_data", "tx_bytes"],
            Metric::RxData => &["port_rcv_data", "rx_bytes"],
            Metric::TxPackets => &["port_xmit_packets", "port_xmit_pkts", "tx_packets"],
            Metric::RxPackets => &["port_rcv_packets", "port_rcv_pkts", "rx_packets"],
        }
    }
}

/// File names whose values are 4-byte words rather than bytes.
const WORD_COUNTERS: [&str; 2] = ["port_xmit_data", "port_rcv_data"];

/// Which raw-view panel an optional counter belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterGroup {
    Rx,
    Tx,
    Other,
}

/// Low-level error/discard counters shown by the raw view.
///
/// None of these participate in rate computation and any of them may be
/// missing on a given driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionalCounter {
    RcvErrors,
    RcvRemotePhysicalErrors,
    RcvSwitchRelayErrors,
    XmitDiscards,
    XmitWait,
    LocalPhysicalErrors,
    SymbolError,
    LinkErrorRecovery,
    LinkDowned,
    Vl15Dropped,
    ExcessiveBufferOverrun,
}

impl OptionalCounter {
    pub const ALL: [OptionalCounter; 11] = [
        OptionalCounter::RcvErrors,
        OptionalCounter::RcvRemotePhysicalErrors,
        OptionalCounter::RcvSwitchRelayErrors,
        OptionalCounter::XmitDiscards,
        OptionalCounter::XmitWait,
        OptionalCounter::LocalPhysicalErrors,
        OptionalCounter::SymbolError,
        OptionalCounter::LinkErrorRecovery,
        OptionalCounter::LinkDowned,
        OptionalCounter::Vl15Dropped,
        OptionalCounter::ExcessiveBufferOverrun,
    ];

    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            OptionalCounter::RcvErrors => &["port_rcv_errors"],
            OptionalCounter::RcvRemotePhysicalErrors => &["port_rcv_remote_physical_errors"],
            OptionalCounter::RcvSwitchRelayErrors => &["port_rcv_switch_relay_errors"],
            OptionalCounter::XmitDiscards => &["port_xmit_discards"],
            OptionalCounter::XmitWait => &["port_xmit_wait"],
            OptionalCounter::LocalPhysicalErrors => {
                &["port_local_phy_errors", "port_local_physical_errors"]
            }
            OptionalCounter::SymbolError => &["symbol_error", "symbol_errors"],
            OptionalCounter::LinkErrorRecovery => &["link_error_recovery"],
            OptionalCounter::LinkDowned => &["link_downed"],
            OptionalCounter::Vl15Dropped => &["VL15_dropped", "vl15_dropped"],
            OptionalCounter::ExcessiveBufferOverrun => &["excessive_buffer_overrun_errors"],
        }
    }

    /// Short label for the raw view.
    pub fn label(&self) -> &'static str {
        match self {
            OptionalCounter::RcvErrors => "port_rcv_errors",
            OptionalCounter::RcvRemotePhysicalErrors => "rcv_remote_phy",
            OptionalCounter::RcvSwitchRelayErrors => "rcv_switch_relay",
            OptionalCounter::XmitDiscards => "xmit_discards",
            OptionalCounter::XmitWait => "xmit_wait",
            OptionalCounter::LocalPhysicalErrors => "local_phy_errors",
            OptionalCounter::SymbolError => "symbol_error",
            OptionalCounter::LinkErrorRecovery => "link_err_recov",
            OptionalCounter::LinkDowned => "link_downed",
            OptionalCounter::Vl15Dropped => "vl15_dropped",
            OptionalCounter::ExcessiveBufferOverrun => "excess_buf_over",
        }
    }

    pub fn group(&self) -> CounterGroup {
        match self {
            OptionalCounter::RcvErrors
            | OptionalCounter::RcvRemotePhysicalErrors
            | OptionalCounter::RcvSwitchRelayErrors => CounterGroup::Rx,
            OptionalCounter::XmitDiscards | OptionalCounter::XmitWait => CounterGroup::Tx,
            _ => CounterGroup::Other,
        }
    }
}

/// Resolved locations of the four required counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterPaths {
    pub tx_data: PathBuf,
    pub rx_data: PathBuf,
    pub tx_packets: PathBuf,
    pub rx_packets: PathBuf,
    /// Data counters count 4-byte words instead of bytes.
    pub data_is_words: bool,
}

/// Optional counters that were found at resolution time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionalCounters {
    found: Vec<(OptionalCounter, PathBuf)>,
}

impl OptionalCounters {
    pub fn len(&self) -> usize {
        self.found.len()
    }

    pub fn is_empty(&self) -> bool {
        self.found.is_empty()
    }

    /// Reads every optional counter that is currently readable.
    ///
    /// Unreadable or malformed counters are skipped; the raw view simply
    /// omits them.
    pub fn read_all<F: FileSystem>(&self, fs: &F) -> Vec<(OptionalCounter, u64)> {
        self.found
            .iter()
            .filter_map(|(counter, path)| read_counter(fs, path).ok().map(|v| (*counter, v)))
            .collect()
    }
}

/// Link metadata read from the port directory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkInfo {
    /// e.g. `InfiniBand` or `Ethernet`.
    pub link_layer: Option<String>,
    /// Free-form rate string, e.g. `100 Gb/sec (4X EDR)`.
    pub rate: Option<String>,
}

impl LinkInfo {
    /// Advertised link rate in Gb/s, if the rate string can be parsed.
    pub fn rate_gbps(&self) -> Option<f64> {
        self.rate.as_deref().and_then(parse_rate_gbps)
    }
}

/// Parses the leading numeric token of a sysfs rate string as Gb/s.
///
/// `"100 Gb/sec (4X EDR)"` yields `Some(100.0)`. Non-numeric, non-finite or
/// non-positive values yield `None`, meaning "no capacity ceiling".
pub fn parse_rate_gbps(rate: &str) -> Option<f64> {
    let token = rate.split_whitespace().next()?;
    let value: f64 = token.parse().ok()?;
    (value.is_finite() && value > 0.0).then_some(value)
}

/// Everything resolved for the monitored port.
#[derive(Debug, Clone)]
pub struct PortCounters {
    pub device: String,
    pub port: u32,
    /// `<root>/<device>/ports/<port>`
    pub port_dir: PathBuf,
    /// `<port_dir>/counters`
    pub counters_dir: PathBuf,
    pub paths: CounterPaths,
    pub optional: OptionalCounters,
    pub link: LinkInfo,
}

/// Fatal configuration error detected while resolving counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The counters directory for the device/port does not exist.
    CountersDirMissing(PathBuf),
    /// One or more required counters have no existing alias.
    MissingCounters { dir: PathBuf, missing: Vec<Metric> },
}

impl ResolveError {
    /// Required metrics that could not be found (empty when the whole
    /// directory is missing).
    pub fn missing_metrics(&self) -> &[Metric] {
        match self {
            ResolveError::CountersDirMissing(_) => &[],
            ResolveError::MissingCounters { missing, .. } => missing,
        }
    }
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::CountersDirMissing(dir) => write!(
                f,
                "counters path not found: {}. Is the device/port correct?",
                dir.display()
            ),
            ResolveError::MissingCounters { dir, missing } => {
                let names: Vec<&str> = missing.iter().map(Metric::name).collect();
                write!(
                    f,
                    "missing expected counter files under {}: {}",
                    dir.display(),
                    names.join(", ")
                )
            }
        }
    }
}

impl std::error::Error for ResolveError {}

/// Returns `<root>/<device>/ports/<port>`.
pub fn port_dir(root: &Path, device: &str, port: u32) -> PathBuf {
    root.join(device).join("ports").join(port.to_string())
}

/// Resolves the counters of `device`/`port` under the sysfs `root`.
pub fn resolve_port<F: FileSystem>(
    fs: &F,
    root: &Path,
    device: &str,
    port: u32,
) -> Result<PortCounters, ResolveError> {
    let port_dir = port_dir(root, device, port);
    let counters_dir = port_dir.join("counters");
    if !fs.is_dir(&counters_dir) {
        return Err(ResolveError::CountersDirMissing(counters_dir));
    }

    let link = LinkInfo {
        link_layer: read_trimmed(fs, &port_dir.join("link_layer")),
        rate: read_trimmed(fs, &port_dir.join("rate")),
    };

    let mut found: Vec<Option<PathBuf>> = Metric::ALL
        .iter()
        .map(|m| first_existing(fs, &counters_dir, m.aliases()))
        .collect();
    let missing: Vec<Metric> = Metric::ALL
        .iter()
        .zip(&found)
        .filter(|(_, p)| p.is_none())
        .map(|(m, _)| *m)
        .collect();
    if !missing.is_empty() {
        return Err(ResolveError::MissingCounters {
            dir: counters_dir,
            missing,
        });
    }

    // All four are present past this point.
    let mut take = |i: usize| found[i].take().unwrap_or_default();
    let tx_data = take(0);
    let rx_data = take(1);
    let tx_packets = take(2);
    let rx_packets = take(3);
    let data_is_words = is_word_counter(&tx_data) || is_word_counter(&rx_data);

    let optional = OptionalCounters {
        found: OptionalCounter::ALL
            .iter()
            .filter_map(|c| first_existing(fs, &counters_dir, c.aliases()).map(|p| (*c, p)))
            .collect(),
    };

    debug!(
        device,
        port,
        data_is_words,
        optional = optional.len(),
        "resolved counters under {}",
        counters_dir.display()
    );

    Ok(PortCounters {
        device: device.to_string(),
        port,
        port_dir,
        counters_dir,
        paths: CounterPaths {
            tx_data,
            rx_data,
            tx_packets,
            rx_packets,
            data_is_words,
        },
        optional,
        link,
    })
}

fn first_existing<F: FileSystem>(fs: &F, dir: &Path, names: &[&str]) -> Option<PathBuf> {
    names
        .iter()
        .map(|name| dir.join(name))
        .find(|path| fs.exists(path))
}

fn is_word_counter(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| WORD_COUNTERS.contains(&n))
}

/// Reads the first line of a text file, trimmed. Empty or unreadable files
/// yield `None`.
pub fn read_trimmed<F: FileSystem>(fs: &F, path: &Path) -> Option<String> {
    let content = fs.read_to_string(path).ok()?;
    let line = content.lines().next()?.trim();
    (!line.is_empty()).then(|| line.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::SYSFS_IB_ROOT;
    use crate::collector::mock::{MOCK_DEVICE, MockFs};

    fn root() -> &'static Path {
        Path::new(SYSFS_IB_ROOT)
    }

    #[test]
    fn test_resolve_infiniband_port() {
        let fs = MockFs::infiniband_port();
        let port = resolve_port(&fs, root(), MOCK_DEVICE, 1).unwrap();

        assert!(port.paths.tx_data.ends_with("port_xmit_data"));
        assert!(port.paths.rx_packets.ends_with("port_rcv_packets"));
        assert!(port.paths.data_is_words);
        assert_eq!(port.link.link_layer.as_deref(), Some("InfiniBand"));
        assert_eq!(port.link.rate.as_deref(), Some("100 Gb/sec (4X EDR)"));
        assert_eq!(port.link.rate_gbps(), Some(100.0));
        assert_eq!(port.optional.len(), OptionalCounter::ALL.len());
    }

    #[test]
    fn test_resolve_byte_counters() {
        let fs = MockFs::roce_port();
        let port = resolve_port(&fs, root(), MOCK_DEVICE, 1).unwrap();

        assert!(port.paths.tx_data.ends_with("tx_bytes"));
        assert!(port.paths.rx_data.ends_with("rx_bytes"));
        assert!(!port.paths.data_is_words);
        assert!(port.optional.is_empty());
    }

    #[test]
    fn test_alias_preference_order() {
        let mut fs = MockFs::new();
        fs.add_port_counters(
            SYSFS_IB_ROOT,
            "mlx4_0",
            2,
            &[
                ("port_xmit_data", 1),
                ("tx_bytes", 1),
                ("rx_bytes", 1),
                ("port_xmit_pkts", 1),
                ("tx_packets", 1),
                ("port_rcv_pkts", 1),
            ],
        );

        let port = resolve_port(&fs, root(), "mlx4_0", 2).unwrap();
        assert!(port.paths.tx_data.ends_with("port_xmit_data"));
        assert!(port.paths.rx_data.ends_with("rx_bytes"));
        assert!(port.paths.tx_packets.ends_with("port_xmit_pkts"));
        assert!(port.paths.rx_packets.ends_with("port_rcv_pkts"));
        // One word-granularity data counter is enough.
        assert!(port.paths.data_is_words);
    }

    #[test]
    fn test_missing_counters_dir() {
        let fs = MockFs::infiniband_port();
        let err = resolve_port(&fs, root(), MOCK_DEVICE, 2).unwrap_err();

        assert!(matches!(err, ResolveError::CountersDirMissing(_)));
        assert!(err.missing_metrics().is_empty());
        assert!(err.to_string().contains("ports/2/counters"));
    }

    #[test]
    fn test_missing_required_counter_is_reported_by_name() {
        let mut fs = MockFs::infiniband_port();
        fs.remove_file(format!("{}/port_rcv_packets", MockFs::mock_counters_dir()));

        let err = resolve_port(&fs, root(), MOCK_DEVICE, 1).unwrap_err();
        assert_eq!(err.missing_metrics(), &[Metric::RxPackets]);
        assert!(err.to_string().contains("rx_pkts"));
        assert!(!err.to_string().contains("tx_data"));
    }

    #[test]
    fn test_missing_link_metadata_is_not_fatal() {
        let mut fs = MockFs::new();
        fs.add_port_counters(
            SYSFS_IB_ROOT,
            "hfi1_0",
            1,
            &[
                ("port_xmit_data", 0),
                ("port_rcv_data", 0),
                ("port_xmit_packets", 0),
                ("port_rcv_packets", 0),
            ],
        );

        let port = resolve_port(&fs, root(), "hfi1_0", 1).unwrap();
        assert_eq!(port.link, LinkInfo::default());
        assert_eq!(port.link.rate_gbps(), None);
    }

    #[test]
    fn test_optional_counter_aliases_and_groups() {
        let fs = MockFs::infiniband_port();
        let port = resolve_port(&fs, root(), MOCK_DEVICE, 1).unwrap();

        let values = port.optional.read_all(&fs);
        // Found through the `port_local_physical_errors` fallback alias.
        assert!(values.contains(&(OptionalCounter::LocalPhysicalErrors, 2)));
        assert!(values.contains(&(OptionalCounter::Vl15Dropped, 0)));
        assert!(values.contains(&(OptionalCounter::XmitWait, 42)));
        assert!(values.contains(&(OptionalCounter::SymbolError, 3)));
        assert_eq!(OptionalCounter::XmitWait.group(), CounterGroup::Tx);
        assert_eq!(OptionalCounter::LinkDowned.group(), CounterGroup::Other);
    }

    #[test]
    fn test_optional_counters_skip_unreadable() {
        let mut fs = MockFs::infiniband_port();
        let port = resolve_port(&fs, root(), MOCK_DEVICE, 1).unwrap();
        fs.add_file(
            format!("{}/symbol_error", MockFs::mock_counters_dir()),
            "garbage\n",
        );

        let values = port.optional.read_all(&fs);
        assert!(
            !values
                .iter()
                .any(|(c, _)| *c == OptionalCounter::SymbolError)
        );
        assert_eq!(values.len(), OptionalCounter::ALL.len() - 1);
    }

    #[test]
    fn test_parse_rate_gbps() {
        assert_eq!(parse_rate_gbps("100 Gb/sec (4X EDR)"), Some(100.0));
        assert_eq!(parse_rate_gbps("2.5 Gb/sec (1X SDR)"), Some(2.5));
        assert_eq!(parse_rate_gbps(""), None);
        assert_eq!(parse_rate_gbps("garbage"), None);
        assert_eq!(parse_rate_gbps("0 Gb/sec"), None);
        assert_eq!(parse_rate_gbps("NaN Gb/sec"), None);
    }

    #[test]
    fn test_read_trimmed() {
        let mut fs = MockFs::new();
        fs.add_file("/a", "  InfiniBand  \nsecond line\n");
        fs.add_file("/b", "\n");

        assert_eq!(read_trimmed(&fs, Path::new("/a")).as_deref(), Some("InfiniBand"));
        assert_eq!(read_trimmed(&fs, Path::new("/b")), None);
        assert_eq!(read_trimmed(&fs, Path::new("/c")), None);
    }
}
