//! GID table of a port, shown by the address view.

use std::path::Path;
use std::time::{Duration, Instant};

use super::counters::read_trimmed;
use super::traits::FileSystem;

/// Upper bound on GID indices probed per port.
pub const MAX_GID_ENTRIES: usize = 256;

/// How long a fetched table stays fresh while the address view is open.
pub const ADDRESS_REFRESH: Duration = Duration::from_secs(1);

/// One non-zero GID table entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressEntry {
    pub index: usize,
    pub gid: String,
    /// e.g. `RoCE v2`; empty when the driver does not expose it.
    pub gid_type: String,
    /// Associated network device; empty for native InfiniBand GIDs.
    pub ndev: String,
}

fn gid_is_zero(gid: &str) -> bool {
    gid.chars().all(|c| c == '0' || c == ':')
}

/// Reads the non-zero GIDs under `<port_dir>/gids`.
pub fn read_addresses<F: FileSystem>(fs: &F, port_dir: &Path) -> Vec<AddressEntry> {
    let gids = port_dir.join("gids");
    let types = port_dir.join("gid_attrs").join("types");
    let ndevs = port_dir.join("gid_attrs").join("ndevs");

    (0..MAX_GID_ENTRIES)
        .filter_map(|index| {
            let name = index.to_string();
            let gid = read_trimmed(fs, &gids.join(&name))?;
            if gid_is_zero(&gid) {
                return None;
            }
            Some(AddressEntry {
                index,
                gid,
                gid_type: read_trimmed(fs, &types.join(&name)).unwrap_or_default(),
                ndev: read_trimmed(fs, &ndevs.join(&name)).unwrap_or_default(),
            })
        })
        .collect()
}

/// Address table cached between frames.
#[derive(Debug, Default)]
pub struct AddressCache {
    entries: Vec<AddressEntry>,
    refreshed_at: Option<Instant>,
}

impl AddressCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-reads the table if it was never read or is older than
    /// [`ADDRESS_REFRESH`]. Returns `true` when a refresh happened.
    pub fn refresh_if_stale<F: FileSystem>(&mut self, fs: &F, port_dir: &Path, now: Instant) -> bool {
        let stale = self
            .refreshed_at
            .is_none_or(|at| now.saturating_duration_since(at) >= ADDRESS_REFRESH);
        if stale {
            self.entries = read_addresses(fs, port_dir);
            self.refreshed_at = Some(now);
        }
        stale
    }

    pub fn entries(&self) -> &[AddressEntry] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::SYSFS_IB_ROOT;
    use crate::collector::counters::port_dir;
    use crate::collector::mock::{MOCK_DEVICE, MockFs};

    fn mock_port_dir() -> std::path::PathBuf {
        port_dir(Path::new(SYSFS_IB_ROOT), MOCK_DEVICE, 1)
    }

    #[test]
    fn test_read_addresses_skips_zero_gids() {
        let fs = MockFs::infiniband_port();
        let entries = read_addresses(&fs, &mock_port_dir());

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].index, 0);
        assert_eq!(entries[0].gid_type, "IB/RoCE v1");
        assert_eq!(entries[0].ndev, "");
        assert_eq!(entries[1].index, 2);
        assert_eq!(entries[1].gid_type, "RoCE v2");
        assert_eq!(entries[1].ndev, "ens1f0np0");
    }

    #[test]
    fn test_read_addresses_without_gid_table() {
        let fs = MockFs::roce_port();
        assert!(read_addresses(&fs, &mock_port_dir()).is_empty());
    }

    #[test]
    fn test_gid_is_zero() {
        assert!(gid_is_zero("0000:0000:0000:0000:0000:0000:0000:0000"));
        assert!(!gid_is_zero("fe80:0000:0000:0000:0c42:a103:0065:1a2e"));
    }

    #[test]
    fn test_address_cache_refresh_interval() {
        let mut fs = MockFs::infiniband_port();
        let dir = mock_port_dir();
        let t0 = Instant::now();
        let mut cache = AddressCache::new();

        assert!(cache.refresh_if_stale(&fs, &dir, t0));
        assert_eq!(cache.entries().len(), 2);

        fs.add_file(
            dir.join("gids").join("3"),
            "fe80:0000:0000:0000:0c42:a103:0065:1a2f\n",
        );
        assert!(!cache.refresh_if_stale(&fs, &dir, t0 + Duration::from_millis(200)));
        assert_eq!(cache.entries().len(), 2);

        assert!(cache.refresh_if_stale(&fs, &dir, t0 + ADDRESS_REFRESH));
        assert_eq!(cache.entries().len(), 3);
    }
}
