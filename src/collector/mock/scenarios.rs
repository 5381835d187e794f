//! Pre-built mock sysfs trees for testing.
//!
//! These mirror what `/sys/class/infiniband` looks like on real hosts: a
//! native InfiniBand HCA with word-granularity data counters and a RoCE-style
//! port exposing byte counters.

use super::filesystem::MockFs;
use crate::collector::SYSFS_IB_ROOT;

/// Device name used by the scenarios.
pub const MOCK_DEVICE: &str = "mlx5_0";

impl MockFs {
    /// An active InfiniBand port (`mlx5_0`, port 1) with the canonical
    /// `port_*` counters, link metadata, the optional error counters and a
    /// small GID table.
    pub fn infiniband_port() -> Self {
        let mut fs = Self::new();
        let port = format!("{}/{}/ports/1", SYSFS_IB_ROOT, MOCK_DEVICE);

        fs.add_port_counters(
            SYSFS_IB_ROOT,
            MOCK_DEVICE,
            1,
            &[
                ("port_xmit_data", 1_000_000),
                ("port_rcv_data", 2_000_000),
                ("port_xmit_packets", 10_000),
                ("port_rcv_packets", 20_000),
                ("port_xmit_discards", 0),
                ("port_xmit_wait", 42),
                ("port_rcv_errors", 1),
                ("port_rcv_remote_physical_errors", 0),
                ("port_rcv_switch_relay_errors", 0),
                ("port_local_physical_errors", 2),
                ("symbol_error", 3),
                ("link_error_recovery", 0),
                ("link_downed", 1),
                ("VL15_dropped", 0),
                ("excessive_buffer_overrun_errors", 0),
            ],
        );

        fs.add_file(format!("{}/state", port), "4: ACTIVE\n");
        fs.add_file(format!("{}/link_layer", port), "InfiniBand\n");
        fs.add_file(format!("{}/rate", port), "100 Gb/sec (4X EDR)\n");

        fs.add_file(
            format!("{}/gids/0", port),
            "fe80:0000:0000:0000:0c42:a103:0065:1a2e\n",
        );
        fs.add_file(
            format!("{}/gids/1", port),
            "0000:0000:0000:0000:0000:0000:0000:0000\n",
        );
        fs.add_file(
            format!("{}/gids/2", port),
            "0000:0000:0000:0000:0000:ffff:0a00:0001\n",
        );
        fs.add_file(format!("{}/gid_attrs/types/0", port), "IB/RoCE v1\n");
        fs.add_file(format!("{}/gid_attrs/types/2", port), "RoCE v2\n");
        fs.add_file(format!("{}/gid_attrs/ndevs/2", port), "ens1f0np0\n");

        fs
    }

    /// A RoCE-style port whose counters use the byte-granularity names
    /// (`tx_bytes`, `rx_packets`, ...) and report an Ethernet link layer.
    pub fn roce_port() -> Self {
        let mut fs = Self::new();
        let port = format!("{}/{}/ports/1", SYSFS_IB_ROOT, MOCK_DEVICE);

        fs.add_port_counters(
            SYSFS_IB_ROOT,
            MOCK_DEVICE,
            1,
            &[
                ("tx_bytes", 5_000),
                ("rx_bytes", 7_000),
                ("tx_packets", 50),
                ("rx_packets", 70),
            ],
        );

        fs.add_file(format!("{}/state", port), "4: ACTIVE\n");
        fs.add_file(format!("{}/link_layer", port), "Ethernet\n");
        fs.add_file(format!("{}/rate", port), "25 Gb/sec (1X EDR)\n");

        fs
    }

    /// Returns the counters directory used by the scenarios.
    pub fn mock_counters_dir() -> String {
        format!("{}/{}/ports/1/counters", SYSFS_IB_ROOT, MOCK_DEVICE)
    }
}
