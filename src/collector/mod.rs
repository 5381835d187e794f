//! Port counter collection from sysfs.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                        collector                         │
//! │  ┌───────────────────┐        ┌───────────────────────┐  │
//! │  │ counters          │        │ sampler               │  │
//! │  │ - alias probing   │ paths  │ - RawSnapshot         │  │
//! │  │ - link metadata   ├───────►│ - wrap-safe delta     │  │
//! │  │ - optional ctrs   │        │ - RateSample          │  │
//! │  └─────────┬─────────┘        └───────────┬───────────┘  │
//! │            │   addresses, discovery       │              │
//! │            └──────────────┬───────────────┘              │
//! │                    ┌──────▼──────┐                       │
//! │                    │  FileSystem │ (trait)               │
//! │                    └──────┬──────┘                       │
//! └───────────────────────────┼──────────────────────────────┘
//!                    ┌────────┴────────┐
//!             ┌──────▼──────┐   ┌──────▼──────┐
//!             │   RealFs    │   │   MockFs    │
//!             └─────────────┘   └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use std::path::Path;
//! use ibmon::collector::{MockFs, Sampler, SYSFS_IB_ROOT, resolve_port};
//!
//! let fs = MockFs::infiniband_port();
//! let port = resolve_port(&fs, Path::new(SYSFS_IB_ROOT), "mlx5_0", 1).unwrap();
//! let mut sampler = Sampler::prime(&fs, port.paths.clone()).unwrap();
//! let rates = sampler.sample(&fs).unwrap();
//! assert_eq!(rates.rx_bytes_per_sec, 0.0);
//! ```

pub mod addresses;
pub mod counters;
pub mod discovery;
pub mod mock;
pub mod sampler;
pub mod traits;

pub use addresses::{AddressCache, AddressEntry, read_addresses};
pub use counters::{
    CounterGroup, CounterPaths, LinkInfo, Metric, OptionalCounter, OptionalCounters,
    PortCounters, ResolveError, parse_rate_gbps, resolve_port,
};
pub use discovery::active_devices;
pub use mock::{MOCK_DEVICE, MockFs};
pub use sampler::{RateSample, RawSnapshot, ReadError, Sampler, delta, to_rate};
pub use traits::{FileSystem, RealFs};

/// Default sysfs location of InfiniBand devices.
pub const SYSFS_IB_ROOT: &str = "/sys/class/infiniband";
