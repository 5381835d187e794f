//! Mock filesystem implementations for testing.
//!
//! This module provides `MockFs` and pre-built sysfs scenarios for testing
//! counter resolution and sampling without real InfiniBand hardware.

mod filesystem;
mod scenarios;

pub use filesystem::MockFs;
pub use scenarios::MOCK_DEVICE;
