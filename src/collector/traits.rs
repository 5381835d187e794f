//! Abstractions for filesystem access to enable testing and mocking.
//!
//! The `FileSystem` trait lets the counter source work against the real sysfs
//! tree on Linux and against in-memory trees in tests.

use std::io;
use std::path::{Path, PathBuf};

/// Abstraction for filesystem operations.
///
/// Everything the collector needs from sysfs goes through this trait, so a
/// port can be simulated completely by [`MockFs`](super::MockFs).
pub trait FileSystem {
    /// Reads the entire contents of a file as a string.
    ///
    /// # Arguments
    /// * `path` - Path to the file to read
    ///
    /// # Returns
    /// The file contents as a string, or an I/O error if the file cannot be read.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Checks if a path (file or directory) exists.
    fn exists(&self, path: &Path) -> bool;

    /// Checks if a path exists and is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Lists entries in a directory.
    ///
    /// # Returns
    /// A vector of paths to entries in the directory, or an I/O error.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>>;
}

/// Real filesystem implementation that delegates to `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

impl RealFs {
    /// Creates a new `RealFs` instance.
    pub fn new() -> Self {
        Self
    }
}

impl FileSystem for RealFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let entries = std::fs::read_dir(path)?;
        let mut paths = Vec::new();
        for entry in entries {
            paths.push(entry?.path());
        }
        Ok(paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_real_fs_read_to_string() {
        let dir = tempfile::tempdir().unwrap();
        let counter = dir.path().join("port_rcv_data");
        std::fs::write(&counter, "12345\n").unwrap();

        let fs = RealFs::new();
        assert_eq!(fs.read_to_string(&counter).unwrap(), "12345\n");
    }

    #[test]
    fn test_real_fs_exists_and_is_dir() {
        let dir = tempfile::tempdir().unwrap();
        let counter = dir.path().join("port_xmit_data");
        std::fs::write(&counter, "0\n").unwrap();

        let fs = RealFs::new();
        assert!(fs.exists(&counter));
        assert!(!fs.is_dir(&counter));
        assert!(fs.is_dir(dir.path()));
        assert!(!fs.exists(Path::new("/nonexistent/path/12345")));
    }

    #[test]
    fn test_real_fs_read_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("mlx5_0")).unwrap();
        std::fs::create_dir(dir.path().join("mlx5_1")).unwrap();

        let fs = RealFs::new();
        let mut entries = fs.read_dir(dir.path()).unwrap();
        entries.sort();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].ends_with("mlx5_0"));
    }
}
