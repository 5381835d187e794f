//! In-memory mock filesystem for testing collectors without real sysfs.
//!
//! `MockFs` simulates a directory tree in memory so counter resolution and
//! sampling can be exercised on any platform and in CI.

use crate::collector::traits::FileSystem;
use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};

/// In-memory filesystem for testing.
#[derive(Debug, Clone, Default)]
pub struct MockFs {
    /// Map from path to file contents.
    files: HashMap<PathBuf, String>,
    /// Set of directories (for read_dir support).
    directories: HashSet<PathBuf>,
}

impl MockFs {
    /// Creates a new empty mock filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or overwrites) a file with the given content.
    ///
    /// Parent directories are automatically created.
    pub fn add_file(&mut self, path: impl AsRef<Path>, content: impl Into<String>) {
        let path = path.as_ref().to_path_buf();
        self.add_parents(&path);
        self.files.insert(path, content.into());
    }

    /// Adds an empty directory.
    pub fn add_dir(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();
        self.add_parents(&path);
        self.directories.insert(path);
    }

    /// Removes a file, simulating a counter that disappears mid-run.
    pub fn remove_file(&mut self, path: impl AsRef<Path>) {
        self.files.remove(path.as_ref());
    }

    /// Adds a port directory with the given counters under
    /// `<root>/<device>/ports/<port>/counters`.
    ///
    /// Returns the counters directory path.
    pub fn add_port_counters(
        &mut self,
        root: impl AsRef<Path>,
        device: &str,
        port: u32,
        counters: &[(&str, u64)],
    ) -> PathBuf {
        let dir = root
            .as_ref()
            .join(device)
            .join("ports")
            .join(port.to_string())
            .join("counters");
        self.add_dir(&dir);
        for (name, value) in counters {
            self.add_file(dir.join(name), format!("{}\n", value));
        }
        dir
    }

    /// Overwrites a single counter value inside a counters directory.
    pub fn set_counter(&mut self, counters_dir: impl AsRef<Path>, name: &str, value: u64) {
        self.add_file(counters_dir.as_ref().join(name), format!("{}\n", value));
    }

    fn add_parents(&mut self, path: &Path) {
        let mut parent = path.parent();
        while let Some(p) = parent {
            if !p.as_os_str().is_empty() {
                self.directories.insert(p.to_path_buf());
            }
            parent = p.parent();
        }
    }
}

impl FileSystem for MockFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("file not found: {:?}", path),
            )
        })
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path) || self.directories.contains(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.directories.contains(path)
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        if !self.directories.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("directory not found: {:?}", path),
            ));
        }

        let mut entries = HashSet::new();

        for file_path in self.files.keys() {
            if file_path.parent().is_some_and(|parent| parent == path) {
                entries.insert(file_path.clone());
            }
        }

        for dir_path in &self.directories {
            if dir_path.parent().is_some_and(|parent| parent == path) && dir_path != path {
                entries.insert(dir_path.clone());
            }
        }

        Ok(entries.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_fs_add_file() {
        let mut fs = MockFs::new();
        fs.add_file("/sys/class/infiniband/mlx5_0/ports/1/rate", "100 Gb/sec\n");

        assert!(fs.exists(Path::new("/sys/class/infiniband/mlx5_0/ports/1/rate")));
        assert!(fs.is_dir(Path::new("/sys/class/infiniband/mlx5_0/ports/1")));
        assert!(!fs.is_dir(Path::new("/sys/class/infiniband/mlx5_0/ports/1/rate")));

        let content = fs
            .read_to_string(Path::new("/sys/class/infiniband/mlx5_0/ports/1/rate"))
            .unwrap();
        assert_eq!(content, "100 Gb/sec\n");
    }

    #[test]
    fn test_mock_fs_read_dir() {
        let mut fs = MockFs::new();
        fs.add_file("/sys/class/infiniband/mlx5_0/ports/1/state", "4: ACTIVE");
        fs.add_file("/sys/class/infiniband/mlx5_1/ports/1/state", "1: DOWN");

        let devices = fs.read_dir(Path::new("/sys/class/infiniband")).unwrap();
        assert_eq!(devices.len(), 2);
    }

    #[test]
    fn test_mock_fs_port_counters() {
        let mut fs = MockFs::new();
        let dir = fs.add_port_counters(
            "/sys/class/infiniband",
            "mlx5_0",
            1,
            &[("port_rcv_data", 10), ("port_xmit_data", 20)],
        );
        assert_eq!(
            dir,
            PathBuf::from("/sys/class/infiniband/mlx5_0/ports/1/counters")
        );
        assert_eq!(
            fs.read_to_string(&dir.join("port_rcv_data")).unwrap(),
            "10\n"
        );

        fs.set_counter(&dir, "port_rcv_data", 99);
        assert_eq!(
            fs.read_to_string(&dir.join("port_rcv_data")).unwrap(),
            "99\n"
        );

        fs.remove_file(dir.join("port_rcv_data"));
        assert!(!fs.exists(&dir.join("port_rcv_data")));
    }

    #[test]
    fn test_mock_fs_not_found() {
        let fs = MockFs::new();
        let result = fs.read_to_string(Path::new("/nonexistent"));
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::NotFound);
    }
}
