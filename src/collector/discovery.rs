//! Picks a device when none was given on the command line.

use std::path::Path;

use tracing::debug;

use super::traits::FileSystem;

/// Lists devices whose port 1 reports an `ACTIVE` state, sorted by name.
pub fn active_devices<F: FileSystem>(fs: &F, root: &Path) -> Vec<String> {
    let Ok(entries) = fs.read_dir(root) else {
        debug!("cannot list {}", root.display());
        return Vec::new();
    };

    let mut devices: Vec<String> = entries
        .iter()
        .filter_map(|path| path.file_name()?.to_str().map(str::to_string))
        .filter(|name| !name.starts_with('.'))
        .filter(|name| {
            let state = root.join(name).join("ports").join("1").join("state");
            fs.read_to_string(&state)
                .is_ok_and(|s| s.contains("ACTIVE"))
        })
        .collect();
    devices.sort();
    devices
}
