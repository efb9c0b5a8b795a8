//! Export cache: where result files land when no output directory is given.
//!
//! Platform locations (via `directories`):
//! - Linux: `~/.cache/colcmp/`
//! - macOS: `~/Library/Caches/com.colcmp.colcmp/`
//! - Windows: `%LOCALAPPDATA%\colcmp\colcmp\cache\`

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Local;
use directories::ProjectDirs;
use tracing::{debug, info, warn};

const APP_QUALIFIER: &str = "com";
const APP_ORG: &str = "colcmp";
const APP_NAME: &str = "colcmp";
const RUNS_DIR: &str = "runs";

#[derive(Debug, Clone)]
pub struct CacheStore {
    root: PathBuf,
}

impl CacheStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Uses `root` when given, otherwise the platform cache directory, or a
    /// `colcmp` folder in the temp directory when the platform has none.
    pub fn resolve(root: Option<PathBuf>) -> Self {
        if let Some(root) = root {
            return Self::new(root);
        }
        match ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME) {
            Some(dirs) => Self::new(dirs.cache_dir()),
            None => {
                let fallback = std::env::temp_dir().join(APP_NAME);
                warn!(dir = %fallback.display(), "no platform cache directory, using temp dir");
                Self::new(fallback)
            }
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding one folder per command run. It is the only part of
    /// the cache root colcmp touches.
    pub fn runs_dir(&self) -> PathBuf {
        self.root.join(RUNS_DIR)
    }

    /// Total size in bytes of every file under [`runs_dir`](Self::runs_dir).
    pub fn size(&self) -> io::Result<u64> {
        match dir_size(&self.runs_dir()) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(0),
            other => other,
        }
    }

    /// Removes every run directory. Other files under the cache root are left
    /// alone, and a missing runs directory is not an error.
    pub fn clear(&self) -> io::Result<()> {
        let runs = self.runs_dir();
        match fs::remove_dir_all(&runs) {
            Ok(()) => info!(dir = %runs.display(), "cleared cache"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// Picks a directory for one command run, named after the command and
    /// the local time. The directory is not created; the export creates it
    /// once there is something to write.
    pub fn run_dir(&self, command: &str) -> PathBuf {
        let stamp = Local::now().format("%Y%m%d-%H%M%S");
        let runs = self.runs_dir();
        let mut candidate = runs.join(format!("{command}-{stamp}"));
        let mut attempt = 1u32;
        while candidate.exists() {
            candidate = runs.join(format!("{command}-{stamp}-{attempt}"));
            attempt += 1;
        }
        debug!(dir = %candidate.display(), "picked run directory");
        candidate
    }
}

fn dir_size(path: &Path) -> io::Result<u64> {
    let mut total = 0;
    for entry in fs::read_dir(path)? {
        let entry = entry?;
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            total += dir_size(&entry.path())?;
        } else if file_type.is_file() {
            total += entry.metadata()?.len();
        }
    }
    Ok(total)
}

/// Formats a byte count with binary units, e.g. `1.5 KiB`.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn size_and_clear_only_touch_runs() {
        let dir = TempDir::new().unwrap();
        let cache = CacheStore::new(dir.path().join("cache"));
        assert_eq!(cache.size().unwrap(), 0);

        let run = cache.run_dir("compare");
        fs::create_dir_all(&run).unwrap();
        fs::write(run.join("a.csv"), "12345").unwrap();
        fs::write(cache.root().join("note.txt"), "abc").unwrap();
        assert_eq!(cache.size().unwrap(), 5);

        cache.clear().unwrap();
        assert_eq!(cache.size().unwrap(), 0);
        assert!(!cache.runs_dir().exists());
        assert_eq!(
            fs::read_to_string(cache.root().join("note.txt")).unwrap(),
            "abc"
        );
    }

    #[test]
    fn run_dirs_are_unique() {
        let dir = TempDir::new().unwrap();
        let cache = CacheStore::new(dir.path());
        let first = cache.run_dir("group");
        assert!(!first.exists());
        fs::create_dir_all(&first).unwrap();
        let second = cache.run_dir("group");
        assert_ne!(first, second);
        assert!(second.starts_with(cache.runs_dir()));
    }

    #[test]
    fn explicit_root_wins() {
        let cache = CacheStore::resolve(Some(PathBuf::from("/tmp/colcmp-test")));
        assert_eq!(cache.root(), Path::new("/tmp/colcmp-test"));
    }

    #[test]
    fn clear_missing_root_is_ok() {
        let dir = TempDir::new().unwrap();
        CacheStore::new(dir.path().join("absent")).clear().unwrap();
    }

    #[test]
    fn formats_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1536), "1.5 KiB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MiB");
    }
}
