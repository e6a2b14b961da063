use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;

use super::error::SampleError;

/// Read access to the kernel's line-oriented pseudo files.
///
/// Each call opens, reads and closes its own handle, so implementations hold
/// no per-read state and are safe to share across threads.
pub trait LineSource: Send + Sync {
    fn read_to_string(&self, path: &Path) -> Result<String, SampleError>;

    /// Names of the entries directly under `path`.
    fn list_dir(&self, path: &Path) -> Result<Vec<String>, SampleError>;
}

/// The real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSource;

impl LineSource for FsSource {
    fn read_to_string(&self, path: &Path) -> Result<String, SampleError> {
        fs::read_to_string(path).map_err(|e| SampleError::from_io(path, &e))
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<String>, SampleError> {
        let entries = fs::read_dir(path).map_err(|e| SampleError::from_io(path, &e))?;
        Ok(entries
            .flatten()
            .map(|entry| entry.file_name().to_string_lossy().to_string())
            .collect())
    }
}

/// In-memory file tree, used for fixtures and benchmarks.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    files: BTreeMap<PathBuf, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        self.insert(path, contents);
        self
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, contents: impl Into<String>) {
        self.files.insert(path.into(), contents.into());
    }
}

impl LineSource for MemorySource {
    fn read_to_string(&self, path: &Path) -> Result<String, SampleError> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| SampleError::NotFound(path.to_path_buf()))
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<String>, SampleError> {
        let mut names: Vec<String> = self
            .files
            .keys()
            .filter_map(|file| file.strip_prefix(path).ok())
            .filter_map(|rel| rel.components().next())
            .map(|c| c.as_os_str().to_string_lossy().to_string())
            .collect();
        names.dedup();
        if names.is_empty() {
            return Err(SampleError::NotFound(path.to_path_buf()));
        }
        Ok(names)
    }
}

/// Locations of the files the engine reads.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProcPaths {
    pub proc_root: PathBuf,
    pub passwd: PathBuf,
    pub os_release: PathBuf,
}

impl Default for ProcPaths {
    fn default() -> Self {
        ProcPaths {
            proc_root: PathBuf::from("/proc"),
            passwd: PathBuf::from("/etc/passwd"),
            os_release: PathBuf::from("/etc/os-release"),
        }
    }
}

impl ProcPaths {
    pub fn stat(&self) -> PathBuf {
        self.proc_root.join("stat")
    }

    pub fn uptime(&self) -> PathBuf {
        self.proc_root.join("uptime")
    }

    pub fn meminfo(&self) -> PathBuf {
        self.proc_root.join("meminfo")
    }

    pub fn version(&self) -> PathBuf {
        self.proc_root.join("version")
    }

    pub fn pid_file(&self, pid: u32, name: &str) -> PathBuf {
        self.proc_root.join(pid.to_string()).join(name)
    }
}

/// Everything an engine or resolver call needs from its environment.
///
/// Passed explicitly to every operation; nothing in `system` reads ambient
/// process-wide state.
#[derive(Clone)]
pub struct ProcContext {
    source: Arc<dyn LineSource>,
    pub paths: ProcPaths,
    pub ticks_per_second: u64,
}

impl ProcContext {
    pub fn new(source: Arc<dyn LineSource>, paths: ProcPaths, ticks_per_second: u64) -> Self {
        Self {
            source,
            paths,
            ticks_per_second,
        }
    }

    /// Context over the real filesystem using the platform tick rate.
    pub fn from_host(paths: ProcPaths) -> Option<Self> {
        let tps = super::platform::ticks_per_second()?;
        Some(Self::new(Arc::new(FsSource), paths, tps))
    }

    pub fn read(&self, path: &Path) -> Result<String, SampleError> {
        self.source.read_to_string(path)
    }

    pub fn list_dir(&self, path: &Path) -> Result<Vec<String>, SampleError> {
        self.source.list_dir(path)
    }
}

impl fmt::Debug for ProcContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcContext")
            .field("paths", &self.paths)
            .field("ticks_per_second", &self.ticks_per_second)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_source_lists_direct_children_once() {
        let source = MemorySource::new()
            .with_file("/proc/1/stat", "a")
            .with_file("/proc/1/status", "b")
            .with_file("/proc/22/stat", "c")
            .with_file("/proc/stat", "d");
        let names = source.list_dir(Path::new("/proc")).unwrap();
        assert_eq!(names, vec!["1", "22", "stat"]);
    }

    #[test]
    fn memory_source_missing_file_is_not_found() {
        let source = MemorySource::new();
        let err = source.read_to_string(Path::new("/proc/9/stat")).unwrap_err();
        assert!(err.is_vanished());
    }

    #[test]
    fn fs_source_reports_missing_path() {
        let err = FsSource
            .read_to_string(Path::new("/nonexistent/procpulse/stat"))
            .unwrap_err();
        assert!(matches!(err, SampleError::NotFound(_)));
    }

    #[test]
    fn pid_paths_join_under_root() {
        let paths = ProcPaths {
            proc_root: PathBuf::from("/fixture"),
            ..ProcPaths::default()
        };
        assert_eq!(paths.pid_file(12, "stat"), PathBuf::from("/fixture/12/stat"));
        assert_eq!(paths.stat(), PathBuf::from("/fixture/stat"));
    }
}
