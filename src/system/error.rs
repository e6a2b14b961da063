use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failure of a single sampling or resolution step.
///
/// Every variant is recoverable at the field or row level. The collector maps
/// them to placeholders; only an unreadable proc root escalates further.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SampleError {
    #[error("malformed record in {source_name}: {reason}")]
    Parse { source_name: String, reason: String },

    #[error("no ticks elapsed between samples")]
    DivisionByZero,

    #[error("process {pid} has a non-positive age")]
    InvalidProcessAge { pid: u32 },

    #[error("{} not found", .0.display())]
    NotFound(PathBuf),

    #[error("uid {0} has no entry in the user database")]
    Unmapped(u32),

    #[error("permission denied reading {}", .0.display())]
    PermissionDenied(PathBuf),

    #[error("failed to read {}: {kind}", .path.display())]
    Io { path: PathBuf, kind: io::ErrorKind },
}

impl SampleError {
    pub fn parse(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        SampleError::Parse {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    pub fn from_io(path: &Path, err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => SampleError::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => SampleError::PermissionDenied(path.to_path_buf()),
            kind => SampleError::Io {
                path: path.to_path_buf(),
                kind,
            },
        }
    }

    /// True when the process behind the record most likely exited between
    /// discovery and read.
    pub fn is_vanished(&self) -> bool {
        matches!(self, SampleError::NotFound(_))
    }
}
