//! Error taxonomy shared by the installer and the wrapper runtime

use std::io;
use std::path::{Path, PathBuf};

pub type Result<T> = std::result::Result<T, WrapError>;

#[derive(Debug, thiserror::Error)]
pub enum WrapError {
    /// A required installer input was missing.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// Filesystem failure during copy, sidecar write/read or permission change.
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
    /// The wrapper could not locate itself or the fallback runtime.
    #[error("resolution failed: {0}")]
    Resolution(String),
    /// The final process-image replacement failed.
    #[error("failed to exec {}: {source}", program.display())]
    Exec {
        program: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl WrapError {
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// True when this is an I/O error whose cause is a missing file.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

/// Attach operation and path context to a raw `io::Result`.
pub trait IoResultExt<T> {
    fn with_path_context(self, op: &str, path: &Path) -> Result<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_path_context(self, op: &str, path: &Path) -> Result<T> {
        self.map_err(|e| WrapError::io(format!("{op} '{}'", path.display()), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_context_includes_operation_and_path() {
        let raw: io::Result<()> = Err(io::Error::from(io::ErrorKind::PermissionDenied));
        let err = raw.with_path_context("error writing", Path::new("/opt/bin/tool.envv"));
        let msg = err.unwrap_err().to_string();
        assert!(msg.starts_with("error writing '/opt/bin/tool.envv'"), "{msg}");
    }

    #[test]
    fn not_found_is_recognised() {
        let err = WrapError::io("open", io::Error::from(io::ErrorKind::NotFound));
        assert!(err.is_not_found());
        let err = WrapError::io("open", io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(!err.is_not_found());
        assert!(!WrapError::Resolution("x".into()).is_not_found());
    }
}
