use crate::error::{Result, WrapError};
use std::path::{Path, PathBuf};

/// Placeholder in argv entries and env values, replaced by the destination
/// folder at install time.
pub const DEST_DIR_TOKEN: &str = "@destDir@";

/// File name of the generic wrapper binary shipped next to the installer.
pub const GENERIC_WRAPPER_NAME: &str = "wrapper";
/// Overrides where the installer picks up the generic wrapper binary.
pub const WRAPPER_BINARY_VAR: &str = "EXECWRAP_WRAPPER_BINARY";
/// Log filter for both binaries.
pub const LOG_FILTER_VAR: &str = "EXECWRAP_LOG";

pub const PATH_VAR: &str = "PATH";
pub const PATH_LIST_SEPARATOR: char = ':';

/// Present once the NVIDIA kernel modules are loaded.
pub const NVIDIA_DRIVER_PROBE: &str = "/proc/driver/nvidia/version";
/// Wrapper names that fall back to [`FALLBACK_RUNTIME`] until the driver is up.
pub const RUNTIME_WRAPPER_NAMES: &[&str] = &[
    "nvidia-container-runtime",
    "nvidia-container-runtime.cdi",
    "nvidia-container-runtime.legacy",
];
pub const FALLBACK_RUNTIME: &str = "runc";

/// Location of the generic wrapper binary the installer copies.
///
/// `EXECWRAP_WRAPPER_BINARY` wins when set and non-empty; otherwise the
/// wrapper is expected in the same directory as the running executable.
pub fn generic_wrapper_path() -> Result<PathBuf> {
    if let Ok(override_path) = std::env::var(WRAPPER_BINARY_VAR) {
        let trimmed = override_path.trim();
        if !trimmed.is_empty() {
            return Ok(PathBuf::from(trimmed));
        }
    }
    let current_exe = std::env::current_exe()
        .map_err(|e| WrapError::Resolution(format!("error getting current executable: {e}")))?;
    generic_wrapper_beside(&current_exe)
}

pub fn generic_wrapper_beside(exe: &Path) -> Result<PathBuf> {
    let dir = exe.parent().ok_or_else(|| {
        WrapError::Resolution(format!("'{}' has no parent directory", exe.display()))
    })?;
    Ok(dir.join(GENERIC_WRAPPER_NAME))
}
