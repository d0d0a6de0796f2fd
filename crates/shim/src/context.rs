//! Wrapper identity and the inherited process state

use execwrap_common::sidecar::REAL_SUFFIX;
use execwrap_common::{sidecar_path, Result, WrapError};
use std::env;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// Everything the wrapper knows about its own invocation.
#[derive(Debug, Clone)]
pub struct WrapperContext {
    /// Absolute path of the running wrapper image
    pub program: PathBuf,
    /// Arguments after argv[0]
    pub args: Vec<OsString>,
    /// Inherited environment, in the order the caller passed it
    pub env: Vec<(OsString, OsString)>,
}

impl WrapperContext {
    pub fn new(
        program: impl Into<PathBuf>,
        args: Vec<OsString>,
        env: Vec<(OsString, OsString)>,
    ) -> Self {
        Self {
            program: program.into(),
            args,
            env,
        }
    }

    /// Capture the running process.
    pub fn from_current_process() -> Result<Self> {
        let program = env::current_exe()
            .map_err(|e| WrapError::Resolution(format!("failed to get executable: {e}")))?;
        Ok(Self::new(
            program,
            env::args_os().skip(1).collect(),
            env::vars_os().collect(),
        ))
    }

    pub fn wrapper_name(&self) -> Option<&str> {
        self.program.file_name().and_then(OsStr::to_str)
    }

    /// `<program>.real`, the binary that is finally exec'd.
    pub fn real_binary(&self) -> PathBuf {
        self.sidecar(REAL_SUFFIX)
    }

    pub fn sidecar(&self, suffix: &str) -> PathBuf {
        sidecar_path(&self.program, suffix)
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// First value of `key` in the inherited environment.
    pub fn live_var(&self, key: &str) -> Option<&OsStr> {
        self.env
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_os_str())
    }
}
