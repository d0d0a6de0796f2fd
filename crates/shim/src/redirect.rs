//! Fallback to the plain OCI runtime while the GPU driver is not loaded

use crate::context::WrapperContext;
use crate::exec::ExecPlan;
use execwrap_common::paths::{
    FALLBACK_RUNTIME, NVIDIA_DRIVER_PROBE, PATH_VAR, RUNTIME_WRAPPER_NAMES,
};
use execwrap_common::{Result, WrapError};
use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct RuntimeRedirect {
    /// File whose presence means the host is ready for the real runtime.
    pub probe: PathBuf,
    /// Wrapper names subject to the redirect.
    pub names: Vec<String>,
    /// Binary looked up on PATH when the probe is absent.
    pub fallback: String,
}

impl Default for RuntimeRedirect {
    fn default() -> Self {
        Self {
            probe: PathBuf::from(NVIDIA_DRIVER_PROBE),
            names: RUNTIME_WRAPPER_NAMES.iter().map(|s| s.to_string()).collect(),
            fallback: FALLBACK_RUNTIME.to_string(),
        }
    }
}

impl RuntimeRedirect {
    pub fn applies_to(&self, ctx: &WrapperContext) -> bool {
        ctx.wrapper_name()
            .is_some_and(|name| self.names.iter().any(|n| n == name))
    }

    pub fn host_ready(&self) -> bool {
        fs::metadata(&self.probe).is_ok()
    }

    /// Locate the fallback on the caller's PATH.
    pub fn locate(&self, ctx: &WrapperContext) -> Result<PathBuf> {
        let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
        which::which_in(&self.fallback, ctx.live_var(PATH_VAR), cwd)
            .map_err(|e| WrapError::Resolution(format!("failed to find {}: {e}", self.fallback)))
    }

    /// `[fallback] + caller args` with the caller's environment untouched.
    /// Sidecars are not consulted.
    pub fn plan(&self, ctx: &WrapperContext) -> Result<ExecPlan> {
        let program = self.locate(ctx)?;
        let argv = std::iter::once(OsString::from(&self.fallback))
            .chain(ctx.args.iter().cloned())
            .collect();
        Ok(ExecPlan {
            program,
            argv,
            envv: ctx.env.clone(),
        })
    }
}
