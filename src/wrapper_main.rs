//! Generic wrapper - rebuilds argv/env from sidecars and execs `<self>.real`
//!
//! The installer copies this binary to the public name of each wrapped
//! executable. It never returns on success: the process image is replaced.

use execwrap_common::paths::LOG_FILTER_VAR;
use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::new().filter_or(LOG_FILTER_VAR, "warn"))
        .format_target(false)
        .init();

    match execwrap_shim::run_wrapper() {
        Ok(never) => match never {},
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
