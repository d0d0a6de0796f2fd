use crate::context::WrapperContext;
use crate::read_sidecar_lines;
use execwrap_common::sidecar::ARGV_SUFFIX;
use log::warn;
use std::ffi::OsString;

/// `[<program>.real] + <program>.argv lines + caller args`.
///
/// A missing sidecar is the normal "no extra arguments" case. Any other read
/// failure is logged and treated the same way.
pub fn read_argv(ctx: &WrapperContext) -> Vec<OsString> {
    let mut argv = vec![ctx.real_binary().into_os_string()];
    let path = ctx.sidecar(ARGV_SUFFIX);
    match read_sidecar_lines(&path) {
        Ok(Some(lines)) => argv.extend(lines.into_iter().map(OsString::from)),
        Ok(None) => {}
        Err(e) => warn!("failed to read argv file {}: {e}", path.display()),
    }
    argv.extend(ctx.args.iter().cloned());
    argv
}
