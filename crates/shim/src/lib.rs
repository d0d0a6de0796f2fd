//! execwrap generic wrapper runtime
//!
//! This library is the body of the `wrapper` binary that the installer copies
//! in front of a real executable.
//!
//! ## Architecture
//!
//! The wrapper works by:
//! 1. Resolving its own absolute path (`/opt/bin/tool`)
//! 2. Redirecting well-known runtime wrappers to `runc` while the host driver
//!    is not loaded
//! 3. Rebuilding argv from `tool.argv` and env from `tool.envv`
//! 4. Replacing itself with `tool.real`
//!
//! ## Usage
//!
//! ```rust,no_run
//! fn main() {
//!     match execwrap_shim::run_wrapper() {
//!         Ok(never) => match never {},
//!         Err(e) => {
//!             eprintln!("wrapper: {e}");
//!             std::process::exit(1);
//!         }
//!     }
//! }
//! ```

pub use context::WrapperContext;
pub use dispatch::{run_wrapper, Dispatcher};
pub use exec::{ExecPlan, Execve, ProcessImage};
pub use redirect::RuntimeRedirect;

mod argv;
mod context;
mod dispatch;
mod envv;
mod exec;
mod redirect;

pub use argv::read_argv;
pub use envv::{merge_env, read_envv};

use std::fs;
use std::io;
use std::path::Path;

/// Lines of a sidecar file, or `None` when it does not exist.
fn read_sidecar_lines(path: &Path) -> io::Result<Option<Vec<String>>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content.lines().map(str::to_string).collect())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}
