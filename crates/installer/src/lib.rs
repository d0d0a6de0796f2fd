//! Installs an executable behind the generic wrapper
//!
//! For a wrapper name `X` in destination folder `D` the installer writes:
//! - `D/X.real`: the original binary, content and mode preserved
//! - `D/X`: a copy of the generic wrapper, forced executable
//! - `D/X.argv`: extra arguments, only when an argument list was given
//! - `D/X.envv`: environment overrides, always (at least the PATH entry)
//!
//! ```rust,no_run
//! use execwrap_installer::{Executable, Installer};
//!
//! fn main() -> execwrap_common::Result<()> {
//!     let installer = Installer::from_env()?;
//!     let exe = Executable::new("/usr/bin/nvidia-ctk").env("NVIDIA_CTK_LIBCUDA", "@destDir@/lib");
//!     let wrapper = installer.install(&exe, "/usr/local/nvidia/toolkit")?;
//!     println!("{}", wrapper.display());
//!     Ok(())
//! }
//! ```

pub use executable::{ensure_executable, Executable, Installer};
pub use replacements::Replacements;

mod executable;
mod replacements;
mod sidecar;

pub use sidecar::{encode_envv, write_argv, write_envv};
