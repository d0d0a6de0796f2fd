//! Shared pieces of the execwrap install-time / run-time contract
//!
//! The installer and the wrapper runtime never talk to each other directly.
//! Everything they agree on lives here: the sidecar line format, the fixed
//! filesystem locations, and the error taxonomy both halves report with.

pub mod error;
pub mod paths;
pub mod sidecar;

pub use error::{IoResultExt, Result, WrapError};
pub use sidecar::{sidecar_path, EnvDirective, EnvEntry};

use std::ffi::{OsStr, OsString};

/// `head:tail`. The separator is always written, even when a side is empty.
pub fn join_path_list(head: &OsStr, tail: &OsStr) -> OsString {
    let mut joined = OsString::with_capacity(head.len() + tail.len() + 1);
    joined.push(head);
    joined.push(paths::PATH_LIST_SEPARATOR.to_string());
    joined.push(tail);
    joined
}
