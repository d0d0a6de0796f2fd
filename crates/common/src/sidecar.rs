//! Line format of the `.argv` / `.envv` sidecar files
//!
//! `.argv` holds one literal argument per line. `.envv` holds one
//! `KEY=VALUE` per line where `KEY` may carry a directive prefix:
//! `<` prepends the value to the live variable, `>` appends it, and a bare
//! key replaces the variable outright. The prefix encoding exists only on
//! disk; in memory the directive is an [`EnvDirective`].

use crate::join_path_list;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

pub const REAL_SUFFIX: &str = ".real";
pub const ARGV_SUFFIX: &str = ".argv";
pub const ENVV_SUFFIX: &str = ".envv";

const PREPEND_MARKER: char = '<';
const APPEND_MARKER: char = '>';

/// `<wrapper><suffix>`, e.g. `/opt/bin/tool` + `.envv`.
pub fn sidecar_path(wrapper: &Path, suffix: &str) -> PathBuf {
    let mut raw = wrapper.as_os_str().to_os_string();
    raw.push(suffix);
    PathBuf::from(raw)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnvDirective {
    Prepend,
    Append,
    Replace,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvEntry {
    pub directive: EnvDirective,
    pub key: String,
    pub value: String,
}

impl EnvEntry {
    pub fn new(directive: EnvDirective, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            directive,
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn replace(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(EnvDirective::Replace, key, value)
    }

    pub fn prepend(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(EnvDirective::Prepend, key, value)
    }

    pub fn append(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(EnvDirective::Append, key, value)
    }

    pub fn to_line(&self) -> String {
        let marker = match self.directive {
            EnvDirective::Prepend => Some(PREPEND_MARKER),
            EnvDirective::Append => Some(APPEND_MARKER),
            EnvDirective::Replace => None,
        };
        let mut line = String::with_capacity(self.key.len() + self.value.len() + 2);
        line.extend(marker);
        line.push_str(&self.key);
        line.push('=');
        line.push_str(&self.value);
        line
    }

    /// Parse one `.envv` line, splitting on the first `=`.
    ///
    /// Returns `None` for blank lines. A line without `=` yields an empty value.
    pub fn parse_line(line: &str) -> Option<Self> {
        if line.is_empty() {
            return None;
        }
        let (raw_key, value) = line.split_once('=').unwrap_or((line, ""));
        Some(Self::from_key(raw_key, value))
    }

    /// Build an entry from a key that may carry a `<`/`>` directive marker.
    pub fn from_key(raw_key: &str, value: impl Into<String>) -> Self {
        let (directive, key) = if let Some(key) = raw_key.strip_prefix(PREPEND_MARKER) {
            (EnvDirective::Prepend, key)
        } else if let Some(key) = raw_key.strip_prefix(APPEND_MARKER) {
            (EnvDirective::Append, key)
        } else {
            (EnvDirective::Replace, raw_key)
        };
        Self::new(directive, key, value)
    }

    /// Final value of the variable given its current value in the live environment.
    pub fn resolve(&self, live: Option<&OsStr>) -> OsString {
        let live = live.unwrap_or_default();
        let value = OsStr::new(&self.value);
        match self.directive {
            EnvDirective::Replace => value.to_os_string(),
            EnvDirective::Prepend => join_path_list(value, live),
            EnvDirective::Append => join_path_list(live, value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn sidecar_path_appends_suffix() {
        assert_eq!(
            sidecar_path(Path::new("/opt/bin/nvidia-ctk"), ENVV_SUFFIX),
            PathBuf::from("/opt/bin/nvidia-ctk.envv")
        );
        assert_eq!(
            sidecar_path(Path::new("tool.v2"), REAL_SUFFIX),
            PathBuf::from("tool.v2.real")
        );
    }

    #[test]
    fn directive_prefixes_serialize() {
        assert_eq!(EnvEntry::prepend("PATH", "/opt").to_line(), "<PATH=/opt");
        assert_eq!(EnvEntry::append("PATH", "/opt").to_line(), ">PATH=/opt");
        assert_eq!(EnvEntry::replace("FOO", "a=b").to_line(), "FOO=a=b");
    }

    #[test]
    fn parse_splits_on_first_equals() {
        let entry = EnvEntry::parse_line("OPTS=--flag=1:x").unwrap();
        assert_eq!(entry, EnvEntry::replace("OPTS", "--flag=1:x"));
        assert_eq!(
            EnvEntry::parse_line(">LD_LIBRARY_PATH=/lib").unwrap(),
            EnvEntry::append("LD_LIBRARY_PATH", "/lib")
        );
        assert_eq!(EnvEntry::parse_line("BARE").unwrap(), EnvEntry::replace("BARE", ""));
        assert!(EnvEntry::parse_line("").is_none());
    }

    #[test]
    fn from_key_strips_directive_marker() {
        assert_eq!(EnvEntry::from_key("<PATH", "/a"), EnvEntry::prepend("PATH", "/a"));
        assert_eq!(EnvEntry::from_key(">PATH", "/a"), EnvEntry::append("PATH", "/a"));
        assert_eq!(EnvEntry::from_key("PATH", "/a"), EnvEntry::replace("PATH", "/a"));
    }

    #[test]
    fn resolve_against_live_value() {
        let live = OsStr::new("/usr/bin");
        assert_eq!(
            EnvEntry::append("PATH", "/extra").resolve(Some(live)),
            OsString::from("/usr/bin:/extra")
        );
        assert_eq!(
            EnvEntry::prepend("PATH", "/opt").resolve(Some(live)),
            OsString::from("/opt:/usr/bin")
        );
        assert_eq!(
            EnvEntry::replace("PATH", "/only").resolve(Some(live)),
            OsString::from("/only")
        );
    }

    #[test]
    fn resolve_without_live_value_keeps_separator() {
        assert_eq!(
            EnvEntry::prepend("PATH", "/opt").resolve(None),
            OsString::from("/opt:")
        );
        assert_eq!(
            EnvEntry::append("X", "/opt").resolve(Some(OsStr::new(""))),
            OsString::from(":/opt")
        );
    }

    proptest! {
        #[test]
        fn line_format_is_stable(
            key in "[A-Za-z_][A-Za-z0-9_]{0,12}",
            value in "[ -~]{0,24}",
            which in 0u8..3,
        ) {
            let directive = match which {
                0 => EnvDirective::Prepend,
                1 => EnvDirective::Append,
                _ => EnvDirective::Replace,
            };
            let entry = EnvEntry::new(directive, key, value);
            prop_assert_eq!(EnvEntry::parse_line(&entry.to_line()), Some(entry));
        }
    }
}
