use crate::context::WrapperContext;
use crate::read_sidecar_lines;
use execwrap_common::sidecar::ENVV_SUFFIX;
use execwrap_common::EnvEntry;
use log::warn;
use std::collections::HashSet;
use std::ffi::{OsStr, OsString};

/// Environment for the real binary: resolved `<program>.envv` entries first,
/// then the inherited environment.
///
/// Without a sidecar the inherited environment is passed through unchanged.
pub fn read_envv(ctx: &WrapperContext) -> Vec<(OsString, OsString)> {
    let path = ctx.sidecar(ENVV_SUFFIX);
    let lines = match read_sidecar_lines(&path) {
        Ok(Some(lines)) => lines,
        Ok(None) => return ctx.env.clone(),
        Err(e) => {
            warn!("failed to read env file {}: {e}", path.display());
            return ctx.env.clone();
        }
    };
    let entries: Vec<EnvEntry> = lines
        .iter()
        .filter_map(|line| EnvEntry::parse_line(line))
        .collect();
    merge_env(&entries, &ctx.env)
}

/// Resolve `entries` against `inherited` and return one value per key.
///
/// Directives resolve against the inherited value, never against an earlier
/// sidecar line. The first occurrence of a key wins, so sidecar entries
/// override the inherited environment and the result holds no duplicates.
pub fn merge_env(
    entries: &[EnvEntry],
    inherited: &[(OsString, OsString)],
) -> Vec<(OsString, OsString)> {
    let live = |key: &str| -> Option<&OsStr> {
        inherited
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_os_str())
    };

    let resolved = entries.iter().filter_map(|entry| {
        if entry.key.is_empty() {
            warn!("ignoring env entry with empty name");
            return None;
        }
        Some((OsString::from(&entry.key), entry.resolve(live(&entry.key))))
    });

    let mut seen = HashSet::new();
    resolved
        .chain(inherited.iter().cloned())
        .filter(|(k, _)| seen.insert(k.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(OsString, OsString)> {
        pairs
            .iter()
            .map(|(k, v)| (OsString::from(k), OsString::from(v)))
            .collect()
    }

    fn ctx_in(dir: &Path, env: &[(&str, &str)]) -> WrapperContext {
        WrapperContext::new(dir.join("tool"), vec![], vars(env))
    }

    #[test]
    fn without_sidecar_env_is_untouched() {
        let temp = TempDir::new().unwrap();
        let ctx = ctx_in(temp.path(), &[("PATH", "/usr/bin"), ("HOME", "/root")]);
        assert_eq!(read_envv(&ctx), ctx.env);
    }

    #[test]
    fn append_directive_uses_live_value() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("tool.envv"), ">PATH=/extra\n").unwrap();
        let ctx = ctx_in(temp.path(), &[("PATH", "/usr/bin")]);
        assert_eq!(read_envv(&ctx), vars(&[("PATH", "/usr/bin:/extra")]));
    }

    #[test]
    fn sidecar_entries_lead_and_override() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("tool.envv"),
            "<PATH=/opt/toolkit\nFOO=from-sidecar\n",
        )
        .unwrap();
        let ctx = ctx_in(
            temp.path(),
            &[("HOME", "/root"), ("FOO", "inherited"), ("PATH", "/usr/bin")],
        );
        assert_eq!(
            read_envv(&ctx),
            vars(&[
                ("PATH", "/opt/toolkit:/usr/bin"),
                ("FOO", "from-sidecar"),
                ("HOME", "/root"),
            ])
        );
    }

    #[test]
    fn directives_resolve_against_inherited_not_earlier_lines() {
        let entries = vec![
            EnvEntry::prepend("LD_LIBRARY_PATH", "/a"),
            EnvEntry::append("LD_LIBRARY_PATH", "/b"),
        ];
        let merged = merge_env(&entries, &vars(&[("LD_LIBRARY_PATH", "/lib")]));
        assert_eq!(merged, vars(&[("LD_LIBRARY_PATH", "/a:/lib")]));
    }

    #[test]
    fn directives_keep_separator_when_live_value_missing() {
        let merged = merge_env(&[EnvEntry::prepend("PATH", "/opt")], &[]);
        assert_eq!(merged, vars(&[("PATH", "/opt:")]));
        let merged = merge_env(&[EnvEntry::append("X", "/opt")], &vars(&[("X", "")]));
        assert_eq!(merged, vars(&[("X", ":/opt")]));
    }

    #[test]
    fn empty_keys_and_blank_lines_are_skipped() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("tool.envv"), "=oops\n\nA=1\n").unwrap();
        let ctx = ctx_in(temp.path(), &[]);
        assert_eq!(read_envv(&ctx), vars(&[("A", "1")]));
    }

    #[test]
    fn inherited_duplicates_collapse_to_first() {
        let merged = merge_env(&[], &vars(&[("X", "1"), ("X", "2")]));
        assert_eq!(merged, vars(&[("X", "1")]));
    }
}
