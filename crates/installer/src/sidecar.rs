//! Sidecar encoder: serialises argv and env overrides next to the wrapper

use crate::replacements::Replacements;
use execwrap_common::paths::{PATH_LIST_SEPARATOR, PATH_VAR};
use execwrap_common::sidecar::{ARGV_SUFFIX, ENVV_SUFFIX};
use execwrap_common::{sidecar_path, EnvDirective, EnvEntry, IoResultExt, Result, WrapError};
use std::collections::{HashMap, HashSet};
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;

const SIDECAR_MODE: u32 = 0o600;

/// Write `<wrapper>.argv`, one substituted argument per line in call order.
///
/// Nothing is written when `argv` is `None`; the missing file is what tells
/// the wrapper to forward the caller's arguments unchanged.
pub fn write_argv(wrapper_path: &Path, dest_folder: &Path, argv: Option<&[String]>) -> Result<()> {
    let Some(argv) = argv else {
        return Ok(());
    };
    let r = Replacements::dest_dir(utf8_dest(dest_folder)?);
    let lines: Vec<String> = argv.iter().map(|arg| r.apply(arg)).collect();
    write_lines(&sidecar_path(wrapper_path, ARGV_SUFFIX), &lines)
}

/// Write `<wrapper>.envv`. Always creates the file.
pub fn write_envv(
    wrapper_path: &Path,
    dest_folder: &Path,
    envm: Option<&HashMap<String, String>>,
) -> Result<()> {
    let lines = encode_envv(dest_folder, envm)?;
    write_lines(&sidecar_path(wrapper_path, ENVV_SUFFIX), &lines)
}

/// Sorted `.envv` lines for `envm`, with the destination folder put at the
/// head of PATH.
///
/// Keys may carry a `<`/`>` directive marker. A `PATH` or `<PATH` key gets the
/// destination folder prepended to its value (`PATH=<dest>:<value>`). Without
/// one, a `<PATH=<dest>` directive defers the prepend to the inherited PATH at
/// run time. `>PATH` cannot be combined with that prepend and is rejected, as
/// is any variable named twice. The caller's map is left untouched.
pub fn encode_envv(
    dest_folder: &Path,
    envm: Option<&HashMap<String, String>>,
) -> Result<Vec<String>> {
    let dest = utf8_dest(dest_folder)?;
    let r = Replacements::dest_dir(dest);

    let mut entries: Vec<EnvEntry> = Vec::new();
    let mut seen = HashSet::new();
    for (raw_key, value) in envm.into_iter().flatten() {
        let mut entry = EnvEntry::from_key(raw_key, r.apply(value));
        if entry.key.is_empty() {
            return Err(WrapError::InvalidArgument(format!(
                "environment key '{raw_key}' has no name"
            )));
        }
        if !seen.insert(entry.key.clone()) {
            return Err(WrapError::InvalidArgument(format!(
                "environment variable '{}' is set more than once",
                entry.key
            )));
        }
        if entry.key == PATH_VAR {
            if entry.directive == EnvDirective::Append {
                return Err(WrapError::InvalidArgument(format!(
                    "'{raw_key}' cannot be combined with the destination folder prepend; use PATH or <PATH"
                )));
            }
            entry.value = format!("{dest}{PATH_LIST_SEPARATOR}{}", entry.value);
        }
        entries.push(entry);
    }
    if !seen.contains(PATH_VAR) {
        entries.push(EnvEntry::prepend(PATH_VAR, dest));
    }

    let mut lines: Vec<String> = entries.iter().map(EnvEntry::to_line).collect();
    lines.sort();
    Ok(lines)
}

/// Destination folder as text; it is written verbatim into the sidecars.
fn utf8_dest(dest_folder: &Path) -> Result<&str> {
    dest_folder.to_str().ok_or_else(|| {
        WrapError::InvalidArgument(format!(
            "destination folder '{}' is not valid UTF-8",
            dest_folder.display()
        ))
    })
}

fn write_lines(path: &Path, lines: &[String]) -> Result<()> {
    let file = open_truncated(path).with_path_context("error creating", path)?;
    let mut writer = BufWriter::new(file);
    for line in lines {
        writeln!(writer, "{line}").with_path_context("error writing", path)?;
    }
    writer.flush().with_path_context("error writing", path)?;
    // `mode` only applies on create; a reinstall may truncate a wider file.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(SIDECAR_MODE))
            .with_path_context("error setting mode for", path)?;
    }
    Ok(())
}

fn open_truncated(path: &Path) -> std::io::Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(SIDECAR_MODE);
    options.open(path)
}
