use crate::sidecar::{write_argv, write_envv};
use execwrap_common::paths::generic_wrapper_path;
use execwrap_common::sidecar::REAL_SUFFIX;
use execwrap_common::{IoResultExt, Result, WrapError};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// An executable to stage behind the generic wrapper.
#[derive(Debug, Clone, Default)]
pub struct Executable {
    source: PathBuf,
    wrapper_name: Option<String>,
    argv: Option<Vec<String>>,
    envm: Option<HashMap<String, String>>,
}

impl Executable {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            ..Self::default()
        }
    }

    /// Public name of the wrapper. Defaults to the source's file name.
    pub fn wrapper_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.wrapper_name = (!name.is_empty()).then_some(name);
        self
    }

    /// Extra arguments placed before the caller's own. Calling this, even with
    /// an empty list, makes the installer emit an `.argv` sidecar.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.argv
            .get_or_insert_with(Vec::new)
            .extend(args.into_iter().map(Into::into));
        self
    }

    pub fn arg(self, arg: impl Into<String>) -> Self {
        self.args([arg.into()])
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envm
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn envs<I, K, V>(self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        vars.into_iter().fold(self, |exe, (k, v)| exe.env(k, v))
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    fn resolved_wrapper_name(&self) -> Result<String> {
        if let Some(name) = &self.wrapper_name {
            return Ok(name.clone());
        }
        self.source
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .ok_or_else(|| {
                WrapError::InvalidArgument(format!(
                    "cannot derive a UTF-8 wrapper name from '{}'",
                    self.source.display()
                ))
            })
    }
}

/// Copies executables into a destination folder behind the generic wrapper.
#[derive(Debug, Clone)]
pub struct Installer {
    generic_wrapper: PathBuf,
}

impl Installer {
    pub fn new(generic_wrapper: impl Into<PathBuf>) -> Self {
        Self {
            generic_wrapper: generic_wrapper.into(),
        }
    }

    /// Use the generic wrapper next to the running executable, or the one
    /// named by `EXECWRAP_WRAPPER_BINARY`.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(generic_wrapper_path()?))
    }

    pub fn generic_wrapper(&self) -> &Path {
        &self.generic_wrapper
    }

    /// Install `exe` into `dest_folder` and return the wrapper's path.
    ///
    /// A failure part-way through leaves the files written so far in place.
    pub fn install(&self, exe: &Executable, dest_folder: impl AsRef<Path>) -> Result<PathBuf> {
        let dest_folder = dest_folder.as_ref();
        if dest_folder.as_os_str().is_empty() {
            return Err(WrapError::InvalidArgument(
                "destination folder must be specified".to_string(),
            ));
        }
        if exe.source.as_os_str().is_empty() {
            return Err(WrapError::InvalidArgument(
                "source executable must be specified".to_string(),
            ));
        }
        if dest_folder.to_str().is_none() {
            return Err(WrapError::InvalidArgument(format!(
                "destination folder '{}' is not valid UTF-8",
                dest_folder.display()
            )));
        }
        let name = exe.resolved_wrapper_name()?;
        info!(
            source = %exe.source.display(),
            dest = %dest_folder.display(),
            "installing executable"
        );

        fs::create_dir_all(dest_folder)
            .with_path_context("error creating destination folder", dest_folder)?;

        let real_path = dest_folder.join(format!("{name}{REAL_SUFFIX}"));
        install_file(&exe.source, &real_path)?;
        info!(path = %real_path.display(), "installed real binary");

        let wrapper_path = self.install_wrapper(exe, &name, dest_folder)?;
        info!(path = %wrapper_path.display(), "installed wrapper");
        Ok(wrapper_path)
    }

    fn install_wrapper(&self, exe: &Executable, name: &str, dest_folder: &Path) -> Result<PathBuf> {
        let wrapper_path = dest_folder.join(name);
        install_file(&self.generic_wrapper, &wrapper_path)?;
        write_argv(&wrapper_path, dest_folder, exe.argv.as_deref())?;
        write_envv(&wrapper_path, dest_folder, exe.envm.as_ref())?;
        ensure_executable(&wrapper_path)?;
        Ok(wrapper_path)
    }
}

fn install_file(src: &Path, dest: &Path) -> Result<()> {
    debug!(src = %src.display(), dest = %dest.display(), "copying file");
    fs::copy(src, dest)
        .map(|_| ())
        .map_err(|e| {
            WrapError::io(
                format!("error copying '{}' to '{}'", src.display(), dest.display()),
                e,
            )
        })
}

/// `chmod +x` on `path`.
pub fn ensure_executable(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        let metadata = fs::metadata(path).with_path_context("error getting file info for", path)?;
        let mut perms = metadata.permissions();
        perms.set_mode(perms.mode() | 0o111);
        fs::set_permissions(path, perms)
            .with_path_context("error setting executable mode for", path)?;
    }
    #[cfg(not(unix))]
    {
        fs::metadata(path).with_path_context("error getting file info for", path)?;
    }
    Ok(())
}
