//! Process-image replacement
//!
//! Everything above this module only builds an [`ExecPlan`]. The one call
//! that does not return lives behind [`ProcessImage`] so the decision logic
//! can be exercised without exec'ing.

use execwrap_common::{Result, WrapError};
use std::convert::Infallible;
use std::ffi::OsString;
use std::path::PathBuf;

/// Program, argv and envv for the final `execve`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecPlan {
    pub program: PathBuf,
    pub argv: Vec<OsString>,
    pub envv: Vec<(OsString, OsString)>,
}

impl ExecPlan {
    pub fn env_var(&self, key: &str) -> Option<&OsString> {
        self.envv.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}

pub trait ProcessImage {
    /// Replace the current process with `plan`. Only returns on failure.
    fn replace(&self, plan: &ExecPlan) -> Result<Infallible>;
}

/// `execve(2)` via nix.
#[derive(Debug, Default, Clone, Copy)]
pub struct Execve;

#[cfg(unix)]
impl ProcessImage for Execve {
    fn replace(&self, plan: &ExecPlan) -> Result<Infallible> {
        use nix::unistd::execve;
        use std::ffi::{CString, OsStr};
        use std::io;
        use std::os::unix::ffi::OsStrExt;

        let fail = |source: io::Error| WrapError::Exec {
            program: plan.program.clone(),
            source,
        };
        let c_string = |raw: &OsStr| {
            CString::new(raw.as_bytes()).map_err(|_| {
                fail(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("{:?} contains an interior NUL byte", raw),
                ))
            })
        };

        let program = c_string(plan.program.as_os_str())?;
        let argv = plan
            .argv
            .iter()
            .map(|arg| c_string(arg.as_os_str()))
            .collect::<Result<Vec<_>>>()?;
        let envv = plan
            .envv
            .iter()
            .map(|(k, v)| {
                let mut kv = k.clone();
                kv.push("=");
                kv.push(v);
                c_string(kv.as_os_str())
            })
            .collect::<Result<Vec<_>>>()?;

        match execve(&program, &argv, &envv) {
            Ok(never) => match never {},
            Err(errno) => Err(fail(io::Error::from(errno))),
        }
    }
}

#[cfg(not(unix))]
impl ProcessImage for Execve {
    fn replace(&self, plan: &ExecPlan) -> Result<Infallible> {
        Err(WrapError::Exec {
            program: plan.program.clone(),
            source: std::io::Error::new(
                std::io::ErrorKind::Unsupported,
                "process replacement requires a unix host",
            ),
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_program_reports_exec_error() {
        let temp = TempDir::new().unwrap();
        let program = temp.path().join("tool.real");
        let plan = ExecPlan {
            program: program.clone(),
            argv: vec![program.clone().into_os_string()],
            envv: vec![],
        };
        match Execve.replace(&plan) {
            Err(WrapError::Exec { program: p, source }) => {
                assert_eq!(p, program);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn nul_in_argument_is_rejected_before_exec() {
        let plan = ExecPlan {
            program: PathBuf::from("/bin/true"),
            argv: vec![OsString::from("a\0b")],
            envv: vec![],
        };
        let err = Execve.replace(&plan).unwrap_err();
        assert!(err.to_string().contains("NUL"), "{err}");
    }

    #[test]
    fn env_var_lookup() {
        let plan = ExecPlan {
            program: PathBuf::from("/bin/true"),
            argv: vec![],
            envv: vec![("A".into(), "1".into())],
        };
        assert_eq!(plan.env_var("A"), Some(&OsString::from("1")));
        assert_eq!(plan.env_var("B"), None);
    }
}
