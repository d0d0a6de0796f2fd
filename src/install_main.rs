//! execwrap-install - stage an executable behind the generic wrapper

use anyhow::{Context, Result};
use clap::Parser;
use execwrap_common::paths::LOG_FILTER_VAR;
use execwrap_installer::{Executable, Installer};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "execwrap-install", version, about)]
struct Cli {
    /// Executable to wrap
    #[arg(long)]
    source: PathBuf,

    /// Public wrapper name (defaults to the source file name)
    #[arg(long)]
    name: Option<String>,

    /// Extra argument placed before the caller's; repeatable. `@destDir@` is substituted
    #[arg(long = "arg", value_name = "ARG", allow_hyphen_values = true)]
    args: Vec<String>,

    /// Environment override KEY=VALUE; repeatable. Prefix KEY with `<` or `>` to
    /// prepend/append to the caller's value. `>PATH` is refused: the destination
    /// folder is always prepended to PATH
    #[arg(long = "env", value_name = "KEY=VALUE", value_parser = parse_env_pair)]
    envs: Vec<(String, String)>,

    /// Generic wrapper binary to copy (defaults to `wrapper` beside this program)
    #[arg(long, value_name = "PATH")]
    wrapper: Option<PathBuf>,

    /// Destination folder
    dest: PathBuf,
}

fn parse_env_pair(raw: &str) -> std::result::Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_FILTER_VAR).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let installer = match cli.wrapper {
        Some(path) => Installer::new(path),
        None => Installer::from_env().context("failed to locate generic wrapper")?,
    };

    let mut exe = Executable::new(&cli.source).envs(cli.envs);
    if let Some(name) = cli.name {
        exe = exe.wrapper_name(name);
    }
    if !cli.args.is_empty() {
        exe = exe.args(cli.args);
    }

    let wrapper = installer
        .install(&exe, &cli.dest)
        .with_context(|| format!("failed to install '{}'", cli.source.display()))?;
    println!("{}", wrapper.display());
    Ok(())
}
