//! Process/loader bridge
//!
//! Spawns the jiti loader CLI with the derived environment, forwarding
//! stdio transparently and propagating the child's exit code, or performs
//! an in-process registration by setting the namespaced variables on the
//! current process. The parent's inherited environment is copied and
//! extended via an overlay, never mutated for inherited keys.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use colored::Colorize;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::ProcessError;
use crate::loader::env::{self, resolve_tsconfig_path};
use crate::loader::loader_options_from_tsconfig;
use crate::utils::format_command_status;

/// Program spawned to run the loader CLI
const LOADER_PROGRAM: &str = "npx";

/// Loader CLI name, resolved by the program above or from node_modules/.bin
const LOADER_BINARY: &str = "jiti";

/// Options for one loader invocation
#[derive(Debug, Clone, Default)]
pub struct ExecuteOptions {
    /// Arguments forwarded verbatim to the loader CLI
    pub args: Vec<String>,

    /// Namespaced variables layered on top of the inherited environment
    pub env_overlay: BTreeMap<String, String>,

    /// Return the exit code instead of failing on non-zero
    pub ignore_exit_code: bool,
}

/// Captured result of running a module through the loader
#[derive(Debug, Clone)]
pub struct ModuleOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ModuleOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// The exact program and argument vector used to invoke the loader.
/// Arguments are forwarded verbatim, flags included.
pub fn loader_invocation(args: &[String]) -> (&'static str, Vec<String>) {
    let mut argv = Vec::with_capacity(args.len() + 1);
    argv.push(LOADER_BINARY.to_string());
    argv.extend(args.iter().cloned());
    (LOADER_PROGRAM, argv)
}

/// Spawn the loader CLI, forward stdio incrementally, await its exit and
/// return the child's exit code.
pub async fn execute_loader(options: ExecuteOptions) -> Result<i32, ProcessError> {
    let (program, argv) = loader_invocation(&options.args);

    if env::verbose_enabled() {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let command_line = format!("{program} {}", argv.join(" "));
        eprintln!(
            "{} Running loader command\n{}",
            "→".blue(),
            format_command_status(
                &command_line,
                &env::filter_and_strip(options.env_overlay.clone()),
                &cwd
            )
        );
    }

    // Inherited stdio streams forward output as it arrives, which matters
    // for interactive or long-running child scripts
    let status = Command::new(program)
        .args(&argv)
        .envs(&options.env_overlay)
        .status()
        .await
        .map_err(|source| ProcessError::Spawn {
            command: format!("{program} {}", argv.join(" ")),
            source,
        })?;

    let code = status.code().unwrap_or(1);
    debug!("Loader process exited with code {code}");

    if code != 0 && !options.ignore_exit_code {
        return Err(ProcessError::ExitCode { code });
    }
    Ok(code)
}

/// Run a single module file through the loader, capturing output instead of
/// inheriting stdio. Used by the programmatic import path.
pub async fn run_module(
    filepath: &Path,
    env_overlay: &BTreeMap<String, String>,
) -> anyhow::Result<ModuleOutput> {
    let (program, argv) = loader_invocation(&[filepath.display().to_string()]);

    let output = Command::new(program)
        .args(&argv)
        .envs(env_overlay)
        .output()
        .await
        .map_err(|source| ProcessError::Spawn {
            command: format!("{program} {}", argv.join(" ")),
            source,
        })?;

    Ok(ModuleOutput {
        exit_code: output.status.code().unwrap_or(1),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

/// Register the loader for the current process.
///
/// Resolves the tsconfig, publishes the derived options as environment
/// variables on this process, and verifies the loader binary is reachable.
/// Every failure here degrades to a warning: a script with no special needs
/// must still run unregistered.
pub fn register_loader() {
    let (tsconfig_path, _) = resolve_tsconfig_path(None);
    let tsconfig_path = if tsconfig_path.is_absolute() {
        tsconfig_path
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(&tsconfig_path))
            .unwrap_or(tsconfig_path)
    };

    match loader_options_from_tsconfig(&tsconfig_path) {
        Ok(options) => {
            for (key, value) in env::to_env(&options) {
                std::env::set_var(key, value);
            }
        }
        Err(error) => {
            warn!(
                "Failed to load tsconfig from {}, registering loader without tsconfig options: {error}",
                tsconfig_path.display()
            );
        }
    }

    if find_loader_binary().is_none() {
        warn!("Loader binary '{LOADER_BINARY}' not found, continuing unregistered");
    }
}

/// Locate the loader binary: node_modules/.bin in the current directory and
/// its ancestors, then the system PATH, then the spawning program itself.
pub fn find_loader_binary() -> Option<PathBuf> {
    if let Ok(cwd) = std::env::current_dir() {
        let mut current = cwd;
        loop {
            let candidate = current.join("node_modules").join(".bin").join(LOADER_BINARY);
            if candidate.is_file() {
                return Some(candidate);
            }
            if !current.pop() {
                break;
            }
        }
    }

    which::which(LOADER_BINARY)
        .or_else(|_| which::which(LOADER_PROGRAM))
        .ok()
}
