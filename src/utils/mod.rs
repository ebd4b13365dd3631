//! Utility functions and helpers

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

/// Check whether a path exists and is a regular file
pub fn file_exists(path: &Path) -> bool {
    path.is_file()
}

/// Normalize a path by removing `.` and `..` components without touching
/// the filesystem
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut parts: Vec<Component> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => continue,
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => continue,
                _ => parts.push(component),
            },
            _ => parts.push(component),
        }
    }

    parts.iter().map(|c| c.as_os_str()).collect()
}

/// Get a path relative to the current working directory for display,
/// falling back to the path itself
pub fn display_relative(path: &Path) -> String {
    std::env::current_dir()
        .ok()
        .and_then(|cwd| pathdiff::diff_paths(path, cwd))
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Format a command invocation with its working directory and environment
/// for diagnostic output
pub fn format_command_status(command: &str, env: &BTreeMap<String, String>, cwd: &Path) -> String {
    let env_lines: Vec<String> = env
        .iter()
        .map(|(key, value)| format!("    {key}={value}"))
        .collect();

    format!(
        "  command: {command}\n  cwd: {}\n  env:\n{}",
        cwd.display(),
        env_lines.join("\n")
    )
}
