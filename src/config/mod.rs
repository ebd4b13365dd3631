//! Configuration handling
//!
//! Reads tsconfig.json files (JSONC tolerated), resolves `extends` chains
//! with cycle detection, matches project files against include/exclude/files
//! rules, and produces the merged [`CompilerConfig`] the options mapper
//! consumes.

mod schema;

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::debug;
use walkdir::WalkDir;

use crate::error::ConfigError;
use crate::utils::{file_exists, normalize_path};

pub use schema::*;

/// Extensions that always count as project files
const TS_EXTENSIONS: &[&str] = &["ts", "tsx", "mts", "cts"];

/// Extensions that count only when `allowJs` is set
const JS_EXTENSIONS: &[&str] = &["js", "jsx", "mjs", "cjs"];

/// Directories excluded by default, mirroring tsc behavior
const DEFAULT_EXCLUDES: &[&str] = &["node_modules", "bower_components", "jspm_packages"];

/// Parsed, merged configuration for one resolution root
#[derive(Debug, Clone, PartialEq)]
pub struct CompilerConfig {
    /// Alias pattern to candidate target patterns, in declaration order
    pub path_mappings: PathMappings,

    /// Absolute root against which relative mapping targets resolve
    pub base_directory: PathBuf,

    /// Default-export interop shimming, if declared
    pub interop_default: Option<bool>,

    /// Source map generation, if declared
    pub source_maps: Option<bool>,

    /// JSX emit mode, if declared
    pub jsx: Option<JsxMode>,

    /// Files matched by the include/exclude/files rules; never empty
    pub matched_files: Vec<PathBuf>,
}

/// Read, merge and resolve the configuration rooted at `path`.
///
/// Fails with [`ConfigError::NotFound`] when the path is not a regular file,
/// [`ConfigError::Cycle`] when the extends chain loops, and
/// [`ConfigError::NoMatchingFiles`] when the project rules match nothing:
/// an empty match set almost always means a typo'd pattern, so silent
/// continuation would be more confusing than an explicit stop.
pub fn read_compiler_config(path: &Path) -> Result<CompilerConfig, ConfigError> {
    if !file_exists(path) {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let mut visited = HashSet::new();
    let merged = resolve_extends_chain(path, &mut visited)?;

    let resolved_path = canonicalize(path)?;
    let config_dir = resolved_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("/"));

    let matched_files = match_project_files(&merged, &config_dir, path)?;

    let base_directory = match merged.compiler_options.base_url.as_deref() {
        Some(base) if Path::new(base).is_absolute() => normalize_path(Path::new(base)),
        Some(base) => normalize_path(&config_dir.join(base)),
        None => std::env::current_dir().map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?,
    };

    debug!(
        "Resolved config {} with {} path mappings, {} matched files",
        resolved_path.display(),
        merged.compiler_options.paths.as_ref().map_or(0, PathMappings::len),
        matched_files.len()
    );

    Ok(CompilerConfig {
        path_mappings: merged.compiler_options.paths.unwrap_or_default(),
        base_directory,
        interop_default: merged.compiler_options.es_module_interop,
        source_maps: merged.compiler_options.source_map,
        jsx: merged.compiler_options.jsx,
        matched_files,
    })
}

/// Parse tsconfig content as JSONC (comments and trailing commas tolerated)
pub fn parse_tsconfig(content: &str, path: &Path) -> Result<TsConfigFile, ConfigError> {
    json5::from_str(content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Resolve an extends chain of arbitrary depth and merge parent-then-child.
///
/// Relative `extends` references resolve against the extending file's
/// directory; a missing `.json` extension is appended. Revisiting a file
/// already in the chain fails with [`ConfigError::Cycle`].
pub fn resolve_extends_chain(
    path: &Path,
    visited: &mut HashSet<PathBuf>,
) -> Result<TsConfigFile, ConfigError> {
    let canonical = canonicalize(path)?;

    if visited.contains(&canonical) {
        return Err(ConfigError::Cycle { path: canonical });
    }
    visited.insert(canonical.clone());

    let content = fs::read_to_string(&canonical).map_err(|source| ConfigError::Io {
        path: canonical.clone(),
        source,
    })?;
    let mut config = parse_tsconfig(&content, &canonical)?;

    if let Some(extends) = config.extends.clone() {
        let parent_path = if Path::new(&extends).is_absolute() {
            PathBuf::from(&extends)
        } else {
            canonical
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("/"))
                .join(&extends)
        };
        let parent_path = if parent_path.extension().is_none() {
            parent_path.with_extension("json")
        } else {
            parent_path
        };

        let parent = resolve_extends_chain(&parent_path, visited)?;
        config = merge_configs(parent, config);
    }

    visited.remove(&canonical);
    Ok(config)
}

fn canonicalize(path: &Path) -> Result<PathBuf, ConfigError> {
    path.canonicalize().map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ConfigError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

/// Resolve include/exclude/files rules against the directory containing the
/// most-derived config file
fn match_project_files(
    config: &TsConfigFile,
    root: &Path,
    config_path: &Path,
) -> Result<Vec<PathBuf>, ConfigError> {
    let allow_js = config.compiler_options.allow_js.unwrap_or(false);
    let mut matched = Vec::new();

    // Explicit file list entries are literal paths, not patterns
    if let Some(files) = &config.files {
        for file in files {
            let full = normalize_path(&root.join(file));
            if full.is_file() {
                matched.push(full);
            }
        }
    }

    // Include defaults to everything only when neither files nor include
    // is declared
    let include_patterns = match (&config.files, &config.include) {
        (_, Some(include)) => include.clone(),
        (Some(_), None) => Vec::new(),
        (None, None) => vec!["**/*".to_string()],
    };

    if !include_patterns.is_empty() {
        let include_set = build_glob_set(&include_patterns, config_path)?;
        let exclude_patterns = config
            .exclude
            .clone()
            .unwrap_or_else(|| DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect());
        let exclude_set = build_glob_set(&exclude_patterns, config_path)?;

        let walker = WalkDir::new(root).into_iter().filter_entry(|entry| {
            // Prune excluded directories during the walk
            let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());
            !(entry.file_type().is_dir() && exclude_set.is_match(rel) && !rel.as_os_str().is_empty())
        });

        for entry in walker.flatten() {
            if !entry.file_type().is_file() {
                continue;
            }
            let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());
            if include_set.is_match(rel)
                && !exclude_set.is_match(rel)
                && has_project_extension(entry.path(), allow_js)
            {
                matched.push(entry.path().to_path_buf());
            }
        }
    }

    matched.sort();
    matched.dedup();

    if matched.is_empty() {
        return Err(ConfigError::NoMatchingFiles {
            path: config_path.to_path_buf(),
        });
    }

    Ok(matched)
}

/// Compile glob patterns, also matching each bare pattern recursively so
/// that a plain directory name like `src` behaves as `src/**/*`
fn build_glob_set(patterns: &[String], config_path: &Path) -> Result<GlobSet, ConfigError> {
    let mut builder = GlobSetBuilder::new();

    for pattern in patterns {
        let trimmed = pattern.trim_end_matches('/');
        for candidate in [trimmed.to_string(), format!("{trimmed}/**/*")] {
            let glob = Glob::new(&candidate).map_err(|e| ConfigError::Parse {
                path: config_path.to_path_buf(),
                message: format!("invalid glob pattern '{pattern}': {e}"),
            })?;
            builder.add(glob);
        }
    }

    builder.build().map_err(|e| ConfigError::Parse {
        path: config_path.to_path_buf(),
        message: format!("failed to compile glob patterns: {e}"),
    })
}

fn has_project_extension(path: &Path, allow_js: bool) -> bool {
    let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
        return false;
    };
    TS_EXTENSIONS.contains(&ext) || (allow_js && JS_EXTENSIONS.contains(&ext))
}
