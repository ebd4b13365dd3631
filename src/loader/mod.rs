//! Loader-facing options and the tsconfig translation layer
//!
//! [`map_compiler_config`] is the semantic core of the crate: it translates a
//! merged [`CompilerConfig`] into the flat option schema the jiti loader
//! understands. Wrong translation silently breaks module resolution in the
//! child process, so the wildcard normalization and overload handling here
//! are covered by unit tests for every documented property.

pub mod env;
pub mod process;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{read_compiler_config, CompilerConfig};
use crate::error::ConfigError;
use crate::utils::normalize_path;

/// Translated, loader-facing configuration. Derived purely from a
/// [`CompilerConfig`], never mutated after construction, safe to serialize
/// to environment variables or JSON and pass across a process boundary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoaderOptions {
    /// Literal prefix to literal absolute path, wildcards stripped
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub alias: BTreeMap<String, String>,

    /// Default-export interop; absent means "loader default"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interop_default: Option<bool>,

    /// Source map generation; absent means "loader default"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_maps: Option<bool>,

    /// Whether any JSX transform is requested at all, collapsed from the
    /// richer tsconfig enum
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jsx: Option<bool>,
}

impl LoaderOptions {
    /// Overlay `derived` on top of `self`, derived fields winning where
    /// present. Used when explicit options and tsconfig-derived options
    /// are combined.
    pub fn merged_with(mut self, derived: LoaderOptions) -> LoaderOptions {
        if !derived.alias.is_empty() {
            self.alias = derived.alias;
        }
        self.interop_default = derived.interop_default.or(self.interop_default);
        self.source_maps = derived.source_maps.or(self.source_maps);
        self.jsx = derived.jsx.or(self.jsx);
        self
    }
}

/// Translate a merged compiler configuration into loader options.
///
/// Pure function of its input. The only error it raises is
/// [`ConfigError::PathOverload`]: a pattern with more than one mapping
/// target cannot be expressed in the loader's alias map, and picking one
/// silently would produce resolution behavior that only matches by accident.
pub fn map_compiler_config(config: &CompilerConfig) -> Result<LoaderOptions, ConfigError> {
    let mut alias = BTreeMap::new();

    for (pattern, targets) in config.path_mappings.iter() {
        match targets.as_slice() {
            // An empty mapping list is unusable, not an error
            [] => {
                debug!("Dropping path pattern '{pattern}' with no targets");
                continue;
            }
            [target] => {
                let key = strip_trailing_wildcard(pattern);
                let value = strip_trailing_wildcard(target);

                let resolved = if Path::new(value).is_absolute() {
                    value.to_string()
                } else {
                    normalize_path(&config.base_directory.join(value))
                        .display()
                        .to_string()
                };

                // Declaration order: the later entry wins for patterns
                // that strip to the same key
                alias.insert(key.to_string(), resolved);
            }
            overloaded => {
                return Err(ConfigError::PathOverload {
                    pattern: pattern.clone(),
                    count: overloaded.len(),
                    targets: overloaded.to_vec(),
                });
            }
        }
    }

    Ok(LoaderOptions {
        alias,
        interop_default: config.interop_default,
        source_maps: config.source_maps,
        jsx: config.jsx.as_ref().and_then(|mode| mode.is_enabled().then_some(true)),
    })
}

/// Strip a single trailing wildcard segment, if present
fn strip_trailing_wildcard(pattern: &str) -> &str {
    pattern.strip_suffix("/*").unwrap_or(pattern)
}

/// Read a tsconfig file and translate it into loader options in one step
pub fn loader_options_from_tsconfig(path: &Path) -> Result<LoaderOptions, ConfigError> {
    let config = read_compiler_config(path)?;
    map_compiler_config(&config)
}

/// A configured loader handle for programmatic (in-process) embedding.
///
/// Holds [`LoaderOptions`] directly, so library callers skip the
/// environment-variable round trip the CLI uses to cross the process
/// boundary; both paths go through the same option type.
#[derive(Debug, Clone, Default)]
pub struct TsLoader {
    options: LoaderOptions,
    tsconfig_path: Option<PathBuf>,
}

impl TsLoader {
    /// Create a loader from explicit options
    pub fn new(options: LoaderOptions) -> Self {
        Self {
            options,
            tsconfig_path: None,
        }
    }

    /// Create a loader with options derived from a tsconfig file
    pub fn from_tsconfig(path: &Path) -> Result<Self, ConfigError> {
        Ok(Self {
            options: loader_options_from_tsconfig(path)?,
            tsconfig_path: Some(path.to_path_buf()),
        })
    }

    /// Create a loader from explicit base options with tsconfig-derived
    /// options layered on top
    pub fn from_tsconfig_with(path: &Path, base: LoaderOptions) -> Result<Self, ConfigError> {
        let derived = loader_options_from_tsconfig(path)?;
        Ok(Self {
            options: base.merged_with(derived),
            tsconfig_path: Some(path.to_path_buf()),
        })
    }

    /// The resolved loader options
    pub fn options(&self) -> &LoaderOptions {
        &self.options
    }

    /// The tsconfig path these options were derived from, if any
    pub fn tsconfig_path(&self) -> Option<&Path> {
        self.tsconfig_path.as_deref()
    }

    /// The environment-variable form of the options, for crossing a
    /// process boundary
    pub fn environment(&self) -> BTreeMap<String, String> {
        env::to_env(&self.options)
    }

    /// Execute a module file through the loader, capturing its output
    pub async fn import(&self, filepath: &Path) -> anyhow::Result<process::ModuleOutput> {
        if !crate::utils::file_exists(filepath) {
            anyhow::bail!("File '{}' does not exist", filepath.display());
        }
        process::run_module(filepath, &self.environment()).await
    }
}

/// Import a module through the loader with tsconfig support.
///
/// When `tsconfig` is `None`, the loader runs with its own defaults.
pub async fn import_module(
    filepath: &Path,
    tsconfig: Option<&Path>,
) -> anyhow::Result<process::ModuleOutput> {
    let loader = match tsconfig {
        Some(path) => TsLoader::from_tsconfig(path)?,
        None => TsLoader::default(),
    };
    loader.import(filepath).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn config_with_mappings(
        base: &str,
        mappings: &[(&str, &[&str])],
    ) -> CompilerConfig {
        CompilerConfig {
            path_mappings: crate::config::PathMappings(
                mappings
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.iter().map(|s| s.to_string()).collect()))
                    .collect(),
            ),
            base_directory: PathBuf::from(base),
            interop_default: None,
            source_maps: None,
            jsx: None,
            matched_files: vec![PathBuf::from("/proj/src/index.ts")],
        }
    }

    #[test]
    fn wildcard_stripped_symmetrically() {
        let config = config_with_mappings("/proj", &[("@app/*", &["src/*"])]);

        let options = map_compiler_config(&config).unwrap();

        assert_eq!(options.alias.get("@app"), Some(&"/proj/src".to_string()));
    }

    #[test]
    fn exact_match_alias_without_wildcard() {
        let config = config_with_mappings("/proj", &[("utils", &["src/utils"])]);

        let options = map_compiler_config(&config).unwrap();

        assert_eq!(options.alias.get("utils"), Some(&"/proj/src/utils".to_string()));
    }

    #[test]
    fn base_url_dot_scenario() {
        // {paths: {"@app/*": ["src/*"]}, baseUrl: "."} at /proj/tsconfig.json
        let config = config_with_mappings("/proj", &[("@app/*", &["src/*"])]);

        let options = map_compiler_config(&config).unwrap();

        assert_eq!(options.alias.get("@app"), Some(&"/proj/src".to_string()));
    }

    #[test]
    fn absolute_target_passes_through_unchanged() {
        let config = config_with_mappings("/proj", &[("@lib/*", &["/opt/lib/*"])]);

        let options = map_compiler_config(&config).unwrap();

        assert_eq!(options.alias.get("@lib"), Some(&"/opt/lib".to_string()));
    }

    #[test]
    fn relative_target_with_dot_segments_normalized() {
        let config = config_with_mappings("/proj/packages", &[("@shared/*", &["../shared/*"])]);

        let options = map_compiler_config(&config).unwrap();

        assert_eq!(options.alias.get("@shared"), Some(&"/proj/shared".to_string()));
    }

    #[test]
    fn empty_target_list_dropped_silently() {
        let config = config_with_mappings("/proj", &[("@dead/*", &[]), ("@live/*", &["src/*"])]);

        let options = map_compiler_config(&config).unwrap();

        assert_eq!(options.alias.len(), 1);
        assert!(options.alias.contains_key("@live"));
    }

    #[test]
    fn overload_rejected_with_full_diagnostics() {
        let config = config_with_mappings("/proj", &[("@/*", &["./a/*", "./b/*"])]);

        let err = map_compiler_config(&config).unwrap_err();

        match &err {
            ConfigError::PathOverload {
                pattern,
                count,
                targets,
            } => {
                assert_eq!(pattern, "@/*");
                assert_eq!(*count, 2);
                assert_eq!(targets, &vec!["./a/*".to_string(), "./b/*".to_string()]);
            }
            other => panic!("expected PathOverload, got {other:?}"),
        }

        // The message names the pattern and lists every target verbatim
        let message = err.to_string();
        assert!(message.contains("@/*"));
        assert!(message.contains('2'));
        assert!(message.contains("./a/*"));
        assert!(message.contains("./b/*"));
    }

    #[test]
    fn duplicate_stripped_keys_follow_declaration_order() {
        // The later declaration wins, regardless of how the patterns sort
        let config = config_with_mappings(
            "/proj",
            &[("@app/*", &["wild/*"]), ("@app", &["exact"])],
        );
        let options = map_compiler_config(&config).unwrap();
        assert_eq!(options.alias.len(), 1);
        assert_eq!(options.alias.get("@app"), Some(&"/proj/exact".to_string()));

        let config = config_with_mappings(
            "/proj",
            &[("@app", &["exact"]), ("@app/*", &["wild/*"])],
        );
        let options = map_compiler_config(&config).unwrap();
        assert_eq!(options.alias.len(), 1);
        assert_eq!(options.alias.get("@app"), Some(&"/proj/wild".to_string()));
    }

    #[test]
    fn declaration_order_survives_parsing() {
        // "@app" sorts before "@app/*"; the file declares the exact entry
        // last, so it must win after the parse-and-map pipeline
        let parsed = crate::config::parse_tsconfig(
            r#"{
                "compilerOptions": {
                    "paths": {
                        "@app/*": ["wild/*"],
                        "@app": ["exact"]
                    }
                }
            }"#,
            Path::new("tsconfig.json"),
        )
        .unwrap();

        let config = CompilerConfig {
            path_mappings: parsed.compiler_options.paths.unwrap(),
            base_directory: PathBuf::from("/proj"),
            interop_default: None,
            source_maps: None,
            jsx: None,
            matched_files: vec![PathBuf::from("/proj/src/index.ts")],
        };

        let options = map_compiler_config(&config).unwrap();

        assert_eq!(options.alias.get("@app"), Some(&"/proj/exact".to_string()));
    }

    #[test]
    fn mapping_is_idempotent() {
        let mut config = config_with_mappings("/proj", &[("@app/*", &["src/*"])]);
        config.interop_default = Some(true);
        config.jsx = Some(crate::config::JsxMode::ReactJsx);

        let first = map_compiler_config(&config).unwrap();
        let second = map_compiler_config(&config).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn flags_pass_through_preserving_absence() {
        let mut config = config_with_mappings("/proj", &[]);
        config.interop_default = Some(false);

        let options = map_compiler_config(&config).unwrap();

        // false is meaningfully different from absent
        assert_eq!(options.interop_default, Some(false));
        assert_eq!(options.source_maps, None);
        assert_eq!(options.jsx, None);
    }

    #[test]
    fn jsx_collapses_to_boolean() {
        use crate::config::JsxMode;

        let mut config = config_with_mappings("/proj", &[]);

        config.jsx = Some(JsxMode::None);
        assert_eq!(map_compiler_config(&config).unwrap().jsx, None);

        config.jsx = None;
        assert_eq!(map_compiler_config(&config).unwrap().jsx, None);

        for mode in [
            JsxMode::Preserve,
            JsxMode::React,
            JsxMode::ReactJsx,
            JsxMode::ReactJsxdev,
            JsxMode::ReactNative,
        ] {
            config.jsx = Some(mode);
            assert_eq!(map_compiler_config(&config).unwrap().jsx, Some(true));
        }
    }

    #[test]
    fn merged_with_derived_wins() {
        let base = LoaderOptions {
            interop_default: Some(false),
            source_maps: Some(true),
            ..Default::default()
        };
        let derived = LoaderOptions {
            interop_default: Some(true),
            ..Default::default()
        };

        let merged = base.merged_with(derived);

        assert_eq!(merged.interop_default, Some(true));
        assert_eq!(merged.source_maps, Some(true));
    }

    #[test]
    fn options_serialize_with_camel_case_and_absent_fields_skipped() {
        let options = LoaderOptions {
            alias: BTreeMap::from([("@app".to_string(), "/proj/src".to_string())]),
            interop_default: Some(true),
            source_maps: None,
            jsx: None,
        };

        let json = serde_json::to_value(&options).unwrap();

        assert_eq!(json["alias"]["@app"], "/proj/src");
        assert_eq!(json["interopDefault"], true);
        assert!(json.get("sourceMaps").is_none());
        assert!(json.get("jsx").is_none());
    }
}
