//! Environment-variable serialization of loader options
//!
//! The options must cross a process boundary to reach the loader, so each
//! present field becomes one `JITI_`-namespaced variable. Absent fields
//! produce no key at all, letting the child process apply its own defaults.

use std::collections::BTreeMap;

use super::LoaderOptions;

/// Namespace prefix for every variable this crate produces or consumes
pub const ENV_PREFIX: &str = "JITI_";

/// JSON-encoded alias map
pub const ENV_ALIAS: &str = "JITI_ALIAS";

/// Default-export interop flag, "1"/"0"
pub const ENV_INTEROP_DEFAULT: &str = "JITI_INTEROP_DEFAULT";

/// Source map flag, "1"/"0"
pub const ENV_SOURCE_MAPS: &str = "JITI_SOURCE_MAPS";

/// JSX transform flag, "1"/"0"
pub const ENV_JSX: &str = "JITI_JSX";

/// Overrides the tsconfig path the CLI resolves
pub const ENV_TSCONFIG_PATH: &str = "JITI_TSCONFIG_PATH";

/// Enables diagnostic logging of the command about to run and its environment
pub const ENV_VERBOSE: &str = "JITI_VERBOSE";

/// Resolve the active tsconfig path from an explicit request, the
/// environment override, or the conventional default location.
///
/// The returned flag says whether the path was explicitly requested; the
/// dispatcher uses it to decide between hard failure and lenient fallback.
pub fn resolve_tsconfig_path(explicit: Option<&std::path::Path>) -> (std::path::PathBuf, bool) {
    if let Some(path) = explicit {
        return (path.to_path_buf(), true);
    }
    if let Ok(path) = std::env::var(ENV_TSCONFIG_PATH) {
        if !path.is_empty() {
            return (std::path::PathBuf::from(path), true);
        }
    }
    (std::path::PathBuf::from("./tsconfig.json"), false)
}

/// Whether verbose diagnostics are requested via the environment
pub fn verbose_enabled() -> bool {
    std::env::var(ENV_VERBOSE)
        .map(|value| !value.is_empty() && value != "0")
        .unwrap_or(false)
}

fn encode_bool(value: bool) -> String {
    if value { "1" } else { "0" }.to_string()
}

/// Serialize options to their environment-variable representation
pub fn to_env(options: &LoaderOptions) -> BTreeMap<String, String> {
    let mut env = BTreeMap::new();

    if !options.alias.is_empty() {
        env.insert(
            ENV_ALIAS.to_string(),
            serde_json::to_string(&options.alias).unwrap_or_default(),
        );
    }
    if let Some(interop) = options.interop_default {
        env.insert(ENV_INTEROP_DEFAULT.to_string(), encode_bool(interop));
    }
    if let Some(source_maps) = options.source_maps {
        env.insert(ENV_SOURCE_MAPS.to_string(), encode_bool(source_maps));
    }
    if let Some(jsx) = options.jsx {
        env.insert(ENV_JSX.to_string(), encode_bool(jsx));
    }

    env
}

/// Extract only namespaced keys from an environment and strip the prefix.
///
/// Used for diagnostic display of what was actually handed to the loader
/// without dumping the entire process environment.
pub fn filter_and_strip<I>(env: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = (String, String)>,
{
    env.into_iter()
        .filter_map(|(key, value)| {
            key.strip_prefix(ENV_PREFIX)
                .map(|stripped| (stripped.to_string(), value))
        })
        .collect()
}
