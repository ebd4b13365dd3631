//! Serde schema for tsconfig.json files
//!
//! Only the subset of fields the loader translation cares about is modeled;
//! unknown fields are ignored. Every field is optional so that "declared but
//! empty" and "absent" stay distinguishable through an extends merge.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Raw tsconfig file content before extends resolution and merging
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TsConfigFile {
    /// Parent configuration to inherit from
    pub extends: Option<String>,

    /// Compiler options subset
    #[serde(default)]
    pub compiler_options: CompilerOptionsFile,

    /// Explicit file list
    pub files: Option<Vec<String>>,

    /// Include glob patterns
    pub include: Option<Vec<String>>,

    /// Exclude glob patterns
    pub exclude: Option<Vec<String>>,
}

/// The compiler options the loader translation understands
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerOptionsFile {
    /// Base directory for resolving non-relative module names and
    /// relative path mapping targets
    pub base_url: Option<String>,

    /// Path alias patterns, each mapping to one or more candidate targets
    pub paths: Option<PathMappings>,

    /// Default-export interop shimming
    pub es_module_interop: Option<bool>,

    /// Source map generation
    pub source_map: Option<bool>,

    /// JSX emit mode
    pub jsx: Option<JsxMode>,

    /// Whether plain JavaScript sources count as project files
    pub allow_js: Option<bool>,
}

/// Ordered path mapping table, keeping the declaration order of the
/// tsconfig file. Order matters: when two patterns strip to the same alias
/// key during translation, the later declaration wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathMappings(pub Vec<(String, Vec<String>)>);

impl PathMappings {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, Vec<String>)> {
        self.0.iter()
    }

    /// Targets for the first entry with this exact pattern
    pub fn get(&self, pattern: &str) -> Option<&Vec<String>> {
        self.0
            .iter()
            .find(|(candidate, _)| candidate == pattern)
            .map(|(_, targets)| targets)
    }
}

impl<'de> Deserialize<'de> for PathMappings {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct PathMappingsVisitor;

        impl<'de> Visitor<'de> for PathMappingsVisitor {
            type Value = PathMappings;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of alias patterns to target path lists")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, Vec<String>>()? {
                    entries.push(entry);
                }
                Ok(PathMappings(entries))
            }
        }

        deserializer.deserialize_map(PathMappingsVisitor)
    }
}

impl Serialize for PathMappings {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (pattern, targets) in &self.0 {
            map.serialize_entry(pattern, targets)?;
        }
        map.end()
    }
}

/// JSX emit modes recognized in tsconfig
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JsxMode {
    None,
    Preserve,
    React,
    ReactJsx,
    ReactJsxdev,
    ReactNative,
}

impl JsxMode {
    /// Whether this mode requests any JSX transform at all. The loader only
    /// needs this single bit, not which flavor.
    pub fn is_enabled(&self) -> bool {
        !matches!(self, JsxMode::None)
    }
}

/// Merge two configs key-by-key, child winning per key. Maps and arrays are
/// replaced wholesale, not merged element-wise.
pub fn merge_configs(parent: TsConfigFile, child: TsConfigFile) -> TsConfigFile {
    TsConfigFile {
        extends: child.extends,
        compiler_options: CompilerOptionsFile {
            base_url: child.compiler_options.base_url.or(parent.compiler_options.base_url),
            paths: child.compiler_options.paths.or(parent.compiler_options.paths),
            es_module_interop: child
                .compiler_options
                .es_module_interop
                .or(parent.compiler_options.es_module_interop),
            source_map: child.compiler_options.source_map.or(parent.compiler_options.source_map),
            jsx: child.compiler_options.jsx.or(parent.compiler_options.jsx),
            allow_js: child.compiler_options.allow_js.or(parent.compiler_options.allow_js),
        },
        files: child.files.or(parent.files),
        include: child.include.or(parent.include),
        exclude: child.exclude.or(parent.exclude),
    }
}
