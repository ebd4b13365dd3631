//! Error types for configuration reading, option mapping and loader execution.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading a tsconfig file or translating it into
/// loader options.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The requested configuration file does not exist or is not a regular file.
    #[error("tsconfig file not found at path: {}", .path.display())]
    NotFound { path: PathBuf },

    /// The configuration file content is not valid JSONC.
    #[error("failed to parse {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    /// An `extends` chain revisits a file already in the chain.
    #[error("circular extends chain detected at {}", .path.display())]
    Cycle { path: PathBuf },

    /// The include/exclude/files rules matched zero files.
    #[error(
        "no files matched by the TypeScript configuration at {}; \
         check your \"include\", \"exclude\" or \"files\" settings",
        .path.display()
    )]
    NoMatchingFiles { path: PathBuf },

    /// A single alias pattern lists more than one mapping target. The loader
    /// has no concept of resolution fallback order, so picking one silently
    /// would only match the project's behavior by accident.
    #[error(
        "path pattern '{pattern}' has {count} mapping targets ({}); \
         the loader supports exactly one target per pattern",
        .targets.join(", ")
    )]
    PathOverload {
        pattern: String,
        count: usize,
        targets: Vec<String>,
    },

    /// Underlying I/O failure while reading configuration files.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised by the process/loader bridge.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The loader process could not be spawned at all.
    #[error("failed to spawn loader process '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The loader process exited with a non-zero code.
    #[error("loader process exited with code {code}")]
    ExitCode { code: i32 },
}

impl ProcessError {
    /// Exit code to propagate to the host process.
    pub fn exit_code(&self) -> i32 {
        match self {
            ProcessError::Spawn { .. } => 1,
            ProcessError::ExitCode { code } => *code,
        }
    }
}
