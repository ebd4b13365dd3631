//! jiti-tsc library
//!
//! Run TypeScript scripts through the jiti loader with options derived from
//! a project's tsconfig.json. The CLI front end lives in [`cli`]; the
//! tsconfig reader in [`config`]; the translation layer, environment
//! serialization and process bridge in [`loader`].

pub mod cli;
pub mod config;
pub mod error;
pub mod loader;
pub mod utils;

pub use cli::Cli;
pub use config::{read_compiler_config, CompilerConfig};
pub use error::{ConfigError, ProcessError};
pub use loader::process::register_loader;
pub use loader::{
    import_module, loader_options_from_tsconfig, map_compiler_config, LoaderOptions, TsLoader,
};
