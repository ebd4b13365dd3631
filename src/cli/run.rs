//! Default run command: forward everything to the loader

use anyhow::Result;
use tracing::debug;

use crate::loader::env::{self, resolve_tsconfig_path, ENV_TSCONFIG_PATH};
use crate::loader::process::{execute_loader, ExecuteOptions};

use super::load_options_lenient;

/// Resolve the configuration pipeline, serialize to environment and
/// delegate to the loader with all arguments forwarded verbatim. The
/// child's exit code becomes ours.
pub async fn execute(args: &[String]) -> Result<i32> {
    let (tsconfig_path, explicit) = resolve_tsconfig_path(None);
    let (options, loaded) = load_options_lenient(&tsconfig_path, explicit)?;

    let mut env_overlay = env::to_env(&options);
    if loaded {
        env_overlay.insert(
            ENV_TSCONFIG_PATH.to_string(),
            tsconfig_path.display().to_string(),
        );
    }

    debug!(
        "Forwarding {} argument(s) to the loader with {} derived variable(s)",
        args.len(),
        env_overlay.len()
    );

    let code = execute_loader(ExecuteOptions {
        args: args.to_vec(),
        env_overlay,
        ignore_exit_code: true,
    })
    .await?;

    Ok(code)
}
