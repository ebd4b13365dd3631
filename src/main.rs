//! jiti-tsc - run TypeScript scripts through the jiti loader
//!
//! Bridges a project's tsconfig.json (path aliases, interop, source maps,
//! JSX) to the loader's configuration surface and forwards everything else
//! to the loader untouched.

use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use jiti_tsc::loader::env::verbose_enabled;
use jiti_tsc::Cli;

/// Initialize the logging/tracing system
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("jiti_tsc=debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("jiti_tsc=warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing(verbose_enabled());

    let code = Cli::from_env().execute().await?;
    if code != 0 {
        std::process::exit(code);
    }

    Ok(())
}
