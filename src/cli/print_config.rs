//! `print-config` command implementation

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use serde::Serialize;

use crate::loader::env::resolve_tsconfig_path;
use crate::loader::LoaderOptions;

use super::load_options_lenient;

/// Flags accepted by `print-config`
#[derive(Parser, Debug)]
#[command(name = "print-config", disable_help_flag = true, disable_version_flag = true)]
pub struct PrintConfigArgs {
    /// Path to the TypeScript configuration file
    #[arg(long, value_name = "PATH")]
    pub tsconfig: Option<PathBuf>,

    /// Write the JSON report to this file instead of stdout
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// JSON shape emitted by the command: the resolved config path plus the
/// flattened loader options. With no config loaded anywhere, every field is
/// absent and the report collapses to `{}`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ConfigReport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    tsconfig_path: Option<String>,
    #[serde(flatten)]
    options: &'a LoaderOptions,
}

pub async fn execute(args: &[String]) -> Result<i32> {
    let flags =
        PrintConfigArgs::try_parse_from(args).context("failed to parse print-config arguments")?;

    let (tsconfig_path, explicit) = resolve_tsconfig_path(flags.tsconfig.as_deref());
    let (options, loaded) = load_options_lenient(&tsconfig_path, explicit)?;

    let report = ConfigReport {
        tsconfig_path: loaded.then(|| tsconfig_path.display().to_string()),
        options: &options,
    };

    match &flags.output {
        Some(output) => {
            if let Some(parent) = output.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent).with_context(|| {
                        format!("failed to create output directory {}", parent.display())
                    })?;
                }
            }
            let json = serde_json::to_string_pretty(&report)?;
            fs::write(output, json)
                .with_context(|| format!("failed to write {}", output.display()))?;
            eprintln!(
                "{} Wrote loader configuration to {}",
                "✓".green().bold(),
                output.display().to_string().cyan()
            );
        }
        None => {
            println!("{}", serde_json::to_string(&report)?);
        }
    }

    Ok(0)
}
