//! Usage text for the CLI

/// Printed for `help`, `--help`, `-h` and empty invocations
pub const HELP_TEXT: &str = "\
Usage: jiti-tsc [command] [options]

Commands:
  print-config                 Print resolved loader configuration from tsconfig
  help                         Print help

  If no command is specified or the first argument is not a recognized command,
  arguments are passed to the jiti loader (default behavior).

Options:
  --tsconfig <path>            Path to the TypeScript configuration file (print-config)
  --output <path>              Output path for print-config (prints to stdout if not provided)
  -h, --help                   Display help information

Environment Variables:
  JITI_TSCONFIG_PATH           Path to the TypeScript configuration file
  JITI_VERBOSE                 Log the loader command and environment before running

Examples:
  # Run a script with tsconfig-derived options
  JITI_TSCONFIG_PATH=./tsconfig.json jiti-tsc ./path/to/module.ts

  # Run a script without tsconfig
  jiti-tsc ./path/to/module.ts

  # Print resolved loader configuration
  JITI_TSCONFIG_PATH=./tsconfig.json jiti-tsc print-config

  # Print configuration to a file
  JITI_TSCONFIG_PATH=./tsconfig.json jiti-tsc print-config --output=./loader-config.json
";

pub fn print_help() {
    println!("{HELP_TEXT}");
}
