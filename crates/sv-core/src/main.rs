//! Serials Validator CLI: the `serials-validator` command.

mod cli;
mod commands;

use clap::Parser;
use cli::Cli;
use sv_core::exit_codes::ExitCode;
use sv_core::logging::{init_logging, LogConfig, LogFormat};
use tracing::error;

fn main() {
    let cli = Cli::parse();

    let log_config = LogConfig {
        verbosity: cli.verbose,
        quiet: cli.quiet,
        format: if cli.log_json {
            LogFormat::Json
        } else {
            LogFormat::Human
        },
        log_dir: cli.log_dir.clone(),
    };
    if let Err(e) = init_logging(&log_config) {
        eprintln!("serials-validator: could not set up logging: {e}");
        std::process::exit(ExitCode::IoError.as_i32());
    }

    let code = match commands::run(cli) {
        Ok(code) => code,
        Err(e) => {
            error!(code = e.code(), "{e}");
            ExitCode::from(&e)
        }
    };
    std::process::exit(code.as_i32());
}
