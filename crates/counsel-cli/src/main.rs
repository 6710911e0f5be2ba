//! counsel - session client for the Counsel legal practice platform
//!
//! Signs in against the platform API and keeps the session in a local store
//! so later invocations reuse it.
//!
//! # Examples
//!
//! ```bash
//! # Sign in (prompts for the password unless COUNSEL_PASSWORD is set)
//! counsel login alice@example.com
//!
//! # Verify the session and print the user
//! counsel whoami --pretty
//!
//! # Complete a two-step login
//! counsel otp verify alice@example.com 123456 --login-session-token <token>
//! ```

use counsel_cli::{Cli, CliResult, build_reconciler, execute, logger};
use counsel_config::Config;

use std::process::ExitCode;

use clap::Parser;
use serde_json::Value;

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> CliResult<String> {
    let config = Config::load()?;
    config.validate()?;

    logger::initialize(
        config.logging.level,
        config.log_file_path()?,
        config.logging.colored,
    )?;
    config.log_summary();

    let reconciler = build_reconciler(&config, cli.server.as_deref())?;
    let value: Value = execute(cli.command, &reconciler).await?;

    let output = if cli.pretty {
        serde_json::to_string_pretty(&value)?
    } else {
        serde_json::to_string(&value)?
    };

    Ok(output)
}
