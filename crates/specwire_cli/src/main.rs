//! specwire CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid arguments
//! - 3: Configuration error
//! - 4: Delivery error

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use specwire_config::ConfigError;
use specwire_core::CoreError;
use specwire_dispatch::DispatchError;

mod commands;

use commands::{Cli, Commands, Globals};

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const CONFIG_ERROR: u8 = 3;
    pub const DELIVERY_ERROR: u8 = 4;
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose {
        "specwire=debug,warn"
    } else if cli.quiet {
        "warn"
    } else {
        "specwire=info,warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let log_result = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    if log_result.is_err() {
        // Logging already initialized, continue
    }

    let globals = Globals {
        secrets: cli.secrets,
        quiet: cli.quiet,
    };

    let result = match cli.command {
        Commands::Run(args) => commands::run::execute(args, &globals).await,
        Commands::Questions(args) => commands::questions::execute(args, &globals).await,
        Commands::Draft(args) => commands::draft::execute(args, &globals).await,
        Commands::Chunk(args) => commands::chunk::execute(args).await,
        Commands::Send(args) => commands::send::execute(args, &globals).await,
        Commands::Config(args) => commands::config::execute(args, &globals).await,
    };

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            let exit_code = categorize_error(&e);
            eprintln!("❌ Error: {:#}", e);
            ExitCode::from(exit_code)
        }
    }
}

/// Categorize error to determine exit code
fn categorize_error(e: &anyhow::Error) -> u8 {
    for cause in e.chain() {
        if cause.downcast_ref::<ConfigError>().is_some() {
            return ExitCodes::CONFIG_ERROR;
        }
        if let Some(err) = cause.downcast_ref::<DispatchError>() {
            return dispatch_exit_code(err);
        }
        if let Some(err) = cause.downcast_ref::<CoreError>() {
            return match err {
                CoreError::EmptyInput
                | CoreError::UnknownDepartment(_)
                | CoreError::AnswerOutOfRange { .. } => ExitCodes::INVALID_ARGS,
                CoreError::Config(_) => ExitCodes::CONFIG_ERROR,
                CoreError::Dispatch(inner) => dispatch_exit_code(inner),
                _ => ExitCodes::GENERAL_ERROR,
            };
        }
    }

    let msg = e.to_string().to_lowercase();
    if msg.contains("argument") || msg.contains("not found") {
        ExitCodes::INVALID_ARGS
    } else {
        ExitCodes::GENERAL_ERROR
    }
}

fn dispatch_exit_code(err: &DispatchError) -> u8 {
    match err {
        DispatchError::Config(_) | DispatchError::NoDestination => ExitCodes::CONFIG_ERROR,
        DispatchError::UnknownDepartment(_) => ExitCodes::INVALID_ARGS,
        _ => ExitCodes::DELIVERY_ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_config_errors_map_to_three() {
        let err = anyhow::Error::new(ConfigError::missing("telegram bot token", &["bot_token"]));
        assert_eq!(categorize_error(&err), ExitCodes::CONFIG_ERROR);

        let wrapped: anyhow::Result<()> = Err(DispatchError::NoDestination).context("Sending document");
        assert_eq!(categorize_error(&wrapped.unwrap_err()), ExitCodes::CONFIG_ERROR);
    }

    #[test]
    fn test_delivery_errors_map_to_four() {
        let err = anyhow::Error::new(CoreError::Dispatch(DispatchError::Rejected {
            chunk: 1,
            total: 2,
            status: 400,
            body: "Bad Request".to_string(),
        }));
        assert_eq!(categorize_error(&err), ExitCodes::DELIVERY_ERROR);
    }

    #[test]
    fn test_usage_errors_map_to_two() {
        assert_eq!(
            categorize_error(&anyhow::Error::new(CoreError::EmptyInput)),
            ExitCodes::INVALID_ARGS
        );
        assert_eq!(
            categorize_error(&anyhow::anyhow!("Invalid argument: --limit must be positive")),
            ExitCodes::INVALID_ARGS
        );
        assert_eq!(categorize_error(&anyhow::anyhow!("boom")), ExitCodes::GENERAL_ERROR);
    }
}
