//! Monsync - monitoring asset synchronizer.

use std::process::ExitCode;

use monsync::cli::Cli;
use monsync::config::init_logging;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse_args();

    if let Err(e) = init_logging(cli.log_level.as_deref()) {
        eprintln!("Failed to initialize logging: {}", e);
        return ExitCode::FAILURE;
    }

    match cli.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e.user_message());
            ExitCode::from(e.exit_code())
        }
    }
}
