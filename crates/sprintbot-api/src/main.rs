//! Sprint bot command-line entry point.
//!
//! Binary name: `sprintbot`
//!
//! Parses CLI arguments, sets up logging, loads configuration, then dispatches
//! to the matching command handler.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;
use sprintbot_observe::tracing_setup::init_tracing;

use cli::sprint::SprintOptions;
use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,sprintbot_core=debug",
        _ => "trace",
    };
    init_tracing(cli.log_format, filter).map_err(|err| anyhow::anyhow!(err))?;

    // Shell completions don't need configuration
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "sprintbot", &mut std::io::stdout());
        return Ok(());
    }

    match cli.command {
        Commands::Roll { text } => cli::dice::roll(&text, cli.json)?,

        Commands::Plural {
            count,
            one,
            few,
            many,
        } => cli::text::plural(count, &one, &few, &many, cli.json)?,

        Commands::Wc { text } => cli::text::word_count(&text, cli.json)?,

        Commands::Sprint {
            duration,
            delay,
            initiator,
            joiners,
            cancel_after,
            live,
        } => {
            let state = AppState::init().await;
            let options = SprintOptions {
                duration,
                delay,
                initiator,
                joiners,
                cancel_after,
                live,
            };
            cli::sprint::run(&state, options, cli.json).await?;
        }

        Commands::Config => {
            let state = AppState::init().await;
            cli::config::show(&state, cli.json)?;
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!("failed to listen for Ctrl+C: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::warn!("failed to install SIGTERM handler: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
