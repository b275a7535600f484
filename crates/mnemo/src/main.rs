use anyhow::Result;
use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod cli;
mod init_cmd;
mod logging;
mod process_cmd;
mod show_cmd;
mod stats_cmd;

use cli::{Cli, Commands};
use mnemo_config::{Config, paths};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Keep the file-log worker alive for the whole run.
    let _guard = init_tracing();

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Process {
            log_file,
            days,
            dry_run,
            yes,
        } => {
            let exit_code =
                process_cmd::handle_process(&config, log_file, days, dry_run, yes).await?;
            std::process::exit(exit_code);
        }
        Commands::Init => {
            init_cmd::handle_init(&config)?;
        }
        Commands::Stats => {
            stats_cmd::handle_stats(&config, cli.format)?;
        }
        Commands::Show { context } => {
            show_cmd::handle_show(&config, context)?;
        }
    }

    Ok(())
}

/// Stderr logging plus a per-run file log under the state directory.
/// File logging is best-effort; stderr always works.
fn init_tracing() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    match logging::create_run_log_writer(&paths::state_dir()) {
        Ok((writer, guard)) => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(writer),
                )
                .try_init()
                .ok();
            Some(guard)
        }
        Err(_) => {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_env_filter(filter)
                .try_init()
                .ok();
            None
        }
    }
}
