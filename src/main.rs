use anyhow::Context;
use dbconnect::cli::Cli;
use dbconnect::{Config, ConnectError, Connector};
use std::process;
use tracing_subscriber::EnvFilter;

// Allow eprintln in main CLI binary
#[allow(clippy::disallowed_methods)]
fn main() {
    init_logging();

    let cli = Cli::parse();
    tracing::info!("dbconnect CLI initialized");

    if let Err(e) = run(&cli) {
        // Exhaustion carries its own operator-facing message
        match e.downcast_ref::<ConnectError>() {
            Some(exhausted) => eprintln!("{exhausted}"),
            None => eprintln!("Error: {e:#}"),
        }
        process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let mut config =
        Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    cli.apply(&mut config);
    config.validate()?;

    let rt = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    rt.block_on(async {
        let connection = Connector::from_config(&config)
            .connect(&config.database)
            .await?;
        tracing::info!(closed = connection.is_closed(), "Connection ready");
        Ok::<(), anyhow::Error>(())
    })
}

/// Initialize logging based on environment variables
fn init_logging() {
    // Default to INFO level, can be overridden by RUST_LOG environment variable
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("dbconnect=info,warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .init();
}
