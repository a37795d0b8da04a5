//! # League Runtime
//!
//! Loads configuration, initialises logging, wires the draft queue service
//! and runs a command script from a file argument or stdin.
//!
//! ```text
//! league-runtime [script-file]
//! DL_LOG=debug league-runtime < season.dl
//! ```

use std::io::Read;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use league_runtime::{EventLogHandler, LeagueConfig, LeagueContainer, ScriptRunner};

fn read_script(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("reading script {path}"))
        }
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("reading script from stdin")?;
            Ok(text)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = LeagueConfig::from_env().context("loading configuration")?;

    // Initialize logging
    let filter = EnvFilter::try_new(&config.log.filter)
        .with_context(|| format!("invalid log filter {:?}", config.log.filter))?;
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let path = std::env::args().nth(1);
    let script = read_script(path.as_deref())?;

    let container = LeagueContainer::new(config).context("building league container")?;
    let event_log = tokio::spawn(EventLogHandler::new(&container.event_bus).run());

    let runner = ScriptRunner::new(
        std::sync::Arc::clone(&container.draft_queue),
        container.config.draft.max_attempts(),
    );
    let mut stdout = std::io::stdout().lock();
    let summary = runner
        .run(&script, &mut stdout)
        .await
        .context("writing script output")?;
    drop(stdout);

    info!(
        executed = summary.executed,
        failed = summary.failed,
        parse_errors = summary.parse_errors,
        "Script finished"
    );

    // Dropping the container closes the bus and lets the log handler drain.
    drop(runner);
    drop(container);
    let logged = event_log.await.context("event log handler panicked")?;
    info!(logged, "Shutdown complete");

    Ok(())
}
