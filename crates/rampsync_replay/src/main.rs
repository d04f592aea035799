//! Replays a ramp-editing scenario and prints the resulting state as JSON.

use clap::Parser;
use rampsync_core::constants::{DEFAULT_LOG_FILTER, ENV_COOKING_ENABLED};
use rampsync_core::Config;
use rampsync_replay::{load_scenario, replay_to_json};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "rampsync-replay", about = "Replay a ramp-editing scenario", version)]
struct Cli {
    /// Scenario JSON file
    scenario: PathBuf,

    /// Pretty-print the report
    #[arg(short, long)]
    pretty: bool,

    /// Start with cooking disabled, unless the scenario says otherwise
    #[arg(long)]
    paused: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = Config::from_env();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_new(config.log_filter.as_str())
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if cli.paused {
        tracing::info!(
            override_of = ENV_COOKING_ENABLED,
            "Cooking paused from the command line"
        );
        config.cooking_enabled = false;
    }

    let scenario = load_scenario(&cli.scenario)?;
    let report = replay_to_json(&scenario, &config, cli.pretty)?;
    println!("{}", report);
    Ok(())
}
