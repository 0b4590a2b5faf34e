use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use pointer_trackers::replay::{ReplayScript, Replayer};
use pointer_trackers::TrackersConfig;

#[derive(Parser)]
#[command(name = "pointer-replay")]
#[command(about = "Replay a scripted pointer session through every tracker")]
#[command(version)]
struct Cli {
    /// Replay script (JSON)
    script: PathBuf,

    /// Tracker configuration (JSON); defaults apply when omitted
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    pointer_trackers::init_tracing();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => TrackersConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => TrackersConfig::default(),
    };

    let script = ReplayScript::from_file(&cli.script)
        .with_context(|| format!("Failed to load script {}", cli.script.display()))?;

    let report = Replayer::new(&config)
        .context("Failed to set up trackers")?
        .run(&script)
        .context("Replay failed")?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
