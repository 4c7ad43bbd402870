//! Generate an SMF score for every chord in the catalog.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use chord_score::{encode, ScoreParams};
use chord_theory::ChordCatalog;
use earcall::{ChordRenderer, SmfDirRenderer};
use earcall_conf::EarcallConfig;

#[derive(Parser)]
#[command(name = "scoregen", about = "Write every catalog chord as a .mid score")]
struct Args {
    /// Output directory (defaults to the configured score dir)
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Config file to load instead of the discovered ones
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    let config =
        EarcallConfig::load_from(args.config.as_deref()).context("loading configuration")?;

    let catalog = ChordCatalog::build().context("building chord catalog")?;
    let params = ScoreParams {
        velocity: config.score.velocity,
        ticks_per_beat: config.score.ticks_per_beat,
        sustain_ticks: config.score.sustain_ticks,
        channel: 0,
    };

    let dir = args.out_dir.unwrap_or_else(|| config.paths.score_dir.clone());
    let renderer = SmfDirRenderer::new(&dir, params.clone());

    let mut written = 0usize;
    for entry in catalog.entries() {
        let events = encode(entry.identity, &params);
        renderer
            .render(&entry.key, &events)
            .with_context(|| format!("rendering {}", entry.key))?;
        written += 1;
    }

    info!(written, dir = %dir.display(), "score generation complete");
    Ok(())
}
