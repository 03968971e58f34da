use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use nebula_core::session::{EventOutcome, Session};
use tracing::{debug, info};

use crate::commands::config;
use crate::script::Script;
use crate::summary;

#[derive(Args)]
pub struct ReplayArgs {
    /// Replay script (TOML with [[viewport]] and [[event]] tables)
    pub script: PathBuf,

    /// Session config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print the final state as TOML instead of a summary
    #[arg(long)]
    pub toml: bool,
}

pub fn run(args: &ReplayArgs) -> Result<()> {
    let script = Script::read(&args.script)?;
    let session_config = config::load(args.config.as_deref())?;
    let base = args.script.parent().unwrap_or(Path::new("."));

    let (session, outcomes) = replay(&script, session_config, base)?;

    if args.toml {
        let text = toml::to_string_pretty(&session.snapshot())
            .context("Failed to serialize session snapshot")?;
        print!("{}", text);
    } else {
        summary::print_session_summary(&session.snapshot(), &outcomes);
    }
    Ok(())
}

/// Build the session described by `script` and feed it every event in order.
pub fn replay(
    script: &Script,
    session_config: nebula_core::config::SessionConfig,
    base: &Path,
) -> Result<(Session, Vec<EventOutcome>)> {
    let mut session = Session::new(session_config)?;
    for (index, spec) in script.viewports.iter().enumerate() {
        let image = spec
            .load(base)
            .with_context(|| format!("viewport {}", index))?;
        session.add_image(image, spec.screen_size())?;
    }
    info!(viewports = session.len(), events = script.events.len(), "Replaying");

    let mut outcomes = Vec::with_capacity(script.events.len());
    for (index, event) in script.events.iter().enumerate() {
        let outcome = session
            .handle(*event)
            .with_context(|| format!("event {} ({:?})", index, event))?;
        debug!(index, ?outcome, "Event applied");
        outcomes.push(outcome);
    }
    Ok((session, outcomes))
}
