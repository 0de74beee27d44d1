mod config;
mod flags;

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};
use streamfeed::{Activity, Encoder, FixedClock, decode};
use tracing::info;

use crate::config::Config;
use crate::flags::{Streamfeed, StreamfeedCmd};

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let flags = Streamfeed::from_env_or_exit();
    let config = Config::load(flags.config.as_deref())?;

    match flags.subcommand {
        StreamfeedCmd::Inspect(cmd) => {
            let activity = read_activity(&cmd.path)?;
            println!("{activity:#?}");
        }
        StreamfeedCmd::Normalize(cmd) => {
            let activity = read_activity(&cmd.path)?;
            let value = match config.encode.fixed_timestamp()? {
                Some(now) => Encoder::with_clock(FixedClock(now)).to_value(&activity)?,
                None => Encoder::new().to_value(&activity)?,
            };
            let text = if config.output.pretty {
                serde_json::to_string_pretty(&value)?
            } else {
                value.to_string()
            };
            println!("{text}");
        }
    }

    Ok(())
}

fn read_activity(path: &Path) -> Result<Activity> {
    let bytes = if path == Path::new("-") {
        let mut bytes = vec![];
        io::stdin()
            .read_to_end(&mut bytes)
            .context("unable to read payload from stdin")?;
        bytes
    } else {
        fs::read(path).with_context(|| format!("unable to read payload {}", path.display()))?
    };
    let activity = decode(&bytes).context("unable to decode activity")?;
    info!(
        actor = %activity.actor,
        verb = %activity.verb,
        metadata = activity.metadata.len(),
        to = activity.to.len(),
        "decoded activity"
    );
    Ok(activity)
}
