use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use jiff::Timestamp;
use serde::Deserialize;

#[derive(Clone, Default, Debug, Deserialize)]
#[serde(default)]
pub(crate) struct Config {
    pub(crate) output: OutputConfig,
    pub(crate) encode: EncodeConfig,
}

#[derive(Clone, Default, Debug, Deserialize)]
#[serde(default)]
pub(crate) struct OutputConfig {
    pub(crate) pretty: bool,
}

#[derive(Clone, Default, Debug, Deserialize)]
#[serde(default)]
pub(crate) struct EncodeConfig {
    /// RFC 3339 instant used for activities without a time
    pub(crate) fixed_time: Option<String>,
}

impl Config {
    pub(crate) fn load(path: Option<&Path>) -> Result<Config> {
        let Some(path) = path else {
            return Ok(Config::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("unable to read config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("invalid config {}", path.display()))
    }
}

impl EncodeConfig {
    pub(crate) fn fixed_timestamp(&self) -> Result<Option<Timestamp>> {
        self.fixed_time
            .as_deref()
            .map(|time| {
                time.parse()
                    .with_context(|| format!("fixed_time {time:?} is not an RFC 3339 instant"))
            })
            .transpose()
    }
}
