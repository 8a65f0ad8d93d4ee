use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use reqwest::Url;

use crate::data::source::{DirectorySource, HttpSource, TextSource};

/// Quantum computing market intelligence dashboard.
#[derive(Debug, Clone, Parser)]
#[command(version, about)]
pub struct Config {
    /// Directory holding the four CSV resources.
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,

    /// Fetch the CSV resources over HTTP from this base URL instead.
    #[arg(long)]
    pub base_url: Option<Url>,

    /// Quiet period for window-resize debouncing, in milliseconds.
    #[arg(long, default_value_t = 100)]
    pub debounce_ms: u64,

    /// Start from the embedded dataset without loading any CSV.
    #[arg(long)]
    pub no_load: bool,
}

impl Config {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// The text source the loader should read from. `None` with `--no-load`.
    pub fn text_source(&self) -> Option<Box<dyn TextSource>> {
        if self.no_load {
            return None;
        }
        Some(match &self.base_url {
            Some(url) => Box::new(HttpSource::new(url.clone())),
            None => Box::new(DirectorySource::new(self.data_dir.clone())),
        })
    }
}
