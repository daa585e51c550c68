pub mod toml_config;

#[cfg(feature = "cli")]
use crate::domain::model::LinkSource;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "link-import")]
#[command(about = "Incrementally import links from configured sources")]
pub struct CliConfig {
    #[arg(long, default_value = "link-import.toml")]
    pub config: String,

    #[arg(long, help = "Send a notification with each source's import result")]
    pub send_results: bool,

    #[arg(long, help = "Import only this source (POCKET, CUSTOM or RSS)")]
    pub source: Option<String>,

    #[arg(long, help = "Print the current checkpoints without importing")]
    pub dry_run: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn source_filter(&self) -> Result<Option<LinkSource>> {
        self.source.as_deref().map(str::parse).transpose()
    }
}
