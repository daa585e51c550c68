pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{HttpLinkProvider, LocalStorage};
pub use app::build_runner;
pub use config::toml_config::ImportConfig;
pub use core::{import::ImportEngine, runner::ImportRunner, runner::RunReport};
pub use domain::model::{ImportLinksRequest, ImportStatistics, Link, LinkSource};
pub use utils::error::{ImportError, Result};
