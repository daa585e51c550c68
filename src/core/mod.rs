pub mod import;
pub mod runner;
pub mod statistics;

pub use crate::domain::model::{ImportLinksRequest, ImportStatistics, Link, LinkSource};
pub use crate::domain::ports::{
    LinkProvider, LinkStore, NotificationService, StatisticsBuilder, StatisticsStore, Storage,
};
pub use crate::utils::error::Result;
