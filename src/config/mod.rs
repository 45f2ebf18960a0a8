#[cfg(feature = "cli")]
pub mod cli;
pub mod site_config;

pub use site_config::{Layout, SiteConfig, DEFAULT_CONFIG_FILE};
