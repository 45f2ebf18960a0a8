use crate::config::DEFAULT_CONFIG_FILE;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "blog-helpers")]
#[command(about = "Helpers and checks for the crashruby.com static blog")]
pub struct Cli {
    /// Path to the site configuration file
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Completed years between a date and today
    Age {
        /// Start date, YYYY-MM-DD
        from: String,

        /// Use this date instead of the system date
        #[arg(long)]
        today: Option<String>,
    },

    /// Check whether URLs belong in the sitemap
    SitemapCheck {
        #[arg(required = true)]
        urls: Vec<String>,

        #[arg(long)]
        json: bool,
    },

    /// Write sitemap.xml for a built site
    Sitemap {
        #[arg(long, default_value = "build")]
        build_dir: PathBuf,

        /// Defaults to site.url from the configuration
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Match an article source path and show its permalink
    Article { path: String },

    /// Load, validate and summarise the configuration
    Config {
        #[arg(long)]
        json: bool,

        /// Include build-only extensions
        #[arg(long)]
        build: bool,
    },
}

impl Command {
    pub fn needs_config(&self) -> bool {
        match self {
            Self::Age { .. } | Self::SitemapCheck { .. } => false,
            Self::Sitemap { base_url, .. } => base_url.is_none(),
            Self::Article { .. } | Self::Config { .. } => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_age_command() {
        let cli = Cli::try_parse_from(["blog-helpers", "age", "1990-05-01", "--today", "2026-10-14"])
            .unwrap();
        assert_eq!(cli.config, PathBuf::from("site.toml"));
        match cli.command {
            Command::Age { from, today } => {
                assert_eq!(from, "1990-05-01");
                assert_eq!(today.as_deref(), Some("2026-10-14"));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["blog-helpers", "config", "--json", "-v", "-c", "other.toml"])
            .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, PathBuf::from("other.toml"));
        assert!(cli.command.needs_config());
    }

    #[test]
    fn test_sitemap_check_requires_urls() {
        assert!(Cli::try_parse_from(["blog-helpers", "sitemap-check"]).is_err());
    }

    #[test]
    fn test_sitemap_with_base_url_skips_config() {
        let cli = Cli::try_parse_from([
            "blog-helpers",
            "sitemap",
            "--base-url",
            "https://crashruby.com",
        ])
        .unwrap();
        assert!(!cli.command.needs_config());

        let cli = Cli::try_parse_from(["blog-helpers", "sitemap"]).unwrap();
        assert!(cli.command.needs_config());
    }
}
