use crate::config::site_config::ConfigSummary;
use crate::config::cli::Command;
use crate::config::SiteConfig;
use crate::core::blog_source::resolve_article;
use crate::core::date_calculations::{parse_date, AgeCalculator};
use crate::core::sitemap::{is_valid_sitemap_resource, SitemapBuilder};
use crate::core::{Clock, FixedClock};
use crate::utils::error::{Result, SiteError};
use crate::utils::validation::Validate;
use serde::Serialize;
use std::fmt::Write;
use std::path::Path;

#[derive(Serialize)]
struct SitemapCheck<'a> {
    url: &'a str,
    include: bool,
}

/// 載入 .env 與設定檔並驗證
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SiteConfig> {
    SiteConfig::load_dotenv()?;

    tracing::info!("📁 Loading configuration from: {}", path.as_ref().display());
    let config = SiteConfig::from_file(path)?;
    config.validate()?;
    tracing::info!("✅ Configuration loaded and validated successfully");
    Ok(config)
}

/// Runs one command and returns what should be printed on stdout.
///
/// `clock` supplies today's date for `age` when `--today` is not given.
/// Commands for which [`Command::needs_config`] is true expect `config`.
pub fn execute<C: Clock>(
    command: &Command,
    config: Option<&SiteConfig>,
    clock: C,
) -> Result<String> {
    match command {
        Command::Age { from, today } => {
            let from = parse_date(from)?;
            let age = match today {
                Some(today) => AgeCalculator::new(FixedClock(parse_date(today)?)).age_in_years(from),
                None => AgeCalculator::new(clock).age_in_years(from),
            };
            Ok(format!("{}\n", age))
        }
        Command::SitemapCheck { urls, json } => {
            let checks: Vec<SitemapCheck> = urls
                .iter()
                .map(|url| SitemapCheck {
                    url,
                    include: is_valid_sitemap_resource(url),
                })
                .collect();

            if *json {
                return Ok(format!("{}\n", serde_json::to_string_pretty(&checks)?));
            }

            let mut out = String::new();
            for check in &checks {
                let verdict = if check.include { "include" } else { "exclude" };
                let _ = writeln!(out, "{}\t{}", verdict, check.url);
            }
            Ok(out)
        }
        Command::Sitemap {
            build_dir,
            base_url,
        } => {
            let builder = match (base_url, config) {
                (Some(base_url), _) => SitemapBuilder::new(build_dir, base_url)?,
                (None, Some(config)) => SitemapBuilder::from_settings(config, build_dir)?,
                (None, None) => {
                    return Err(SiteError::MissingConfigError {
                        field: "site.url".to_string(),
                    })
                }
            };

            tracing::info!("🗺️ Building sitemap from {}", builder.build_dir().display());
            let output = builder.write()?;
            Ok(format!("✅ Sitemap written to: {}\n", output.display()))
        }
        Command::Article { path } => {
            let config = require(config)?;
            match resolve_article(config, path)? {
                Some(resolved) => Ok(format!(
                    "Date:      {}\nTitle:     {}\nPermalink: {}\n",
                    resolved.article.date, resolved.article.title, resolved.output_path
                )),
                None => Ok(format!(
                    "'{}' does not match the article template {}\n",
                    path, config.blog.sources
                )),
            }
        }
        Command::Config { json, build } => {
            let summary = require(config)?.summary(*build);
            if *json {
                Ok(format!("{}\n", serde_json::to_string_pretty(&summary)?))
            } else {
                Ok(format_config_summary(&summary))
            }
        }
    }
}

fn require(config: Option<&SiteConfig>) -> Result<&SiteConfig> {
    config.ok_or_else(|| SiteError::ConfigError {
        message: "configuration was not loaded".to_string(),
    })
}

fn format_config_summary(summary: &ConfigSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "📋 Configuration Summary:");
    let _ = writeln!(out, "  Site: {} ({})", summary.name, summary.url);
    let _ = writeln!(out, "  Time zone: {}", summary.time_zone);
    let _ = writeln!(out, "  Article sources: {}", summary.sources);
    let _ = writeln!(out, "  Permalink: {}", summary.permalink);

    match &summary.sync_target {
        Some(target) => {
            let credentials = if summary.sync_credentials {
                "configured"
            } else {
                "missing"
            };
            let _ = writeln!(out, "  Sync: {} (credentials {})", target, credentials);
        }
        None => {
            let _ = writeln!(out, "  Sync: disabled");
        }
    }

    let _ = writeln!(out, "  Extensions: {}", summary.extensions.join(", "));
    let _ = writeln!(out, "  Page rules: {}", summary.page_rules);
    out
}
