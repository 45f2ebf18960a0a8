#[cfg(feature = "cli")]
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::{Cli, Command};

pub use config::{Layout, SiteConfig};
pub use core::blog_source::{resolve_article, Permalink, ResolvedArticle, SourceTemplate};
pub use core::date_calculations::{age_in_years, parse_date, AgeCalculator};
pub use core::sitemap::{is_valid_sitemap_resource, SitemapBuilder};
pub use core::{ArticleSource, Clock, FixedClock, SiteSettings, SitemapEntry, SystemClock};
pub use utils::error::{Result, SiteError};
