pub mod blog_source;
pub mod date_calculations;
pub mod sitemap;

pub use crate::domain::model::{ArticleSource, SitemapEntry};
pub use crate::domain::ports::{Clock, FixedClock, SiteSettings, SystemClock};
pub use crate::utils::error::Result;
