use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use url::Url;

/// A blog article identified from its source path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleSource {
    pub date: NaiveDate,
    pub title: String,
    pub source_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SitemapEntry {
    pub loc: Url,
}
