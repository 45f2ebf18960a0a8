use crate::core::{SiteSettings, SitemapEntry};
use crate::utils::error::{Result, SiteError};
use crate::utils::validation::validate_site_url;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use url::Url;
use walkdir::WalkDir;

/// 不列入 sitemap 的靜態資源副檔名（區分大小寫）
pub const EXCLUDED_EXTENSIONS: [&str; 9] =
    ["css", "js", "eot", "svg", "woff", "otf", "ttf", "png", "jpg"];

pub const SITEMAP_FILE: &str = "sitemap.xml";

const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

static EXCLUDED_RESOURCE: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(r"\.({})$", EXCLUDED_EXTENSIONS.join("|"));
    Regex::new(&pattern).expect("excluded extension pattern is valid")
});

/// Returns false for stylesheets, scripts, fonts and images, true otherwise.
pub fn is_valid_sitemap_resource(url: &str) -> bool {
    !EXCLUDED_RESOURCE.is_match(url)
}

pub struct SitemapBuilder {
    build_dir: PathBuf,
    base_url: Url,
}

impl SitemapBuilder {
    pub fn new<P: AsRef<Path>>(build_dir: P, base_url: &str) -> Result<Self> {
        let mut base_url = validate_site_url("base_url", base_url)?;

        // 沒有結尾斜線時 join 會取代最後一段路徑
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            build_dir: build_dir.as_ref().to_path_buf(),
            base_url,
        })
    }

    pub fn from_settings<S: SiteSettings, P: AsRef<Path>>(settings: &S, build_dir: P) -> Result<Self> {
        Self::new(build_dir, settings.site_url())
    }

    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    pub fn collect(&self) -> Result<Vec<SitemapEntry>> {
        if !self.build_dir.is_dir() {
            return Err(SiteError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("build directory not found: {}", self.build_dir.display()),
            )));
        }

        let mut paths = Vec::new();
        for entry in WalkDir::new(&self.build_dir).follow_links(false) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let Some(url_path) = self.url_path(entry.path()) else {
                tracing::debug!("Skipping non UTF-8 path: {}", entry.path().display());
                continue;
            };

            if url_path == SITEMAP_FILE {
                continue;
            }

            if !is_valid_sitemap_resource(&url_path) {
                tracing::debug!("Excluded from sitemap: {}", url_path);
                continue;
            }

            paths.push(url_path);
        }

        paths.sort();
        paths.dedup();

        let entries = paths
            .iter()
            .map(|path| {
                Ok(SitemapEntry {
                    loc: self.location(path)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::info!(
            "Collected {} sitemap entries from {}",
            entries.len(),
            self.build_dir.display()
        );
        Ok(entries)
    }

    pub fn render(entries: &[SitemapEntry]) -> String {
        let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        xml.push_str(&format!("<urlset xmlns=\"{}\">\n", SITEMAP_NAMESPACE));
        for entry in entries {
            xml.push_str("  <url>\n");
            xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(entry.loc.as_str())));
            xml.push_str("  </url>\n");
        }
        xml.push_str("</urlset>\n");
        xml
    }

    /// 收集、產生並寫入 `<build_dir>/sitemap.xml`，回傳寫入路徑
    pub fn write(&self) -> Result<PathBuf> {
        let entries = self.collect()?;
        let output = self.build_dir.join(SITEMAP_FILE);
        std::fs::write(&output, Self::render(&entries))?;
        tracing::info!("Wrote {}", output.display());
        Ok(output)
    }

    /// 逐段附加到 base URL，`#`、`?` 等字元會被百分比編碼
    fn location(&self, url_path: &str) -> Result<Url> {
        let mut loc = self.base_url.clone();
        {
            let mut segments = loc
                .path_segments_mut()
                .map_err(|_| SiteError::UrlError(url::ParseError::RelativeUrlWithCannotBeABaseBase))?;
            // base 以 "/" 結尾，先移除空的最後一段；目錄路徑的結尾 "" 會補回斜線
            segments.pop_if_empty();
            segments.extend(url_path.split('/'));
        }
        Ok(loc)
    }

    /// Relative URL path for a built file; `index.html` maps to its directory.
    fn url_path(&self, file: &Path) -> Option<String> {
        let relative = file.strip_prefix(&self.build_dir).ok()?;
        let segments = relative
            .components()
            .map(|c| c.as_os_str().to_str())
            .collect::<Option<Vec<_>>>()?;

        match segments.split_last() {
            Some((&"index.html", dirs)) if dirs.is_empty() => Some(String::new()),
            Some((&"index.html", dirs)) => Some(format!("{}/", dirs.join("/"))),
            Some(_) => Some(segments.join("/")),
            None => None,
        }
    }
}

fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assets_are_excluded() {
        for url in [
            "style.css",
            "/javascripts/all.js",
            "/fonts/icons.eot",
            "/images/logo.svg",
            "/fonts/icons.woff",
            "/fonts/icons.otf",
            "/fonts/icons.ttf",
            "/images/header.png",
            "/images/photo.jpg",
        ] {
            assert!(!is_valid_sitemap_resource(url), "{} should be excluded", url);
        }
    }

    #[test]
    fn test_pages_are_included() {
        assert!(is_valid_sitemap_resource("/articles/2024-01-01-hello.html"));
        assert!(is_valid_sitemap_resource("/feed.xml"));
        assert!(is_valid_sitemap_resource("/about/"));
        assert!(is_valid_sitemap_resource("README"));
        assert!(is_valid_sitemap_resource(""));
    }

    #[test]
    fn test_match_is_case_sensitive() {
        assert!(is_valid_sitemap_resource("logo.PNG"));
        assert!(is_valid_sitemap_resource("style.CSS"));
    }

    #[test]
    fn test_match_is_anchored_to_end() {
        assert!(is_valid_sitemap_resource("/stylesheets/site.css.html"));
        assert!(is_valid_sitemap_resource("/javascripts/"));
        assert!(is_valid_sitemap_resource("/jsonfeed"));
        // 副檔名前必須有點
        assert!(is_valid_sitemap_resource("/notes/css"));
        assert!(is_valid_sitemap_resource("/image.jpeg"));
        assert!(!is_valid_sitemap_resource("/archive.tar.js"));
    }

    #[test]
    fn test_trailing_newline_is_not_an_extension() {
        assert!(is_valid_sitemap_resource("style.css\n"));
    }

    #[test]
    fn test_render_escapes_locations() {
        let entries = vec![SitemapEntry {
            loc: Url::parse("https://crashruby.com/search?q=a&b=c").unwrap(),
        }];
        let xml = SitemapBuilder::render(&entries);
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains(SITEMAP_NAMESPACE));
        assert!(xml.contains("<loc>https://crashruby.com/search?q=a&amp;b=c</loc>"));
    }

    #[test]
    fn test_render_empty_urlset() {
        let xml = SitemapBuilder::render(&[]);
        assert!(xml.contains("<urlset"));
        assert!(!xml.contains("<url>"));
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let builder = SitemapBuilder::new("build", "https://example.com/blog").unwrap();
        assert_eq!(builder.base_url.as_str(), "https://example.com/blog/");
    }

    #[test]
    fn test_rejects_relative_base_url() {
        assert!(SitemapBuilder::new("build", "example.com").is_err());
    }

    #[test]
    fn test_location_encodes_reserved_characters() {
        let builder = SitemapBuilder::new("build", "https://crashruby.com").unwrap();
        assert_eq!(
            builder.location("c#-notes.html").unwrap().as_str(),
            "https://crashruby.com/c%23-notes.html"
        );
        assert_eq!(
            builder.location("faq?.html").unwrap().as_str(),
            "https://crashruby.com/faq%3F.html"
        );
        assert_eq!(
            builder.location("notes/ruby 3.html").unwrap().as_str(),
            "https://crashruby.com/notes/ruby%203.html"
        );
        assert_eq!(
            builder.location("a:b.html").unwrap().as_str(),
            "https://crashruby.com/a:b.html"
        );
    }

    #[test]
    fn test_location_keeps_directory_slashes() {
        let builder = SitemapBuilder::new("build", "https://example.com/blog/").unwrap();
        assert_eq!(builder.location("").unwrap().as_str(), "https://example.com/blog/");
        assert_eq!(
            builder.location("about/").unwrap().as_str(),
            "https://example.com/blog/about/"
        );
        assert_eq!(
            builder.location("2024/01/05/hello.html").unwrap().as_str(),
            "https://example.com/blog/2024/01/05/hello.html"
        );
    }

    #[test]
    fn test_url_path_mapping() {
        let builder = SitemapBuilder::new("/srv/build", "https://example.com").unwrap();
        let path = |p: &str| builder.url_path(Path::new(p));
        assert_eq!(path("/srv/build/index.html").as_deref(), Some(""));
        assert_eq!(path("/srv/build/about/index.html").as_deref(), Some("about/"));
        assert_eq!(path("/srv/build/feed.xml").as_deref(), Some("feed.xml"));
        assert_eq!(
            path("/srv/build/2024/01/05/hello.html").as_deref(),
            Some("2024/01/05/hello.html")
        );
        assert_eq!(path("/elsewhere/index.html"), None);
    }
}
