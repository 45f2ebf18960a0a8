use crate::core::date_calculations::date_from_parts;
use crate::core::{ArticleSource, SiteSettings};
use crate::utils::error::{Result, SiteError};
use chrono::Datelike;
use regex::Regex;

pub const DEFAULT_SOURCES: &str = "/articles/:year-:month-:day-:title.html";
pub const DEFAULT_PERMALINK: &str = ":year/:month/:day/:title.html";

const PLACEHOLDERS: [&str; 4] = ["year", "month", "day", "title"];

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(&'static str),
}

/// 把 `:name` 形式的模板切成文字與佔位符
fn tokenize(template: &str, field_name: &str) -> Result<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = template.char_indices().peekable();

    while let Some((_, c)) = chars.next() {
        let starts_name = c == ':'
            && chars
                .peek()
                .is_some_and(|(_, next)| next.is_ascii_alphabetic());
        if !starts_name {
            literal.push(c);
            continue;
        }

        let mut name = String::new();
        while let Some(&(_, next)) = chars.peek() {
            if !next.is_ascii_alphanumeric() && next != '_' {
                break;
            }
            name.push(next);
            chars.next();
        }

        let placeholder = PLACEHOLDERS
            .iter()
            .copied()
            .find(|p| *p == name)
            .ok_or_else(|| SiteError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: template.to_string(),
                reason: format!(
                    "Unknown placeholder ':{}'. Supported: :{}",
                    name,
                    PLACEHOLDERS.join(", :")
                ),
            })?;

        if !literal.is_empty() {
            segments.push(Segment::Literal(std::mem::take(&mut literal)));
        }
        segments.push(Segment::Placeholder(placeholder));
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }

    for required in PLACEHOLDERS {
        if !segments.contains(&Segment::Placeholder(required)) {
            return Err(SiteError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: template.to_string(),
                reason: format!("Template must contain :{}", required),
            });
        }
    }

    Ok(segments)
}

/// Matches article source paths such as `/articles/2024-01-05-hello.html`.
#[derive(Debug, Clone)]
pub struct SourceTemplate {
    template: String,
    pattern: Regex,
}

impl SourceTemplate {
    pub fn parse(template: &str) -> Result<Self> {
        let segments = tokenize(template.trim_start_matches('/'), "blog.sources")?;

        let mut pattern = String::from("^/?");
        for segment in &segments {
            match segment {
                Segment::Literal(text) => pattern.push_str(&regex::escape(text)),
                Segment::Placeholder("year") => pattern.push_str(r"(?P<year>[0-9]{4})"),
                Segment::Placeholder("month") => pattern.push_str(r"(?P<month>[0-9]{2})"),
                Segment::Placeholder("day") => pattern.push_str(r"(?P<day>[0-9]{2})"),
                Segment::Placeholder(_) => pattern.push_str(r"(?P<title>[^/]+)"),
            }
        }
        pattern.push('$');

        let pattern = Regex::new(&pattern).map_err(|e| SiteError::ConfigValidationError {
            field: "blog.sources".to_string(),
            message: format!("Could not compile template '{}': {}", template, e),
        })?;

        Ok(Self {
            template: template.to_string(),
            pattern,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// `Ok(None)` 代表路徑不符合模板；日期不存在時回傳 `InvalidDate`
    pub fn match_path(&self, path: &str) -> Result<Option<ArticleSource>> {
        let Some(caps) = self.pattern.captures(path) else {
            return Ok(None);
        };

        // 佔位符只匹配 ASCII 數字
        let number = |name: &str| -> Result<u32> {
            caps[name]
                .parse::<u32>()
                .map_err(|e| SiteError::invalid_date(path, e.to_string()))
        };
        let year = i32::try_from(number("year")?)
            .map_err(|e| SiteError::invalid_date(path, e.to_string()))?;
        let date = date_from_parts(year, number("month")?, number("day")?)?;

        let article = ArticleSource {
            date,
            title: caps["title"].to_string(),
            source_path: path.to_string(),
        };
        tracing::debug!("Matched article {} ({})", article.title, article.date);
        Ok(Some(article))
    }
}

#[derive(Debug, Clone)]
pub struct Permalink {
    segments: Vec<Segment>,
}

impl Permalink {
    pub fn parse(template: &str) -> Result<Self> {
        Ok(Self {
            segments: tokenize(template, "blog.permalink")?,
        })
    }

    pub fn render(&self, article: &ArticleSource) -> String {
        let mut output = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => output.push_str(text),
                Segment::Placeholder("year") => {
                    output.push_str(&format!("{:04}", article.date.year()))
                }
                Segment::Placeholder("month") => {
                    output.push_str(&format!("{:02}", article.date.month()))
                }
                Segment::Placeholder("day") => output.push_str(&format!("{:02}", article.date.day())),
                Segment::Placeholder(_) => output.push_str(&article.title),
            }
        }
        output
    }

    /// `hello.html` 變成 `hello/index.html`（directory indexes）
    pub fn render_with_indexes(&self, article: &ArticleSource) -> String {
        let rendered = self.render(article);
        let (dir, file) = match rendered.rsplit_once('/') {
            Some((dir, file)) => (Some(dir), file),
            None => (None, rendered.as_str()),
        };

        let indexed = match file.strip_suffix(".html") {
            Some(stem) if file != "index.html" && !stem.is_empty() => Some(match dir {
                Some(dir) => format!("{}/{}/index.html", dir, stem),
                None => format!("{}/index.html", stem),
            }),
            _ => None,
        };
        indexed.unwrap_or(rendered)
    }
}

/// A matched article and the output path it is published under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedArticle {
    pub article: ArticleSource,
    pub output_path: String,
}

pub fn resolve_article<S: SiteSettings>(
    settings: &S,
    source_path: &str,
) -> Result<Option<ResolvedArticle>> {
    let template = SourceTemplate::parse(settings.source_template())?;
    let Some(article) = template.match_path(source_path)? else {
        return Ok(None);
    };

    let permalink = Permalink::parse(settings.permalink_template())?;
    let output_path = if settings.directory_indexes() {
        permalink.render_with_indexes(&article)
    } else {
        permalink.render(&article)
    };

    Ok(Some(ResolvedArticle {
        article,
        output_path,
    }))
}
