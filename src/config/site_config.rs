use crate::core::blog_source::{Permalink, SourceTemplate, DEFAULT_PERMALINK, DEFAULT_SOURCES};
use crate::core::SiteSettings;
use crate::utils::error::{Result, SiteError};
use crate::utils::validation::{
    validate_non_empty_string, validate_one_of, validate_positive_number, validate_relative_dir,
    validate_required_field, validate_site_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "site.toml";

const REMOTE_FILE_POLICIES: [&str; 3] = ["keep", "delete", "ignore"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub site: SiteSection,
    #[serde(default)]
    pub blog: BlogConfig,
    pub sync: Option<SyncConfig>,
    #[serde(default)]
    pub extensions: ExtensionsConfig,
    #[serde(default)]
    pub markdown: MarkdownConfig,
    #[serde(default)]
    pub assets: AssetsConfig,
    #[serde(default)]
    pub build: BuildConfig,
    #[serde(default)]
    pub pages: Vec<PageRule>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteSection {
    pub name: String,
    pub url: String,
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogConfig {
    pub prefix: Option<String>,
    pub sources: String,
    pub permalink: String,
    pub layout: String,
    pub tag_template: String,
    pub calendar_template: String,
    pub paginate: bool,
    pub per_page: usize,
    pub summary_length: usize,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            prefix: None,
            sources: DEFAULT_SOURCES.to_string(),
            permalink: DEFAULT_PERMALINK.to_string(),
            layout: "article_layout".to_string(),
            tag_template: "tag.html".to_string(),
            calendar_template: "calendar.html".to_string(),
            paginate: false,
            per_page: 10,
            summary_length: 250,
        }
    }
}

/// 部署到雲端儲存空間的同步設定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    pub directory: Option<String>,
    #[serde(default = "default_region")]
    pub region: String,
    pub aws_access_key_id: Option<String>,
    pub aws_secret_access_key: Option<String>,
    #[serde(default = "default_remote_files")]
    pub existing_remote_files: String,
    #[serde(default)]
    pub after_build: bool,
}

impl SyncConfig {
    /// Access key pair; placeholders left unresolved count as missing.
    pub fn credentials(&self) -> Result<(&str, &str)> {
        let key_id = resolved("sync.aws_access_key_id", &self.aws_access_key_id)?;
        let secret = resolved("sync.aws_secret_access_key", &self.aws_secret_access_key)?;
        Ok((key_id, secret))
    }

    pub fn has_credentials(&self) -> bool {
        self.credentials().is_ok()
    }
}

fn resolved<'a>(field: &str, value: &'a Option<String>) -> Result<&'a str> {
    let value = validate_required_field(field, value)?;
    if value.trim().is_empty() || value.contains("${") {
        return Err(SiteError::MissingConfigError {
            field: field.to_string(),
        });
    }
    Ok(value.as_str())
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtensionsConfig {
    pub livereload: bool,
    pub asset_hash: bool,
    pub minify_html: bool,
    pub directory_indexes: bool,
    pub syntax_highlighting: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
    pub engine: String,
    pub fenced_code_blocks: bool,
    pub smartypants: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            engine: "redcarpet".to_string(),
            fenced_code_blocks: false,
            smartypants: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    pub css_dir: String,
    pub js_dir: String,
    pub images_dir: String,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            css_dir: "stylesheets".to_string(),
            js_dir: "javascripts".to_string(),
            images_dir: "images".to_string(),
        }
    }
}

/// 只在 build 時啟用的擴充功能
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    pub minify_css: bool,
    pub minify_javascript: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRule {
    pub pattern: String,
    pub layout: LayoutSetting,
}

/// `layout = "article"` or `layout = false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LayoutSetting {
    Named(String),
    Flag(bool),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Layout {
    Named(String),
    Disabled,
}

/// Secret-free view of the configuration for display.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigSummary {
    pub name: String,
    pub url: String,
    pub time_zone: String,
    pub sources: String,
    pub permalink: String,
    pub sync_target: Option<String>,
    pub sync_credentials: bool,
    pub extensions: Vec<&'static str>,
    pub page_rules: usize,
}

fn default_time_zone() -> String {
    "Eastern Time (US & Canada)".to_string()
}

fn default_provider() -> String {
    "AWS".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_remote_files() -> String {
    "keep".to_string()
}

impl SiteConfig {
    /// 載入目前目錄的 `.env`（若存在）
    pub fn load_dotenv() -> Result<()> {
        match dotenvy::dotenv() {
            Ok(path) => {
                tracing::debug!("Loaded environment from {}", path.display());
                Ok(())
            }
            Err(e) if e.not_found() => Ok(()),
            Err(e) => Err(SiteError::ConfigError {
                message: format!("Could not read .env file: {}", e),
            }),
        }
    }

    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SiteError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| SiteError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${AWS_ACCESS_KEY})
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| SiteError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    pub fn article_template(&self) -> Result<SourceTemplate> {
        SourceTemplate::parse(&self.blog.sources)
    }

    pub fn permalink(&self) -> Result<Permalink> {
        Permalink::parse(&self.blog.permalink)
    }

    /// 最後一條符合的規則優先
    pub fn layout_for(&self, path: &str) -> Option<Layout> {
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };

        self.pages
            .iter()
            .rev()
            .find(|rule| {
                glob::Pattern::new(&rule.pattern)
                    .map(|pattern| pattern.matches(&path))
                    .unwrap_or(false)
            })
            .map(|rule| match &rule.layout {
                LayoutSetting::Named(name) => Layout::Named(name.clone()),
                LayoutSetting::Flag(_) => Layout::Disabled,
            })
    }

    /// Extensions the generator should activate, in declaration order.
    pub fn active_extensions(&self, for_build: bool) -> Vec<&'static str> {
        let ext = &self.extensions;
        let mut active: Vec<&'static str> = [
            ("blog", true),
            ("sync", self.sync.is_some()),
            ("livereload", ext.livereload),
            ("asset_hash", ext.asset_hash),
            ("minify_html", ext.minify_html),
            ("directory_indexes", ext.directory_indexes),
            ("syntax_highlighting", ext.syntax_highlighting),
        ]
        .into_iter()
        .filter_map(|(name, on)| on.then_some(name))
        .collect();

        if for_build {
            if self.build.minify_css {
                active.push("minify_css");
            }
            if self.build.minify_javascript {
                active.push("minify_javascript");
            }
        }
        active
    }

    pub fn summary(&self, for_build: bool) -> ConfigSummary {
        ConfigSummary {
            name: self.site.name.clone(),
            url: self.site.url.clone(),
            time_zone: self.site.time_zone.clone(),
            sources: self.blog.sources.clone(),
            permalink: self.blog.permalink.clone(),
            sync_target: self
                .sync
                .as_ref()
                .and_then(|sync| sync.directory.clone()),
            sync_credentials: self.sync.as_ref().is_some_and(SyncConfig::has_credentials),
            extensions: self.active_extensions(for_build),
            page_rules: self.pages.len(),
        }
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("site.name", &self.site.name)?;
        validate_site_url("site.url", &self.site.url)?;
        validate_non_empty_string("site.time_zone", &self.site.time_zone)?;

        self.article_template()?;
        self.permalink()?;
        validate_positive_number("blog.per_page", self.blog.per_page, 1)?;
        validate_non_empty_string("blog.layout", &self.blog.layout)?;
        if let Some(prefix) = &self.blog.prefix {
            validate_relative_dir("blog.prefix", prefix)?;
        }

        if let Some(sync) = &self.sync {
            let directory = validate_required_field("sync.directory", &sync.directory)?;
            validate_non_empty_string("sync.directory", directory)?;
            validate_non_empty_string("sync.provider", &sync.provider)?;
            validate_non_empty_string("sync.region", &sync.region)?;
            validate_one_of(
                "sync.existing_remote_files",
                &sync.existing_remote_files,
                &REMOTE_FILE_POLICIES,
            )?;
        }

        validate_non_empty_string("markdown.engine", &self.markdown.engine)?;
        validate_relative_dir("assets.css_dir", &self.assets.css_dir)?;
        validate_relative_dir("assets.js_dir", &self.assets.js_dir)?;
        validate_relative_dir("assets.images_dir", &self.assets.images_dir)?;

        for (index, rule) in self.pages.iter().enumerate() {
            let field = format!("pages[{}]", index);
            glob::Pattern::new(&rule.pattern).map_err(|e| SiteError::InvalidConfigValueError {
                field: format!("{}.pattern", field),
                value: rule.pattern.clone(),
                reason: e.to_string(),
            })?;
            match &rule.layout {
                LayoutSetting::Named(name) => {
                    validate_non_empty_string(&format!("{}.layout", field), name)?
                }
                LayoutSetting::Flag(false) => {}
                LayoutSetting::Flag(true) => {
                    return Err(SiteError::InvalidConfigValueError {
                        field: format!("{}.layout", field),
                        value: "true".to_string(),
                        reason: "Use a layout name, or false for no layout".to_string(),
                    })
                }
            }
        }

        Ok(())
    }
}

impl SiteSettings for SiteConfig {
    fn site_url(&self) -> &str {
        &self.site.url
    }

    fn source_template(&self) -> &str {
        &self.blog.sources
    }

    fn permalink_template(&self) -> &str {
        &self.blog.permalink
    }

    fn directory_indexes(&self) -> bool {
        self.extensions.directory_indexes
    }
}

impl Validate for SiteConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
