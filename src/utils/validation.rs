use crate::utils::error::{Result, SiteError};
use std::path::{Component, Path};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field_name: &str, value: &str, reason: impl Into<String>) -> SiteError {
    SiteError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// 驗證網站根網址：必須是 http/https 的絕對網址
pub fn validate_site_url(field_name: &str, url_str: &str) -> Result<Url> {
    if url_str.is_empty() {
        return Err(invalid(field_name, url_str, "URL cannot be empty"));
    }

    let url = Url::parse(url_str)
        .map_err(|e| invalid(field_name, url_str, format!("Invalid URL format: {}", e)))?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(invalid(
                field_name,
                url_str,
                format!("Unsupported URL scheme: {}", scheme),
            ))
        }
    }

    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(invalid(field_name, url_str, "URL must include a host"));
    }

    Ok(url)
}

/// 驗證輸出目錄下的相對路徑（例如 stylesheets、javascripts）
pub fn validate_relative_dir(field_name: &str, path: &str) -> Result<()> {
    validate_non_empty_string(field_name, path)?;

    if path.contains('\0') {
        return Err(invalid(field_name, path, "Path contains null bytes"));
    }

    let escapes = Path::new(path).components().any(|component| {
        matches!(
            component,
            Component::RootDir | Component::Prefix(_) | Component::ParentDir
        )
    });
    if escapes {
        return Err(invalid(
            field_name,
            path,
            "Path must stay inside the site directory",
        ));
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(invalid(
            field_name,
            &value.to_string(),
            format!("Value must be at least {}", min_value),
        ));
    }
    Ok(())
}

pub fn validate_one_of(field_name: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if !allowed.contains(&value) {
        return Err(invalid(
            field_name,
            value,
            format!("Expected one of: {}", allowed.join(", ")),
        ));
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| SiteError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(
            field_name,
            value,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}
