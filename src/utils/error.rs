use thiserror::Error;

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("Invalid date '{input}': {reason}")]
    InvalidDate { input: String, reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Directory walk failed: {0}")]
    WalkError(#[from] walkdir::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl SiteError {
    pub fn invalid_date(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDate {
            input: input.into(),
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidDate { .. } | Self::UrlError(_) => ErrorCategory::Input,
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::IoError(_) | Self::WalkError(_) | Self::SerializationError(_) => {
                ErrorCategory::System
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::Medium,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 程式結束碼：輸入錯誤 1、配置錯誤 2、系統錯誤 3
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::High => 1,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::Critical => 3,
        }
    }

    /// 對應錯誤類型的修復建議
    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::InvalidDate { .. } => {
                "Use the ISO format YYYY-MM-DD with a real calendar date".to_string()
            }
            Self::UrlError(_) => "Check that the URL is absolute, e.g. https://example.com/".to_string(),
            Self::IoError(_) | Self::WalkError(_) => {
                "Check that the path exists and is readable".to_string()
            }
            Self::SerializationError(_) => "Report this as a bug".to_string(),
            Self::MissingConfigError { field } => {
                format!("Set '{}' in site.toml or in the environment (.env)", field)
            }
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => {
                "Fix the value in site.toml and run `blog-helpers config` to re-check".to_string()
            }
        }
    }

    /// 給終端使用者看的簡短訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::InvalidDate { input, .. } => format!("'{}' is not a valid date", input),
            Self::UrlError(e) => format!("Bad URL: {}", e),
            Self::IoError(e) => format!("File system problem: {}", e),
            Self::WalkError(e) => format!("Could not read build directory: {}", e),
            Self::SerializationError(e) => format!("Could not produce output: {}", e),
            Self::MissingConfigError { field } => format!("'{}' is not configured", field),
            Self::ConfigError { message } => format!("Configuration problem: {}", message),
            Self::ConfigValidationError { field, message } => {
                format!("Configuration problem in '{}': {}", field, message)
            }
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("'{}' is invalid: {}", field, reason)
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, SiteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_date_is_input_error() {
        let err = SiteError::invalid_date("2024-02-30", "day out of range");
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.to_string().contains("2024-02-30"));
    }

    #[test]
    fn test_config_errors_share_category() {
        let missing = SiteError::MissingConfigError {
            field: "sync.directory".to_string(),
        };
        assert_eq!(missing.category(), ErrorCategory::Configuration);
        assert!(missing.recovery_suggestion().contains("sync.directory"));
    }

    #[test]
    fn test_exit_code_follows_severity() {
        assert_eq!(SiteError::invalid_date("x", "bad").exit_code(), 1);
        let url_err: SiteError = url::ParseError::EmptyHost.into();
        assert_eq!(url_err.exit_code(), 1);
        assert_eq!(
            SiteError::MissingConfigError {
                field: "site.url".to_string()
            }
            .exit_code(),
            2
        );
        assert_eq!(
            SiteError::ConfigError {
                message: "broken".to_string()
            }
            .exit_code(),
            2
        );
        let io_err: SiteError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert_eq!(io_err.exit_code(), 3);
    }

    #[test]
    fn test_io_error_is_critical() {
        let err: SiteError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }
}
