use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdsError {
    #[error("API request failed: {0}")]
    ApiRequestError(#[from] reqwest::Error),

    #[error("API returned {status}: {body}")]
    ApiError { status: u16, body: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Report format error: {message}")]
    FormatError { message: String },

    #[error("Invalid report state: {message}")]
    StateError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

pub type Result<T> = std::result::Result<T, AdsError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Transport,
    Report,
    Io,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AdsError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AdsError::ConfigError { .. }
            | AdsError::MissingConfigError { .. }
            | AdsError::InvalidConfigValueError { .. }
            | AdsError::ConfigValidationError { .. }
            | AdsError::ValidationError { .. } => ErrorCategory::Configuration,
            AdsError::ApiRequestError(_) | AdsError::ApiError { .. } => ErrorCategory::Transport,
            AdsError::CsvError(_) | AdsError::FormatError { .. } | AdsError::StateError { .. } => {
                ErrorCategory::Report
            }
            AdsError::IoError(_) | AdsError::SerializationError(_) => ErrorCategory::Io,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 5xx and connection failures are worth retrying by the caller
            AdsError::ApiRequestError(_) => ErrorSeverity::Medium,
            AdsError::ApiError { status, .. } if *status >= 500 => ErrorSeverity::Medium,
            AdsError::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            AdsError::ConfigError { .. } | AdsError::MissingConfigError { .. } => {
                "Add the missing field to the configuration file"
            }
            AdsError::InvalidConfigValueError { .. } | AdsError::ConfigValidationError { .. } => {
                "Check the configuration values against the documented format"
            }
            AdsError::ApiRequestError(_) => "Check network connectivity and the endpoint URL",
            AdsError::ApiError { status, .. } if *status == 401 || *status == 403 => {
                "Refresh the access token and verify the developer token"
            }
            AdsError::ApiError { .. } => "Inspect the API response body and retry later",
            AdsError::CsvError(_) | AdsError::FormatError { .. } => {
                "Verify the requested report fields and that the report was downloaded"
            }
            AdsError::StateError { .. } => "Create a new report fetcher for each report cycle",
            AdsError::ValidationError { .. } => "Review the input values",
            AdsError::IoError(_) | AdsError::SerializationError(_) => {
                "Check file permissions and available disk space"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Transport => format!("Could not reach the advertising API: {}", self),
            ErrorCategory::Report => format!("Report processing failed: {}", self),
            ErrorCategory::Io => format!("Local file operation failed: {}", self),
        }
    }
}
