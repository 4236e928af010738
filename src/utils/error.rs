use thiserror::Error;

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Missing required fields: {}", .fields.join(", "))]
    MissingFieldsError { fields: Vec<String> },

    #[error("Email delivery via {provider} failed: {message}")]
    DeliveryError { provider: String, message: String },

    #[error("Contact endpoint answered HTTP {status}")]
    HttpStatusError { status: u16 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Validation,
    Delivery,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl SiteError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SiteError::ApiError(_) | SiteError::HttpStatusError { .. } => ErrorCategory::Network,
            SiteError::ConfigError { .. }
            | SiteError::ConfigValidationError { .. }
            | SiteError::InvalidConfigValueError { .. }
            | SiteError::MissingConfigError { .. } => ErrorCategory::Configuration,
            SiteError::MissingFieldsError { .. } => ErrorCategory::Validation,
            SiteError::DeliveryError { .. } => ErrorCategory::Delivery,
            SiteError::IoError(_) | SiteError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Validation => ErrorSeverity::Low,
            ErrorCategory::Network | ErrorCategory::Delivery => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 給終端使用者看的訊息，不含內部細節
    pub fn user_friendly_message(&self) -> String {
        match self {
            SiteError::ApiError(_) => "Could not reach the contact service".to_string(),
            SiteError::HttpStatusError { .. } => {
                "There was an error sending your message. Please try again.".to_string()
            }
            SiteError::MissingFieldsError { fields } => {
                format!("Please fill in: {}", fields.join(", "))
            }
            SiteError::DeliveryError { .. } => "Failed to send message. Please try again.".to_string(),
            SiteError::ConfigError { .. }
            | SiteError::ConfigValidationError { .. }
            | SiteError::InvalidConfigValueError { .. }
            | SiteError::MissingConfigError { .. } => format!("Configuration problem: {}", self),
            SiteError::IoError(_) | SiteError::SerializationError(_) => {
                format!("Internal error: {}", self)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check the server URL and your network connection, then resubmit",
            ErrorCategory::Configuration => "Review the config file, CLI flags and environment variables",
            ErrorCategory::Validation => "Fill in first name, last name, email and message",
            ErrorCategory::Delivery => "Check the mail provider credentials and try again later",
            ErrorCategory::System => "Check file permissions and disk space",
        }
    }
}

impl ErrorSeverity {
    /// Process exit code for a binary that stops on this error.
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::High => 1,     // 設定錯誤
            ErrorSeverity::Medium => 2,   // 可重試
            ErrorSeverity::Critical => 3, // 系統錯誤
            ErrorSeverity::Low => 4,      // 輸入不完整
        }
    }
}

pub type Result<T> = std::result::Result<T, SiteError>;
