use thiserror::Error;

#[derive(Error, Debug)]
pub enum HubError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Device replied with status {status}: {body}")]
    DeviceError { status: u16, body: String },

    #[error("Not enough free storage for file!")]
    InsufficientStorage,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

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

    #[error("Invalid input for '{field}': {reason}")]
    FormError { field: String, reason: String },

    #[error("Unexpected response from {path}: {message}")]
    ResponseError { path: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Device,
    Configuration,
    Input,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// Process exit status for a command that failed with this severity.
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl HubError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            HubError::ApiError(_) | HubError::UrlError(_) => ErrorCategory::Network,
            HubError::DeviceError { .. }
            | HubError::InsufficientStorage
            | HubError::ResponseError { .. } => ErrorCategory::Device,
            HubError::ConfigError { .. }
            | HubError::ConfigValidationError { .. }
            | HubError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            HubError::FormError { .. } | HubError::SerializationError(_) => ErrorCategory::Input,
            HubError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Device | ErrorCategory::Input => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// Short message for the terminal. Device replies are shown verbatim.
    pub fn user_friendly_message(&self) -> String {
        match self {
            HubError::DeviceError { body, .. } if !body.is_empty() => body.clone(),
            HubError::DeviceError { status, .. } => format!("Device returned HTTP {}", status),
            HubError::ApiError(e) if e.is_connect() => "Could not reach the device".to_string(),
            HubError::ApiError(e) if e.is_timeout() => "The device did not answer in time".to_string(),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            HubError::ApiError(_) => "Check that the device is powered and reachable at --device-url",
            HubError::UrlError(_) => "Use a full URL such as http://192.168.4.1",
            HubError::DeviceError { .. } => "Inspect the device message above and adjust the request",
            HubError::InsufficientStorage => "Delete unused files on the device and retry the upload",
            HubError::ResponseError { .. } => "The device firmware may be incompatible with this console",
            HubError::FormError { .. } => "Run the matching 'show' command to see field names and types",
            HubError::SerializationError(_) => "The payload could not be encoded or decoded as JSON",
            HubError::ConfigError { .. }
            | HubError::ConfigValidationError { .. }
            | HubError::InvalidConfigValueError { .. } => "Fix the console configuration file or flags",
            HubError::IoError(_) => "Check local file paths and permissions",
        }
    }
}

pub type Result<T> = std::result::Result<T, HubError>;
