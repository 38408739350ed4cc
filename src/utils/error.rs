use thiserror::Error;

#[derive(Error, Debug)]
pub enum ListingError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV output error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Invalid catalog document: {message}")]
    InvalidCatalog { message: String },

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

    #[error("Unknown category '{value}'")]
    InvalidCategory { value: String },

    #[error("Unknown sort option '{value}'")]
    InvalidSortOption { value: String },

    #[error("Page '{page}' is not available for role '{role}'")]
    ForbiddenNavigation { page: String, role: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Data,
    Configuration,
    Input,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ListingError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ListingError::IoError(_) => ErrorCategory::Io,
            ListingError::SerializationError(_)
            | ListingError::CsvError(_)
            | ListingError::InvalidCatalog { .. } => ErrorCategory::Data,
            ListingError::ConfigValidationError { .. }
            | ListingError::InvalidConfigValueError { .. }
            | ListingError::MissingConfigError { .. } => ErrorCategory::Configuration,
            ListingError::InvalidCategory { .. }
            | ListingError::InvalidSortOption { .. }
            | ListingError::ForbiddenNavigation { .. } => ErrorCategory::Input,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 輸入錯誤只影響單次操作，狀態不變
            ErrorCategory::Input => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            ListingError::IoError(_) => {
                "Check that the catalog/config file exists and is readable".to_string()
            }
            ListingError::SerializationError(_) => {
                "Make sure the catalog file is a JSON array of services".to_string()
            }
            ListingError::InvalidCatalog { .. } => {
                "Use a JSON array of services or an object with a 'services' array".to_string()
            }
            ListingError::CsvError(_) => "Try a different output format (table, json)".to_string(),
            ListingError::ConfigValidationError { field, .. }
            | ListingError::InvalidConfigValueError { field, .. } => {
                format!("Fix the '{}' entry in the configuration", field)
            }
            ListingError::MissingConfigError { field } => {
                format!("Provide a value for '{}'", field)
            }
            ListingError::InvalidCategory { .. } => {
                "Use --list-categories to see valid categories, or 'all'".to_string()
            }
            ListingError::InvalidSortOption { .. } => {
                "Use one of: newest, rating, price_asc".to_string()
            }
            ListingError::ForbiddenNavigation { .. } => {
                "Sign in with an admin account to open this page".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ListingError::IoError(_) => "Could not read a required file".to_string(),
            ListingError::SerializationError(_) => "The catalog data is not valid JSON".to_string(),
            ListingError::InvalidCategory { value } => {
                format!("'{}' is not a known category", value)
            }
            ListingError::InvalidSortOption { value } => {
                format!("'{}' is not a known sort option", value)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ListingError>;
