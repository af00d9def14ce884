use std::path::PathBuf;
use thiserror::Error;

use crate::domain::model::ItemKind;

#[derive(Error, Debug)]
pub enum InventoryError {
    #[error("File in path \"{}\" was not found", .path.display())]
    NotFound { path: PathBuf },

    #[error("Invalid argument `{argument}`: {reason}")]
    InvalidArgument { argument: String, reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Background task failed: {0}")]
    TaskError(#[from] tokio::task::JoinError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for `{field}`: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value `{value}` for `{field}`: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field `{field}`")]
    MissingConfigError { field: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("No {kind} at position {index}")]
    ItemNotFound { kind: ItemKind, index: usize },

    #[error("Another load or save is still in progress")]
    Busy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Storage,
    Argument,
    Configuration,
    Validation,
    Concurrency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl InventoryError {
    pub fn invalid_argument(argument: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            argument: argument.into(),
            reason: reason.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound { .. }
            | Self::IoError(_)
            | Self::CsvError(_)
            | Self::SerializationError(_) => ErrorCategory::Storage,
            Self::InvalidArgument { .. } => ErrorCategory::Argument,
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::ValidationError { .. } | Self::ItemNotFound { .. } => ErrorCategory::Validation,
            Self::TaskError(_) | Self::Busy => ErrorCategory::Concurrency,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ItemNotFound { .. } => ErrorSeverity::Low,
            Self::Busy | Self::ValidationError { .. } => ErrorSeverity::Medium,
            Self::TaskError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    /// Single generic notification for the person at the keyboard.
    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Storage => match self {
                Self::NotFound { .. } => "Failed to load the inventory.".to_string(),
                _ => "Failed to read or write the inventory.".to_string(),
            },
            ErrorCategory::Argument => "Failed to save the inventory.".to_string(),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Validation => self.to_string(),
            ErrorCategory::Concurrency => {
                "The inventory is busy, try again once the current operation finishes.".to_string()
            }
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::NotFound { path } => format!(
                "Create the inventory file at \"{}\" or point --file at an existing one",
                path.display()
            ),
            Self::InvalidArgument { argument, .. } => {
                format!("Provide a valid value for `{}`", argument)
            }
            Self::IoError(_) => {
                "Check disk space and permissions on the inventory and scratch directories"
                    .to_string()
            }
            Self::CsvError(_) | Self::SerializationError(_) => {
                "Check that the export destination is writable".to_string()
            }
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => {
                "Fix the configuration file and run the command again".to_string()
            }
            Self::ValidationError { .. } => "Fill in every required field".to_string(),
            Self::ItemNotFound { .. } => "Search again with a different title or platform".to_string(),
            Self::Busy => "Wait for the running load or save to finish".to_string(),
            Self::TaskError(_) => "Re-run the command; report it if the failure repeats".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, InventoryError>;
