//! Typed error handling for powerdash
//!
//! The synchronizer and aggregation operations never fail: missing query
//! parameters, unmapped filters and unresolvable field paths all have a
//! defined non-error outcome. Errors only exist at the edges where external
//! input is decoded.
//!
//! # Error Categories
//!
//! - [`ConfigError`]: Errors related to dashboard configuration
//! - [`LibraryError`]: Errors related to decoding the upstream library document
//! - [`PreferenceError`]: Errors related to persisted view preferences
//!
//! # Example
//!
//! ```rust,ignore
//! use powerdash::prelude::*;
//!
//! match DashboardConfig::from_yaml_file("dashboard.yaml") {
//!     Ok(config) => println!("{} filters", config.filter_params.len()),
//!     Err(DashError::Config(ConfigError::FileNotFound { path })) => {
//!         eprintln!("no config at {}", path);
//!     }
//!     Err(e) => eprintln!("{} ({})", e, e.error_code()),
//! }
//! ```

use thiserror::Error;

/// The main error type for powerdash
#[derive(Debug, Error)]
pub enum DashError {
    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Library document errors
    #[error(transparent)]
    Library(#[from] LibraryError),

    /// Preference store errors
    #[error(transparent)]
    Preference(#[from] PreferenceError),
}

impl DashError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            DashError::Config(e) => e.error_code(),
            DashError::Library(e) => e.error_code(),
            DashError::Preference(e) => e.error_code(),
        }
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse configuration file
    #[error("Failed to parse config{}: {message}", file_suffix(.file))]
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// Invalid value in configuration
    #[error("Invalid value '{value}' for field '{field}': {message}")]
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    /// IO error while reading configuration
    #[error("IO error: {message}")]
    IoError { message: String },
}

fn file_suffix(file: &Option<String>) -> String {
    file.as_ref()
        .map(|f| format!(" file '{}'", f))
        .unwrap_or_default()
}

impl ConfigError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ConfigError::ParseError { .. } => "CONFIG_PARSE_ERROR",
            ConfigError::InvalidValue { .. } => "CONFIG_INVALID_VALUE",
            ConfigError::FileNotFound { .. } => "CONFIG_FILE_NOT_FOUND",
            ConfigError::IoError { .. } => "CONFIG_IO_ERROR",
        }
    }
}

// =============================================================================
// Library Errors
// =============================================================================

/// Errors related to the upstream library document
#[derive(Debug, Error)]
pub enum LibraryError {
    /// The document is not valid JSON or does not have the expected shape
    #[error("Invalid library JSON: {message}")]
    InvalidJson { message: String },

    /// A profile could not be converted into a record
    #[error("Failed to convert profile '{model_id}' into a record: {message}")]
    RecordConversion { model_id: String, message: String },
}

impl LibraryError {
    pub fn error_code(&self) -> &'static str {
        match self {
            LibraryError::InvalidJson { .. } => "LIBRARY_INVALID_JSON",
            LibraryError::RecordConversion { .. } => "LIBRARY_RECORD_CONVERSION",
        }
    }
}

// =============================================================================
// Preference Errors
// =============================================================================

/// Errors related to persisted view preferences
#[derive(Debug, Error)]
pub enum PreferenceError {
    /// Stored preference value is not valid JSON
    #[error("Malformed preference '{key}': {message}")]
    Malformed { key: String, message: String },

    /// Preference could not be serialized
    #[error("Failed to serialize preference '{key}': {message}")]
    Serialization { key: String, message: String },
}

impl PreferenceError {
    pub fn error_code(&self) -> &'static str {
        match self {
            PreferenceError::Malformed { .. } => "PREFERENCE_MALFORMED",
            PreferenceError::Serialization { .. } => "PREFERENCE_SERIALIZATION",
        }
    }
}

// =============================================================================
// Conversions from external errors
// =============================================================================

impl From<serde_json::Error> for DashError {
    fn from(err: serde_json::Error) -> Self {
        DashError::Library(LibraryError::InvalidJson {
            message: err.to_string(),
        })
    }
}

impl From<serde_yaml::Error> for DashError {
    fn from(err: serde_yaml::Error) -> Self {
        DashError::Config(ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        })
    }
}

impl From<std::io::Error> for DashError {
    fn from(err: std::io::Error) -> Self {
        DashError::Config(ConfigError::IoError {
            message: err.to_string(),
        })
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for powerdash operations
pub type DashResult<T> = Result<T, DashError>;
