//! Error handling for recipegen.
//! Defines the crate-wide error type and result alias.

use thiserror::Error;

/// Errors that can occur while loading configuration, reading templates
/// or writing generated files.
#[derive(Error, Debug)]
pub enum Error {
    /// Represents errors that occur during file system operations
    #[error("IO error: {0}.")]
    IoError(#[from] std::io::Error),

    #[error("Configuration file '{path}' does not exist.")]
    ConfigNotFound { path: String },

    #[error("Failed to parse configuration: {0}.")]
    ConfigParseError(String),

    #[error("Failed to serialize configuration. Original error: {0}")]
    ConfigSerializeError(#[from] serde_json::Error),

    #[error("Template '{path}' does not exist.")]
    TemplateNotFound { path: String },

    /// The template file exists but is not valid UTF-8.
    #[error("Template '{path}' is not valid UTF-8 text.")]
    TemplateEncodingError { path: String },

    #[error("Failed to parse template scan pattern. Original error: {0}")]
    GlobSetParseError(#[from] globset::Error),

    #[error("Failed to scan template directory. Original error: {0}")]
    WalkDirError(#[from] walkdir::Error),

    /// Represents validation failures in the configuration
    #[error("Validation error: {0}.")]
    ValidationError(String),

    #[error("Cannot write '{path}'. Original error: {e}")]
    WriteError { path: String, e: String },

    /// Generation finished but some output files could not be written.
    #[error("{failed} of {total} files could not be written.")]
    PartialFailure { failed: usize, total: usize },

    #[error("A generation run is already in progress.")]
    AlreadyRunning,

    #[error("Generation worker terminated unexpectedly.")]
    WorkerPanicked,
}

/// Convenience type alias for Results with [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The error to handle
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{}", err);
    std::process::exit(1);
}
