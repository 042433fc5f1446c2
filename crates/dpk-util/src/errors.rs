use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all dpk operations.
#[derive(Debug, Error, Diagnostic)]
pub enum DpkError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A package index could not be read or parsed.
    #[error("Index error: {message}")]
    #[diagnostic(help("Check that the index file is an extracted plain-text APKINDEX"))]
    Index { message: String },

    /// Invalid or unreadable configuration.
    #[error("Configuration error: {message}")]
    #[diagnostic(help("Check ~/.dpk/config.toml for syntax errors"))]
    Config { message: String },

    /// Catch-all for miscellaneous errors.
    #[error("{message}")]
    Generic { message: String },
}

/// Convenience alias for `miette::Result<T>`.
pub type DpkResult<T> = miette::Result<T>;
