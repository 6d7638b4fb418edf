//! Error types for iconrelief

use thiserror::Error;

/// Main error type for iconrelief operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SVG error: {0}")]
    Svg(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Geometry error: {0}")]
    Geometry(String),

    #[error("GPU error: {0}")]
    Gpu(String),

    #[error("Visualization error: {0}")]
    Visualization(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Result type alias for iconrelief operations
pub type Result<T> = std::result::Result<T, Error>;
