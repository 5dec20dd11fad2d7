//! Error types for hoteldir
//!
//! Validation diagnostics are *not* errors: they are collected into a
//! [`ValidationReport`](crate::schema::ValidationReport) so that a single
//! validation run can report every issue in the document. The `Error` enum
//! here covers the failures that abort an operation outright.

use thiserror::Error;

/// Result type alias using hoteldir Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for hoteldir operations
#[derive(Error, Debug)]
pub enum Error {
    /// Resource retrieval error (file or URL fetch failed)
    #[error("resource error: {0}")]
    Resource(String),

    /// XML parsing error on the conversion path
    #[error("XML error: {0}")]
    Xml(String),

    /// XSD schema compilation error
    #[error("schema error: {0}")]
    Schema(String),

    /// Resource size limit exceeded
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
