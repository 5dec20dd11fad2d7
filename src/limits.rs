//! Resource limits
//!
//! Documents arrive from untrusted locations, so the loader bounds how much
//! text it will accept before handing it to the parsers.

use crate::error::{Error, Result};

/// Default maximum document size: 100 MB
pub const DEFAULT_MAX_DOCUMENT_SIZE: usize = 100 * 1024 * 1024;

/// Strict maximum document size: 10 MB
pub const STRICT_MAX_DOCUMENT_SIZE: usize = 10 * 1024 * 1024;

/// Size limits applied when loading documents and schemas
#[derive(Debug, Clone, Copy)]
pub struct Limits {
    /// Maximum size in bytes of a loaded document
    pub max_document_size: usize,
}

impl Limits {
    /// Create limits with the default document size
    pub fn new() -> Self {
        Self {
            max_document_size: DEFAULT_MAX_DOCUMENT_SIZE,
        }
    }

    /// Create strict limits for untrusted input
    pub fn strict() -> Self {
        Self {
            max_document_size: STRICT_MAX_DOCUMENT_SIZE,
        }
    }

    /// Set the maximum document size
    pub fn with_max_document_size(mut self, size: usize) -> Self {
        self.max_document_size = size;
        self
    }

    /// Check a document size against the limit
    pub fn check_document_size(&self, size: usize) -> Result<()> {
        if size > self.max_document_size {
            return Err(Error::LimitExceeded(format!(
                "document size {} exceeds maximum {}",
                size, self.max_document_size
            )));
        }
        Ok(())
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self::new()
    }
}
