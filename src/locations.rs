//! Document location resolution
//!
//! A locator string is either an absolute HTTP/HTTPS URL or a filesystem
//! path. Inline documents exist as a variant for direct construction but
//! are never produced by locator classification, so a mistyped file name
//! surfaces as a retrieval error instead of being read as document text.

use std::path::PathBuf;
use url::Url;

/// Document location - a URL, file path, or inline text
#[derive(Debug, Clone)]
pub enum Location {
    /// File system path
    Path(PathBuf),
    /// Absolute HTTP or HTTPS URL
    Url(Url),
    /// In-memory document text, constructed directly by callers
    Inline(String),
}

impl Location {
    /// Create a location from a locator string (auto-detect type)
    ///
    /// Only `http` and `https` URLs classify as remote; a `file` URL is
    /// converted to its path, and every other locator names a file. A
    /// locator is never classified as inline text, so a missing file is
    /// reported by the loader rather than validated as a document.
    pub fn from_str(s: &str) -> Self {
        if let Ok(url) = Url::parse(s) {
            if url.scheme() == "http" || url.scheme() == "https" {
                return Location::Url(url);
            }
            if url.scheme() == "file" {
                if let Ok(path) = url.to_file_path() {
                    return Location::Path(path);
                }
            }
        }

        Location::Path(PathBuf::from(s))
    }

    /// Get the location as a display string
    pub fn as_str(&self) -> String {
        match self {
            Location::Path(p) => p.to_string_lossy().to_string(),
            Location::Url(u) => u.to_string(),
            Location::Inline(s) => s.clone(),
        }
    }

    /// Check if this is a remote location (URL)
    pub fn is_remote(&self) -> bool {
        matches!(self, Location::Url(_))
    }

    /// Check if this is a local file
    pub fn is_file(&self) -> bool {
        matches!(self, Location::Path(_))
    }
}
