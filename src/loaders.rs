//! Document retrieval
//!
//! This module implements the fetcher boundary: raw document text comes from
//! a local file, an HTTPS URL, or an inline string. Retrieval failures are
//! fatal for the call that needed the document.

use crate::error::{Error, Result};
use crate::limits::Limits;
use crate::locations::Location;
use std::fs;
use std::time::Duration;

/// Default timeout for remote retrieval
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Document loader for schemas and XML documents
#[derive(Debug)]
pub struct Loader {
    /// Resource limits
    limits: Limits,
    /// Whether to allow remote resources
    allow_remote: bool,
}

impl Loader {
    /// Create a new loader with default settings
    pub fn new() -> Self {
        Self {
            limits: Limits::default(),
            allow_remote: true,
        }
    }

    /// Set the limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Set whether to allow remote resources
    pub fn with_allow_remote(mut self, allow: bool) -> Self {
        self.allow_remote = allow;
        self
    }

    /// Load a document as UTF-8 text
    pub fn load(&self, location: &Location) -> Result<String> {
        match location {
            Location::Path(path) => {
                let content = fs::read_to_string(path).map_err(|e| {
                    Error::Resource(format!("Failed to read file '{}': {}", path.display(), e))
                })?;

                self.limits.check_document_size(content.len())?;

                Ok(content)
            }
            Location::Url(url) => {
                if !self.allow_remote {
                    return Err(Error::Resource(
                        "Remote resources are not allowed".to_string(),
                    ));
                }

                let content = self.fetch_url(url.as_str()).map_err(|e| {
                    Error::Resource(format!("Failed to fetch '{}': {}", url, e))
                })?;

                self.limits.check_document_size(content.len())?;

                Ok(content)
            }
            Location::Inline(s) => Ok(s.clone()),
        }
    }

    /// Fetch a URL over a TLS 1.2+ connection, decoding the body as UTF-8
    fn fetch_url(&self, url: &str) -> Result<String> {
        let client = reqwest::blocking::Client::builder()
            .min_tls_version(reqwest::tls::Version::TLS_1_2)
            .timeout(FETCH_TIMEOUT)
            .build()?;

        let response = client.get(url).send()?.error_for_status()?;
        let bytes = response.bytes()?;

        String::from_utf8(bytes.to_vec())
            .map_err(|e| Error::Resource(format!("Response is not valid UTF-8: {}", e)))
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "<Hotels><Hotel/></Hotels>").unwrap();

        let location = Location::Path(file.path().to_path_buf());
        let loader = Loader::new();
        let content = loader.load(&location).unwrap();

        assert!(content.contains("<Hotels>"));
    }

    #[test]
    fn test_load_from_inline() {
        let location = Location::Inline("<Hotels/>".to_string());
        let loader = Loader::new();
        let content = loader.load(&location).unwrap();

        assert_eq!(content, "<Hotels/>");
    }

    #[test]
    fn test_load_missing_file() {
        let location = Location::Path("/nonexistent/Hotels.xml".into());
        let loader = Loader::new();
        let result = loader.load(&location);

        assert!(matches!(result, Err(Error::Resource(_))));
    }

    #[test]
    fn test_remote_disallowed() {
        let location = Location::from_str("https://example.com/Hotels.xml");
        let loader = Loader::new().with_allow_remote(false);
        let result = loader.load(&location);

        assert!(matches!(result, Err(Error::Resource(_))));
    }

    #[test]
    fn test_size_limit() {
        let mut file = NamedTempFile::new().unwrap();
        let large_content = "x".repeat(32);
        write!(file, "{}", large_content).unwrap();

        let location = Location::Path(file.path().to_path_buf());
        let loader = Loader::new().with_limits(Limits::new().with_max_document_size(16));
        let result = loader.load(&location);

        assert!(matches!(result, Err(Error::LimitExceeded(_))));
    }
}
