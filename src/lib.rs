//! # hoteldir
//!
//! Validation and conversion for hotel-directory XML documents.
//!
//! Two independent pipelines share only the raw-text source:
//!
//! - **Validation**: compile an XSD and check XML text against it,
//!   aggregating *all* diagnostics with line/column context and severity
//!   instead of stopping at the first.
//! - **Conversion**: map a (presumed valid) hotel document into a generic
//!   JSON value tree and render it with a fixed, hand-written serializer.
//!
//! ## Example
//!
//! ```rust,ignore
//! use hoteldir::{validate, convert_to_json};
//!
//! let report = validate(&xml_text, &xsd_text);
//! println!("{}", report.render());
//!
//! let json = convert_to_json(&xml_text)?;
//! println!("{}", json);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Foundation
pub mod error;
pub mod limits;

// Resource loading
pub mod loaders;
pub mod locations;

// Documents and validation
pub mod documents;
pub mod schema;

// Conversion
pub mod json;
pub mod mapper;

// Re-exports for convenience
pub use error::{Error, Result};
pub use json::JsonValue;
pub use mapper::HotelMapper;
pub use schema::{SchemaValidator, Severity, ValidationMessage, ValidationReport};

/// Version of the hoteldir library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Fetch document text from a locator (URL or file path)
pub fn fetch(locator: &str) -> Result<String> {
    let location = locations::Location::from_str(locator);
    loaders::Loader::new().load(&location)
}

/// Validate XML text against XSD text, collecting all diagnostics
pub fn validate(xml_text: &str, xsd_text: &str) -> ValidationReport {
    SchemaValidator::new().validate(xml_text, xsd_text)
}

/// Map hotel XML text to the JSON value model
pub fn map_hotels(xml_text: &str) -> Result<JsonValue> {
    let doc = documents::Document::from_string(xml_text)?;
    Ok(HotelMapper::new().map(&doc))
}

/// Convert hotel XML text to JSON text
pub fn convert_to_json(xml_text: &str) -> Result<String> {
    Ok(json::serialize(&map_hotels(xml_text)?))
}
