//! Validation diagnostics
//!
//! One validation run produces an ordered sequence of messages. Messages are
//! immutable once created; the report owns them for the lifetime of the run.

use std::fmt;

/// Severity of a validation diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Recoverable issue; the document may still be usable
    Warning,
    /// Schema or well-formedness violation
    Error,
}

impl Severity {
    /// Get the severity as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Warning => "Warning",
            Severity::Error => "Error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One reported validation issue, with optional source position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationMessage {
    /// Diagnostic severity
    pub severity: Severity,
    /// 1-based line number, when known
    pub line: Option<u32>,
    /// 1-based column number, when known
    pub column: Option<u32>,
    /// Diagnostic text
    pub text: String,
}

impl ValidationMessage {
    /// Create an error diagnostic with no position
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            line: None,
            column: None,
            text: text.into(),
        }
    }

    /// Create a warning diagnostic with no position
    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            line: None,
            column: None,
            text: text.into(),
        }
    }

    /// Attach a source position
    pub fn at(mut self, line: u32, column: u32) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }

    /// Check if this diagnostic is an error
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ValidationMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.severity)?;
        if let (Some(line), Some(column)) = (self.line, self.column) {
            write!(f, " (line {}, pos {})", line, column)?;
        }
        write!(f, ": {}", self.text)
    }
}

/// Literal text rendered when a validation run produced no diagnostics
pub const NO_ERROR: &str = "No Error";

/// Outcome of one validation run
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// Diagnostics in the order they were produced
    pub messages: Vec<ValidationMessage>,
}

impl ValidationReport {
    /// Create an empty report
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }

    /// Create a report holding a single diagnostic
    pub fn single(message: ValidationMessage) -> Self {
        Self {
            messages: vec![message],
        }
    }

    /// Append a diagnostic
    pub fn push(&mut self, message: ValidationMessage) {
        self.messages.push(message);
    }

    /// True iff the run produced no diagnostics at all
    pub fn is_valid(&self) -> bool {
        self.messages.is_empty()
    }

    /// Number of diagnostics
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Check if the report is empty
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Number of error-severity diagnostics
    pub fn error_count(&self) -> usize {
        self.messages.iter().filter(|m| m.is_error()).count()
    }

    /// Render the report: the success text when empty, otherwise one line
    /// per diagnostic in production order
    pub fn render(&self) -> String {
        if self.is_valid() {
            NO_ERROR.to_string()
        } else {
            self.messages
                .iter()
                .map(ValidationMessage::to_string)
                .collect::<Vec<_>>()
                .join("\n")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_display_with_position() {
        let msg = ValidationMessage::error("The element 'Hotel' has invalid child element 'Pool'.")
            .at(12, 6);
        assert_eq!(
            msg.to_string(),
            "Error (line 12, pos 6): The element 'Hotel' has invalid child element 'Pool'."
        );
    }

    #[test]
    fn test_message_display_without_position() {
        let msg = ValidationMessage::warning("No schema type declared for element 'Extra'.");
        assert_eq!(
            msg.to_string(),
            "Warning: No schema type declared for element 'Extra'."
        );
    }

    #[test]
    fn test_empty_report_is_valid() {
        let report = ValidationReport::new();
        assert!(report.is_valid());
        assert_eq!(report.render(), "No Error");
    }

    #[test]
    fn test_report_render_one_line_per_message() {
        let mut report = ValidationReport::new();
        report.push(ValidationMessage::error("first").at(1, 2));
        report.push(ValidationMessage::warning("second"));

        assert!(!report.is_valid());
        assert_eq!(report.len(), 2);
        assert_eq!(report.error_count(), 1);
        assert_eq!(
            report.render(),
            "Error (line 1, pos 2): first\nWarning: second"
        );
    }

    #[test]
    fn test_warning_alone_means_not_valid() {
        // Success is an empty sequence; warnings still surface in output
        let report = ValidationReport::single(ValidationMessage::warning("w"));
        assert!(!report.is_valid());
    }
}
