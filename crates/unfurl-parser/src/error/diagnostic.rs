//! The core diagnostic type for the unfurl error system.
//!
//! A [`Diagnostic`] represents a single error or warning with an optional
//! error code, labeled source span, and help text.

use thiserror::Error;

use crate::{
    error::{Severity, error_code::ErrorCode},
    span::Span,
};

/// A diagnostic message with optional source location information.
///
/// Diagnostics carry:
/// - A severity level
/// - An optional error code for documentation and searchability
/// - A primary message describing the issue
/// - An optional labeled source span
/// - Optional help text with suggestions
///
/// # Example
///
/// ```text
/// error[E101]: subgraph block is never closed
///   --> overview.mmd:4:1
///    |
///  4 | subgraph api["API"]
///    | ^^^^^^^^^^^^^^^^^^^ opened here
///    |
///    = help: add a matching `end` line
/// ```
#[derive(Debug, Clone, Error)]
#[error("{severity}{}: {message}", code_tag(.code))]
pub struct Diagnostic {
    severity: Severity,
    code: Option<ErrorCode>,
    message: String,
    span: Option<Span>,
    span_label: Option<String>,
    help: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Create a warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Get the severity of this diagnostic.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Get the error code, if any.
    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    /// Get the primary message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source span, if any.
    pub fn span(&self) -> Option<Span> {
        self.span
    }

    /// Get the label attached to the span, if any.
    pub fn span_label(&self) -> Option<&str> {
        self.span_label.as_deref()
    }

    /// Get the help text, if any.
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Set the error code.
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Attach a labeled source span.
    pub fn with_span(mut self, span: Span, label: impl Into<String>) -> Self {
        self.span = Some(span);
        self.span_label = Some(label.into());
        self
    }

    /// Set the help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: None,
            message: message.into(),
            span: None,
            span_label: None,
            help: None,
        }
    }
}

/// `"[E001]"` when a code is set, empty otherwise.
fn code_tag(code: &Option<ErrorCode>) -> String {
    match code {
        Some(code) => format!("[{code}]"),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_error() {
        let diag = Diagnostic::error("test error");

        assert!(diag.severity().is_error());
        assert_eq!(diag.message(), "test error");
        assert!(diag.code().is_none());
        assert!(diag.span().is_none());
        assert!(diag.help().is_none());
    }

    #[test]
    fn test_diagnostic_builder_chain() {
        let diag = Diagnostic::error("subgraph block is never closed")
            .with_code(ErrorCode::E101)
            .with_span(Span::new(10..29), "opened here")
            .with_help("add a matching `end` line");

        assert_eq!(diag.code(), Some(ErrorCode::E101));
        assert_eq!(diag.span(), Some(Span::new(10..29)));
        assert_eq!(diag.span_label(), Some("opened here"));
        assert_eq!(diag.help(), Some("add a matching `end` line"));
    }

    #[test]
    fn test_diagnostic_display_with_code() {
        let diag = Diagnostic::error("unmatched `end`").with_code(ErrorCode::E100);
        assert_eq!(diag.to_string(), "error[E100]: unmatched `end`");
    }

    #[test]
    fn test_diagnostic_display_without_code() {
        let diag = Diagnostic::warning("missing graph header");
        assert_eq!(diag.to_string(), "warning: missing graph header");
    }
}
