//! Collector for accumulating diagnostics during a parse.
//!
//! The [`DiagnosticCollector`] lets the document pass report every
//! problem it finds instead of failing on the first one.

use crate::error::{Diagnostic, ParseError};

/// A collector for accumulating diagnostics during a parse.
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
    has_errors: bool,
}

impl DiagnosticCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit a diagnostic to this collector.
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        if diagnostic.severity().is_error() {
            self.has_errors = true;
        }
        self.diagnostics.push(diagnostic);
    }

    /// Finish collection and return a result.
    ///
    /// - If there are errors, returns `Err(ParseError)` with all diagnostics.
    /// - If there are no errors, returns `Ok(())`.
    ///
    /// Warnings are discarded in the success case.
    pub fn finish(self) -> Result<(), ParseError> {
        if self.has_errors {
            Err(ParseError::new(self.diagnostics))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collector_new_finish_ok() {
        let collector = DiagnosticCollector::new();
        assert!(collector.finish().is_ok());
    }

    #[test]
    fn test_collector_emit_error_finish_err() {
        let mut collector = DiagnosticCollector::new();
        collector.emit(Diagnostic::error("test error"));
        assert!(collector.finish().is_err());
    }

    #[test]
    fn test_collector_emit_warning_finish_ok() {
        let mut collector = DiagnosticCollector::new();
        collector.emit(Diagnostic::warning("test warning"));
        assert!(collector.finish().is_ok());
    }

    #[test]
    fn test_collector_keeps_warnings_alongside_errors() {
        let mut collector = DiagnosticCollector::new();

        collector.emit(Diagnostic::error("error 1"));
        collector.emit(Diagnostic::warning("warning 1"));
        collector.emit(Diagnostic::error("error 2"));

        let err = collector.finish().unwrap_err();
        assert_eq!(err.diagnostics().len(), 3);
    }
}
