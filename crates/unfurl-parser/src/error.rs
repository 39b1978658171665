//! Error and diagnostic system for the unfurl parser.
//!
//! This module provides an error handling system with:
//! - Error codes for documentation and searchability
//! - Optional labeled source spans
//! - Severity levels
//! - Diagnostic collector for accumulating multiple errors
//!
//! # Overview
//!
//! The error system is built around the [`Diagnostic`] type, which
//! represents a single error or warning with an optional error code,
//! source location, and help text. Multiple diagnostics are wrapped in
//! [`ParseError`] for returning from the parsing lifecycle.
//!
//! # Example
//!
//! ```
//! # use unfurl_parser::error::{Diagnostic, ErrorCode};
//! # use unfurl_parser::Span;
//!
//! let span = Span::new(10..24);
//!
//! let diag = Diagnostic::error("subgraph block is never closed")
//!     .with_code(ErrorCode::E101)
//!     .with_span(span, "opened here")
//!     .with_help("add a matching `end` line");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod parse_error;
mod severity;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use parse_error::ParseError;
pub use severity::Severity;
