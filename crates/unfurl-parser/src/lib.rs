//! # Unfurl Parser
//!
//! Line-oriented parser for the flowchart subset of diagram text that
//! the unfurl rewriting engine operates on. Every input line is kept
//! verbatim and classified into a [`Statement`], so a document can be
//! re-emitted exactly as it was read.
//!
//! ## Usage
//!
//! ```
//! # use unfurl_parser::{Document, ParseError};
//! fn main() -> Result<(), ParseError> {
//!     let source = "graph TD\n    A[App] --> B[Config]\n";
//!     let doc = Document::parse(source)?;
//!     assert_eq!(doc.stats().nodes, 2);
//!     Ok(())
//! }
//! ```
//!
//! [`Statement`]: unfurl_core::semantic::Statement

mod document;
pub mod error;
mod span;
mod statement;

pub use document::{ClickBinding, DeclSite, Declaration, Document, Line, Stats};
pub use error::{Diagnostic, ErrorCode, ParseError, Severity};
pub use span::Span;
pub use statement::is_incompatible_type;
