//! Error codes for the unfurl diagnostic system.
//!
//! Error codes are organized by phase:
//! - `E0xx` - Statement errors (a single line failed to parse)
//! - `E1xx` - Structure errors (block nesting, diagram type)
//! - `E2xx` - Consistency warnings

use std::fmt;

/// Error codes for categorizing diagnostic errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Statement Errors (E0xx)
    // =========================================================================
    /// Unbalanced brackets.
    ///
    /// A line opens a node label with `[` that is never closed, or closes
    /// one that was never opened. Labels cannot span lines.
    E001,

    /// Invalid identifier.
    ///
    /// An identifier was expected but the token does not match
    /// `[A-Za-z_][A-Za-z0-9_]*`.
    E002,

    /// Malformed statement.
    ///
    /// A line starts with a statement keyword (`graph`, `flowchart`,
    /// `subgraph`, `click`) but the rest of the line does not parse.
    E003,

    // =========================================================================
    // Structure Errors (E1xx)
    // =========================================================================
    /// Unmatched `end`.
    ///
    /// An `end` line was found with no open `subgraph` block.
    E100,

    /// Unterminated subgraph.
    ///
    /// A `subgraph` block was opened but never closed with `end`.
    E101,

    /// Incompatible diagram type.
    ///
    /// The diagram uses a type the viewer cannot rewrite, such as
    /// `classDiagram` or `sequenceDiagram`. Only `graph` and `flowchart`
    /// diagrams are supported.
    E102,

    /// Missing graph header.
    ///
    /// The first statement is not a `graph`/`flowchart` header. Module
    /// fragments are allowed to omit the header, so this is a warning.
    E103,

    // =========================================================================
    // Consistency Warnings (E2xx)
    // =========================================================================
    /// Duplicate node declaration.
    ///
    /// A node id is declared with a label more than once in the same
    /// scope. The rendering library tolerates this but the later label
    /// silently wins.
    E200,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E003 => "E003",
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E103 => "E103",
            ErrorCode::E200 => "E200",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "unbalanced brackets",
            ErrorCode::E002 => "invalid identifier",
            ErrorCode::E003 => "malformed statement",
            ErrorCode::E100 => "unmatched `end`",
            ErrorCode::E101 => "unterminated subgraph",
            ErrorCode::E102 => "incompatible diagram type",
            ErrorCode::E103 => "missing graph header",
            ErrorCode::E200 => "duplicate node declaration",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::E001.to_string(), "E001");
        assert_eq!(ErrorCode::E100.to_string(), "E100");
        assert_eq!(ErrorCode::E200.to_string(), "E200");
    }

    #[test]
    fn test_error_code_description() {
        assert_eq!(ErrorCode::E001.description(), "unbalanced brackets");
        assert_eq!(ErrorCode::E102.description(), "incompatible diagram type");
    }
}
