//! Identifier handling for diagram nodes.
//!
//! This module provides the [`NodeId`] type: a validated identifier as it
//! appears in diagram text. Identifiers are the unit of edge redirection,
//! so validation happens at construction time and derived forms (the
//! `_sub` subgraph id, the `_collapse` control id) go through
//! [`NodeId::with_suffix`] rather than ad-hoc string concatenation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a string is not a valid diagram identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid identifier `{0}`")]
pub struct InvalidIdentifier(pub String);

/// A diagram node identifier.
///
/// Valid identifiers start with an ASCII letter or underscore and continue
/// with letters, digits, or underscores. Identifiers are case-sensitive
/// and unique within the scope they are declared in.
///
/// # Examples
///
/// ```
/// use unfurl_core::identifier::NodeId;
///
/// let id = NodeId::new("flask_app").unwrap();
/// assert_eq!(id.as_str(), "flask_app");
///
/// let sub = id.with_suffix("_sub");
/// assert_eq!(sub.as_str(), "flask_app_sub");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NodeId(String);

impl NodeId {
    /// Creates a `NodeId`, validating the identifier grammar.
    pub fn new(name: impl Into<String>) -> Result<Self, InvalidIdentifier> {
        let name = name.into();
        if is_valid_identifier(&name) {
            Ok(Self(name))
        } else {
            Err(InvalidIdentifier(name))
        }
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Derives a new identifier by appending `suffix`.
    ///
    /// The suffix must itself consist of identifier characters, which is
    /// true for the fixed suffixes the engine uses.
    pub fn with_suffix(&self, suffix: &str) -> Self {
        debug_assert!(suffix.chars().all(is_identifier_char));
        Self(format!("{}{}", self.0, suffix))
    }
}

/// Returns `true` if `c` may appear in an identifier.
pub fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Returns `true` if `s` is a valid identifier.
pub fn is_valid_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(is_identifier_char)
        }
        _ => false,
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for NodeId {
    type Err = InvalidIdentifier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for NodeId {
    type Error = InvalidIdentifier;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<NodeId> for String {
    fn from(id: NodeId) -> Self {
        id.0
    }
}

impl PartialEq<str> for NodeId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for NodeId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
