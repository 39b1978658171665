//! Engine configuration.

use serde::{Deserialize, Serialize};

use unfurl_core::identifier::NodeId;

/// Naming and command conventions used by the rewriting engine.
///
/// Every field has a default; configuration files only override what
/// they name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Suffix appended to an expanded node's id to name its subgraph.
    pub expansion_suffix: String,
    /// Suffix appended to an expanded node's id to name its collapse
    /// control node.
    pub collapse_suffix: String,
    /// Visible label of the collapse control node.
    pub collapse_label: String,
    /// Command verb bound to collapse controls, as `verb:id`.
    pub collapse_command: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            expansion_suffix: "_sub".to_string(),
            collapse_suffix: "_collapse".to_string(),
            collapse_label: "⊖ Collapse".to_string(),
            collapse_command: "collapse".to_string(),
        }
    }
}

impl EngineConfig {
    /// The click command bound to the collapse control of `id`.
    pub fn collapse_command_for(&self, id: &NodeId) -> String {
        format!("{}:{}", self.collapse_command, id)
    }

    /// Extracts the target id from a collapse command, if `command` is
    /// one.
    pub fn parse_collapse_command<'a>(&self, command: &'a str) -> Option<&'a str> {
        let rest = command.strip_prefix(&self.collapse_command)?;
        rest.strip_prefix(':')
    }
}
