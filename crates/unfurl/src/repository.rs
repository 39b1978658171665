//! Read-only per-module diagram data.
//!
//! A [`ModuleRepository`] maps node ids to the data needed to expand
//! them: a display label, a diagram fragment, and click bindings for the
//! fragment's own expandable nodes. The engine never mutates it.

use indexmap::{IndexMap, IndexSet};
use log::warn;
use serde::{Deserialize, Serialize};

use unfurl_core::{identifier::NodeId, semantic::click_line};
use unfurl_parser::Document;

use crate::error::UnfurlError;

/// The per-node data bundle used to build one expansion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleEntry {
    /// Display label for the node and its expanded subgraph.
    pub label: String,
    /// Diagram fragment spliced in when the node is expanded.
    pub diagram: String,
    /// Click commands for expandable nodes inside the fragment.
    #[serde(default)]
    pub links: IndexMap<NodeId, String>,
}

/// Read-only mapping from node id to [`ModuleEntry`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleRepository {
    modules: IndexMap<NodeId, ModuleEntry>,
}

impl ModuleRepository {
    /// An empty repository. Nothing is expandable.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a repository from a JSON object keyed by node id.
    ///
    /// # Errors
    ///
    /// Returns [`UnfurlError::Repository`] if the text is not valid
    /// JSON for this shape.
    pub fn from_json(text: &str) -> Result<Self, UnfurlError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Inserts an entry, replacing any existing one for the same id.
    pub fn insert(&mut self, id: NodeId, entry: ModuleEntry) {
        self.modules.insert(id, entry);
    }

    /// Looks up the entry for `id`. Absence means the node simply
    /// cannot be expanded.
    pub fn get(&self, id: &NodeId) -> Option<&ModuleEntry> {
        self.modules.get(id)
    }

    /// Whether `id` has module data.
    pub fn contains(&self, id: &NodeId) -> bool {
        self.modules.contains_key(id)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Whether the repository is empty.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Ids with module data, in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &NodeId> {
        self.modules.keys()
    }

    /// Node ids declared inside the fragment of `id`.
    ///
    /// An unparseable fragment contributes nothing; the failure will
    /// surface with a proper diagnostic when the fragment is spliced.
    pub fn fragment_children(&self, id: &NodeId) -> IndexSet<NodeId> {
        let Some(entry) = self.modules.get(id) else {
            return IndexSet::new();
        };
        match Document::parse(&entry.diagram) {
            Ok(doc) => doc.node_ids(),
            Err(err) => {
                warn!(module = id.as_str(), error = err.to_string(); "Module fragment does not parse");
                IndexSet::new()
            }
        }
    }

    /// Whether `descendant` is declared inside the fragment of
    /// `ancestor`, directly or through intermediate modules.
    pub fn is_descendant(&self, ancestor: &NodeId, descendant: &NodeId) -> bool {
        let mut frontier = vec![ancestor.clone()];
        let mut visited: IndexSet<NodeId> = IndexSet::new();
        while let Some(current) = frontier.pop() {
            if !visited.insert(current.clone()) {
                continue;
            }
            let children = self.fragment_children(&current);
            if children.contains(descendant) {
                return true;
            }
            for child in children {
                if self.contains(&child) {
                    frontier.push(child);
                }
            }
        }
        false
    }
}

/// Click commands for the top-level nodes of the base diagram.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OverviewLinks {
    links: IndexMap<NodeId, String>,
}

impl OverviewLinks {
    /// Loads overview links from a JSON object keyed by node id.
    pub fn from_json(text: &str) -> Result<Self, UnfurlError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Inserts a link command for `id`.
    pub fn insert(&mut self, id: NodeId, command: impl Into<String>) {
        self.links.insert(id, command.into());
    }

    /// Appends `click` bindings to `base` for every linked id the
    /// diagram declares and does not already bind.
    ///
    /// # Errors
    ///
    /// Returns [`UnfurlError::Parse`] if `base` does not parse.
    pub fn apply_to(&self, base: &str) -> Result<String, UnfurlError> {
        let doc = Document::parse(base).map_err(|err| UnfurlError::parse(err, base))?;
        let declared = doc.node_ids();
        let bound: IndexSet<&NodeId> = doc.clicks().map(|c| c.id).collect();

        let mut out = base.trim_end_matches('\n').to_string();
        for (id, command) in &self.links {
            if declared.contains(id) && !bound.contains(id) {
                out.push('\n');
                out.push_str(&click_line(id, command));
            }
        }
        out.push('\n');
        Ok(out)
    }
}
