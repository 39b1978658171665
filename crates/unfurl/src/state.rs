//! Expansion state.
//!
//! [`ExpansionState`] pairs the immutable base diagram text with the
//! insertion-ordered set of currently expanded node ids. Every operation
//! returns a new value; the dispatcher is the only writer.

use indexmap::IndexSet;
use thiserror::Error;

use unfurl_core::identifier::NodeId;

use crate::repository::ModuleRepository;

/// Why an expand command was rejected. Reported, never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotExpandable {
    #[error("node `{0}` has no module data")]
    NoModule(NodeId),

    #[error("node `{0}` is already expanded")]
    AlreadyExpanded(NodeId),

    #[error("node `{0}` is not visible in the current view")]
    NotVisible(NodeId),

    #[error("no clickable node at position {0}")]
    NoSuchCandidate(usize),
}

/// The base diagram text plus the ordered set of expanded node ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpansionState {
    base: String,
    expanded: IndexSet<NodeId>,
}

impl ExpansionState {
    /// A fresh state with nothing expanded.
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            expanded: IndexSet::new(),
        }
    }

    /// The immutable base diagram text.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Expanded node ids in insertion order.
    pub fn expanded(&self) -> &IndexSet<NodeId> {
        &self.expanded
    }

    /// Whether `id` is currently expanded.
    pub fn is_expanded(&self, id: &NodeId) -> bool {
        self.expanded.contains(id)
    }

    /// Returns a new state with `id` appended to the expansion set.
    ///
    /// # Errors
    ///
    /// Rejects ids without module data and ids that are already
    /// expanded. The original state is untouched either way.
    pub fn expand(&self, id: &NodeId, repo: &ModuleRepository) -> Result<Self, NotExpandable> {
        if !repo.contains(id) {
            return Err(NotExpandable::NoModule(id.clone()));
        }
        if self.expanded.contains(id) {
            return Err(NotExpandable::AlreadyExpanded(id.clone()));
        }
        let mut next = self.clone();
        next.expanded.insert(id.clone());
        Ok(next)
    }

    /// Returns a new state with nothing expanded.
    pub fn collapse_all(&self) -> Self {
        Self {
            base: self.base.clone(),
            expanded: IndexSet::new(),
        }
    }

    /// Returns a new state with `id` removed, along with every expanded
    /// id declared inside `id`'s module fragment. Collapsing a parent
    /// takes its expanded descendants with it, since their declarations
    /// no longer exist once the parent reverts.
    pub fn collapse_one(&self, id: &NodeId, repo: &ModuleRepository) -> Self {
        let expanded = self
            .expanded
            .iter()
            .filter(|e| *e != id && !repo.is_descendant(id, e))
            .cloned()
            .collect();
        Self {
            base: self.base.clone(),
            expanded,
        }
    }
}
