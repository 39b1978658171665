//! Command dispatch.
//!
//! [`CommandDispatcher`] owns the expansion state and is its only
//! writer. Each command is handled to completion: mutate state, render
//! text, hand it to the adapter, reconcile the outcome. A failed render
//! keeps the previous display and state intact, so a later valid
//! command always recovers.

use log::{error, info};

use unfurl_core::identifier::NodeId;
use unfurl_parser::Document;

use crate::{
    config::EngineConfig,
    engine,
    error::UnfurlError,
    render::{RenderAdapter, RenderResult},
    repository::ModuleRepository,
    state::{ExpansionState, NotExpandable},
};

/// An external command token, decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Digit key `1`..`9`: expand the k-th clickable node of the
    /// current view.
    Expand(usize),
    /// A collapse control was activated for one expanded node.
    Collapse(NodeId),
    /// Key `c`: collapse everything.
    CollapseAll,
}

impl Command {
    /// Decodes a raw command token. Unknown tokens decode to `None`
    /// and are ignored by callers.
    pub fn parse(token: &str, config: &EngineConfig) -> Option<Self> {
        if token == "c" {
            return Some(Command::CollapseAll);
        }
        if let Ok(k) = token.parse::<usize>() {
            if (1..=9).contains(&k) && token.len() == 1 {
                return Some(Command::Expand(k));
            }
            return None;
        }
        if let Some(target) = config.parse_collapse_command(token) {
            return NodeId::new(target).ok().map(Command::Collapse);
        }
        None
    }
}

/// Dispatcher phase. An errored phase keeps the last valid display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Errored(String),
}

/// What one dispatched command did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The view was re-rendered; counts come from the adapter.
    Rendered { nodes: usize, clusters: usize },
    /// The command was a no-op; state and display are unchanged.
    Rejected(NotExpandable),
    /// Rendering failed; the previous display is still shown.
    RolledBack { reason: String },
}

/// Maps command tokens to state transitions and re-renders.
#[derive(Debug)]
pub struct CommandDispatcher<A: RenderAdapter> {
    state: ExpansionState,
    repo: ModuleRepository,
    config: EngineConfig,
    adapter: A,
    displayed: String,
    phase: Phase,
}

impl<A: RenderAdapter> CommandDispatcher<A> {
    /// Creates a dispatcher and renders the base view once.
    ///
    /// # Errors
    ///
    /// Returns [`UnfurlError::Render`] if the adapter rejects the base
    /// text; there is no previous display to fall back to.
    pub fn new(
        base: impl Into<String>,
        repo: ModuleRepository,
        config: EngineConfig,
        mut adapter: A,
    ) -> Result<Self, UnfurlError> {
        let base = base.into();
        match adapter.render(&base) {
            RenderResult::Success { .. } => Ok(Self {
                state: ExpansionState::new(base.clone()),
                repo,
                config,
                adapter,
                displayed: base,
                phase: Phase::Idle,
            }),
            RenderResult::Failure { reason } => Err(UnfurlError::Render(reason)),
        }
    }

    /// The currently displayed diagram text.
    pub fn displayed(&self) -> &str {
        &self.displayed
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Read access for inspection; only the dispatcher writes.
    pub fn state(&self) -> &ExpansionState {
        &self.state
    }

    /// Expandable click targets of the current view, in document
    /// order. Collapse controls are not candidates.
    pub fn candidates(&self) -> Vec<NodeId> {
        let Ok(doc) = Document::parse(&self.displayed) else {
            return Vec::new();
        };
        let mut out: Vec<NodeId> = Vec::new();
        for click in doc.clicks() {
            if self.config.parse_collapse_command(click.command).is_some() {
                continue;
            }
            if !out.contains(click.id) {
                out.push(click.id.clone());
            }
        }
        out
    }

    /// Handles one command to completion.
    pub fn dispatch(&mut self, command: Command) -> DispatchOutcome {
        match command {
            Command::Expand(k) => {
                let candidates = self.candidates();
                match k.checked_sub(1).and_then(|i| candidates.get(i)).cloned() {
                    Some(id) => self.expand_node(&id),
                    None => {
                        info!(position = k; "No clickable node at position");
                        DispatchOutcome::Rejected(NotExpandable::NoSuchCandidate(k))
                    }
                }
            }
            Command::Collapse(id) => self.apply(self.state.collapse_one(&id, &self.repo)),
            Command::CollapseAll => self.apply(self.state.collapse_all()),
        }
    }

    /// Expands `id` directly. The node must be visible in the current
    /// view.
    pub fn expand_node(&mut self, id: &NodeId) -> DispatchOutcome {
        let visible = Document::parse(&self.displayed)
            .map(|doc| doc.node_ids().contains(id))
            .unwrap_or(false);
        if !visible {
            return DispatchOutcome::Rejected(NotExpandable::NotVisible(id.clone()));
        }
        match self.state.expand(id, &self.repo) {
            Ok(next) => self.apply(next),
            Err(reject) => {
                info!(node = id.as_str(), reason = reject.to_string(); "Expansion rejected");
                DispatchOutcome::Rejected(reject)
            }
        }
    }

    fn apply(&mut self, next: ExpansionState) -> DispatchOutcome {
        let text = match engine::render(&next, &self.repo, &self.config) {
            Ok(text) => text,
            Err(err) => {
                error!(error = err.to_string(); "Render attempt aborted");
                let reason = err.to_string();
                self.phase = Phase::Errored(reason.clone());
                return DispatchOutcome::RolledBack { reason };
            }
        };
        match self.adapter.render(&text) {
            RenderResult::Success { nodes, clusters } => {
                self.state = next;
                self.displayed = text;
                self.phase = Phase::Idle;
                DispatchOutcome::Rendered { nodes, clusters }
            }
            RenderResult::Failure { reason } => {
                error!(reason = reason.as_str(); "Adapter rejected produced text");
                self.phase = Phase::Errored(reason.clone());
                DispatchOutcome::RolledBack { reason }
            }
        }
    }
}
