//! The render boundary.
//!
//! The engine never inspects visual output; it hands diagram text to a
//! [`RenderAdapter`] and reads back structural counts or a failure
//! reason. [`TextRenderer`] is the built-in adapter: it validates the
//! text structurally and reports counts without drawing anything.

use unfurl_parser::Document;

/// Outcome of one render call. Consumed immediately by the dispatcher,
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderResult {
    Success {
        /// Distinct nodes in the rendered diagram.
        nodes: usize,
        /// Subgraph clusters in the rendered diagram.
        clusters: usize,
    },
    /// Malformed input is reported as text, never panicked on.
    Failure { reason: String },
}

impl RenderResult {
    pub fn is_success(&self) -> bool {
        matches!(self, RenderResult::Success { .. })
    }
}

/// External rendering boundary: accepts diagram text, reports nodes
/// and clusters, and rejects malformed input recoverably.
pub trait RenderAdapter {
    fn render(&mut self, text: &str) -> RenderResult;
}

/// Structural renderer backed by the parser. Counts what a visual
/// renderer would draw.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

impl TextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl RenderAdapter for TextRenderer {
    fn render(&mut self, text: &str) -> RenderResult {
        match Document::parse(text) {
            Ok(doc) => {
                let stats = doc.stats();
                RenderResult::Success {
                    nodes: stats.nodes,
                    clusters: stats.clusters,
                }
            }
            Err(err) => RenderResult::Failure {
                reason: err.to_string(),
            },
        }
    }
}
