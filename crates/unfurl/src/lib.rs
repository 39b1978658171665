//! # Unfurl
//!
//! An incremental expand/collapse rewriting engine for flowchart
//! diagram text. Starting from a flat overview diagram, nodes with
//! module data can be expanded in place: the node's declaration is
//! replaced by a nested subgraph spliced from its module fragment,
//! every edge that touched the node is redirected to the subgraph, and
//! a collapse control is injected. Collapsing reverses the rewrite;
//! collapsing everything reproduces the base text byte for byte.
//!
//! ## Usage
//!
//! ```
//! use unfurl::{
//!     Command, CommandDispatcher, EngineConfig, ModuleEntry, ModuleRepository, TextRenderer,
//! };
//! use unfurl_core::identifier::NodeId;
//!
//! # fn main() -> Result<(), unfurl::UnfurlError> {
//! let base = "graph TD\nA[App] --> B[Config]\nclick A \"open:app\"\n";
//! let mut repo = ModuleRepository::new();
//! repo.insert(
//!     NodeId::new("A").unwrap(),
//!     ModuleEntry {
//!         label: "App".to_string(),
//!         diagram: "X[Init] --> Y[Run]".to_string(),
//!         links: Default::default(),
//!     },
//! );
//!
//! let mut dispatcher =
//!     CommandDispatcher::new(base, repo, EngineConfig::default(), TextRenderer::new())?;
//! dispatcher.dispatch(Command::Expand(1));
//! assert!(dispatcher.displayed().contains("subgraph A_sub[\"App\"]"));
//! # Ok(())
//! # }
//! ```

mod config;
mod dispatch;
pub mod engine;
mod error;
mod render;
mod repository;
mod state;

pub use config::EngineConfig;
pub use dispatch::{Command, CommandDispatcher, DispatchOutcome, Phase};
pub use engine::{EngineError, render};
pub use error::UnfurlError;
pub use render::{RenderAdapter, RenderResult, TextRenderer};
pub use repository::{ModuleEntry, ModuleRepository, OverviewLinks};
pub use state::{ExpansionState, NotExpandable};
