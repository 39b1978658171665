//! Semantic statement model for the flowchart DSL subset.
//!
//! A diagram is a sequence of lines, each classified as one [`Statement`].
//! The model covers exactly what the rewriting engine needs to locate,
//! splice, and redirect: headers, node declarations, edges, subgraph
//! blocks, and click bindings. Everything else is carried through as
//! [`Statement::Raw`] and never touched.
//!
//! Rewriting works on the original line text, so untouched lines are
//! never reformatted. The only lines the engine emits from scratch are
//! the generated ones, via the helpers at the bottom of this module.

use std::fmt;

use crate::identifier::NodeId;

/// The graph-type keyword of the diagram header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphKind {
    Graph,
    Flowchart,
}

impl fmt::Display for GraphKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphKind::Graph => write!(f, "graph"),
            GraphKind::Flowchart => write!(f, "flowchart"),
        }
    }
}

/// Layout direction of the diagram header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    TD,
    TB,
    LR,
    RL,
    BT,
}

impl Direction {
    /// Parses a direction keyword.
    pub fn from_keyword(s: &str) -> Option<Self> {
        match s {
            "TD" => Some(Direction::TD),
            "TB" => Some(Direction::TB),
            "LR" => Some(Direction::LR),
            "RL" => Some(Direction::RL),
            "BT" => Some(Direction::BT),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::TD => "TD",
            Direction::TB => "TB",
            Direction::LR => "LR",
            Direction::RL => "RL",
            Direction::BT => "BT",
        };
        write!(f, "{s}")
    }
}

/// A standalone node declaration line: `id[label]`, optionally with a
/// `:::class` suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeDecl {
    pub id: NodeId,
    /// Label text with quoting already stripped. `None` for a bare `id`.
    pub label: Option<String>,
    pub class: Option<String>,
}

/// One endpoint of an edge. Endpoints may carry an inline declaration
/// (`A[App]-->B`), which declares the node at first mention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub id: NodeId,
    pub label: Option<String>,
    pub class: Option<String>,
}

/// An edge line: `from --> to`, optionally with `|text|` edge text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeStmt {
    pub from: Endpoint,
    pub to: Endpoint,
    pub text: Option<String>,
}

/// One classified line of diagram text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// `graph TD`, `flowchart LR`, …
    Header {
        kind: GraphKind,
        direction: Direction,
    },
    /// `id[label]` on its own line.
    Node(NodeDecl),
    /// `a --> b`.
    Edge(EdgeStmt),
    /// `subgraph id["label"]`.
    SubgraphStart {
        id: NodeId,
        label: Option<String>,
    },
    /// `end`.
    End,
    /// `click id "command"` with an optional tooltip string.
    Click {
        id: NodeId,
        command: String,
        tooltip: Option<String>,
    },
    /// An empty or whitespace-only line.
    Blank,
    /// Any line the engine does not rewrite (`classDef`, `style`,
    /// `%%` comments, …). Carried through verbatim.
    Raw,
}

/// Emits a `subgraph id["label"]` opening line.
///
/// Subgraph labels are always quoted: the visible label is display text
/// (the original node's label), never an identifier.
pub fn subgraph_open_line(id: &NodeId, label: &str) -> String {
    format!("subgraph {}[\"{}\"]", id, label.replace('"', "'"))
}

/// Emits a node declaration line with a quoted label.
pub fn node_line(id: &NodeId, label: &str) -> String {
    format!("{}[\"{}\"]", id, label.replace('"', "'"))
}

/// Emits a `click id "command"` binding line.
pub fn click_line(id: &NodeId, command: &str) -> String {
    format!("click {} \"{}\"", id, command)
}
