//! Parsed diagram documents.
//!
//! A [`Document`] is the line-classified form of one piece of diagram
//! text: every line keeps its original text and carries its classified
//! [`Statement`] plus the scope path of enclosing subgraphs. The document
//! pass validates structure (block nesting, diagram type) and exposes the
//! queries the rewriting engine needs: statistics, click bindings, and
//! declaration sites.

use indexmap::IndexSet;
use log::debug;

use unfurl_core::{identifier::NodeId, semantic::Statement};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    span::Span,
    statement::{self, Classified},
};

/// One line of a parsed document.
#[derive(Debug, Clone)]
pub struct Line {
    number: usize,
    offset: usize,
    raw: String,
    stmt: Statement,
    scope: Vec<NodeId>,
}

impl Line {
    /// 1-based line number.
    pub fn number(&self) -> usize {
        self.number
    }

    /// The original line text, without its newline.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The classified statement.
    pub fn stmt(&self) -> &Statement {
        &self.stmt
    }

    /// Ids of the enclosing subgraphs, outermost first. Empty at top
    /// level.
    pub fn scope(&self) -> &[NodeId] {
        &self.scope
    }

    /// The byte span of this line in the source.
    pub fn span(&self) -> Span {
        Span::new(self.offset..self.offset + self.raw.len())
    }
}

/// Counts reported by the structural renderer boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    /// Unique declared or referenced node ids (clusters excluded).
    pub nodes: usize,
    /// Number of subgraph blocks.
    pub clusters: usize,
    /// Unique click-bound node ids.
    pub clickable: usize,
}

/// A `click` binding found in the document, in document order.
#[derive(Debug, Clone, Copy)]
pub struct ClickBinding<'a> {
    pub line_index: usize,
    pub id: &'a NodeId,
    pub command: &'a str,
    pub scope: &'a [NodeId],
}

/// Where a node declaration was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclSite {
    /// A standalone `id[label]` line.
    Standalone,
    /// The left endpoint of an edge line.
    EdgeFrom,
    /// The right endpoint of an edge line.
    EdgeTo,
}

/// The first declaration site of a node, plus its resolved label.
#[derive(Debug, Clone)]
pub struct Declaration<'a> {
    pub line_index: usize,
    pub site: DeclSite,
    /// The label from the first labeled declaration in the same scope,
    /// if the node is ever declared with one.
    pub label: Option<String>,
    pub scope: &'a [NodeId],
}

/// A parsed, structure-validated diagram document.
#[derive(Debug, Clone)]
pub struct Document {
    lines: Vec<Line>,
}

impl Document {
    /// Parses diagram text into a document.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] carrying every diagnostic found:
    /// malformed statements, unbalanced blocks, or an incompatible
    /// diagram type. Warnings alone do not fail the parse.
    pub fn parse(source: &str) -> Result<Self, ParseError> {
        let mut collector = DiagnosticCollector::new();
        let mut lines = Vec::new();
        // Open subgraph blocks: (id, span of the opening line).
        let mut stack: Vec<(NodeId, Span)> = Vec::new();
        let mut seen_significant = false;

        let mut offset = 0;
        for (index, raw) in source.split('\n').enumerate() {
            let span = Span::new(offset..offset + raw.len());

            let mut stmt = match statement::classify(raw) {
                Classified::Stmt(stmt) => stmt,
                Classified::Malformed { code, message } => {
                    collector.emit(
                        Diagnostic::error(message)
                            .with_code(code)
                            .with_span(span, code.description()),
                    );
                    Statement::Raw
                }
            };

            if !seen_significant
                && !matches!(stmt, Statement::Blank)
                && !raw.trim_start().starts_with("%%")
            {
                seen_significant = true;
                let keyword = raw.trim().split_whitespace().next().unwrap_or("");
                if statement::is_incompatible_type(keyword) {
                    collector.emit(
                        Diagnostic::error(format!(
                            "diagram type `{keyword}` is not supported"
                        ))
                        .with_code(ErrorCode::E102)
                        .with_span(span, "declared here")
                        .with_help("use a `graph` or `flowchart` diagram"),
                    );
                    stmt = Statement::Raw;
                } else if !matches!(stmt, Statement::Header { .. }) {
                    collector.emit(
                        Diagnostic::warning("diagram does not start with a graph header")
                            .with_code(ErrorCode::E103)
                            .with_span(span, "first statement here"),
                    );
                }
            }

            let scope: Vec<NodeId> = stack.iter().map(|(id, _)| id.clone()).collect();

            match &stmt {
                Statement::SubgraphStart { id, .. } => {
                    stack.push((id.clone(), span));
                }
                Statement::End => {
                    if stack.pop().is_none() {
                        collector.emit(
                            Diagnostic::error("`end` with no open subgraph block")
                                .with_code(ErrorCode::E100)
                                .with_span(span, "unmatched `end`"),
                        );
                    }
                }
                _ => {}
            }

            // The opening line itself belongs to the enclosing scope.
            lines.push(Line {
                number: index + 1,
                offset,
                raw: raw.to_string(),
                stmt,
                scope,
            });

            offset += raw.len() + 1;
        }

        for (id, span) in stack {
            collector.emit(
                Diagnostic::error(format!("subgraph `{id}` is never closed"))
                    .with_code(ErrorCode::E101)
                    .with_span(span, "opened here")
                    .with_help("add a matching `end` line"),
            );
        }

        let doc = Self { lines };
        doc.check_duplicates(&mut collector);

        collector.finish()?;
        debug!(lines = doc.lines.len(); "Parsed diagram document");
        Ok(doc)
    }

    /// All lines, in document order.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Node, cluster, and clickable counts for this document.
    pub fn stats(&self) -> Stats {
        let mut nodes: IndexSet<&NodeId> = IndexSet::new();
        let mut clickable: IndexSet<&NodeId> = IndexSet::new();
        let mut clusters = 0;

        for line in &self.lines {
            match &line.stmt {
                Statement::Node(decl) => {
                    nodes.insert(&decl.id);
                }
                Statement::Edge(edge) => {
                    nodes.insert(&edge.from.id);
                    nodes.insert(&edge.to.id);
                }
                Statement::SubgraphStart { .. } => clusters += 1,
                Statement::Click { id, .. } => {
                    clickable.insert(id);
                }
                _ => {}
            }
        }

        Stats {
            nodes: nodes.len(),
            clusters,
            clickable: clickable.len(),
        }
    }

    /// Click bindings in document order.
    pub fn clicks(&self) -> impl Iterator<Item = ClickBinding<'_>> {
        self.lines
            .iter()
            .enumerate()
            .filter_map(|(line_index, line)| match &line.stmt {
                Statement::Click { id, command, .. } => Some(ClickBinding {
                    line_index,
                    id,
                    command,
                    scope: &line.scope,
                }),
                _ => None,
            })
    }

    /// All node ids declared or referenced, in document order.
    pub fn node_ids(&self) -> IndexSet<NodeId> {
        let mut ids = IndexSet::new();
        for line in &self.lines {
            match &line.stmt {
                Statement::Node(decl) => {
                    ids.insert(decl.id.clone());
                }
                Statement::Edge(edge) => {
                    ids.insert(edge.from.id.clone());
                    ids.insert(edge.to.id.clone());
                }
                Statement::SubgraphStart { id, .. } => {
                    ids.insert(id.clone());
                }
                _ => {}
            }
        }
        ids
    }

    /// Finds the first declaration site of `id` in document order.
    ///
    /// The label is resolved from the first labeled declaration within
    /// the same scope, which may be a later line than the site itself.
    pub fn find_declaration(&self, id: &NodeId) -> Option<Declaration<'_>> {
        let mut first: Option<(usize, DeclSite)> = None;

        for (line_index, line) in self.lines.iter().enumerate() {
            let site = match &line.stmt {
                Statement::Node(decl) if decl.id == *id => Some(DeclSite::Standalone),
                Statement::Edge(edge) if edge.from.id == *id => Some(DeclSite::EdgeFrom),
                Statement::Edge(edge) if edge.to.id == *id => Some(DeclSite::EdgeTo),
                _ => None,
            };
            if let Some(site) = site {
                first = Some((line_index, site));
                break;
            }
        }

        let (line_index, site) = first?;
        let scope = &self.lines[line_index].scope;
        let label = self.label_in_scope(id, scope);

        Some(Declaration {
            line_index,
            site,
            label,
            scope,
        })
    }

    fn label_in_scope(&self, id: &NodeId, scope: &[NodeId]) -> Option<String> {
        for line in &self.lines {
            if line.scope != scope {
                continue;
            }
            let label = match &line.stmt {
                Statement::Node(decl) if decl.id == *id => decl.label.as_deref(),
                Statement::Edge(edge) if edge.from.id == *id => edge.from.label.as_deref(),
                Statement::Edge(edge) if edge.to.id == *id => edge.to.label.as_deref(),
                _ => None,
            };
            if let Some(label) = label {
                return Some(label.to_string());
            }
        }
        None
    }

    fn check_duplicates(&self, collector: &mut DiagnosticCollector) {
        let mut seen: IndexSet<(String, &NodeId)> = IndexSet::new();
        for line in &self.lines {
            let decl = match &line.stmt {
                Statement::Node(decl) if decl.label.is_some() => Some(&decl.id),
                _ => None,
            };
            let Some(id) = decl else { continue };
            let scope_key = line
                .scope
                .iter()
                .map(NodeId::as_str)
                .collect::<Vec<_>>()
                .join("/");
            if !seen.insert((scope_key, id)) {
                collector.emit(
                    Diagnostic::warning(format!(
                        "node `{id}` is declared more than once in this scope"
                    ))
                    .with_code(ErrorCode::E200)
                    .with_span(line.span(), "redeclared here"),
                );
            }
        }
    }
}
