//! The splicing and edge-redirection engine.
//!
//! [`render`] is a pure function from (base text, expansion state,
//! module repository) to diagram text. Expanded ids are processed in
//! insertion order; each step replaces one node declaration with a
//! subgraph block sourced from the node's module fragment and redirects
//! every same-scope edge reference to the new subgraph id. Lines the
//! step does not touch keep their original text, so an empty expansion
//! set reproduces the base byte for byte.

use log::{debug, trace};
use thiserror::Error;

use unfurl_core::{
    identifier::{NodeId, is_identifier_char},
    semantic::{Statement, click_line, node_line, subgraph_open_line},
};
use unfurl_parser::{DeclSite, Document, ParseError};

use crate::{config::EngineConfig, repository::ModuleRepository, state::ExpansionState};

/// Internal-consistency faults during a render attempt. Fatal to that
/// attempt only; the caller keeps its previous state.
#[derive(Debug, Error)]
pub enum EngineError {
    /// An expanded id has no declaration in the working text.
    #[error("node `{0}` has no declaration in the current diagram")]
    DeclarationNotFound(NodeId),

    /// The deterministic suffix would collide with an existing id.
    #[error("expanding `{id}` would collide with existing id `{existing}`")]
    SuffixCollision { id: NodeId, existing: NodeId },

    /// An expanded id lost its module data between state and render.
    #[error("node `{0}` has no module data")]
    MissingModule(NodeId),

    /// The working text or a module fragment failed to parse.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Renders the diagram text for `state`.
///
/// Deterministic and order-stable: the same state renders to
/// byte-identical text. With nothing expanded the base is returned
/// unchanged.
///
/// # Errors
///
/// Any [`EngineError`] leaves no trace; the caller's state is
/// untouched and a later render from the same inputs is well-defined.
pub fn render(
    state: &ExpansionState,
    repo: &ModuleRepository,
    config: &EngineConfig,
) -> Result<String, EngineError> {
    if state.expanded().is_empty() {
        return Ok(state.base().to_string());
    }

    let mut text = state.base().to_string();
    for id in state.expanded() {
        text = expand_once(&text, id, repo, config)?;
        trace!(node = id.as_str(); "Spliced expansion");
    }

    // The produced text must itself be well-formed.
    Document::parse(&text)?;
    debug!(expanded = state.expanded().len(); "Rendered diagram text");
    Ok(text)
}

fn expand_once(
    text: &str,
    id: &NodeId,
    repo: &ModuleRepository,
    config: &EngineConfig,
) -> Result<String, EngineError> {
    let doc = Document::parse(text)?;
    let entry = repo
        .get(id)
        .ok_or_else(|| EngineError::MissingModule(id.clone()))?;
    let decl = doc
        .find_declaration(id)
        .ok_or_else(|| EngineError::DeclarationNotFound(id.clone()))?;

    let sub_id = id.with_suffix(&config.expansion_suffix);
    let collapse_id = id.with_suffix(&config.collapse_suffix);
    let existing = doc.node_ids();
    for candidate in [&sub_id, &collapse_id] {
        if existing.contains(candidate) {
            return Err(EngineError::SuffixCollision {
                id: id.clone(),
                existing: candidate.clone(),
            });
        }
    }

    // The subgraph label is display text: the node's own label where it
    // has one, the module label otherwise. A raw identifier must never
    // surface as visible text.
    let label = decl
        .label
        .clone()
        .unwrap_or_else(|| entry.label.clone());

    let decl_line = &doc.lines()[decl.line_index];
    let indent: String = decl_line
        .raw()
        .chars()
        .take_while(|c| c.is_whitespace())
        .collect();
    let block = build_block(&indent, &sub_id, &label, entry, &collapse_id, id, config)?;

    let scope = decl.scope;
    let mut out: Vec<String> = Vec::with_capacity(doc.lines().len() + block.len());

    for (i, line) in doc.lines().iter().enumerate() {
        if i == decl.line_index {
            out.extend(block.iter().cloned());
            if decl.site == DeclSite::Standalone {
                continue;
            }
            // An inline declaration site is an edge line; it falls
            // through to the redirection below.
        }

        let same_scope = line.scope() == scope;
        match line.stmt() {
            // The expanded node's own click binding is superseded by
            // the collapse control inside the new block.
            Statement::Click { id: bound, .. } if same_scope && bound == id => continue,

            Statement::Edge(edge) if same_scope && (edge.from.id == *id || edge.to.id == *id) => {
                let from = if edge.from.id == *id { &sub_id } else { &edge.from.id };
                let to = if edge.to.id == *id { &sub_id } else { &edge.to.id };
                // An edge collapsing onto the new subgraph itself is
                // dropped rather than rendered as a self-loop.
                if from == to {
                    continue;
                }
                out.push(rewrite_identifier(line.raw(), id.as_str(), sub_id.as_str()));
            }

            _ => out.push(line.raw().to_string()),
        }
    }

    Ok(out.join("\n"))
}

fn build_block(
    indent: &str,
    sub_id: &NodeId,
    label: &str,
    entry: &crate::repository::ModuleEntry,
    collapse_id: &NodeId,
    expanded_id: &NodeId,
    config: &EngineConfig,
) -> Result<Vec<String>, EngineError> {
    let frag = Document::parse(&entry.diagram)?;
    let inner = format!("{indent}    ");

    let mut block = vec![format!("{indent}{}", subgraph_open_line(sub_id, label))];
    for line in frag.lines() {
        match line.stmt() {
            // The fragment is spliced into an existing diagram; its own
            // header and blank padding do not belong in the block.
            Statement::Header { .. } | Statement::Blank => continue,
            _ => block.push(format!("{inner}{}", line.raw().trim())),
        }
    }

    let declared = frag.node_ids();
    let bound: Vec<&NodeId> = frag.clicks().map(|c| c.id).collect();
    for (child, command) in &entry.links {
        if declared.contains(child) && !bound.contains(&child) {
            block.push(format!("{inner}{}", click_line(child, command)));
        }
    }

    block.push(format!(
        "{inner}{}",
        node_line(collapse_id, &config.collapse_label)
    ));
    block.push(format!(
        "{inner}{}",
        click_line(collapse_id, &config.collapse_command_for(expanded_id))
    ));
    block.push(format!("{indent}end"));
    Ok(block)
}

/// Replaces whole-identifier occurrences of `target` with `replacement`
/// in one line of diagram text.
///
/// Occurrences inside bracket labels, quoted strings, and `|…|` edge
/// text are left alone. A replaced occurrence also swallows a directly
/// attached `[label]` group and `:::class` suffix, since the reference
/// now names a subgraph and must not re-declare a node.
fn rewrite_identifier(raw: &str, target: &str, replacement: &str) -> String {
    let chars: Vec<(usize, char)> = raw.char_indices().collect();
    let mut out = String::with_capacity(raw.len() + replacement.len());
    let mut idx = 0;
    let mut prev_ident = false;
    let mut in_quote = false;
    let mut in_pipe = false;
    let mut depth = 0usize;

    while idx < chars.len() {
        let (pos, c) = chars[idx];

        if in_quote {
            out.push(c);
            if c == '"' {
                in_quote = false;
            }
            idx += 1;
            prev_ident = false;
            continue;
        }
        match c {
            '"' => {
                in_quote = true;
                out.push(c);
                idx += 1;
                prev_ident = false;
                continue;
            }
            '|' if depth == 0 => {
                in_pipe = !in_pipe;
                out.push(c);
                idx += 1;
                prev_ident = false;
                continue;
            }
            '[' => {
                depth += 1;
                out.push(c);
                idx += 1;
                prev_ident = false;
                continue;
            }
            ']' => {
                depth = depth.saturating_sub(1);
                out.push(c);
                idx += 1;
                prev_ident = false;
                continue;
            }
            _ => {}
        }

        if depth == 0 && !in_pipe && !prev_ident && raw[pos..].starts_with(target) {
            let end = pos + target.len();
            let boundary = raw[end..]
                .chars()
                .next()
                .is_none_or(|next| !is_identifier_char(next));
            if boundary {
                out.push_str(replacement);
                while idx < chars.len() && chars[idx].0 < end {
                    idx += 1;
                }
                idx = skip_attached_decoration(raw, &chars, idx);
                prev_ident = true;
                continue;
            }
        }

        out.push(c);
        prev_ident = is_identifier_char(c);
        idx += 1;
    }

    out
}

/// Skips a `[label]` group and `:::class` suffix directly following a
/// rewritten identifier.
fn skip_attached_decoration(raw: &str, chars: &[(usize, char)], mut idx: usize) -> usize {
    if idx < chars.len() && chars[idx].1 == '[' {
        let mut depth = 0usize;
        let mut quoted = false;
        while idx < chars.len() {
            let (_, c) = chars[idx];
            idx += 1;
            match c {
                '"' => quoted = !quoted,
                '[' if !quoted => depth += 1,
                ']' if !quoted => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                _ => {}
            }
        }
    }
    if idx < chars.len() && raw[chars[idx].0..].starts_with(":::") {
        idx += 3;
        while idx < chars.len() && is_identifier_char(chars[idx].1) {
            idx += 1;
        }
    }
    idx
}
