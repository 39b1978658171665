//! Statement grammars for single lines of diagram text.
//!
//! Each line of a document is classified into one [`Statement`] by
//! [`classify`]. The grammars here are deliberately tolerant: only lines
//! that start with a statement keyword are required to parse, everything
//! else that fails to match falls through to [`Statement::Raw`] and is
//! carried verbatim. The engine rewrites nothing it cannot parse.

use winnow::{
    Parser,
    ascii::{space0, space1},
    combinator::{alt, delimited, eof, opt, preceded, terminated},
    error::{ContextError, ErrMode},
    token::{one_of, take_till, take_while},
};

use unfurl_core::{
    identifier::{self, NodeId},
    semantic::{Direction, EdgeStmt, Endpoint, GraphKind, NodeDecl, Statement},
};

use crate::error::ErrorCode;

type IResult<O> = Result<O, ErrMode<ContextError>>;

/// Result of classifying one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Classified {
    Stmt(Statement),
    Malformed { code: ErrorCode, message: String },
}

/// Diagram types the rewriting engine cannot work with.
pub(crate) const INCOMPATIBLE_TYPES: &[&str] = &[
    "classDiagram",
    "sequenceDiagram",
    "stateDiagram",
    "stateDiagram-v2",
    "erDiagram",
    "pie",
    "gantt",
    "journey",
];

/// Classifies one line of diagram text.
pub(crate) fn classify(line: &str) -> Classified {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Classified::Stmt(Statement::Blank);
    }
    if trimmed.starts_with("%%") {
        return Classified::Stmt(Statement::Raw);
    }
    if trimmed == "end" {
        return Classified::Stmt(Statement::End);
    }

    // Labels cannot span lines, so bracket balance is a per-line property.
    if !brackets_balanced(trimmed) {
        return Classified::Malformed {
            code: ErrorCode::E001,
            message: format!("unbalanced brackets in `{trimmed}`"),
        };
    }

    let keyword = trimmed.split_whitespace().next().unwrap_or("");
    match keyword {
        "graph" | "flowchart" => {
            return match parse_full(header, trimmed) {
                Some(stmt) => Classified::Stmt(stmt),
                None => Classified::Malformed {
                    code: ErrorCode::E003,
                    message: format!("malformed graph header `{trimmed}`"),
                },
            };
        }
        "subgraph" => {
            return match parse_full(subgraph_start, trimmed) {
                Some(stmt) => Classified::Stmt(stmt),
                None => Classified::Malformed {
                    code: ErrorCode::E003,
                    message: format!("malformed subgraph declaration `{trimmed}`"),
                },
            };
        }
        "click" => {
            return match parse_full(click, trimmed) {
                Some(stmt) => Classified::Stmt(stmt),
                None => classify_bad_click(trimmed),
            };
        }
        // Styling statements are passed through untouched.
        "classDef" | "style" | "linkStyle" | "class" | "direction" => {
            return Classified::Stmt(Statement::Raw);
        }
        _ => {}
    }

    if trimmed.contains("-->") {
        // Edge chains and exotic arrow forms fall through as raw text;
        // they render fine, they are just never rewritten.
        return match parse_full(edge, trimmed) {
            Some(e) => Classified::Stmt(Statement::Edge(e)),
            None => Classified::Stmt(Statement::Raw),
        };
    }

    match parse_full(node_decl, trimmed) {
        Some(decl) => Classified::Stmt(Statement::Node(decl)),
        None => Classified::Stmt(Statement::Raw),
    }
}

/// Returns `true` if `keyword` opens a diagram type the engine cannot
/// rewrite.
pub fn is_incompatible_type(keyword: &str) -> bool {
    INCOMPATIBLE_TYPES.contains(&keyword)
}

fn classify_bad_click(trimmed: &str) -> Classified {
    // Distinguish a bad target from a generally malformed binding.
    let target = trimmed
        .split_whitespace()
        .nth(1)
        .unwrap_or_default();
    if !target.is_empty() && !identifier::is_valid_identifier(target) {
        Classified::Malformed {
            code: ErrorCode::E002,
            message: format!("click target `{target}` is not a valid identifier"),
        }
    } else {
        Classified::Malformed {
            code: ErrorCode::E003,
            message: format!("malformed click binding `{trimmed}`"),
        }
    }
}

/// Runs `parser` against the whole line; trailing whitespace is allowed,
/// anything else is a failure.
fn parse_full<O>(parser: fn(&mut &str) -> IResult<O>, line: &str) -> Option<O> {
    let mut input = line;
    terminated(parser, (space0, eof)).parse_next(&mut input).ok()
}

fn brackets_balanced(line: &str) -> bool {
    let mut depth = 0i32;
    let mut in_quotes = false;
    for c in line.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            '[' if !in_quotes => depth += 1,
            ']' if !in_quotes => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0 && !in_quotes
}

// =========================================================================
// Grammars
// =========================================================================

fn raw_ident<'s>(input: &mut &'s str) -> IResult<&'s str> {
    (
        one_of(|c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., identifier::is_identifier_char),
    )
        .take()
        .parse_next(input)
}

fn ident(input: &mut &str) -> IResult<NodeId> {
    raw_ident
        .verify_map(|s| NodeId::new(s).ok())
        .parse_next(input)
}

/// `["quoted label"]` or `[bare label]`.
fn bracket_label(input: &mut &str) -> IResult<String> {
    delimited(
        '[',
        alt((
            delimited('"', take_till(0.., '"'), '"').map(str::to_string),
            take_till(1.., ']').map(|s: &str| s.trim().to_string()),
        )),
        ']',
    )
    .parse_next(input)
}

fn class_suffix(input: &mut &str) -> IResult<String> {
    preceded(":::", raw_ident).map(str::to_string).parse_next(input)
}

fn header(input: &mut &str) -> IResult<Statement> {
    (
        alt((
            "flowchart".value(GraphKind::Flowchart),
            "graph".value(GraphKind::Graph),
        )),
        space1,
        take_while(1.., |c: char| c.is_ascii_alphabetic())
            .verify_map(Direction::from_keyword),
    )
        .map(|(kind, _, direction)| Statement::Header { kind, direction })
        .parse_next(input)
}

fn subgraph_start(input: &mut &str) -> IResult<Statement> {
    preceded(("subgraph", space1), (ident, opt(bracket_label)))
        .map(|(id, label)| Statement::SubgraphStart { id, label })
        .parse_next(input)
}

fn quoted(input: &mut &str) -> IResult<String> {
    delimited('"', take_till(0.., '"'), '"')
        .map(str::to_string)
        .parse_next(input)
}

fn click(input: &mut &str) -> IResult<Statement> {
    preceded(
        ("click", space1),
        (ident, space1, quoted, opt(preceded(space1, quoted))),
    )
    .map(|(id, _, command, tooltip)| Statement::Click {
        id,
        command,
        tooltip,
    })
    .parse_next(input)
}

fn endpoint(input: &mut &str) -> IResult<Endpoint> {
    (ident, opt(bracket_label), opt(class_suffix))
        .map(|(id, label, class)| Endpoint { id, label, class })
        .parse_next(input)
}

fn edge(input: &mut &str) -> IResult<EdgeStmt> {
    (
        endpoint,
        delimited(space0, "-->", space0),
        opt(terminated(
            delimited('|', take_till(0.., '|'), '|'),
            space0,
        )),
        endpoint,
    )
        .map(|(from, _, text, to)| EdgeStmt {
            from,
            to,
            text: text.map(|t: &str| t.trim().to_string()),
        })
        .parse_next(input)
}

fn node_decl(input: &mut &str) -> IResult<NodeDecl> {
    (ident, opt(bracket_label), opt(class_suffix))
        .map(|(id, label, class)| NodeDecl { id, label, class })
        .parse_next(input)
}
