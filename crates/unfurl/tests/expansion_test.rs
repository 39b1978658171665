//! Integration tests for the expansion engine and dispatcher API.
//!
//! These exercise the behavioral contract end to end: exact round
//! trips, count growth, edge redirection, label substitution, and
//! nested expansion.

use indexmap::IndexMap;
use proptest::prelude::*;

use unfurl::{
    Command, CommandDispatcher, DispatchOutcome, EngineConfig, ExpansionState, ModuleEntry,
    ModuleRepository, NotExpandable, RenderAdapter, RenderResult, TextRenderer, render,
};
use unfurl_core::{identifier::NodeId, semantic::Statement};
use unfurl_parser::Document;

fn id(s: &str) -> NodeId {
    NodeId::new(s).unwrap()
}

fn entry(label: &str, diagram: &str) -> ModuleEntry {
    ModuleEntry {
        label: label.to_string(),
        diagram: diagram.to_string(),
        links: IndexMap::new(),
    }
}

const SCENARIO_BASE: &str =
    "graph TD\nA[App]-->B[Config]\nclick A \"open:app\"\nclick B \"open:config\"";

fn scenario_repo() -> ModuleRepository {
    let mut repo = ModuleRepository::new();
    repo.insert(id("A"), entry("App", "X[Init]-->Y[Run]"));
    repo
}

fn counts(text: &str) -> (usize, usize) {
    match TextRenderer::new().render(text) {
        RenderResult::Success { nodes, clusters } => (nodes, clusters),
        RenderResult::Failure { reason } => panic!("render failed: {reason}"),
    }
}

#[test]
fn scenario_expansion_produces_expected_text() {
    let repo = scenario_repo();
    let state = ExpansionState::new(SCENARIO_BASE)
        .expand(&id("A"), &repo)
        .unwrap();
    let out = render(&state, &repo, &EngineConfig::default()).unwrap();

    assert!(out.contains("subgraph A_sub[\"App\"]"));
    assert!(out.contains("X[Init]-->Y[Run]"));
    assert!(out.contains("Collapse"));
    assert!(out.contains("end"));
    assert!(out.contains("A_sub-->B[Config]"));
}

#[test]
fn scenario_collapse_restores_base_exactly() {
    let repo = scenario_repo();
    let state = ExpansionState::new(SCENARIO_BASE)
        .expand(&id("A"), &repo)
        .unwrap();
    let collapsed = state.collapse_all();
    let out = render(&collapsed, &repo, &EngineConfig::default()).unwrap();
    assert_eq!(out, SCENARIO_BASE);
}

#[test]
fn expanding_twice_is_rejected_with_state_unchanged() {
    let repo = scenario_repo();
    let state = ExpansionState::new(SCENARIO_BASE)
        .expand(&id("A"), &repo)
        .unwrap();
    assert_eq!(
        state.expand(&id("A"), &repo),
        Err(NotExpandable::AlreadyExpanded(id("A")))
    );
    assert_eq!(state.expanded().len(), 1);
}

#[test]
fn node_count_grows_and_clusters_increase_per_expansion() {
    let base = "graph TD\nA[App] --> B[Config]\nB --> C[Store]\n";
    let mut repo = ModuleRepository::new();
    repo.insert(id("A"), entry("App", "X[Init] --> Y[Run]"));
    repo.insert(id("B"), entry("Config", "L[Load] --> V[Validate]"));
    let config = EngineConfig::default();

    let s0 = ExpansionState::new(base);
    let (n0, c0) = counts(&render(&s0, &repo, &config).unwrap());

    let s1 = s0.expand(&id("A"), &repo).unwrap();
    let (n1, c1) = counts(&render(&s1, &repo, &config).unwrap());
    assert!(n1 > n0);
    assert!(c1 >= c0 + 1);

    let s2 = s1.expand(&id("B"), &repo).unwrap();
    let (n2, c2) = counts(&render(&s2, &repo, &config).unwrap());
    assert!(n2 > n1);
    assert!(c2 >= c1 + 1);
}

#[test]
fn no_visible_label_is_a_bare_module_key() {
    let repo = scenario_repo();
    let state = ExpansionState::new(SCENARIO_BASE)
        .expand(&id("A"), &repo)
        .unwrap();
    let out = render(&state, &repo, &EngineConfig::default()).unwrap();
    let doc = Document::parse(&out).unwrap();

    for line in doc.lines() {
        let label = match line.stmt() {
            Statement::Node(decl) => decl.label.as_deref(),
            Statement::SubgraphStart { label, .. } => label.as_deref(),
            _ => None,
        };
        if let Some(label) = label {
            if let Ok(as_id) = NodeId::new(label) {
                assert!(
                    !repo.contains(&as_id),
                    "bare module key `{label}` surfaced as visible text"
                );
            }
        }
    }
}

#[test]
fn edge_redirection_leaves_no_dangling_reference() {
    let repo = scenario_repo();
    let state = ExpansionState::new(SCENARIO_BASE)
        .expand(&id("A"), &repo)
        .unwrap();
    let out = render(&state, &repo, &EngineConfig::default()).unwrap();
    let doc = Document::parse(&out).unwrap();

    // Every remaining top-level edge that used to touch A now touches
    // A_sub instead.
    for line in doc.lines() {
        if line.scope().is_empty() {
            if let Statement::Edge(edge) = line.stmt() {
                assert_ne!(edge.from.id, id("A"), "dangling edge: {}", line.raw());
                assert_ne!(edge.to.id, id("A"), "dangling edge: {}", line.raw());
            }
        }
    }
}

#[test]
fn prefix_identifiers_are_never_confused() {
    let base = "graph TD\nst[State] --> store[Store]\nstore --> st\n";
    let mut repo = ModuleRepository::new();
    repo.insert(id("st"), entry("State", "I[Idle] --> W[Working]"));
    let state = ExpansionState::new(base).expand(&id("st"), &repo).unwrap();
    let out = render(&state, &repo, &EngineConfig::default()).unwrap();

    assert!(out.contains("st_sub --> store"));
    assert!(out.contains("store --> st_sub"));
    assert!(!out.contains("store_sub"));
}

#[test]
fn disjoint_expansions_commute_on_counts() {
    let base = "graph TD\nA[App] --> B[Config]\nB --> C[Store]\nC --> D[Log]\n";
    let mut repo = ModuleRepository::new();
    repo.insert(id("A"), entry("App", "A1[One] --> A2[Two]"));
    repo.insert(id("C"), entry("Store", "C1[Get] --> C2[Put]"));
    repo.insert(id("D"), entry("Log", "D1[Write]"));
    let config = EngineConfig::default();

    let forward = ExpansionState::new(base)
        .expand(&id("A"), &repo)
        .unwrap()
        .expand(&id("C"), &repo)
        .unwrap()
        .expand(&id("D"), &repo)
        .unwrap();
    let backward = ExpansionState::new(base)
        .expand(&id("D"), &repo)
        .unwrap()
        .expand(&id("C"), &repo)
        .unwrap()
        .expand(&id("A"), &repo)
        .unwrap();

    let fwd = counts(&render(&forward, &repo, &config).unwrap());
    let bwd = counts(&render(&backward, &repo, &config).unwrap());
    assert_eq!(fwd, bwd);
}

#[test]
fn nested_expansion_reaches_the_second_level() {
    let base = "graph TD\nA[App] --> B[Config]\nclick A \"expand:A\"\n";
    let mut repo = ModuleRepository::new();
    let mut links = IndexMap::new();
    links.insert(id("X"), "expand:X".to_string());
    repo.insert(
        id("A"),
        ModuleEntry {
            label: "App".to_string(),
            diagram: "X[Init] --> Y[Run]".to_string(),
            links,
        },
    );
    repo.insert(id("X"), entry("Init", "P[Parse] --> Q[Check]"));

    let mut dispatcher =
        CommandDispatcher::new(base, repo, EngineConfig::default(), TextRenderer::new()).unwrap();

    assert!(matches!(
        dispatcher.dispatch(Command::Expand(1)),
        DispatchOutcome::Rendered { .. }
    ));
    // X is now the first candidate, bound by A's module links.
    assert_eq!(dispatcher.candidates(), [id("X")]);
    assert!(matches!(
        dispatcher.dispatch(Command::Expand(1)),
        DispatchOutcome::Rendered { .. }
    ));

    let out = dispatcher.displayed();
    assert!(out.contains("subgraph A_sub[\"App\"]"));
    assert!(out.contains("subgraph X_sub[\"Init\"]"));
    assert!(out.contains("P[Parse] --> Q[Check]"));

    dispatcher.dispatch(Command::CollapseAll);
    assert_eq!(dispatcher.displayed(), base);
}

#[test]
fn collapsing_a_parent_takes_nested_expansions_with_it() {
    let base = "graph TD\nA[App] --> B[Config]\n";
    let mut repo = ModuleRepository::new();
    repo.insert(id("A"), entry("App", "X[Init] --> Y[Run]"));
    repo.insert(id("X"), entry("Init", "P[Parse]"));
    repo.insert(id("B"), entry("Config", "L[Load]"));
    let config = EngineConfig::default();

    let state = ExpansionState::new(base)
        .expand(&id("A"), &repo)
        .unwrap()
        .expand(&id("X"), &repo)
        .unwrap()
        .expand(&id("B"), &repo)
        .unwrap();

    let state = state.collapse_one(&id("A"), &repo);
    let out = render(&state, &repo, &config).unwrap();
    assert!(!out.contains("A_sub"));
    assert!(!out.contains("X_sub"));
    assert!(out.contains("B_sub"));
}

proptest! {
    // Any subset of expandable nodes, expanded in any order, renders
    // parseable text, and a full collapse always reproduces the base.
    #[test]
    fn expansion_round_trip_holds_for_any_order(order in proptest::sample::subsequence(
        vec!["A", "B", "C"], 0..=3,
    ), shuffle in any::<bool>()) {
        let base = "graph TD\nA[App] --> B[Config]\nB --> C[Store]\nC --> A\n";
        let mut repo = ModuleRepository::new();
        repo.insert(id("A"), entry("App", "A1[One] --> A2[Two]"));
        repo.insert(id("B"), entry("Config", "B1[Load]"));
        repo.insert(id("C"), entry("Store", "C1[Get] --> C2[Put]"));
        let config = EngineConfig::default();

        let mut names = order;
        if shuffle {
            names.reverse();
        }

        let mut state = ExpansionState::new(base);
        for name in &names {
            state = state.expand(&id(name), &repo).unwrap();
        }

        let out = render(&state, &repo, &config).unwrap();
        prop_assert!(Document::parse(&out).is_ok());

        let restored = render(&state.collapse_all(), &repo, &config).unwrap();
        prop_assert_eq!(restored, base);
    }
}
