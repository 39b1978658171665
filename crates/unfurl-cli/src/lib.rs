//! CLI logic for the unfurl diagram tool.
//!
//! Reads a base diagram, optional module data and overview links, then
//! replays a sequence of expand/collapse commands and writes the
//! resulting diagram text.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;
pub use config::AppConfig;

use std::fs;

use log::{info, warn};

use unfurl::{
    Command, CommandDispatcher, DispatchOutcome, ModuleRepository, OverviewLinks, TextRenderer,
    UnfurlError,
};
use unfurl_parser::Document;

/// Run the unfurl CLI application
///
/// Loads the base diagram and module data, replays the requested
/// commands through the dispatcher, and writes the final diagram text
/// to the output path or stdout.
///
/// # Errors
///
/// Returns `UnfurlError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Diagram or module data parsing errors
/// - A base diagram the render boundary rejects
pub fn run(args: &Args) -> Result<(), UnfurlError> {
    info!(input_path = args.input; "Processing diagram");

    let app_config = config::load_config(args.config.as_ref())?;

    let mut base = fs::read_to_string(&args.input)?;
    // Surface parse diagnostics against the input before any rewriting.
    Document::parse(&base).map_err(|err| UnfurlError::parse(err, base.clone()))?;

    let repo = match &args.modules {
        Some(path) => {
            let text = fs::read_to_string(path)?;
            let repo = ModuleRepository::from_json(&text)?;
            info!(path = path.as_str(), modules = repo.len(); "Loaded module data");
            repo
        }
        None => ModuleRepository::new(),
    };

    if let Some(path) = &args.links {
        let text = fs::read_to_string(path)?;
        let links = OverviewLinks::from_json(&text)?;
        base = links.apply_to(&base)?;
    }

    let mut dispatcher =
        CommandDispatcher::new(base, repo, app_config.engine.clone(), TextRenderer::new())?;

    for token in &args.commands {
        let Some(command) = Command::parse(token, &app_config.engine) else {
            warn!(token = token.as_str(); "Unknown command token, ignoring");
            continue;
        };
        match dispatcher.dispatch(command) {
            DispatchOutcome::Rendered { nodes, clusters } => {
                info!(token = token.as_str(), nodes, clusters; "Rendered view");
            }
            DispatchOutcome::Rejected(reason) => {
                warn!(token = token.as_str(), reason = reason.to_string(); "Command rejected");
            }
            DispatchOutcome::RolledBack { reason } => {
                warn!(token = token.as_str(), reason = reason.as_str(); "Render failed, kept previous view");
            }
        }
    }

    match &args.output {
        Some(path) => {
            fs::write(path, dispatcher.displayed())?;
            info!(output_file = path.as_str(); "Diagram text written");
        }
        None => print!("{}", dispatcher.displayed()),
    }

    Ok(())
}
