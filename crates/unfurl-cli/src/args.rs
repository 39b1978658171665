//! Command-line argument definitions for the unfurl CLI.
//!
//! This module defines the [`Args`] structure parsed from the command
//! line using [`clap`]. Arguments control input/output paths, module
//! data, the command sequence to replay, configuration file selection,
//! and logging verbosity.

use clap::Parser;

/// Command-line arguments for the unfurl diagram tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the base diagram file
    #[arg(help = "Path to the base diagram file")]
    pub input: String,

    /// Path to the module data JSON file
    #[arg(short, long)]
    pub modules: Option<String>,

    /// Path to the overview links JSON file
    #[arg(long)]
    pub links: Option<String>,

    /// Command tokens to replay against the diagram, in order
    /// (digits expand, `c` collapses all, `collapse:<id>` collapses one)
    #[arg(short = 'x', long = "command", value_name = "TOKEN")]
    pub commands: Vec<String>,

    /// Path to the output file; omit to print to stdout
    #[arg(short, long)]
    pub output: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
