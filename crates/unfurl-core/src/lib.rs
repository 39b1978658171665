//! Unfurl Core Types and Definitions
//!
//! This crate provides the foundational types for the unfurl diagram
//! engine. It includes:
//!
//! - **Identifiers**: Validated diagram node identifiers ([`identifier::NodeId`])
//! - **Semantic**: The statement model for the flowchart DSL subset ([`semantic`] module)

pub mod identifier;
pub mod semantic;
