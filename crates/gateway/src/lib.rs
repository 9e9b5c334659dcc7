//! Orchestrator for the SOAP note brush-up: accepts page connections, runs
//! the per-operation pipeline, and dispatches prompts to the configured
//! provider.

pub mod api;
pub mod bootstrap;
pub mod cli;
pub mod pages;
pub mod pipeline;
pub mod settings;
pub mod state;
