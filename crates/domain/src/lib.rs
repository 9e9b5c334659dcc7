//! Shared types, configuration, and the error taxonomy for yakureki-assist.

pub mod capability;
pub mod config;
pub mod context;
pub mod error;
pub mod flags;
pub mod provider;
