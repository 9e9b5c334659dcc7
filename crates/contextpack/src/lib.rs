//! Deterministic prompt assembly for the SOAP note assistant.

pub mod builder;
pub mod injection;
pub mod policy;
pub mod report;

pub use builder::{PromptBuilder, PromptDocument, PromptInputs};
pub use report::{PromptReport, SectionKind};
