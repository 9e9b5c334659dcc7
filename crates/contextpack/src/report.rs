use serde::{Deserialize, Serialize};

use yk_domain::flags::FlagSet;

/// Identifies one section of the assembled prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Role,
    Order,
    History,
    Templates,
    ConstipationPolicy,
    Packaging,
    FlagNotes,
    Constraints,
    Checklist,
    Note,
}

/// Per-section entry within the prompt build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionReport {
    pub kind: SectionKind,
    pub chars: usize,
}

/// Full report of a prompt build, logged at debug level by the gateway.
/// Never carries the prompt text itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptReport {
    pub sections: Vec<SectionReport>,
    pub history_blocks: usize,
    pub flags: FlagSet,
    pub constipation_risk: bool,
    pub laxative: bool,
    pub total_chars: usize,
}

impl PromptReport {
    pub fn includes(&self, kind: SectionKind) -> bool {
        self.sections.iter().any(|s| s.kind == kind)
    }
}
