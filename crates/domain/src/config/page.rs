use serde::{Deserialize, Serialize};

use crate::capability::PipelineCapabilities;
use crate::context::EditMode;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Host page layout
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Where the page context finds its context blocks, and which optional
/// pipeline behaviours are enabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageConfig {
    /// Element id of the current-order block.
    #[serde(default = "d_order_block_id")]
    pub order_block_id: String,
    /// Element ids of the prior-visit blocks, most recent first.
    #[serde(default = "d_history_block_ids")]
    pub history_block_ids: Vec<String>,
    /// Element id of the secondary (follow-up) field.
    #[serde(default = "d_followup_field_id")]
    pub followup_field_id: String,
    /// How generated notes are written into the target field.
    #[serde(default)]
    pub edit_mode: EditMode,
    #[serde(default)]
    pub capabilities: PipelineCapabilities,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            order_block_id: d_order_block_id(),
            history_block_ids: d_history_block_ids(),
            followup_field_id: d_followup_field_id(),
            edit_mode: EditMode::default(),
            capabilities: PipelineCapabilities::default(),
        }
    }
}

fn d_order_block_id() -> String {
    "this-time".into()
}

fn d_history_block_ids() -> Vec<String> {
    vec!["left".into()]
}

fn d_followup_field_id() -> String {
    "followup".into()
}
