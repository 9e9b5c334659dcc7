use serde::{Deserialize, Serialize};

/// Optional pipeline behaviours, selected by the integration rather than by
/// maintaining separate pipeline variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineCapabilities {
    /// Capture up to two prior-visit blocks instead of only the first.
    pub multi_visit_history: bool,
    /// Forward question lines from the Plan section to the secondary field.
    pub followup_extraction: bool,
    /// Run marker detection over annotation spans nested in the order block.
    pub annotation_scan: bool,
}

impl Default for PipelineCapabilities {
    fn default() -> Self {
        Self {
            multi_visit_history: true,
            followup_extraction: true,
            annotation_scan: true,
        }
    }
}

impl PipelineCapabilities {
    /// The single-visit, replace-only behaviour of the first release.
    pub fn minimal() -> Self {
        Self {
            multi_visit_history: false,
            followup_extraction: false,
            annotation_scan: false,
        }
    }

    /// How many prior-visit blocks the locator captures.
    pub fn max_prior_visits(&self) -> usize {
        if self.multi_visit_history {
            2
        } else {
            1
        }
    }
}
