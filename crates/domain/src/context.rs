use serde::{Deserialize, Serialize};

/// Which page region a [`ContextBlock`] was captured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContextLabel {
    #[serde(rename = "current-order")]
    CurrentOrder,
    #[serde(rename = "prior-visit-1")]
    PriorVisit1,
    #[serde(rename = "prior-visit-2")]
    PriorVisit2,
}

impl ContextLabel {
    /// Prior-visit labels in capture order.
    pub const PRIOR_VISITS: [ContextLabel; 2] = [ContextLabel::PriorVisit1, ContextLabel::PriorVisit2];

    /// Heading used when the block is rendered into a prompt.
    pub fn heading(self) -> &'static str {
        match self {
            ContextLabel::CurrentOrder => "今回の処方",
            ContextLabel::PriorVisit1 => "前回",
            ContextLabel::PriorVisit2 => "前々回",
        }
    }
}

/// Labeled text snapshot taken from a page region at request time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextBlock {
    pub label: ContextLabel,
    pub text: String,
}

impl ContextBlock {
    pub fn new(label: ContextLabel, text: impl Into<String>) -> Self {
        Self {
            label,
            text: text.into(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// How generated text is written into the target field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EditMode {
    #[default]
    Replace,
    AppendAfterExisting,
}
