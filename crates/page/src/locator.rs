//! Captures the page context for one operation.

use yk_domain::config::PageConfig;
use yk_domain::context::{ContextBlock, ContextLabel};
use yk_markers::FlagDetector;
use yk_protocol::FieldContext;

use crate::dom::{Document, NodeHandle};

/// Reads the pinned field and the configured context regions.
#[derive(Debug, Clone)]
pub struct FieldLocator {
    layout: PageConfig,
    detector: FlagDetector,
}

impl FieldLocator {
    pub fn new(layout: PageConfig) -> Self {
        Self {
            layout,
            detector: FlagDetector::new(),
        }
    }

    pub fn layout(&self) -> &PageConfig {
        &self.layout
    }

    /// Snapshot the page for `target`. Without a target only `value: None`
    /// is reported and nothing else is read.
    pub fn capture(&self, doc: &Document, target: Option<NodeHandle>) -> FieldContext {
        let Some(value) = target.and_then(|t| doc.text_of(t)) else {
            return FieldContext::no_field();
        };

        let order_block = doc.get_element_by_id(&self.layout.order_block_id);
        let order = order_block
            .and_then(|h| doc.text_of(h))
            .unwrap_or_default()
            .trim()
            .to_string();

        let mut fragments: Vec<&str> = vec![order.as_str()];
        if self.layout.capabilities.annotation_scan {
            if let Some(element) = order_block.and_then(|h| doc.element(h)) {
                fragments.extend(element.annotations().iter().map(String::as_str));
            }
        }
        let flags = self.detector.detect(fragments);

        let history = self.capture_history(doc);

        tracing::debug!(
            order_chars = order.chars().count(),
            history_blocks = history.len(),
            flags = ?flags.present(),
            "captured field context"
        );

        FieldContext {
            value: Some(value.to_string()),
            order,
            history,
            flags,
        }
    }

    /// Prior-visit blocks in configured order, capped by the capability,
    /// with marker-bearing lines removed. Missing or blank blocks are skipped.
    fn capture_history(&self, doc: &Document) -> Vec<ContextBlock> {
        let max = self.layout.capabilities.max_prior_visits();
        self.layout
            .history_block_ids
            .iter()
            .take(max)
            .zip(ContextLabel::PRIOR_VISITS)
            .filter_map(|(id, label)| {
                let raw = doc.get_element_by_id(id).and_then(|h| doc.text_of(h))?;
                let text = self.detector.strip_marker_lines(raw);
                (!text.is_empty()).then(|| ContextBlock::new(label, text))
            })
            .collect()
    }
}
