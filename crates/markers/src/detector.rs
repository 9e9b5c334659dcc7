use yk_domain::flags::{FlagSet, Marker};

use crate::normalize::{tokenize, Pattern, Token};
use crate::rules::{MarkerRule, MARKER_RULES};

/// Scans text fragments for the fixed marker set.
///
/// Pure: the same fragments always yield the same [`FlagSet`], and inputs
/// are only borrowed.
#[derive(Debug, Clone)]
pub struct FlagDetector {
    rules: Vec<(Marker, Pattern)>,
}

impl Default for FlagDetector {
    fn default() -> Self {
        Self::with_rules(MARKER_RULES)
    }
}

impl FlagDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rules(rules: &[MarkerRule]) -> Self {
        Self {
            rules: rules
                .iter()
                .map(|r| (r.marker, Pattern::compile_bounded(r.pattern)))
                .collect(),
        }
    }

    /// A marker is present if any fragment contains it.
    pub fn detect<'a, I>(&self, fragments: I) -> FlagSet
    where
        I: IntoIterator<Item = &'a str>,
    {
        fragments
            .into_iter()
            .fold(FlagSet::default(), |acc, fragment| {
                acc.union(self.detect_tokens(&tokenize(fragment)))
            })
    }

    pub fn detect_text(&self, text: &str) -> FlagSet {
        self.detect([text])
    }

    fn detect_tokens(&self, tokens: &[Token]) -> FlagSet {
        self.rules
            .iter()
            .fold(FlagSet::default(), |acc, (marker, pattern)| {
                if pattern.is_found_in(tokens) {
                    acc.with(*marker, true)
                } else {
                    acc
                }
            })
    }

    /// Whether `line` carries any marker.
    pub fn line_has_marker(&self, line: &str) -> bool {
        self.detect_text(line).any()
    }

    /// Drop every line that carries a marker; the rest is rejoined with
    /// `\n` and trimmed.
    pub fn strip_marker_lines(&self, text: &str) -> String {
        let kept: Vec<&str> = text
            .lines()
            .filter(|line| !self.line_has_marker(line))
            .collect();
        let dropped = text.lines().count() - kept.len();
        if dropped > 0 {
            tracing::debug!(dropped, "stripped marker lines from prior-visit text");
        }
        kept.join("\n").trim().to_string()
    }
}
