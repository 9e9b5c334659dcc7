//! Declarative marker table.

use yk_domain::flags::Marker;

/// A marker and the canonical text that signals it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerRule {
    pub marker: Marker,
    pub pattern: &'static str,
}

/// One rule per [`Marker`]. Patterns are written in canonical (full-width
/// kanji/kana, half-width latin and digits) form; the tokenizer folds both
/// sides, so variants need no separate entries.
pub const MARKER_RULES: &[MarkerRule] = &[
    MarkerRule {
        marker: Marker::InstitutionalPackaging,
        pattern: "支B",
    },
    MarkerRule {
        marker: Marker::RiskClassB,
        pattern: "特B",
    },
    MarkerRule {
        marker: Marker::RiskClass3A,
        pattern: "特3A",
    },
    MarkerRule {
        marker: Marker::RiskClass3B,
        pattern: "特3B",
    },
    MarkerRule {
        marker: Marker::RiskClassC,
        pattern: "特C",
    },
    MarkerRule {
        marker: Marker::OralDoseTypeHa,
        pattern: "内ハ",
    },
    MarkerRule {
        marker: Marker::OralDoseTypeRo,
        pattern: "内ロ",
    },
];
