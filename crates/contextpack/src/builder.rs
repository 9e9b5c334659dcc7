use std::fmt;

use yk_domain::context::ContextBlock;
use yk_domain::flags::{FlagSet, Marker};
use yk_markers::classify_order;

use crate::injection;
use crate::policy;
use crate::report::{PromptReport, SectionKind, SectionReport};

/// Text captured from the page for one operation.
#[derive(Debug, Clone, Copy)]
pub struct PromptInputs<'a> {
    /// Existing note text in the target field; may be empty.
    pub note_text: &'a str,
    pub order_text: &'a str,
    /// Prior-visit blocks, most recent first.
    pub history: &'a [ContextBlock],
    pub flags: FlagSet,
}

/// The fully assembled instruction text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptDocument(String);

impl PromptDocument {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }
}

impl fmt::Display for PromptDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PromptDocument {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Deterministic prompt builder.
///
/// Pure function: accepts already-captured page text and the flag set,
/// returns the assembled prompt plus a machine-readable report. No clock,
/// randomness, or environment is consulted.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn build(&self, inputs: &PromptInputs<'_>) -> (PromptDocument, PromptReport) {
        let mut assembler = Assembler::default();

        assembler.push(SectionKind::Role, policy::ROLE_STATEMENT.to_string());

        if !inputs.order_text.trim().is_empty() {
            assembler.push(
                SectionKind::Order,
                injection::format_order_section(inputs.order_text),
            );
        }

        let history_blocks = inputs.history.iter().filter(|b| !b.is_blank()).count();
        if let Some(history) = injection::format_history_section(inputs.history) {
            assembler.push(SectionKind::History, history);
        }

        assembler.push(SectionKind::Templates, policy::ORDER_TYPE_TEMPLATES.to_string());

        let profile = classify_order(inputs.order_text);
        if profile.needs_constipation_policy() {
            assembler.push(
                SectionKind::ConstipationPolicy,
                policy::CONSTIPATION_SUB_POLICY.to_string(),
            );
        }

        assembler.push(
            SectionKind::Packaging,
            injection::format_packaging_block(inputs.flags.get(Marker::InstitutionalPackaging)),
        );

        if let Some(notes) = injection::format_flag_notes(&inputs.flags) {
            assembler.push(SectionKind::FlagNotes, notes);
        }

        assembler.push(SectionKind::Constraints, policy::OUTPUT_CONSTRAINTS.to_string());
        assembler.push(SectionKind::Checklist, policy::CONSISTENCY_CHECKLIST.to_string());
        assembler.push(SectionKind::Note, injection::format_note_section(inputs.note_text));

        let document = PromptDocument(assembler.text);
        let report = PromptReport {
            sections: assembler.sections,
            history_blocks,
            flags: inputs.flags,
            constipation_risk: profile.constipation_risk,
            laxative: profile.laxative,
            total_chars: document.char_count(),
        };

        tracing::debug!(
            sections = report.sections.len(),
            history_blocks,
            constipation_policy = profile.needs_constipation_policy(),
            total_chars = report.total_chars,
            "prompt assembled"
        );

        (document, report)
    }
}

#[derive(Default)]
struct Assembler {
    text: String,
    sections: Vec<SectionReport>,
}

impl Assembler {
    fn push(&mut self, kind: SectionKind, body: String) {
        if !self.text.is_empty() {
            self.text.push('\n');
        }
        self.sections.push(SectionReport {
            kind,
            chars: body.chars().count(),
        });
        self.text.push_str(&body);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yk_domain::context::ContextLabel;

    fn inputs<'a>(order: &'a str, history: &'a [ContextBlock], flags: FlagSet) -> PromptInputs<'a> {
        PromptInputs {
            note_text: "S: 特になし",
            order_text: order,
            history,
            flags,
        }
    }

    #[test]
    fn identical_inputs_give_identical_documents() {
        let history = vec![ContextBlock::new(ContextLabel::PriorVisit1, "前回の処方")];
        let flags = FlagSet::default().with(Marker::RiskClassB, true);
        let a = PromptBuilder::new().build(&inputs("アムロジピン錠5mg", &history, flags));
        let b = PromptBuilder::new().build(&inputs("アムロジピン錠5mg", &history, flags));
        assert_eq!(a.0, b.0);
    }

    #[test]
    fn sections_appear_in_fixed_order() {
        let history = vec![ContextBlock::new(ContextLabel::PriorVisit1, "前回の処方")];
        let (doc, report) = PromptBuilder::new().build(&inputs("処方", &history, FlagSet::default()));
        let kinds: Vec<SectionKind> = report.sections.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SectionKind::Role,
                SectionKind::Order,
                SectionKind::History,
                SectionKind::Templates,
                SectionKind::Packaging,
                SectionKind::Constraints,
                SectionKind::Checklist,
                SectionKind::Note,
            ]
        );
        assert!(doc.as_str().starts_with(policy::ROLE_STATEMENT));
        assert!(doc.as_str().ends_with("薬歴内容：\nS: 特になし"));
    }

    #[test]
    fn empty_order_and_history_are_omitted() {
        let (_, report) = PromptBuilder::new().build(&PromptInputs {
            note_text: "",
            order_text: "  ",
            history: &[],
            flags: FlagSet::default(),
        });
        assert!(!report.includes(SectionKind::Order));
        assert!(!report.includes(SectionKind::History));
        assert!(report.includes(SectionKind::Note));
        assert_eq!(report.history_blocks, 0);
    }

    #[test]
    fn packaging_flag_switches_disclosure() {
        let on = FlagSet::default().with(Marker::InstitutionalPackaging, true);
        let (with, _) = PromptBuilder::new().build(&inputs("処方", &[], on));
        let (without, _) = PromptBuilder::new().build(&inputs("処方", &[], FlagSet::default()));

        assert!(with.as_str().contains(policy::PACKAGING_DISCLOSURE));
        assert!(!with.as_str().contains(policy::PACKAGING_PROHIBITION));
        assert!(without.as_str().contains(policy::PACKAGING_PROHIBITION));
        assert!(!without.as_str().contains(policy::PACKAGING_DISCLOSURE));
    }

    #[test]
    fn constipation_policy_requires_both_classes() {
        let both = "オキシコドン徐放錠5mg\nセンノシド錠12mg 便秘時";
        let (doc, report) = PromptBuilder::new().build(&inputs(both, &[], FlagSet::default()));
        assert!(doc.as_str().contains(policy::CONSTIPATION_SUB_POLICY));
        assert!(report.includes(SectionKind::ConstipationPolicy));

        let risk_only = "オキシコドン徐放錠5mg";
        let (doc, report) = PromptBuilder::new().build(&inputs(risk_only, &[], FlagSet::default()));
        assert!(!doc.as_str().contains(policy::CONSTIPATION_SUB_POLICY));
        assert!(!report.includes(SectionKind::ConstipationPolicy));
        assert!(report.constipation_risk);
    }

    #[test]
    fn flag_notes_only_when_non_packaging_marker_set() {
        let (_, report) = PromptBuilder::new().build(&inputs(
            "処方",
            &[],
            FlagSet::default().with(Marker::InstitutionalPackaging, true),
        ));
        assert!(!report.includes(SectionKind::FlagNotes));

        let (doc, report) = PromptBuilder::new().build(&inputs(
            "処方",
            &[],
            FlagSet::default().with(Marker::RiskClassC, true),
        ));
        assert!(report.includes(SectionKind::FlagNotes));
        assert!(doc.as_str().contains(policy::FLAG_NOTES_HEADER));
    }

    #[test]
    fn report_totals_match_document() {
        let (doc, report) = PromptBuilder::new().build(&inputs("処方", &[], FlagSet::default()));
        assert_eq!(report.total_chars, doc.char_count());
    }
}
