use yk_domain::context::ContextBlock;
use yk_domain::flags::{FlagSet, Marker};

use crate::policy;

/// Format the current-order section. The order text is inserted verbatim.
pub fn format_order_section(order_text: &str) -> String {
    format!(
        "\
■ 今回の処方内容：
{order_text}

"
    )
}

/// Format the prior-visit section, one labeled sub-block per visit.
/// Blank blocks are skipped; returns `None` when nothing remains.
pub fn format_history_section(history: &[ContextBlock]) -> Option<String> {
    let blocks: Vec<String> = history
        .iter()
        .filter(|b| !b.is_blank())
        .map(|b| format!("【{}】\n{}\n", b.label.heading(), b.text))
        .collect();

    if blocks.is_empty() {
        return None;
    }

    Some(format!(
        "\
■ 過去の処方・薬歴データ：
{}
",
        blocks.join("\n")
    ))
}

/// Format the packaging rule. Exactly one of the mandate or the
/// prohibition is emitted.
pub fn format_packaging_block(packaging: bool) -> String {
    if packaging {
        format!(
            "\
{}
- 一包化: 記載する
- SOAPのどこか適切な箇所に必ず以下を記載すること：
  「{}」
",
            policy::PACKAGING_HEADER,
            policy::PACKAGING_DISCLOSURE
        )
    } else {
        format!(
            "\
{}
- 一包化: 記載しない
{}
",
            policy::PACKAGING_HEADER,
            policy::PACKAGING_PROHIBITION
        )
    }
}

/// Fixed instruction line for a confirmed marker, if that marker carries one.
pub fn flag_instruction(marker: Marker) -> Option<&'static str> {
    match marker {
        Marker::InstitutionalPackaging => None,
        Marker::RiskClassB => Some(
            "- 特定薬剤管理指導の対象薬（ハイリスク薬）が含まれる。Aに該当薬の注意点を確認した旨を記載すること",
        ),
        Marker::RiskClass3A => Some(
            "- 医薬品リスク管理計画（RMP）に基づく指導の対象。RMP資材を用いて説明した旨をOに記載すること",
        ),
        Marker::RiskClass3B => Some(
            "- 後発医薬品への変更等に関する説明の対象。説明を行った旨をOに記載すること",
        ),
        Marker::RiskClassC => Some(
            "- 服用薬剤の調整支援の対象。重複投与や減薬の検討を行った旨をAに記載すること",
        ),
        Marker::OralDoseTypeHa => Some(
            "- 内服薬の調剤区分がハ（頓服）である。頓用の使用状況と使用回数をOに記載すること",
        ),
        Marker::OralDoseTypeRo => Some(
            "- 内服薬の調剤区分がロ（浸煎薬・湯薬）である。服用方法を理解している旨をOに記載すること",
        ),
    }
}

/// Format the confirmed-flags section for every set marker that carries an
/// instruction. Returns `None` when no such marker is set.
pub fn format_flag_notes(flags: &FlagSet) -> Option<String> {
    let lines: Vec<&str> = flags
        .present()
        .into_iter()
        .filter_map(flag_instruction)
        .collect();

    if lines.is_empty() {
        return None;
    }

    Some(format!("{}\n{}\n", policy::FLAG_NOTES_HEADER, lines.join("\n")))
}

/// Format the trailing note section. An empty note yields a header with no
/// body, which the role statement tells the model to treat as "create new".
pub fn format_note_section(note_text: &str) -> String {
    format!("{}\n{note_text}", policy::NOTE_HEADER)
}
