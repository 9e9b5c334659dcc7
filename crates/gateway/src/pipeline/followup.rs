//! Follow-up question extraction from the Plan section of a generated note.

use std::sync::LazyLock;

use regex::Regex;

/// Leading bullet markers. The middle dot and bullet may touch the text;
/// dash-like markers need whitespace so that a leading long-vowel mark or a
/// negative number is left alone.
static BULLET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[・•]\s*|[-*‐－ー]\s+)").expect("valid regex"));

/// Section letter of a SOAP header, folded to half-width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoapSection {
    Subjective,
    Objective,
    Assessment,
    Plan,
}

impl SoapSection {
    fn from_char(c: char) -> Option<Self> {
        match c {
            'S' | 'Ｓ' => Some(SoapSection::Subjective),
            'O' | 'Ｏ' => Some(SoapSection::Objective),
            'A' | 'Ａ' => Some(SoapSection::Assessment),
            'P' | 'Ｐ' => Some(SoapSection::Plan),
            _ => None,
        }
    }
}

/// Recognise a section header at the start of `line`.
///
/// Accepted forms: `P`, `P:`, `P：`, `P（計画）`, `P(Plan):`, `【P】`, `[P]`,
/// `【P（計画）】`, `【P】（計画）`,
/// with the letter in half- or full-width. Returns the section and whatever
/// text follows the header on the same line.
pub fn parse_header(line: &str) -> Option<(SoapSection, &str)> {
    let mut rest = line.trim_start();

    let bracket_close = if let Some(r) = rest.strip_prefix('【') {
        rest = r;
        Some('】')
    } else if let Some(r) = rest.strip_prefix('[') {
        rest = r;
        Some(']')
    } else {
        None
    };

    let letter = rest.chars().next()?;
    let section = SoapSection::from_char(letter)?;
    rest = &rest[letter.len_utf8()..];

    let mut delimited = false;
    let mut titled = false;
    if let Some(after) = strip_title(rest) {
        rest = after;
        titled = true;
        delimited = true;
    }

    if let Some(close) = bracket_close {
        rest = rest.trim_start().strip_prefix(close)?;
        delimited = true;
        if !titled {
            if let Some(after) = strip_title(rest) {
                rest = after;
            }
        }
    }

    let trimmed = rest.trim_start();
    if let Some(after) = trimmed.strip_prefix(':').or_else(|| trimmed.strip_prefix('：')) {
        rest = after;
        delimited = true;
    }

    if delimited || rest.trim().is_empty() {
        Some((section, rest.trim()))
    } else {
        None
    }
}

/// A parenthesised title such as `（計画）` or `(Plan)` at the start of `s`,
/// returning the text after it.
fn strip_title(s: &str) -> Option<&str> {
    let trimmed = s.trim_start();
    let inner = trimmed
        .strip_prefix('（')
        .or_else(|| trimmed.strip_prefix('('))?;
    let end = inner.find(['）', ')'])?;
    let close_len = inner[end..].chars().next().map_or(1, char::len_utf8);
    Some(&inner[end + close_len..])
}

/// Strip one leading bullet marker and surrounding whitespace.
pub fn strip_bullet(line: &str) -> &str {
    let trimmed = line.trim();
    match BULLET_RE.find(trimmed) {
        Some(m) => trimmed[m.end()..].trim(),
        None => trimmed,
    }
}

fn is_question(line: &str) -> bool {
    line.ends_with('？') || line.ends_with('?')
}

/// Question lines from the Plan section, in order, bullets removed.
///
/// The section runs from its header to the next recognised header or the
/// end of the text. Text on the header line itself counts as the first line.
pub fn extract_followups(note: &str) -> Vec<String> {
    let mut in_plan = false;
    let mut questions = Vec::new();

    for raw in note.lines() {
        let body = match parse_header(raw) {
            Some((section, rest)) => {
                in_plan = section == SoapSection::Plan;
                rest
            }
            None => raw,
        };

        if !in_plan {
            continue;
        }

        let line = strip_bullet(body);
        if is_question(line) {
            questions.push(line.to_string());
        }
    }

    questions
}
