//! Width/case folding tokenizer shared by every rule table.

/// One folded unit of input text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// A non-whitespace character after folding.
    Char(char),
    /// A run of one or more whitespace characters.
    Space,
}

/// Half-width katakana U+FF66..=U+FF9D, in code point order, mapped to
/// their full-width forms.
const HALF_WIDTH_KATAKANA: &str = "ヲァィゥェォャュョッーアイウエオカキクケコサシスセソタチツテトナニヌネノハヒフヘホマミムメモヤユヨラリルレロワン";

const HALF_WIDTH_VOICED_MARK: char = '\u{FF9E}';
const HALF_WIDTH_SEMI_VOICED_MARK: char = '\u{FF9F}';

/// Fold a single character: full-width ASCII to ASCII, half-width katakana
/// to full-width, latin to lowercase, ideographic space to ASCII space.
pub fn fold_char(c: char) -> char {
    let folded = match c {
        '\u{3000}' => ' ',
        '\u{FF01}'..='\u{FF5E}' => char::from_u32(c as u32 - 0xFEE0).unwrap_or(c),
        '\u{FF66}'..='\u{FF9D}' => {
            let idx = (c as u32 - 0xFF66) as usize;
            HALF_WIDTH_KATAKANA.chars().nth(idx).unwrap_or(c)
        }
        '\u{FF61}' => '。',
        '\u{FF62}' => '「',
        '\u{FF63}' => '」',
        '\u{FF64}' => '、',
        '\u{FF65}' => '・',
        _ => c,
    };
    folded.to_ascii_lowercase()
}

/// Compose a full-width katakana base with a following half-width (semi-)
/// voiced mark, e.g. `ｶﾞ` → `ガ`, `ﾊﾟ` → `パ`.
fn compose_voiced(base: char, mark: char) -> Option<char> {
    let code = base as u32;
    let voiceable = matches!(base,
        'カ' | 'キ' | 'ク' | 'ケ' | 'コ' | 'サ' | 'シ' | 'ス' | 'セ' | 'ソ'
        | 'タ' | 'チ' | 'ツ' | 'テ' | 'ト' | 'ハ' | 'ヒ' | 'フ' | 'ヘ' | 'ホ');
    let semi_voiceable = matches!(base, 'ハ' | 'ヒ' | 'フ' | 'ヘ' | 'ホ');

    match mark {
        HALF_WIDTH_VOICED_MARK if base == 'ウ' => Some('ヴ'),
        HALF_WIDTH_VOICED_MARK if voiceable => char::from_u32(code + 1),
        HALF_WIDTH_SEMI_VOICED_MARK if semi_voiceable => char::from_u32(code + 2),
        _ => None,
    }
}

/// Fold `text` into tokens. Consecutive whitespace collapses to one
/// [`Token::Space`]; the input is never modified.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens: Vec<Token> = Vec::with_capacity(text.len());

    for raw in text.chars() {
        if raw == HALF_WIDTH_VOICED_MARK || raw == HALF_WIDTH_SEMI_VOICED_MARK {
            if let Some(Token::Char(prev)) = tokens.last().copied() {
                if let Some(composed) = compose_voiced(prev, raw) {
                    tokens.pop();
                    tokens.push(Token::Char(composed));
                    continue;
                }
            }
        }

        let c = fold_char(raw);
        if c.is_whitespace() {
            if tokens.last() != Some(&Token::Space) {
                tokens.push(Token::Space);
            }
        } else {
            tokens.push(Token::Char(c));
        }
    }

    tokens
}

/// A compiled pattern: the folded constituent characters of a marker or
/// drug name. Whitespace inside the source pattern is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    chars: Vec<char>,
    bounded: bool,
}

impl Pattern {
    pub fn compile(source: &str) -> Self {
        let chars = tokenize(source)
            .into_iter()
            .filter_map(|t| match t {
                Token::Char(c) => Some(c),
                Token::Space => None,
            })
            .collect();
        Self {
            chars,
            bounded: false,
        }
    }

    /// Like [`Pattern::compile`], but a match must also end at a word
    /// boundary (see [`Pattern::is_found_in`]). Used for short markers that
    /// would otherwise fire inside ordinary words.
    pub fn compile_bounded(source: &str) -> Self {
        Self {
            bounded: true,
            ..Self::compile(source)
        }
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Whether the pattern occurs in `tokens`, allowing any whitespace
    /// between (never before or after) its constituents.
    ///
    /// A bounded pattern must also end at a word boundary: the next character
    /// may not be of the same script as its last constituent, so `内ハ` is
    /// not found in `内 ハルシオン` while `支B` is still found in `支B内服`.
    pub fn is_found_in(&self, tokens: &[Token]) -> bool {
        let (Some(&first), Some(&last)) = (self.chars.first(), self.chars.last()) else {
            return false;
        };

        tokens.iter().enumerate().any(|(start, tok)| {
            if *tok != Token::Char(first) {
                return false;
            }
            let rest = &tokens[start + 1..];
            match self.match_len(rest) {
                Some(len) => !self.bounded || ends_at_boundary(last, rest.get(len)),
                None => false,
            }
        })
    }

    /// Number of tokens of `rest` consumed by the constituents after the
    /// first, or `None` if they do not follow.
    fn match_len(&self, rest: &[Token]) -> Option<usize> {
        let mut pos = 0;
        for &want in &self.chars[1..] {
            if rest.get(pos) == Some(&Token::Space) {
                pos += 1;
            }
            match rest.get(pos) {
                Some(Token::Char(c)) if *c == want => pos += 1,
                _ => return None,
            }
        }
        Some(pos)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Script {
    Alphanumeric,
    Kana,
    Kanji,
}

fn script(c: char) -> Option<Script> {
    match c {
        _ if c.is_ascii_alphanumeric() => Some(Script::Alphanumeric),
        '\u{3041}'..='\u{309F}' | '\u{30A0}'..='\u{30FA}' | '\u{30FC}'..='\u{30FF}' => Some(Script::Kana),
        '\u{3400}'..='\u{4DBF}' | '\u{4E00}'..='\u{9FFF}' => Some(Script::Kanji),
        _ => None,
    }
}

fn ends_at_boundary(last: char, next: Option<&Token>) -> bool {
    match (script(last), next) {
        (Some(want), Some(Token::Char(n))) => script(*n) != Some(want),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_width_ascii_folds() {
        assert_eq!(fold_char('Ｂ'), 'b');
        assert_eq!(fold_char('３'), '3');
        assert_eq!(fold_char('ａ'), 'a');
    }

    #[test]
    fn half_width_katakana_folds() {
        assert_eq!(fold_char('ﾊ'), 'ハ');
        assert_eq!(fold_char('ﾛ'), 'ロ');
        assert_eq!(fold_char('ｦ'), 'ヲ');
        assert_eq!(fold_char('ﾝ'), 'ン');
    }

    #[test]
    fn voiced_marks_compose() {
        let tokens = tokenize("ｾﾝﾉｼﾄﾞ");
        let text: String = tokens
            .iter()
            .filter_map(|t| match t {
                Token::Char(c) => Some(*c),
                Token::Space => None,
            })
            .collect();
        assert_eq!(text, "センノシド");
        assert_eq!(tokenize("ﾋﾟｺ")[0], Token::Char('ピ'));
        assert_eq!(tokenize("ｳﾞ")[0], Token::Char('ヴ'));
    }

    #[test]
    fn whitespace_runs_collapse() {
        assert_eq!(
            tokenize("a \u{3000}\tb"),
            vec![Token::Char('a'), Token::Space, Token::Char('b')]
        );
    }

    #[test]
    fn pattern_allows_interior_whitespace_only() {
        let p = Pattern::compile("特3A");
        assert!(p.is_found_in(&tokenize("特 3　A")));
        assert!(p.is_found_in(&tokenize("加算:特３ａ算定")));
        assert!(!p.is_found_in(&tokenize("特3")));
        assert!(!p.is_found_in(&tokenize("特-3A")));
    }

    #[test]
    fn pattern_retries_after_partial_match() {
        let p = Pattern::compile("支B");
        assert!(p.is_found_in(&tokenize("支援 支B")));
    }

    #[test]
    fn match_must_end_at_a_script_boundary() {
        let ha = Pattern::compile_bounded("内ハ");
        assert!(Pattern::compile("内ハ").is_found_in(&tokenize("内 ハルシオン")));
        assert!(!ha.is_found_in(&tokenize("内 ハルシオン錠0.25mg 1錠")));
        assert!(ha.is_found_in(&tokenize("内ハ 頓服")));
        assert!(ha.is_found_in(&tokenize("内ハ頓服")));

        let packaging = Pattern::compile_bounded("支B");
        assert!(packaging.is_found_in(&tokenize("支B内服+2")));
        assert!(!packaging.is_found_in(&tokenize("支Bx")));
        assert!(!Pattern::compile_bounded("特3A").is_found_in(&tokenize("特3A1")));
    }

    #[test]
    fn empty_pattern_never_matches() {
        assert!(!Pattern::compile("  ").is_found_in(&tokenize("anything")));
    }
}
