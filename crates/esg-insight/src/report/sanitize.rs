/// Drops every character the PDF fonts cannot shape.
///
/// Kept: CJK unified ideographs, ASCII letters and digits, whitespace, and a
/// small set of Latin and full-width punctuation.
pub fn sanitize(text: &str) -> String {
    text.chars().filter(|ch| is_allowed(*ch)).collect()
}

pub fn is_allowed(ch: char) -> bool {
    matches!(ch, '\u{4e00}'..='\u{9fff}')
        || ch.is_ascii_alphanumeric()
        || ch.is_whitespace()
        || matches!(
            ch,
            '.' | ','
                | ';'
                | ':'
                | '!'
                | '?'
                | '('
                | ')'
                | '（'
                | '）'
                | '【'
                | '】'
                | '-'
                | '%'
                | '/'
                | '+'
                | '\''
                | '"'
                | '。'
                | '，'
        )
}
