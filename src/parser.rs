use crate::ast::*;

/// Parser state for a single trimmed statement: tracks position in the text.
struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

/// Split normalized snippet text into statements.
///
/// Statements are delimited by `;`, trimmed, and dropped when blank. Parsing
/// never fails: anything that is not an output statement is pass-through text.
pub fn parse(normalized: &str) -> Vec<Statement> {
    normalized
        .split(';')
        .map(trim_blank)
        .filter(|text| !text.is_empty())
        .map(parse_statement)
        .collect()
}

fn parse_statement(text: &str) -> Statement {
    let mut parser = Parser { input: text, pos: 0 };
    match parser.eat_keyword() {
        Some(keyword) => Statement::Output {
            keyword,
            fragments: split_fragments(trim_blank(parser.remaining())),
        },
        None => Statement::PassThrough(text.to_string()),
    }
}

/// Split an output expression on `.` and `,` and classify each piece.
///
/// The split is purely textual: a `.` or `,` inside a quoted literal also
/// splits it.
pub fn split_fragments(expr: &str) -> Vec<Fragment> {
    expr.split(['.', ','])
        .map(trim_blank)
        .filter(|part| !part.is_empty())
        .map(classify_fragment)
        .collect()
}

/// Classify one trimmed fragment. Pure: the same text always yields the
/// same variant.
pub fn classify_fragment(text: &str) -> Fragment {
    if let Some(body) = string_literal_body(text) {
        return Fragment::StringLiteral(body.to_string());
    }
    if is_variable_reference(text) {
        return Fragment::VariableReference(text.to_string());
    }
    Fragment::RawToken(text.to_string())
}

/// Characters a literal may not contain.
const LINE_BREAKS: [char; 4] = ['\n', '\r', '\u{2028}', '\u{2029}'];

/// Blank for statement and fragment trimming: Unicode white space except
/// NEL (U+0085), plus the byte order mark (U+FEFF).
fn is_blank(ch: char) -> bool {
    (ch.is_whitespace() && ch != '\u{0085}') || ch == '\u{FEFF}'
}

fn trim_blank(text: &str) -> &str {
    text.trim_matches(is_blank)
}

/// The text between a matching pair of quotes wrapping the whole fragment.
/// A literal never spans a line break.
fn string_literal_body(text: &str) -> Option<&str> {
    let quote = text.chars().next()?;
    if quote != '"' && quote != '\'' {
        return None;
    }
    if text.len() < 2 || !text.ends_with(quote) || text.contains(LINE_BREAKS) {
        return None;
    }
    Some(&text[1..text.len() - 1])
}

/// `$` followed by an identifier, and nothing else.
fn is_variable_reference(text: &str) -> bool {
    let mut bytes = text.bytes();
    if bytes.next() != Some(b'$') {
        return false;
    }
    match bytes.next() {
        Some(b) if b.is_ascii_alphabetic() || b == b'_' => {}
        _ => return false,
    }
    bytes.all(|b| b.is_ascii_alphanumeric() || b == b'_')
}

impl<'a> Parser<'a> {
    // ── Helpers ──────────────────────────────────────────────────────

    fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek_char(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn advance(&mut self, n: usize) {
        self.pos += n;
    }

    fn skip_ws(&mut self) {
        while let Some(ch) = self.peek_char() {
            if !is_blank(ch) {
                break;
            }
            self.advance(ch.len_utf8());
        }
    }

    // ── Keywords ────────────────────────────────────────────────────

    /// Consume `echo` or `print` (any case) plus the whitespace after it.
    /// At least one whitespace character must follow, so `print_r(...)` and
    /// a bare `echo` are not output statements.
    fn eat_keyword(&mut self) -> Option<Keyword> {
        for keyword in Keyword::ALL {
            let word = keyword.as_str();
            let matches_word = self
                .remaining()
                .get(..word.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(word));
            if !matches_word {
                continue;
            }
            let start = self.pos;
            self.advance(word.len());
            if self.peek_char().is_some_and(is_blank) {
                self.skip_ws();
                return Some(keyword);
            }
            self.pos = start;
        }
        None
    }
}
