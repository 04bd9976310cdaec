use crate::ast::*;
use crate::parser;

/// How resolved output is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Plain text. `\n` becomes a line break, `\t` an EM SPACE (U+2003).
    #[default]
    Text,
    /// Markup-safe: all snippet text is HTML-escaped, `\n` becomes `<br/>`
    /// and `\t` becomes `&emsp;`.
    Html,
}

/// Wide space marker emitted for `\t` in plain text output.
pub const WIDE_SPACE: char = '\u{2003}';

/// Append-only output buffer for one run.
struct Output {
    buf: String,
    format: OutputFormat,
}

impl Output {
    fn push_char(&mut self, ch: char) {
        match (self.format, ch) {
            (OutputFormat::Html, '&') => self.buf.push_str("&amp;"),
            (OutputFormat::Html, '<') => self.buf.push_str("&lt;"),
            (OutputFormat::Html, '>') => self.buf.push_str("&gt;"),
            (OutputFormat::Html, '"') => self.buf.push_str("&quot;"),
            (OutputFormat::Html, '\'') => self.buf.push_str("&#39;"),
            _ => self.buf.push(ch),
        }
    }

    fn push_text(&mut self, text: &str) {
        for ch in text.chars() {
            self.push_char(ch);
        }
    }

    fn push_line_break(&mut self) {
        match self.format {
            OutputFormat::Text => self.buf.push('\n'),
            OutputFormat::Html => self.buf.push_str("<br/>"),
        }
    }

    fn push_wide_space(&mut self) {
        match self.format {
            OutputFormat::Text => self.buf.push(WIDE_SPACE),
            OutputFormat::Html => self.buf.push_str("&emsp;"),
        }
    }
}

/// Resolve normalized snippet text into plain-text output.
///
/// Total: every input, including the empty string, yields a string.
pub fn interpret(normalized: &str) -> String {
    execute(&parser::parse(normalized), OutputFormat::Text)
}

/// Render parsed statements in source order with no separator between them.
pub fn execute(statements: &[Statement], format: OutputFormat) -> String {
    let mut out = Output {
        buf: String::new(),
        format,
    };
    for stmt in statements {
        execute_statement(stmt, &mut out);
    }
    out.buf
}

fn execute_statement(stmt: &Statement, out: &mut Output) {
    match stmt {
        Statement::Output { fragments, .. } => {
            for fragment in fragments {
                resolve_fragment(fragment, out);
            }
        }
        Statement::PassThrough(text) => out.push_text(text),
    }
}

fn resolve_fragment(fragment: &Fragment, out: &mut Output) {
    match fragment {
        Fragment::StringLiteral(body) => resolve_escapes(body, out),
        // No bindings exist, so a variable is shown as `[$name]`.
        Fragment::VariableReference(name) => {
            out.push_char('[');
            out.push_text(name);
            out.push_char(']');
        }
        Fragment::RawToken(text) => out.push_text(text),
    }
}

/// Resolve `\n`, `\t`, `\"` and `\'`. Any other backslash is kept as-is and
/// does not consume the character after it.
fn resolve_escapes(body: &str, out: &mut Output) {
    let mut chars = body.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push_char(ch);
            continue;
        }
        match chars.peek() {
            Some('n') => {
                chars.next();
                out.push_line_break();
            }
            Some('t') => {
                chars.next();
                out.push_wide_space();
            }
            Some(&quote) if quote == '"' || quote == '\'' => {
                chars.next();
                out.push_char(quote);
            }
            _ => out.push_char('\\'),
        }
    }
}
