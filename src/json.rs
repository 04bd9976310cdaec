use crate::ast::*;
use crate::Simulation;

use std::fmt::Write;

/// JSON formatting style.
#[derive(Clone, Copy)]
pub enum JsonStyle {
    /// Compact: no whitespace between tokens.
    Compact,
    /// Pretty: 2-space indented, one entry per line.
    Pretty,
}

struct JsonWriter {
    buf: String,
    style: JsonStyle,
    depth: usize,
}

impl JsonWriter {
    fn new(style: JsonStyle) -> Self {
        JsonWriter {
            buf: String::new(),
            style,
            depth: 0,
        }
    }

    fn is_pretty(&self) -> bool {
        matches!(self.style, JsonStyle::Pretty)
    }

    fn newline(&mut self) {
        if self.is_pretty() {
            self.buf.push('\n');
            for _ in 0..self.depth {
                self.buf.push_str("  ");
            }
        }
    }

    fn space(&mut self) {
        if self.is_pretty() {
            self.buf.push(' ');
        }
    }

    fn begin(&mut self, open: char) {
        self.buf.push(open);
        self.depth += 1;
    }

    /// Close an object or array; `empty` keeps `{}` / `[]` on one line.
    fn end(&mut self, close: char, empty: bool) {
        self.depth -= 1;
        if !empty {
            self.newline();
        }
        self.buf.push(close);
    }

    fn write_statement(&mut self, stmt: &Statement) {
        self.begin('{');
        let mut first = true;
        match stmt {
            Statement::Output { keyword, fragments } => {
                self.entry_sep(&mut first);
                self.write_key("kind");
                self.write_string_value("output");
                self.entry_sep(&mut first);
                self.write_key("keyword");
                self.write_string_value(keyword.as_str());
                self.entry_sep(&mut first);
                self.write_key("fragments");
                self.begin('[');
                for (i, fragment) in fragments.iter().enumerate() {
                    if i > 0 {
                        self.buf.push(',');
                    }
                    self.newline();
                    self.write_fragment(fragment);
                }
                self.end(']', fragments.is_empty());
            }
            Statement::PassThrough(text) => {
                self.entry_sep(&mut first);
                self.write_key("kind");
                self.write_string_value("passThrough");
                self.entry_sep(&mut first);
                self.write_key("text");
                self.write_string_value(text);
            }
        }
        self.end('}', false);
    }

    fn write_fragment(&mut self, fragment: &Fragment) {
        let (kind, text) = match fragment {
            Fragment::StringLiteral(s) => ("string", s),
            Fragment::VariableReference(s) => ("variable", s),
            Fragment::RawToken(s) => ("raw", s),
        };
        self.begin('{');
        let mut first = true;
        self.entry_sep(&mut first);
        self.write_key("kind");
        self.write_string_value(kind);
        self.entry_sep(&mut first);
        self.write_key("text");
        self.write_string_value(text);
        self.end('}', false);
    }

    fn entry_sep(&mut self, first: &mut bool) {
        if *first {
            *first = false;
        } else {
            self.buf.push(',');
        }
        self.newline();
    }

    fn write_key(&mut self, key: &str) {
        self.write_string_value(key);
        self.buf.push(':');
        self.space();
    }

    fn write_string_value(&mut self, s: &str) {
        self.buf.push('"');
        for ch in s.chars() {
            match ch {
                '"' => self.buf.push_str("\\\""),
                '\\' => self.buf.push_str("\\\\"),
                '\n' => self.buf.push_str("\\n"),
                '\r' => self.buf.push_str("\\r"),
                '\t' => self.buf.push_str("\\t"),
                '\u{0008}' => self.buf.push_str("\\b"),
                '\u{000C}' => self.buf.push_str("\\f"),
                c if c < '\u{0020}' => {
                    write!(&mut self.buf, "\\u{:04x}", c as u32).unwrap();
                }
                c => self.buf.push(c),
            }
        }
        self.buf.push('"');
    }
}

/// Serialize a simulation result to compact JSON:
/// `{"output":…,"display":…,"statements":N,"outputStatements":M}`.
pub fn simulation_to_json(sim: &Simulation) -> String {
    let mut w = JsonWriter::new(JsonStyle::Compact);
    w.buf.push('{');
    w.write_key("output");
    w.write_string_value(&sim.output);
    w.buf.push(',');
    w.write_key("display");
    w.write_string_value(sim.display());
    w.buf.push(',');
    w.write_key("statements");
    write!(&mut w.buf, "{}", sim.statements).unwrap();
    w.buf.push(',');
    w.write_key("outputStatements");
    write!(&mut w.buf, "{}", sim.output_statements).unwrap();
    w.buf.push('}');
    w.buf
}

/// Serialize parsed statements to a JSON array.
pub fn statements_to_json(statements: &[Statement], style: JsonStyle) -> String {
    let mut w = JsonWriter::new(style);
    w.begin('[');
    for (i, stmt) in statements.iter().enumerate() {
        if i > 0 {
            w.buf.push(',');
        }
        w.newline();
        w.write_statement(stmt);
    }
    w.end(']', statements.is_empty());
    w.buf
}
