//! Intermediate representation produced by the parser and consumed by the
//! interpreter.

/// One of the two statement prefixes that trigger fragment resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Echo,
    Print,
}

impl Keyword {
    pub const ALL: [Keyword; 2] = [Keyword::Echo, Keyword::Print];

    /// The lowercase spelling of the keyword.
    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Echo => "echo",
            Keyword::Print => "print",
        }
    }
}

/// A sub-unit of an output expression, separated by `.` or `,`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// Quoted text with the delimiting quotes stripped.
    /// Escape sequences are still raw; they are resolved when rendering.
    StringLiteral(String),
    /// `$identifier`, sigil included. Rendered as a placeholder, never a value.
    VariableReference(String),
    /// Numbers, bare identifiers, operator residue. Emitted verbatim.
    RawToken(String),
}

/// A `;`-delimited, non-blank unit of the normalized snippet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// `echo expr` / `print expr`
    Output {
        keyword: Keyword,
        fragments: Vec<Fragment>,
    },
    /// Anything else, trimmed.
    PassThrough(String),
}

impl Statement {
    pub fn is_output(&self) -> bool {
        matches!(self, Statement::Output { .. })
    }
}
