use once_cell::sync::Lazy;
use regex::Regex;

/// `<?php` and `?>` are deleted wherever they appear; they are not paired.
static DELIMITERS: Lazy<Regex> = Lazy::new(|| Regex::new(r"<\?php|\?>").unwrap());

/// `// ...` up to (not including) the line break. CRLF mode keeps the `\r`
/// of a `\r\n` ending.
static SLASH_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?mR)//.*$").unwrap());

/// `# ...` up to (not including) the line break.
static HASH_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?mR)#.*$").unwrap());

/// `/* ... */`, shortest span, may cross lines.
static BLOCK_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)/\*.*?\*/").unwrap());

/// Strip script delimiters and comments from a raw snippet.
///
/// Each pass runs in a fixed order: delimiters, `//` comments, `#` comments,
/// block comments. Passes repeat until the text stops changing, since a
/// deletion can join the halves of a delimiter or comment marker; the result
/// holds neither, and normalizing it again is a no-op. String literals are
/// not tokenized first, so a comment marker inside a literal truncates the
/// rest of its line.
pub fn normalize(raw: &str) -> String {
    let mut text = raw.to_string();
    loop {
        let next = normalize_pass(&text);
        if next == text {
            return next;
        }
        text = next;
    }
}

fn normalize_pass(text: &str) -> String {
    let text = strip_delimiters(text.to_string());
    let text = SLASH_COMMENT.replace_all(&text, "");
    let text = HASH_COMMENT.replace_all(&text, "");
    BLOCK_COMMENT.replace_all(&text, "").into_owned()
}

/// Delete delimiters until none remain; a deletion may join `<?` and `php`.
fn strip_delimiters(mut text: String) -> String {
    while DELIMITERS.is_match(&text) {
        text = DELIMITERS.replace_all(&text, "").into_owned();
    }
    text
}
