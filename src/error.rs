use std::fmt;

/// An error at a host boundary (CLI input). The simulator itself is total
/// and never produces one.
#[derive(Debug, Clone, PartialEq)]
pub struct SimError {
    pub code: String,
    pub message: String,
}

impl SimError {
    /// Reading the snippet from `source` (a path, or `<stdin>`) failed.
    pub fn read_failed(source: &str, err: &std::io::Error) -> Self {
        SimError {
            code: "read-failed".to_string(),
            message: format!("cannot read {}: {}", source, err),
        }
    }

    pub fn invalid_utf8(source: &str, err: &std::string::FromUtf8Error) -> Self {
        SimError {
            code: "invalid-utf8".to_string(),
            message: format!(
                "{} is not valid UTF-8 (at byte {})",
                source,
                err.utf8_error().valid_up_to()
            ),
        }
    }
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.code)
    }
}

impl std::error::Error for SimError {}
