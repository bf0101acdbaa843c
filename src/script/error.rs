use std::fmt;

/// Syntax or evaluation failure in a paint script, located by byte offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptError {
    /// Byte offset into the script source.
    pub offset: usize,
    /// What went wrong.
    pub message: String,
}

impl ScriptError {
    /// Error at `offset`.
    pub fn new(offset: usize, message: impl Into<String>) -> Self {
        Self {
            offset,
            message: message.into(),
        }
    }
}

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "at byte {}: {}", self.offset, self.message)
    }
}

impl std::error::Error for ScriptError {}
