use crate::script::error::ScriptError;

/// Convenience result type used across colrpaint.
pub type ColrResult<T> = Result<T, ColrError>;

/// Top-level error taxonomy used by compiler and decompiler APIs.
#[derive(thiserror::Error, Debug)]
pub enum ColrError {
    /// Malformed user input: bad colors, composite modes or argument shapes.
    #[error("validation error: {0}")]
    Validation(String),

    /// A value does not fit its storage encoding.
    #[error("range error: {0}")]
    Range(String),

    /// Inconsistent state: missing default location, palette mismatches, mode conflicts.
    #[error("consistency error: {0}")]
    Consistency(String),

    /// A name or address that could not be resolved (unknown axis, decompile miss).
    #[error("lookup error: {0}")]
    Lookup(String),

    /// Syntax or evaluation error in a paint script.
    #[error("script error: {0}")]
    Script(#[from] ScriptError),

    /// Errors when serializing or deserializing font documents.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ColrError {
    /// Build a [`ColrError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ColrError::Range`] value.
    pub fn range(msg: impl Into<String>) -> Self {
        Self::Range(msg.into())
    }

    /// Build a [`ColrError::Consistency`] value.
    pub fn consistency(msg: impl Into<String>) -> Self {
        Self::Consistency(msg.into())
    }

    /// Build a [`ColrError::Lookup`] value.
    pub fn lookup(msg: impl Into<String>) -> Self {
        Self::Lookup(msg.into())
    }

    /// Build a [`ColrError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
