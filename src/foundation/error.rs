use std::path::PathBuf;

/// Convenience result type used across ledsign.
pub type LedSignResult<T> = Result<T, LedSignError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum LedSignError {
    /// A font source or a file it references does not exist.
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// A font or configuration envelope could not be parsed.
    #[error("format error: {0}")]
    Format(String),

    /// An input file exceeds the fixed size cap.
    #[error("size limit exceeded: '{}' is {size} bytes (limit {limit})", .path.display())]
    SizeLimitExceeded {
        /// Offending file.
        path: PathBuf,
        /// Observed size in bytes.
        size: u64,
        /// Configured cap in bytes.
        limit: u64,
    },

    /// Invalid user-provided data that cannot be clamped into range.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while producing a bitmap.
    #[error("render error: {0}")]
    Render(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LedSignError {
    /// Build a [`LedSignError::Format`] value.
    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }

    /// Build a [`LedSignError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`LedSignError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`LedSignError::FileNotFound`] value.
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound(path.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
