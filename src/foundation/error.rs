/// Convenience result type used across Grafel.
pub type GrafelResult<T> = Result<T, GrafelError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum GrafelError {
    /// Invalid scene description: malformed interval, unknown color, bad arguments.
    #[error("validation error: {0}")]
    Validation(String),

    /// Action kind name not present in the registry.
    #[error("unknown action kind '{0}'")]
    UnknownAction(String),

    /// A frame was queried against an interval that does not contain it.
    #[error("frame {frame} is outside interval [{lower}, {upper}]")]
    OutOfInterval {
        /// Offending frame.
        frame: u64,
        /// Interval lower bound (inclusive).
        lower: u64,
        /// Interval upper bound (inclusive).
        upper: u64,
    },

    /// Syntax error in a Grafel script.
    #[error("parse error at line {line}, column {column}: {message}")]
    Parse {
        /// 1-based line.
        line: usize,
        /// 1-based column.
        column: usize,
        /// Human readable description.
        message: String,
    },

    /// Failure inside a rendering backend or frame sink.
    #[error("render error: {0}")]
    Render(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl GrafelError {
    /// Build a [`GrafelError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`GrafelError::UnknownAction`] value.
    pub fn unknown_action(name: impl Into<String>) -> Self {
        Self::UnknownAction(name.into())
    }

    /// Build a [`GrafelError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`GrafelError::Parse`] value.
    pub fn parse(line: usize, column: usize, msg: impl Into<String>) -> Self {
        Self::Parse {
            line,
            column,
            message: msg.into(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
