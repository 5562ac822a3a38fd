//! Error types and handling for envlist parsing and editing

use thiserror::Error;

/// Main error type for envlist operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvlistError {
    /// Malformed brace nesting or an unterminated group
    #[error("Syntax error at byte {offset}: {message}")]
    Syntax { offset: usize, message: String },

    /// An edit target matched nothing in the tree
    #[error("No match for {target}")]
    NotFound { target: String },

    /// Text handed to an edit could not be used as a factor or entry
    #[error("Invalid fragment '{text}': {reason}")]
    InvalidFragment { text: String, reason: String },

    /// A prefix could not be hoisted out of an entry
    #[error("Cannot hoist '{prefix}': {reason}")]
    Hoist { prefix: String, reason: String },

    /// Configuration loading or validation errors
    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Syntax,
    NotFound,
    InvalidFragment,
    Hoist,
    Config,
}

impl EnvlistError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            EnvlistError::Syntax { .. } => ErrorKind::Syntax,
            EnvlistError::NotFound { .. } => ErrorKind::NotFound,
            EnvlistError::InvalidFragment { .. } => ErrorKind::InvalidFragment,
            EnvlistError::Hoist { .. } => ErrorKind::Hoist,
            EnvlistError::Config { .. } => ErrorKind::Config,
        }
    }

    /// Whether the error only reports an edit that changed nothing
    pub fn is_no_op(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    /// Byte offset of a syntax error
    pub fn offset(&self) -> Option<usize> {
        match self {
            EnvlistError::Syntax { offset, .. } => Some(*offset),
            _ => None,
        }
    }

    /// Create a syntax error
    pub fn syntax(offset: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            offset,
            message: message.into(),
        }
    }

    /// Create a not-found error
    pub fn not_found(target: impl Into<String>) -> Self {
        Self::NotFound {
            target: target.into(),
        }
    }

    /// Create an invalid fragment error
    pub fn invalid_fragment(text: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidFragment {
            text: text.into(),
            reason: reason.into(),
        }
    }

    /// Create a hoist error
    pub fn hoist(prefix: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Hoist {
            prefix: prefix.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(EnvlistError::syntax(3, "x").kind(), ErrorKind::Syntax);
        assert_eq!(EnvlistError::not_found("lint").kind(), ErrorKind::NotFound);
        assert_eq!(EnvlistError::hoist("py", "x").kind(), ErrorKind::Hoist);
        assert_eq!(EnvlistError::config("bad").kind(), ErrorKind::Config);
    }

    #[test]
    fn test_only_not_found_is_no_op() {
        assert!(EnvlistError::not_found("lint").is_no_op());
        assert!(!EnvlistError::syntax(0, "unclosed group").is_no_op());
    }

    #[test]
    fn test_display() {
        let err = EnvlistError::syntax(4, "unclosed group");
        assert_eq!(err.to_string(), "Syntax error at byte 4: unclosed group");
        assert_eq!(err.offset(), Some(4));
        assert_eq!(EnvlistError::not_found("factor 'x'").offset(), None);
    }
}
