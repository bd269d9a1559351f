// This module defines error types for ammtojs using the thiserror crate for idiomatic
// Rust error handling. TranslateError is the main error enum covering the failure
// scenarios of a translation: the AMM text could not be parsed, a handler asked for a
// runtime capability the JavaScript backend cannot provide, the input file could not be
// read, or writing into the output buffer failed. Each variant carries the context
// needed for a useful message. The module also provides TranslateResult<T> as a
// convenience alias for Result<T, TranslateError>.

//! Error types for the AMM to JavaScript translator.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for a translation.
#[derive(Error, Debug)]
pub enum TranslateError {
    /// The frontend could not build a program. The message is the parser's, unchanged.
    #[error("{message}")]
    Parse { message: String },

    #[error("AVM Control Port unavailable in JS (handler for '{event}')")]
    UnsupportedCapability { event: String },

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write output: {0}")]
    Format(#[from] std::fmt::Error),
}

impl TranslateError {
    /// True when the failure came from the frontend rather than the backend.
    pub fn is_parse(&self) -> bool {
        matches!(self, TranslateError::Parse { .. })
    }
}

/// Result type alias for translation operations.
pub type TranslateResult<T> = Result<T, TranslateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_message_is_unchanged() {
        let err = TranslateError::Parse {
            message: "line 3, column 7: Expected ':' but found '='".to_string(),
        };
        assert_eq!(err.to_string(), "line 3, column 7: Expected ':' but found '='");
        assert!(err.is_parse());
    }

    #[test]
    fn test_control_port_message() {
        let err = TranslateError::UnsupportedCapability {
            event: "__ctrl".to_string(),
        };
        assert!(err.to_string().starts_with("AVM Control Port unavailable in JS"));
        assert!(!err.is_parse());
    }
}
