//! error types for building and evaluating expressions

use thiserror::Error;

/// configuration errors; all of them abort the run
#[derive(Debug, Error)]
pub enum ExprError {
    #[error("invalid filter clause '{clause}': expected <key><operator><value> with one of == != <= < >= > ^")]
    InvalidClause { clause: String },

    #[error("invalid edit '{expression}': expected <key>=<value>")]
    InvalidEdit { expression: String },

    #[error("invalid {bound} time '{input}'")]
    InvalidTimestamp { bound: &'static str, input: String },

    #[error("list source '{source_name}' must map attribute keys to lists of values: {message}")]
    MalformedListSource { source_name: String, message: String },

    #[error("list source '{source_name}': value of '{key}' must be a list of strings, numbers or booleans")]
    InvalidListEntry { source_name: String, key: String },

    #[error("failed to read list source '{source_name}'")]
    ListSourceIo {
        source_name: String,
        #[source]
        error: std::io::Error,
    },

    #[error("cannot compare attribute '{key}' of kind {kind}")]
    UnsupportedValue { key: String, kind: &'static str },
}

pub type Result<T> = std::result::Result<T, ExprError>;
