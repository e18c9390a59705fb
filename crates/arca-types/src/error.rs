use thiserror::Error;

/// Errors produced by type construction and parsing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid {kind} {value:?}: {reason}")]
    InvalidIdentifier {
        kind: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("malformed uuid: {0:?}")]
    MalformedUuid(String),

    #[error("malformed timestamp: {0:?}")]
    MalformedTimestamp(String),

    #[error("unknown status: {0:?}")]
    UnknownStatus(String),
}
