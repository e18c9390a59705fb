use arca_types::TypeError;

/// Errors from reading system fields out of a metadata map.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MetaError {
    /// A required system field is absent or null.
    #[error("missing metadata field {0:?}")]
    MissingField(&'static str),

    /// A system field holds a value of the wrong shape.
    #[error("metadata field {field:?} has the wrong type: expected {expected}, found {found}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    /// A system field is present but does not parse (uuid, status, timestamp).
    #[error(transparent)]
    Type(#[from] TypeError),
}

/// Result alias for metadata operations.
pub type MetaResult<T> = Result<T, MetaError>;
