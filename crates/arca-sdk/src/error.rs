use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("invalid identifier: {0}")]
    Identifier(#[from] arca_types::TypeError),

    #[error("store error: {0}")]
    Store(#[from] arca_store::StoreError),
}

impl SdkError {
    /// `true` when the bucket, chain, or selected version does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Store(e) if e.is_not_found())
    }
}

pub type SdkResult<T> = Result<T, SdkError>;
