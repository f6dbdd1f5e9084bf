use store::StoreError;
use thiserror::Error;

/// Errors raised while building or running a listing query.
#[derive(Debug, Error)]
pub enum ListingError {
    /// A date filter did not match the canonical wire format.
    #[error("invalid date '{value}', expected YYYY-MM-DD")]
    InvalidDate { value: String },

    /// Page or limit below 1.
    #[error("page and limit must both be at least 1")]
    InvalidPage,

    /// An unexpected gateway failure.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
