use thiserror::Error;

/// Errors from the recommendation workflow.
///
/// Display strings double as the user-facing messages published to
/// [`crate::recommend::RecommendState`], so their wording is part of
/// the contract.
#[derive(Debug, Error)]
pub enum RecommendError {
    /// A movie request arrived without a mood or genre selection.
    /// Recoverable: the user must change their input.
    #[error("Please select both mood and genre!")]
    MissingFilters,

    /// The filters were valid but matched nothing. Recoverable: the
    /// user must relax their filters. The label is `movies` or
    /// `anime`.
    #[error("No {0} found with these criteria. Try different filters!")]
    NoMatches(&'static str),

    /// A catalog call failed (non-success status or transport error).
    /// Recoverable by retrying; retries are always user-initiated.
    #[error("catalog error: {0}")]
    Upstream(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl RecommendError {
    pub(crate) fn upstream<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Upstream(Box::new(err))
    }
}
