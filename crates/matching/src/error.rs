use lostfound_core::error::CoreError;
use lostfound_core::types::DbId;

/// Error returned by the lifecycle and claim workflows.
///
/// Wraps [`CoreError`] for domain failures (not found, validation,
/// authorization) and carries storage failures as `Persistence`. A
/// persistence error always means the current transaction was rolled back.
#[derive(Debug, thiserror::Error)]
pub enum MatchingError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] sqlx::Error),
}

/// Convenience alias for workflow return values.
pub type MatchingResult<T> = Result<T, MatchingError>;

impl MatchingError {
    pub fn not_found(entity: &'static str, id: DbId) -> Self {
        MatchingError::Core(CoreError::NotFound { entity, id })
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        MatchingError::Core(CoreError::Forbidden(message.into()))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        MatchingError::Core(CoreError::Validation(message.into()))
    }

    /// The domain error, if this is not a storage failure.
    pub fn as_core(&self) -> Option<&CoreError> {
        match self {
            MatchingError::Core(core) => Some(core),
            MatchingError::Persistence(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn helpers_wrap_core_variants() {
        assert_matches!(
            MatchingError::not_found("Claim", 4),
            MatchingError::Core(CoreError::NotFound { entity: "Claim", id: 4 })
        );
        assert_matches!(
            MatchingError::forbidden("nope").as_core(),
            Some(CoreError::Forbidden(_))
        );
    }

    #[test]
    fn database_errors_are_persistence_failures() {
        let err = MatchingError::from(sqlx::Error::RowNotFound);
        assert_matches!(&err, MatchingError::Persistence(_));
        assert!(err.as_core().is_none());
    }

    #[test]
    fn display_includes_message() {
        let err = MatchingError::validation("Search query is required");
        assert_eq!(err.to_string(), "Validation failed: Search query is required");
    }
}
