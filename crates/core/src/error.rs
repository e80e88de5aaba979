use crate::types::DbId;

/// Domain error shared by every layer of the matching subsystem.
///
/// The scorer and filter never produce these; they are raised by the
/// lifecycle and claim operations and translated by callers.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// The acting user does not own or claim the resource.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
