//! Domain error taxonomy shared by the persistence and HTTP layers.

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// No row with this id. `entity` is the display name ("Article", "Work").
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// Input that parsed but breaks a domain rule (unknown enum value,
    /// title without a slug-able character).
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A uniqueness rule would be broken (duplicate slug, second admin).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// No credentials, or credentials that do not match.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Credentials were presented but are not acceptable.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn not_found(entity: &'static str, id: DbId) -> Self {
        CoreError::NotFound { entity, id }
    }

    /// The message without the variant prefix, as shown to API clients.
    pub fn client_message(&self) -> String {
        match self {
            CoreError::NotFound { .. } => self.to_string(),
            CoreError::Validation(msg)
            | CoreError::Conflict(msg)
            | CoreError::Unauthorized(msg)
            | CoreError::Forbidden(msg)
            | CoreError::Internal(msg) => msg.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_entity_and_id() {
        assert_eq!(
            CoreError::not_found("Article", 42).client_message(),
            "Article with id 42 not found"
        );
    }

    #[test]
    fn client_message_drops_the_prefix() {
        let err = CoreError::Validation("status must be DRAFT or PUBLISHED".into());
        assert_eq!(err.to_string(), "Validation failed: status must be DRAFT or PUBLISHED");
        assert_eq!(err.client_message(), "status must be DRAFT or PUBLISHED");
    }
}
