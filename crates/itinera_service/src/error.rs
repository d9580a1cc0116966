//! Error types for the mutation service.

use itinera_store::StoreError;
use thiserror::Error;

/// Result type for mutation-service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors that can occur while validating or persisting a mutation.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// The payload was malformed or missing required fields.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The targeted day or event does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The store call failed for infrastructure reasons.
    #[error("persistence failure: {0}")]
    Persistence(String),
}

impl ServiceError {
    /// True when the error was caused by the single offending message and is
    /// reported only to its sender.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ServiceError::InvalidInput(_) | ServiceError::NotFound(_)
        )
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        if err.is_not_found() {
            ServiceError::NotFound(err.to_string())
        } else {
            ServiceError::Persistence(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itinera_protocol::EventId;

    #[test]
    fn error_classification() {
        assert!(ServiceError::InvalidInput("bad label".into()).is_client_error());
        assert!(ServiceError::NotFound("event".into()).is_client_error());
        assert!(!ServiceError::Persistence("io".into()).is_client_error());
    }

    #[test]
    fn store_not_found_maps_to_not_found() {
        let err: ServiceError = StoreError::UnknownEvent(EventId::generate()).into();
        assert!(matches!(err, ServiceError::NotFound(_)));

        let err: ServiceError = StoreError::Backend("timeout".into()).into();
        assert!(matches!(err, ServiceError::Persistence(_)));
    }
}
