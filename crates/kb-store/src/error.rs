//! Store error type

use kb_core::KbError;

#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: String },

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid response body: {0}")]
    Decode(String),

    #[error("Invalid store URL: {0}")]
    InvalidUrl(String),

    /// Failure scripted on the in-memory store
    #[error("Injected failure: {0}")]
    Injected(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            id: id.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            StoreError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            StoreError::Http {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            StoreError::Transport(err.to_string())
        }
    }
}

impl From<StoreError> for KbError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { resource, id } => KbError::NotFound {
                entity: resource,
                field: "id",
                value: id,
            },
            StoreError::InvalidUrl(message) => KbError::Config(message),
            other => KbError::ExternalService {
                service: "remote-store".to_string(),
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_kb_not_found() {
        let err: KbError = StoreError::not_found("teams", "t1").into();
        assert_eq!(err, KbError::not_found("teams", "id", "t1"));
    }

    #[test]
    fn test_http_maps_to_external_service() {
        let err: KbError = StoreError::Http {
            status: 503,
            message: "unavailable".into(),
        }
        .into();
        assert!(err.is_retryable());
    }
}
