//! Itinerary store error types

use thiserror::Error;

/// Errors from an itinerary store backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Itinerary not found: {0}")]
    NotFound(String),

    #[error("Storage API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid store URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Whether the caller lacks valid credentials
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api { status: 401 | 403, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(StoreError::NotFound("abc".to_string()).is_not_found());
        assert!(
            StoreError::Api {
                status: 401,
                message: "Unauthorized".to_string()
            }
            .is_unauthorized()
        );
        assert!(
            !StoreError::Api {
                status: 500,
                message: "oops".to_string()
            }
            .is_unauthorized()
        );
    }
}
