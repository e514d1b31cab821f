//! Generation service error types

use thiserror::Error;

/// Errors that can occur talking to the generation service
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GenerationError {
    /// Check if a transport-level retry could help
    pub fn is_retryable(&self) -> bool {
        match self {
            GenerationError::Api { status, .. } => *status == 408 || *status == 429 || *status >= 500,
            GenerationError::Network(_) => true,
            GenerationError::InvalidResponse(_) => false,
            GenerationError::Json(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_retryable() {
        assert!(
            GenerationError::Api {
                status: 503,
                message: "Unavailable".to_string()
            }
            .is_retryable()
        );

        assert!(
            GenerationError::Api {
                status: 429,
                message: "Slow down".to_string()
            }
            .is_retryable()
        );

        // 4xx errors should not be retryable
        assert!(
            !GenerationError::Api {
                status: 400,
                message: "Bad request".to_string()
            }
            .is_retryable()
        );

        assert!(!GenerationError::InvalidResponse("no draft".to_string()).is_retryable());
    }
}
