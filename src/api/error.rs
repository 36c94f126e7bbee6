use thiserror::Error;

/// Failures talking to the category backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Request timed out after {0}s")]
    Timeout(u64),
    /// Non-2xx response other than the ones mapped below
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// The category is still referenced (books attached) and cannot be removed
    #[error("Category is still in use")]
    InUse,
    #[error("Response too large (exceeds {0} bytes)")]
    ResponseTooLarge(usize),
    #[error("Invalid response body: {0}")]
    InvalidResponse(#[from] serde_json::Error),
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("Insecure API base URL: HTTPS required (except localhost)")]
    InsecureBaseUrl,
}

impl ApiError {
    /// True for failures the user can reasonably retry by resubmitting.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Network(_) | ApiError::Timeout(_) => true,
            ApiError::HttpStatus(status) => *status >= 500 || *status == 429,
            ApiError::InUse
            | ApiError::ResponseTooLarge(_)
            | ApiError::InvalidResponse(_)
            | ApiError::InvalidBaseUrl(_)
            | ApiError::InsecureBaseUrl => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(ApiError::Timeout(20).is_transient());
        assert!(ApiError::HttpStatus(503).is_transient());
        assert!(ApiError::HttpStatus(429).is_transient());
        assert!(!ApiError::HttpStatus(400).is_transient());
        assert!(!ApiError::InUse.is_transient());
        assert!(!ApiError::InsecureBaseUrl.is_transient());
    }
}
