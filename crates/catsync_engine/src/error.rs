//! Error types for the sync engine.

use thiserror::Error;

/// Result type for resource service calls.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors a resource service can return.
///
/// The engine never inspects these beyond formatting them; they are
/// forwarded to the error callback as the cause of a failed draft.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Network or transport error.
    #[error("transport error: {message}")]
    Transport {
        /// Error message.
        message: String,
        /// Whether the operation can be retried.
        retryable: bool,
    },

    /// The resource changed remotely since it was fetched.
    #[error("concurrent modification: expected version {expected}, found {actual}")]
    ConcurrentModification {
        /// Version the request was based on.
        expected: u64,
        /// Version currently stored.
        actual: u64,
    },

    /// The resource does not exist (on update or publish).
    #[error("resource not found: {0}")]
    NotFound(String),

    /// Credentials were rejected.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The backend rejected the request.
    #[error("backend error: {0}")]
    Backend(String),

    /// Timeout.
    #[error("operation timed out")]
    Timeout,
}

impl ServiceError {
    /// Creates a retryable transport error.
    pub fn transport_retryable(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            retryable: true,
        }
    }

    /// Creates a non-retryable transport error.
    pub fn transport_fatal(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
            retryable: false,
        }
    }

    /// Returns true if a caller-side retry could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ServiceError::Transport { retryable, .. } => *retryable,
            ServiceError::Timeout => true,
            ServiceError::ConcurrentModification { .. } => true,
            _ => false,
        }
    }
}

/// Why a single draft failed to sync.
///
/// The `Display` output is the message handed to the error callback.
#[derive(Error, Debug)]
pub enum SyncError {
    /// The draft has no business key.
    #[error("failed to process {resource} draft without a key: {draft}")]
    MissingKey {
        /// Resource type (singular).
        resource: &'static str,
        /// Debug rendering of the offending draft.
        draft: String,
    },

    /// Fetching the matching resource failed.
    #[error("failed to fetch {resource} with key '{key}': {source}")]
    Fetch {
        /// Resource type (singular).
        resource: &'static str,
        /// Business key.
        key: String,
        /// Underlying failure.
        #[source]
        source: ServiceError,
    },

    /// Creating the resource failed.
    #[error("failed to create {resource} with key '{key}': {source}")]
    Create {
        /// Resource type (singular).
        resource: &'static str,
        /// Business key.
        key: String,
        /// Underlying failure.
        #[source]
        source: ServiceError,
    },

    /// Updating the resource failed.
    #[error("failed to update {resource} with key '{key}': {source}")]
    Update {
        /// Resource type (singular).
        resource: &'static str,
        /// Business key.
        key: String,
        /// Underlying failure.
        #[source]
        source: ServiceError,
    },

    /// Publishing the resource failed.
    #[error("failed to publish {resource} with key '{key}': {source}")]
    Publish {
        /// Resource type (singular).
        resource: &'static str,
        /// Business key.
        key: String,
        /// Underlying failure.
        #[source]
        source: ServiceError,
    },
}

impl SyncError {
    /// The service error behind this failure, `None` for validation failures.
    pub fn cause(&self) -> Option<&ServiceError> {
        match self {
            SyncError::MissingKey { .. } => None,
            SyncError::Fetch { source, .. }
            | SyncError::Create { source, .. }
            | SyncError::Update { source, .. }
            | SyncError::Publish { source, .. } => Some(source),
        }
    }

    /// The business key of the failed draft, if it had one.
    pub fn key(&self) -> Option<&str> {
        match self {
            SyncError::MissingKey { .. } => None,
            SyncError::Fetch { key, .. }
            | SyncError::Create { key, .. }
            | SyncError::Update { key, .. }
            | SyncError::Publish { key, .. } => Some(key),
        }
    }
}

/// Errors in client configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required field is empty.
    #[error("missing required configuration value: {0}")]
    Missing(&'static str),

    /// A URL does not use http or https.
    #[error("invalid url for {field}: {url}")]
    InvalidUrl {
        /// Field name.
        field: &'static str,
        /// Rejected value.
        url: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_errors() {
        assert!(ServiceError::transport_retryable("connection reset").is_retryable());
        assert!(!ServiceError::transport_fatal("bad certificate").is_retryable());
        assert!(ServiceError::Timeout.is_retryable());
        assert!(ServiceError::ConcurrentModification {
            expected: 1,
            actual: 2
        }
        .is_retryable());
        assert!(!ServiceError::Unauthorized("expired token".into()).is_retryable());
    }

    #[test]
    fn sync_error_message_carries_key_and_cause() {
        let err = SyncError::Fetch {
            resource: "category",
            key: "externalId".into(),
            source: ServiceError::Timeout,
        };
        let message = err.to_string();
        assert!(message.contains("externalId"));
        assert!(message.contains("operation timed out"));
        assert_eq!(err.cause(), Some(&ServiceError::Timeout));
        assert_eq!(err.key(), Some("externalId"));
    }

    #[test]
    fn missing_key_has_no_cause() {
        let err = SyncError::MissingKey {
            resource: "product",
            draft: "ProductDraft { .. }".into(),
        };
        assert!(err.cause().is_none());
        assert!(err.key().is_none());
        assert!(err.to_string().contains("without a key"));
    }
}
