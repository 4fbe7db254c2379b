//! Error taxonomy exposed by the repository gateway.

use thiserror::Error;

/// Structured failures surfaced by remote repository-state operations.
///
/// Every gateway operation fails with exactly one of these kinds. Callers
/// branch on the kind, never on GitHub's error text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    /// The requested resource does not exist on the remote.
    #[error("{resource} was not found")]
    NotFound {
        /// Human-readable description of the missing resource.
        resource: String,
    },

    /// The authenticated identity lacks permission for the operation.
    #[error("permission denied: {message}")]
    PermissionDenied {
        /// GitHub error message returned with the 401/403 response.
        message: String,
    },

    /// The resource to be created already exists on the remote.
    #[error("{resource} already exists")]
    AlreadyExists {
        /// Human-readable description of the conflicting resource.
        resource: String,
    },

    /// GitHub's API rate limit was exhausted. The migration does not retry;
    /// the operator re-runs once the limit resets.
    #[error("GitHub API rate limit exceeded: {message}")]
    RateLimited {
        /// Error message from GitHub.
        message: String,
    },

    /// Any other remote failure, carrying the HTTP status when one was
    /// received. Transport-level failures have no status.
    #[error("remote error{}: {message}", status.map(|code| format!(" ({code})")).unwrap_or_default())]
    Unknown {
        /// HTTP status code, when the remote produced a response.
        status: Option<u16>,
        /// Description of the failure.
        message: String,
    },
}

impl GatewayError {
    /// Builds a [`GatewayError::NotFound`] for the named resource.
    #[must_use]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Builds a [`GatewayError::AlreadyExists`] for the named resource.
    #[must_use]
    pub fn already_exists(resource: impl Into<String>) -> Self {
        Self::AlreadyExists {
            resource: resource.into(),
        }
    }
}
