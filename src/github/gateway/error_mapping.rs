//! Error mapping helpers for the Octocrab repository gateway.

use http::StatusCode;

use crate::github::error::GatewayError;

/// Checks whether an octocrab error represents a network/transport issue.
pub(super) const fn is_network_error(error: &octocrab::Error) -> bool {
    matches!(
        error,
        octocrab::Error::Http { .. }
            | octocrab::Error::Hyper { .. }
            | octocrab::Error::Service { .. }
    )
}

/// Checks whether the GitHub error represents a rate limit error based on
/// the HTTP status and message / documentation URL content.
pub(super) fn is_rate_limit_error(source: &octocrab::GitHubError) -> bool {
    let is_rate_limit_status = matches!(
        source.status_code,
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS
    );

    let message_indicates_rate_limit = source.message.to_lowercase().contains("rate limit")
        || source
            .documentation_url
            .as_deref()
            .is_some_and(|url| url.contains("rate-limit"));

    is_rate_limit_status && message_indicates_rate_limit
}

/// Checks whether a 403 stems from the repository's plan not supporting the
/// feature at all, rather than from missing permissions. GitHub signals
/// this with an account-upgrade message on the protection routes.
pub(super) fn is_plan_limitation(source: &octocrab::GitHubError) -> bool {
    source.status_code == StatusCode::FORBIDDEN
        && source.message.to_lowercase().contains("upgrade")
}

pub(super) fn map_octocrab_error(operation: &str, error: &octocrab::Error) -> GatewayError {
    if let octocrab::Error::GitHub { source, .. } = error {
        return map_github_error(operation, source);
    }

    if is_network_error(error) {
        return GatewayError::Unknown {
            status: None,
            message: format!("{operation} failed: {error}"),
        };
    }

    GatewayError::Unknown {
        status: None,
        message: format!("{operation} failed: {error}"),
    }
}

fn map_github_error(operation: &str, source: &octocrab::GitHubError) -> GatewayError {
    if is_rate_limit_error(source) {
        return GatewayError::RateLimited {
            message: format!("{operation} failed: {message}", message = source.message),
        };
    }

    match source.status_code {
        StatusCode::NOT_FOUND => GatewayError::NotFound {
            resource: operation.to_owned(),
        },
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GatewayError::PermissionDenied {
            message: format!(
                "{operation} failed: GitHub returned {status} {message}",
                status = source.status_code,
                message = source.message
            ),
        },
        StatusCode::UNPROCESSABLE_ENTITY
            if source.message.to_lowercase().contains("already exists") =>
        {
            GatewayError::AlreadyExists {
                resource: operation.to_owned(),
            }
        }
        status => GatewayError::Unknown {
            status: Some(status.as_u16()),
            message: format!(
                "{operation} failed with status {status}: {message}",
                message = source.message
            ),
        },
    }
}

pub(super) fn map_http_error(
    operation: &str,
    status: StatusCode,
    maybe_message: Option<String>,
) -> GatewayError {
    let message = maybe_message.unwrap_or_else(|| "unknown error".to_owned());
    match status {
        StatusCode::NOT_FOUND => GatewayError::NotFound {
            resource: operation.to_owned(),
        },
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GatewayError::PermissionDenied {
            message: format!("{operation} failed: GitHub returned {status} {message}"),
        },
        _ => GatewayError::Unknown {
            status: Some(status.as_u16()),
            message: format!("{operation} failed with status {status}: {message}"),
        },
    }
}

pub(super) fn extract_github_message(body: &str) -> Option<String> {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return None;
    };
    value
        .get("message")
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned)
}
