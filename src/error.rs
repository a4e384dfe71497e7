//! Error types for the Asana provider.

use thiserror::Error;

/// Errors that can occur while managing Asana resources.
#[derive(Debug, Error)]
pub enum Error {
    /// The `ASANA_TOKEN` environment variable is not set or is empty.
    #[error("ASANA_TOKEN environment variable is not set")]
    MissingToken,

    /// The provided token contains invalid characters.
    #[error("invalid token format")]
    InvalidToken,

    /// An HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to parse a response from the API or a state document.
    #[error("failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// The API returned an error response.
    #[error("API error: {message}")]
    Api {
        /// The error message from the API.
        message: String,
    },

    /// A resource was not found (HTTP 404).
    #[error("resource not found: {0}")]
    NotFound(String),

    /// A project identifier in a task's `projects` list is not numeric.
    #[error("invalid project id {value:?}: {source}")]
    InvalidProjectId {
        /// The offending list entry.
        value: String,
        /// The underlying integer parse failure.
        source: std::num::ParseIntError,
    },

    /// The resource configuration failed schema validation.
    #[error("invalid {resource_type} configuration: {}", .problems.join("; "))]
    InvalidConfig {
        /// The resource type being validated.
        resource_type: String,
        /// Every problem found, in field order.
        problems: Vec<String>,
    },

    /// The provider does not manage this resource type.
    #[error("unknown resource type: {0}")]
    UnknownResourceType(String),

    /// The resource type has no in-place update.
    #[error("{0} does not support in-place update; changes require replacement")]
    UpdateNotSupported(String),

    /// An operation that needs a remote identifier was given none.
    #[error("{0} state has no id")]
    MissingId(String),
}

impl Error {
    /// Returns true if the remote API reported the resource as gone.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}
