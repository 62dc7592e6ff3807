//
//  teax
//  api/common/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/09.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! Common API Building Blocks
//!
//! This module provides the shared pieces every resource client is built
//! from: the unified [`ApiError`] type, safe path-segment encoding, the
//! pagination loop, the per-repository name resolution cache, and the
//! tagged scope selectors for endpoints that exist at more than one
//! authorization level.
//!
//! # Overview
//!
//! - [`ApiError`] - Unified error type for all API operations
//! - [`encode_segment`] - Percent-encoding for path slots (re-exported from [`encode`])
//! - [`fetch_all`] / [`Paged`] - "Fetch every page up to a ceiling" loop
//! - [`NameCache`] - name → id memoization with a bounded refresh policy
//! - [`Scope`] / [`SecretScope`] - repo/org/global and repo/org/user selection
//!
//! # Example
//!
//! ```rust
//! use teax::api::common::ApiError;
//!
//! fn handle_result<T>(result: Result<T, ApiError>) {
//!     match result {
//!         Ok(_) => println!("Success!"),
//!         Err(ApiError::NotFound { kind, name }) => {
//!             println!("{} '{}' does not exist", kind, name)
//!         }
//!         Err(e) => println!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! # Notes
//!
//! - Decode failures are a distinct variant from HTTP-status failures so
//!   callers can tell "server rejected the request" from "server sent a
//!   shape we do not understand".
//! - Validation failures are raised before any request leaves the process.

use reqwest::StatusCode;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

mod cache;
mod encode;
mod pagination;
mod scope;

pub use cache::{repo_key, NameCache};
pub use encode::encode_segment;
pub use pagination::{fetch_all, Paged, DEFAULT_LIMIT, DEFAULT_MAX_PAGES};
pub use scope::{Scope, SecretScope};

/// Unified error type for all Gitea API operations.
///
/// `ApiError` covers the full failure taxonomy of the client: input that is
/// rejected before a request is built, transport-level failures, non-2xx
/// responses, response bodies that do not match the documented shape, and
/// name-resolution misses. It implements the standard `Error` trait via
/// `thiserror` for ergonomic propagation with `?`.
///
/// # Variants
///
/// | Variant | Description | Network call made? |
/// |---------|-------------|--------------------|
/// | `Validation` | Malformed input, conflicting flags, bad path segment | No |
/// | `Network` | Timeout, TLS failure, connection refused | Attempted |
/// | `Http` | Server answered with a 4xx/5xx status | Yes |
/// | `Decode` | 2xx body did not match the expected record shape | Yes |
/// | `NotFound` | A label/milestone name failed resolution | Yes |
///
/// # Example
///
/// ```rust
/// use teax::api::common::ApiError;
///
/// fn resolve() -> Result<i64, ApiError> {
///     Err(ApiError::NotFound {
///         kind: "Label",
///         name: "backport".to_string(),
///     })
/// }
///
/// assert_eq!(
///     resolve().unwrap_err().to_string(),
///     "Label 'backport' not found in repository"
/// );
/// ```
///
/// # Notes
///
/// - The `Network` variant converts automatically from `reqwest::Error`
/// - `Http` carries both the status code and the server-provided message
/// - There is no automatic retry for any variant; the only retry in the
///   client is the single cache-refresh-and-recheck used by name resolution
#[derive(Error, Debug)]
pub enum ApiError {
    /// The input was rejected before any request was sent.
    ///
    /// Covers malformed repository references, conflicting scope flags,
    /// unencodable path segments and similar client-side failures.
    #[error("{0}")]
    Validation(String),

    /// A transport-level error occurred during the request.
    ///
    /// Timeouts, TLS handshake failures, DNS errors and refused
    /// connections all surface here, unretried.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    ///
    /// The message is extracted from the JSON error body where possible,
    /// falling back to the raw body text.
    #[error("API error ({status}): {message}")]
    Http {
        /// The HTTP status code of the response.
        status: StatusCode,
        /// The server-provided error message.
        message: String,
    },

    /// A 2xx response body did not match the expected shape.
    ///
    /// Kept distinct from [`ApiError::Http`] so callers can tell "server
    /// rejected" from "server sent garbage".
    #[error("Unexpected response from server: {0}")]
    Decode(String),

    /// A human-readable name failed to resolve to a numeric id.
    ///
    /// Raised after the single cache refresh allowed by the resolution
    /// policy has already happened.
    #[error("{kind} '{name}' not found in repository")]
    NotFound {
        /// What was being resolved ("Label", "Milestone").
        kind: &'static str,
        /// The name that could not be resolved.
        name: String,
    },
}

impl ApiError {
    /// Builds a [`ApiError::Http`] from a status code and raw error body.
    ///
    /// The server reports errors as `{"message": "..."}`; when that shape
    /// is present the message is extracted, otherwise the trimmed raw body
    /// (or the canonical status reason for an empty body) is used.
    pub(crate) fn from_response(status: StatusCode, body: &str) -> Self {
        if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
            if let Some(message) = json.get("message").and_then(|m| m.as_str()) {
                if !message.is_empty() {
                    return Self::Http {
                        status,
                        message: message.to_string(),
                    };
                }
            }
            if let Some(message) = json
                .get("errors")
                .and_then(|e| e.as_array())
                .and_then(|arr| arr.first())
                .and_then(|m| m.as_str())
            {
                return Self::Http {
                    status,
                    message: message.to_string(),
                };
            }
        }

        let body = body.trim();
        let message = if body.is_empty() {
            status.canonical_reason().unwrap_or("unknown error").to_string()
        } else {
            body.to_string()
        };
        Self::Http { status, message }
    }

    /// Builds a [`ApiError::Decode`] for a body that failed deserialization.
    pub(crate) fn decode(context: &str, err: serde_json::Error) -> Self {
        Self::Decode(format!("{context}: {err}"))
    }
}

/// Deserializes a JSON `null` into the type's default value.
///
/// Several endpoints report absent collections as `null` rather than `[]`
/// (issue labels, job steps); this keeps the model fields as plain `Vec`s.
pub(crate) fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_extracts_message() {
        let err = ApiError::from_response(
            StatusCode::NOT_FOUND,
            r#"{"message": "issue does not exist", "url": "https://example.com"}"#,
        );
        assert_eq!(
            err.to_string(),
            "API error (404 Not Found): issue does not exist"
        );
    }

    #[test]
    fn test_http_error_falls_back_to_body() {
        let err = ApiError::from_response(StatusCode::BAD_GATEWAY, "upstream exploded");
        assert_eq!(
            err.to_string(),
            "API error (502 Bad Gateway): upstream exploded"
        );
    }

    #[test]
    fn test_http_error_empty_body_uses_reason() {
        let err = ApiError::from_response(StatusCode::FORBIDDEN, "");
        assert_eq!(err.to_string(), "API error (403 Forbidden): Forbidden");
    }

    #[test]
    fn test_not_found_names_the_resource() {
        let err = ApiError::NotFound {
            kind: "Milestone",
            name: "Sprint 9".to_string(),
        };
        assert_eq!(err.to_string(), "Milestone 'Sprint 9' not found in repository");
    }
}
