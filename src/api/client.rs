//
//  teax
//  api/client.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/09.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! # HTTP Client for the Gitea API
//!
//! This module provides the core HTTP client session. It owns URL
//! normalization, the TLS policy, authentication headers, and the
//! request/response plumbing that every resource operation is built on.
//!
//! ## Features
//!
//! - Idempotent base-URL normalization (`/api/v1/` suffixing)
//! - HTTPS-only by default, with an explicit environment override
//! - Certificate verification with custom-CA and (warned) disable options
//! - Proxy isolation: ambient proxy variables are never honoured
//! - JSON request/response helpers with typed error mapping
//!
//! ## Security posture
//!
//! The bearer token travels in a header on every request, so the transport
//! defaults are deliberately strict: plaintext HTTP is refused unless
//! `TEAX_ALLOW_HTTP` is set, disabling certificate verification always
//! warns, and the session ignores `HTTP_PROXY`/`HTTPS_PROXY` entirely so a
//! poisoned environment cannot reroute credentialed traffic.
//!
//! ## Creating a client
//!
//! ```rust,no_run
//! use teax::api::GiteaClient;
//! use teax::config::resolve_login;
//!
//! # fn example() -> anyhow::Result<()> {
//! let login = resolve_login(None)?;
//! let client = GiteaClient::new(&login)?;
//! println!("talking to {}", client.base_url());
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Certificate, Method, StatusCode};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::api::common::{ApiError, NameCache};
use crate::config::Login;

/// Per-request timeout. A hung server becomes a timeout failure, not a
/// silent retry.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable naming a custom CA bundle (PEM). Highest precedence.
pub const ENV_CA_BUNDLE: &str = "TEAX_CA_BUNDLE";

/// Environment variable disabling certificate verification. Lowest
/// precedence; always warns.
pub const ENV_INSECURE: &str = "TEAX_INSECURE";

/// Environment variable permitting plaintext HTTP base URLs.
pub const ENV_ALLOW_HTTP: &str = "TEAX_ALLOW_HTTP";

/// Whether an environment variable holds a recognized truthy value.
///
/// Recognized values are `1`, `true` and `yes`, case-insensitive.
/// Anything else (including an unset variable) is false.
pub(crate) fn env_truthy(name: &str) -> bool {
    match std::env::var(name) {
        Ok(value) => matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes"
        ),
        Err(_) => false,
    }
}

/// Transport policy resolved from the environment at client construction.
///
/// # Fields
///
/// * `allow_http` - Permit non-HTTPS base URLs (with a warning)
/// * `insecure` - Disable certificate verification (with a warning)
/// * `ca_bundle` - Path to a custom PEM CA bundle; overrides `insecure`
///
/// # Notes
///
/// Tests construct this directly; production code goes through
/// [`ConnectionPolicy::from_env`].
#[derive(Debug, Clone, Default)]
pub struct ConnectionPolicy {
    /// Permit plaintext HTTP base URLs.
    pub allow_http: bool,
    /// Disable certificate verification entirely.
    pub insecure: bool,
    /// Custom CA bundle path; takes precedence over `insecure`.
    pub ca_bundle: Option<PathBuf>,
}

impl ConnectionPolicy {
    /// Reads the policy from `TEAX_ALLOW_HTTP`, `TEAX_INSECURE` and
    /// `TEAX_CA_BUNDLE`.
    pub fn from_env() -> Self {
        Self {
            allow_http: env_truthy(ENV_ALLOW_HTTP),
            insecure: env_truthy(ENV_INSECURE),
            ca_bundle: std::env::var_os(ENV_CA_BUNDLE).map(PathBuf::from),
        }
    }
}

/// Normalizes a login URL into the API base URL.
///
/// Strips surrounding whitespace and trailing slashes, removes one existing
/// `/api/v1` or `/api` suffix, then appends `/api/v1/`. The operation is
/// idempotent: normalizing an already-normalized URL yields the same string
/// and can never produce a doubled `/api/v1/api/v1/` segment, regardless of
/// subpath prefixes.
///
/// # Example
///
/// ```rust
/// use teax::api::client::normalize_base_url;
///
/// assert_eq!(
///     normalize_base_url("https://git.example.com"),
///     "https://git.example.com/api/v1/"
/// );
/// assert_eq!(
///     normalize_base_url("https://host/gitea/api/v1"),
///     "https://host/gitea/api/v1/"
/// );
/// assert_eq!(
///     normalize_base_url("  https://host/gitea/ "),
///     "https://host/gitea/api/v1/"
/// );
/// ```
pub fn normalize_base_url(raw: &str) -> String {
    let mut root = raw.trim().trim_end_matches('/').to_string();
    for suffix in ["/api/v1", "/api"] {
        if let Some(stripped) = root.strip_suffix(suffix) {
            root = stripped.trim_end_matches('/').to_string();
            break;
        }
    }
    format!("{root}/api/v1/")
}

/// An authenticated session against one Gitea instance.
///
/// The session owns one HTTP connection pool, one normalized base URL, and
/// the per-repository name caches used by label and milestone resolution.
/// Dropping the session (or calling [`close`](Self::close)) releases the
/// pool and clears every cache together, on every exit path.
///
/// # Example
///
/// ```rust,no_run
/// use teax::api::GiteaClient;
/// use teax::config::resolve_login;
///
/// # async fn example() -> anyhow::Result<()> {
/// let login = resolve_login(Some("git.example.com"))?;
/// let client = GiteaClient::new(&login)?;
///
/// let issue = client.get_issue("owner", "repo", 25).await?;
/// println!("#{}: {}", issue.number, issue.title);
///
/// client.close();
/// # Ok(())
/// # }
/// ```
pub struct GiteaClient {
    http: reqwest::Client,
    /// Normalized `<root>/api/v1/` base.
    base_url: String,
    /// Sibling `<root>/api/packages/` base (not nested under `/api/v1/`).
    packages_url: String,
    /// Username from the login record; used by the token bootstrap call.
    login_user: String,
    pub(crate) labels: NameCache,
    pub(crate) milestones: NameCache,
}

impl GiteaClient {
    /// Builds a session for the given login, reading the transport policy
    /// from the environment.
    ///
    /// # Errors
    ///
    /// Fails when the URL is malformed, when the URL is plaintext HTTP and
    /// the override is not set, when a configured CA bundle cannot be
    /// loaded, or when the HTTP client cannot be constructed.
    pub fn new(login: &Login) -> Result<Self, ApiError> {
        Self::with_policy(login, ConnectionPolicy::from_env())
    }

    /// Builds a session with an explicit transport policy.
    ///
    /// See [`new`](Self::new) for the failure modes. This constructor is
    /// the seam tests use to exercise the TLS policy without mutating the
    /// process environment.
    pub fn with_policy(login: &Login, policy: ConnectionPolicy) -> Result<Self, ApiError> {
        let base_url = normalize_base_url(&login.url);
        let parsed = Url::parse(&base_url)
            .map_err(|e| ApiError::Validation(format!("Invalid login URL: {e}")))?;

        if parsed.scheme() != "https" {
            if policy.allow_http {
                tracing::warn!(
                    "using plaintext HTTP for {}: the access token is sent \
                     unencrypted on every request",
                    parsed.host_str().unwrap_or("the server")
                );
            } else {
                return Err(ApiError::Validation(format!(
                    "Refusing plaintext HTTP URL '{}': the access token would be \
                     sent unencrypted. Set {ENV_ALLOW_HTTP}=1 to override.",
                    login.url.trim()
                )));
            }
        }

        let packages_url = {
            let root = base_url.trim_end_matches("api/v1/");
            format!("{root}api/packages/")
        };

        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("token {}", login.token.expose_secret()))
            .map_err(|_| {
                ApiError::Validation("Login token contains characters not valid in a header".to_string())
            })?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder()
            .user_agent(format!("teax/{}", crate::VERSION))
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            // The token must never transit an ambient proxy.
            .no_proxy();

        if let Some(path) = &policy.ca_bundle {
            let pem = std::fs::read(path).map_err(|e| {
                ApiError::Validation(format!(
                    "Cannot read CA bundle {}: {e}",
                    path.display()
                ))
            })?;
            builder = builder.add_root_certificate(Certificate::from_pem(&pem)?);
        } else if policy.insecure {
            tracing::warn!(
                "certificate verification disabled ({ENV_INSECURE}): connections \
                 can be intercepted"
            );
            builder = builder.danger_accept_invalid_certs(true);
        }

        Ok(Self {
            http: builder.build()?,
            base_url,
            packages_url,
            login_user: login.user.clone(),
            labels: NameCache::default(),
            milestones: NameCache::default(),
        })
    }

    /// The normalized API base URL (`<root>/api/v1/`).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The username of the authenticated login (may be empty when the
    /// config omits it).
    pub fn login_user(&self) -> &str {
        &self.login_user
    }

    /// Closes the session, releasing the connection pool and clearing
    /// every name cache.
    pub fn close(self) {
        // Drop does the actual work; consuming self makes the release a
        // compile-time guarantee for callers holding the session by value.
    }

    /// Builds a full URL under the `/api/v1/` base.
    pub(crate) fn api_url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Builds a full URL under the sibling `/api/packages/` base.
    pub(crate) fn pkg_url(&self, path: &str) -> String {
        format!("{}{path}", self.packages_url)
    }

    /// Issues a request and checks the status, returning the raw response.
    ///
    /// Non-2xx statuses become [`ApiError::Http`] carrying the status and
    /// the server-provided message.
    pub(crate) async fn execute(
        &self,
        method: Method,
        url: String,
        query: &[(&str, String)],
        body: Option<&serde_json::Value>,
    ) -> Result<reqwest::Response, ApiError> {
        let mut request = self.http.request(method, &url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ApiError::from_response(status, &text));
        }
        Ok(response)
    }

    /// GET a JSON document.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        url: String,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let response = self.execute(Method::GET, url, query, None).await?;
        decode_response(response).await
    }

    /// GET a plain-text document (job logs).
    pub(crate) async fn get_text(&self, url: String) -> Result<String, ApiError> {
        let response = self.execute(Method::GET, url, &[], None).await?;
        Ok(response.text().await?)
    }

    /// POST a JSON body and decode a JSON response.
    pub(crate) async fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        url: String,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = to_value(body)?;
        let response = self.execute(Method::POST, url, &[], Some(&body)).await?;
        decode_response(response).await
    }

    /// POST a JSON body, ignoring the response body.
    pub(crate) async fn post_empty<B: Serialize>(
        &self,
        url: String,
        body: &B,
    ) -> Result<(), ApiError> {
        let body = to_value(body)?;
        self.execute(Method::POST, url, &[], Some(&body)).await?;
        Ok(())
    }

    /// PATCH a JSON body and decode a JSON response.
    pub(crate) async fn patch_json<T: DeserializeOwned, B: Serialize>(
        &self,
        url: String,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = to_value(body)?;
        let response = self.execute(Method::PATCH, url, &[], Some(&body)).await?;
        decode_response(response).await
    }

    /// PUT a JSON body and decode a JSON response.
    pub(crate) async fn put_json<T: DeserializeOwned, B: Serialize>(
        &self,
        url: String,
        body: &B,
    ) -> Result<T, ApiError> {
        let body = to_value(body)?;
        let response = self.execute(Method::PUT, url, &[], Some(&body)).await?;
        decode_response(response).await
    }

    /// PUT a JSON body, returning only the response status.
    pub(crate) async fn put_status<B: Serialize>(
        &self,
        url: String,
        body: &B,
    ) -> Result<StatusCode, ApiError> {
        let body = to_value(body)?;
        let response = self.execute(Method::PUT, url, &[], Some(&body)).await?;
        Ok(response.status())
    }

    /// DELETE without a body.
    pub(crate) async fn delete(&self, url: String) -> Result<(), ApiError> {
        self.execute(Method::DELETE, url, &[], None).await?;
        Ok(())
    }

    /// DELETE carrying a JSON body (dependency removal).
    pub(crate) async fn delete_with_body<B: Serialize>(
        &self,
        url: String,
        body: &B,
    ) -> Result<(), ApiError> {
        let body = to_value(body)?;
        self.execute(Method::DELETE, url, &[], Some(&body)).await?;
        Ok(())
    }

    /// POST authenticated with basic credentials instead of the session
    /// token.
    ///
    /// Token creation is a bootstrap operation: the server refuses to mint
    /// tokens under token auth, so this single call carries
    /// username/password.
    pub(crate) async fn post_json_basic_auth<T: DeserializeOwned, B: Serialize>(
        &self,
        url: String,
        body: &B,
        username: &str,
        password: &str,
    ) -> Result<T, ApiError> {
        let body = to_value(body)?;
        let response = self
            .http
            .post(&url)
            .basic_auth(username, Some(password))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ApiError::from_response(status, &text));
        }
        decode_response(response).await
    }
}

impl Drop for GiteaClient {
    /// Clears every name cache when the session ends, so no state can
    /// survive the connection pool it belongs to.
    fn drop(&mut self) {
        self.labels.clear();
        self.milestones.clear();
    }
}

/// Serializes a request body up front so serialization failures surface as
/// decode-class errors rather than opaque transport errors.
fn to_value<B: Serialize>(body: &B) -> Result<serde_json::Value, ApiError> {
    serde_json::to_value(body).map_err(|e| ApiError::decode("serializing request body", e))
}

/// Decodes a 2xx response body, mapping shape mismatches to
/// [`ApiError::Decode`].
async fn decode_response<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|e| ApiError::decode("decoding response body", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn login(url: &str) -> Login {
        Login {
            name: "test".to_string(),
            url: url.to_string(),
            token: SecretString::from("test-token-123".to_string()),
            default: true,
            user: "testuser".to_string(),
        }
    }

    fn allow_http() -> ConnectionPolicy {
        ConnectionPolicy {
            allow_http: true,
            ..ConnectionPolicy::default()
        }
    }

    #[test]
    fn test_normalize_appends_api_suffix() {
        assert_eq!(
            normalize_base_url("https://git.example.com"),
            "https://git.example.com/api/v1/"
        );
        assert_eq!(
            normalize_base_url("https://git.example.com/"),
            "https://git.example.com/api/v1/"
        );
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let urls = [
            "https://h/gitea",
            "https://h/gitea/",
            "https://h/gitea/api",
            "https://h/gitea/api/v1",
            "https://h/gitea/api/v1/",
        ];
        for url in urls {
            let once = normalize_base_url(url);
            assert_eq!(once, "https://h/gitea/api/v1/");
            assert_eq!(normalize_base_url(&once), once);
        }
    }

    #[test]
    fn test_normalize_trims_whitespace() {
        assert_eq!(
            normalize_base_url("  https://h/gitea/ "),
            "https://h/gitea/api/v1/"
        );
    }

    #[test]
    fn test_plaintext_http_rejected_by_default() {
        let err =
            GiteaClient::with_policy(&login("http://git.example.com"), ConnectionPolicy::default())
                .err()
                .expect("http must be refused");
        assert!(matches!(err, ApiError::Validation(_)));
        assert!(err.to_string().contains("TEAX_ALLOW_HTTP"));
    }

    #[test]
    fn test_plaintext_http_allowed_with_override() {
        let client =
            GiteaClient::with_policy(&login("http://git.example.com"), allow_http()).unwrap();
        assert_eq!(client.base_url(), "http://git.example.com/api/v1/");
    }

    #[test]
    fn test_packages_base_is_sibling_of_api_v1() {
        let client =
            GiteaClient::with_policy(&login("https://h/gitea/api/v1"), ConnectionPolicy::default())
                .unwrap();
        assert_eq!(
            client.pkg_url("myorg"),
            "https://h/gitea/api/packages/myorg"
        );
        assert_eq!(
            client.api_url("repos/o/r/issues"),
            "https://h/gitea/api/v1/repos/o/r/issues"
        );
    }

    #[test]
    fn test_missing_ca_bundle_fails() {
        let policy = ConnectionPolicy {
            ca_bundle: Some(PathBuf::from("/definitely/not/here.pem")),
            ..ConnectionPolicy::default()
        };
        let err = GiteaClient::with_policy(&login("https://git.example.com"), policy)
            .err()
            .expect("unreadable bundle must fail");
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn test_env_truthy_values() {
        // All env assertions share one test: the variables are process
        // globals and the test harness runs tests in parallel.
        let var = "TEAX_TRUTHY_PROBE";
        for (value, expected) in [
            ("1", true),
            ("true", true),
            ("YES", true),
            ("True", true),
            ("0", false),
            ("no", false),
            ("on", false),
            ("", false),
        ] {
            std::env::set_var(var, value);
            assert_eq!(env_truthy(var), expected, "value {value:?}");
        }
        std::env::remove_var(var);
        assert!(!env_truthy(var));
    }

    #[test]
    fn test_close_clears_caches() {
        let client =
            GiteaClient::with_policy(&login("https://git.example.com"), ConnectionPolicy::default())
                .unwrap();
        client.labels.replace(
            "owner/repo",
            std::collections::HashMap::from([("bug".to_string(), 1)]),
            None,
        );
        assert!(!client.labels.is_empty());
        client.close();
        // The session is consumed; nothing can observe stale cache state.
    }
}
