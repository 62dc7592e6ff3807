//
//  teax
//  api/tokens.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/09.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! Access token bootstrap.
//!
//! The server refuses to mint API tokens under token authentication, so
//! token creation is the one call in the client that authenticates with
//! basic username/password credentials instead of the session's bearer
//! token. The returned `sha1` is shown exactly once by the server; it
//! cannot be retrieved again.

use serde::{Deserialize, Serialize};

use crate::api::common::{encode_segment, ApiError};
use crate::api::GiteaClient;

/// A newly created API access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessToken {
    /// Server-assigned numeric id.
    pub id: i64,

    /// Token name.
    pub name: String,

    /// The one-time token value. Empty on listings; populated only in the
    /// creation response.
    #[serde(default)]
    pub sha1: String,

    /// Granted scopes.
    #[serde(default)]
    pub scopes: Vec<String>,
}

#[derive(Debug, Serialize)]
struct CreateTokenRequest {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    scopes: Option<Vec<String>>,
}

impl GiteaClient {
    /// Creates an API access token for `username`.
    ///
    /// Authenticates this single call with basic credentials; the
    /// password never leaves the request. When `scopes` is `None` the
    /// server grants its default (`all`).
    pub async fn create_access_token(
        &self,
        username: &str,
        password: &str,
        name: &str,
        scopes: Option<Vec<String>>,
    ) -> Result<AccessToken, ApiError> {
        let url = self.api_url(&format!("users/{}/tokens", encode_segment(username)?));
        let body = CreateTokenRequest {
            name: name.to_string(),
            scopes,
        };
        self.post_json_basic_auth(url, &body, username, password)
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::api::labels::tests::test_client;
    use base64::Engine;

    #[tokio::test]
    async fn test_token_creation_uses_basic_auth_not_bearer() {
        let mut server = mockito::Server::new_async().await;
        let expected = format!(
            "Basic {}",
            base64::engine::general_purpose::STANDARD.encode("testuser:hunter2")
        );
        let create = server
            .mock("POST", "/api/v1/users/testuser/tokens")
            .match_header("authorization", expected.as_str())
            .match_body(mockito::Matcher::Json(serde_json::json!({
                "name": "ci-token",
                "scopes": ["write:repository", "write:package"]
            })))
            .with_status(201)
            .with_body(
                r#"{
                    "id": 7, "name": "ci-token", "sha1": "deadbeefcafe",
                    "scopes": ["write:repository", "write:package"]
                }"#,
            )
            .create_async()
            .await;

        let client = test_client(&server);
        let token = client
            .create_access_token(
                "testuser",
                "hunter2",
                "ci-token",
                Some(vec![
                    "write:repository".to_string(),
                    "write:package".to_string(),
                ]),
            )
            .await
            .unwrap();

        assert_eq!(token.sha1, "deadbeefcafe");
        create.assert_async().await;
    }

    #[tokio::test]
    async fn test_token_creation_without_scopes_omits_field() {
        let mut server = mockito::Server::new_async().await;
        let create = server
            .mock("POST", "/api/v1/users/testuser/tokens")
            .match_body(mockito::Matcher::Json(serde_json::json!({
                "name": "simple"
            })))
            .with_status(201)
            .with_body(r#"{"id": 8, "name": "simple", "sha1": "cafe", "scopes": []}"#)
            .create_async()
            .await;

        let client = test_client(&server);
        client
            .create_access_token("testuser", "pw", "simple", None)
            .await
            .unwrap();
        create.assert_async().await;
    }
}
