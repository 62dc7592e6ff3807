//
//  teax
//  api/labels.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/09.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! Repository labels and label-name resolution.
//!
//! Labels are the first of the two name-resolved resources: the CLI deals
//! in names (`bug`, `backport/v2`), the API mutates by numeric id. The
//! resolution path here is the reference implementation of the cache
//! policy described in [`crate::api::common::NameCache`]:
//!
//! 1. First use for a repository fetches the full label set (paginated)
//!    and memoizes `name -> id`.
//! 2. A resolution call performs at most one full refresh for names that
//!    are not in the memoized set, then fails naming the first label that
//!    is still missing.
//! 3. Creating a label inserts the new pair in place; the user-facing
//!    listing repopulates the table wholesale.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::api::common::{
    encode_segment, fetch_all, repo_key, ApiError, DEFAULT_LIMIT, DEFAULT_MAX_PAGES,
};
use crate::api::GiteaClient;

/// A repository label.
///
/// Uniquely identified by `name` within a repository for resolution
/// purposes, by `id` for mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Label {
    /// Server-assigned numeric id.
    pub id: i64,

    /// Label name, unique within the repository.
    pub name: String,

    /// Hex color without a leading `#`.
    #[serde(default)]
    pub color: String,

    /// Optional free-form description.
    #[serde(default)]
    pub description: String,
}

/// Request payload for creating a label.
#[derive(Debug, Clone, Serialize)]
struct CreateLabelRequest {
    name: String,
    color: String,
    description: String,
}

impl GiteaClient {
    /// Fetches the complete label set for a repository, paginated.
    async fn fetch_label_page(
        &self,
        owner: &str,
        repo: &str,
        page: u32,
        limit: u32,
    ) -> Result<Vec<Label>, ApiError> {
        let url = self.api_url(&format!(
            "repos/{}/{}/labels",
            encode_segment(owner)?,
            encode_segment(repo)?
        ));
        self.get_json(url, &[("page", page.to_string()), ("limit", limit.to_string())])
            .await
    }

    async fn fetch_all_labels(&self, owner: &str, repo: &str) -> Result<Vec<Label>, ApiError> {
        let paged = fetch_all(
            |page, limit| self.fetch_label_page(owner, repo, page, limit),
            DEFAULT_LIMIT,
            DEFAULT_MAX_PAGES,
        )
        .await?;
        Ok(paged.into_items("label"))
    }

    fn label_table(labels: &[Label]) -> HashMap<String, i64> {
        labels.iter().map(|l| (l.name.clone(), l.id)).collect()
    }

    /// Lists every label in a repository.
    ///
    /// This is the user-facing listing, so it also repopulates the label
    /// cache for the repository wholesale.
    pub async fn list_labels(&self, owner: &str, repo: &str) -> Result<Vec<Label>, ApiError> {
        let labels = self.fetch_all_labels(owner, repo).await?;
        self.labels
            .replace(&repo_key(owner, repo), Self::label_table(&labels), None);
        Ok(labels)
    }

    /// Creates a label.
    ///
    /// The new `name -> id` pair is inserted into the cache in place; the
    /// rest of the memoized table stays valid.
    pub async fn create_label(
        &self,
        owner: &str,
        repo: &str,
        name: &str,
        color: &str,
        description: &str,
    ) -> Result<Label, ApiError> {
        let url = self.api_url(&format!(
            "repos/{}/{}/labels",
            encode_segment(owner)?,
            encode_segment(repo)?
        ));
        let body = CreateLabelRequest {
            name: name.to_string(),
            color: color.strip_prefix('#').unwrap_or(color).to_string(),
            description: description.to_string(),
        };
        let label: Label = self.post_json(url, &body).await?;
        self.labels
            .insert(&repo_key(owner, repo), &label.name, label.id);
        Ok(label)
    }

    /// Resolves a label by name, creating it when it does not exist.
    ///
    /// Returns the label id and whether a label was created.
    pub async fn ensure_label(
        &self,
        owner: &str,
        repo: &str,
        name: &str,
        color: &str,
        description: &str,
    ) -> Result<(i64, bool), ApiError> {
        match self.resolve_label_ids(owner, repo, &[name.to_string()]).await {
            Ok(ids) => Ok((ids[0], false)),
            Err(ApiError::NotFound { .. }) => {
                let label = self.create_label(owner, repo, name, color, description).await?;
                Ok((label.id, true))
            }
            Err(e) => Err(e),
        }
    }

    /// Resolves label names to ids through the per-repository cache.
    ///
    /// On first use for a repository the full label set is fetched and
    /// memoized. For names missing from the memoized set, exactly one full
    /// refresh is performed for the whole call (not one per missing name);
    /// any name still missing after that refresh fails with
    /// [`ApiError::NotFound`] naming the label.
    pub async fn resolve_label_ids(
        &self,
        owner: &str,
        repo: &str,
        names: &[String],
    ) -> Result<Vec<i64>, ApiError> {
        let key = repo_key(owner, repo);

        if !self.labels.populated_under(&key, None) {
            let labels = self.fetch_all_labels(owner, repo).await?;
            self.labels.replace(&key, Self::label_table(&labels), None);
        }

        let mut refreshed = false;
        let mut ids = Vec::with_capacity(names.len());
        for name in names {
            if let Some(id) = self.labels.lookup(&key, name) {
                ids.push(id);
                continue;
            }

            if !refreshed {
                let labels = self.fetch_all_labels(owner, repo).await?;
                self.labels.replace(&key, Self::label_table(&labels), None);
                refreshed = true;
            }

            match self.labels.lookup(&key, name) {
                Some(id) => ids.push(id),
                None => {
                    return Err(ApiError::NotFound {
                        kind: "Label",
                        name: name.clone(),
                    })
                }
            }
        }
        Ok(ids)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use crate::api::client::ConnectionPolicy;
    use crate::api::GiteaClient;
    use crate::config::Login;
    use secrecy::SecretString;

    pub(crate) fn test_client(server: &mockito::ServerGuard) -> GiteaClient {
        let login = Login {
            name: "test".to_string(),
            url: server.url(),
            token: SecretString::from("test-token-123".to_string()),
            default: true,
            user: "testuser".to_string(),
        };
        let policy = ConnectionPolicy {
            allow_http: true,
            ..ConnectionPolicy::default()
        };
        GiteaClient::with_policy(&login, policy).unwrap()
    }

    const LABELS: &str = r#"[
        {"id": 1, "name": "bug", "color": "ff0000", "description": ""},
        {"id": 2, "name": "feature", "color": "00ff00", "description": ""}
    ]"#;

    #[tokio::test]
    async fn test_resolution_fetches_once_then_hits_cache() {
        let mut server = mockito::Server::new_async().await;
        let list = server
            .mock("GET", "/api/v1/repos/owner/repo/labels")
            .match_query(mockito::Matcher::Any)
            .with_body(LABELS)
            .expect(1)
            .create_async()
            .await;

        let client = test_client(&server);
        let ids = client
            .resolve_label_ids("owner", "repo", &["bug".to_string()])
            .await
            .unwrap();
        assert_eq!(ids, vec![1]);

        // A second resolution for a different cached name makes no
        // additional fetch.
        let ids = client
            .resolve_label_ids("owner", "repo", &["feature".to_string()])
            .await
            .unwrap();
        assert_eq!(ids, vec![2]);

        list.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_name_refreshes_once_then_fails() {
        let mut server = mockito::Server::new_async().await;
        // Initial population + the single refresh: two fetches, no more.
        let list = server
            .mock("GET", "/api/v1/repos/owner/repo/labels")
            .match_query(mockito::Matcher::Any)
            .with_body(LABELS)
            .expect(2)
            .create_async()
            .await;

        let client = test_client(&server);
        let err = client
            .resolve_label_ids(
                "owner",
                "repo",
                &["bug".to_string(), "nonexistent".to_string(), "ghost".to_string()],
            )
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Label 'nonexistent' not found in repository");
        list.assert_async().await;
    }

    #[tokio::test]
    async fn test_cache_is_per_repo() {
        let mut server = mockito::Server::new_async().await;
        let repo1 = server
            .mock("GET", "/api/v1/repos/owner/repo1/labels")
            .match_query(mockito::Matcher::Any)
            .with_body(r#"[{"id": 1, "name": "bug", "color": "", "description": ""}]"#)
            .expect(1)
            .create_async()
            .await;
        let repo2 = server
            .mock("GET", "/api/v1/repos/owner/repo2/labels")
            .match_query(mockito::Matcher::Any)
            .with_body(r#"[{"id": 5, "name": "bug", "color": "", "description": ""}]"#)
            .expect(1)
            .create_async()
            .await;

        let client = test_client(&server);
        assert_eq!(
            client
                .resolve_label_ids("owner", "repo1", &["bug".to_string()])
                .await
                .unwrap(),
            vec![1]
        );
        assert_eq!(
            client
                .resolve_label_ids("owner", "repo2", &["bug".to_string()])
                .await
                .unwrap(),
            vec![5]
        );

        repo1.assert_async().await;
        repo2.assert_async().await;
    }

    #[tokio::test]
    async fn test_create_label_updates_cache_in_place() {
        let mut server = mockito::Server::new_async().await;
        let list = server
            .mock("GET", "/api/v1/repos/owner/repo/labels")
            .match_query(mockito::Matcher::Any)
            .with_body(LABELS)
            .expect(1)
            .create_async()
            .await;
        let create = server
            .mock("POST", "/api/v1/repos/owner/repo/labels")
            .with_status(201)
            .with_body(r#"{"id": 10, "name": "epic/new", "color": "9b59b6", "description": ""}"#)
            .create_async()
            .await;

        let client = test_client(&server);
        client
            .resolve_label_ids("owner", "repo", &["bug".to_string()])
            .await
            .unwrap();

        let label = client
            .create_label("owner", "repo", "epic/new", "#9b59b6", "")
            .await
            .unwrap();
        assert_eq!(label.id, 10);

        // The new name resolves without another listing, and the old
        // entries survived.
        let ids = client
            .resolve_label_ids("owner", "repo", &["epic/new".to_string(), "bug".to_string()])
            .await
            .unwrap();
        assert_eq!(ids, vec![10, 1]);

        list.assert_async().await;
        create.assert_async().await;
    }

    #[tokio::test]
    async fn test_list_labels_paginates() {
        let mut server = mockito::Server::new_async().await;
        let full_page: Vec<serde_json::Value> = (1..=50)
            .map(|i| {
                serde_json::json!({
                    "id": i, "name": format!("l{i}"), "color": "", "description": ""
                })
            })
            .collect();
        let page1 = server
            .mock("GET", "/api/v1/repos/owner/repo/labels")
            .match_query(mockito::Matcher::UrlEncoded("page".into(), "1".into()))
            .with_body(serde_json::to_string(&full_page).unwrap())
            .create_async()
            .await;
        let page2 = server
            .mock("GET", "/api/v1/repos/owner/repo/labels")
            .match_query(mockito::Matcher::UrlEncoded("page".into(), "2".into()))
            .with_body(r#"[{"id": 51, "name": "tail", "color": "", "description": ""}]"#)
            .create_async()
            .await;

        let client = test_client(&server);
        let labels = client.list_labels("owner", "repo").await.unwrap();
        assert_eq!(labels.len(), 51);
        assert_eq!(labels[50].name, "tail");

        page1.assert_async().await;
        page2.assert_async().await;
    }
}
