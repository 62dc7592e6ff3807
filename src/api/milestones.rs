//
//  teax
//  api/milestones.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/09.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! Milestones and milestone-title resolution.
//!
//! Milestones resolve by title the way labels resolve by name, with two
//! twists:
//!
//! - A reference that parses as an integer is treated as an id and
//!   validated by a direct fetch (authoritative, bypasses the cache); a
//!   404 there is a hard failure, not a fall-back to title lookup.
//! - The title table is only trusted when it was populated under the
//!   `all` state filter. A table populated by a narrower user-facing
//!   listing (`open`, `closed`) is missing every milestone outside that
//!   state and is treated as stale for resolution purposes.
//!
//! The server does not enforce title uniqueness; when titles collide the
//! first match wins. That is a known limitation preserved for
//! compatibility, not a disambiguation scheme.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::api::common::{
    encode_segment, fetch_all, null_default, repo_key, ApiError, DEFAULT_LIMIT, DEFAULT_MAX_PAGES,
};
use crate::api::GiteaClient;

/// The state filter under which a milestone table is trustworthy for
/// title resolution.
const ALL_STATES: &str = "all";

/// A milestone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Milestone {
    /// Server-assigned numeric id.
    pub id: i64,

    /// Title; best-effort unique within a repository.
    pub title: String,

    /// `open` or `closed`.
    #[serde(default = "default_state")]
    pub state: String,

    /// Optional description; the server reports `null` for none.
    #[serde(default, deserialize_with = "null_default")]
    pub description: String,

    /// Due timestamp, if one is set.
    #[serde(default)]
    pub due_on: Option<String>,
}

fn default_state() -> String {
    "open".to_string()
}

/// Request payload for creating a milestone.
#[derive(Debug, Clone, Serialize)]
struct CreateMilestoneRequest {
    title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    due_on: Option<String>,
}

/// Fields for updating a milestone. `None` means "leave unchanged".
///
/// The due date has three-valued semantics: `None` leaves it unchanged,
/// an empty string clears it (serialized as an explicit `null`), and any
/// other value sets it.
#[derive(Debug, Clone, Default)]
pub struct MilestoneEdit {
    /// New title.
    pub title: Option<String>,

    /// New description.
    pub description: Option<String>,

    /// New state (`open`/`closed`).
    pub state: Option<String>,

    /// New due timestamp; empty string clears the due date.
    pub due_on: Option<String>,
}

impl MilestoneEdit {
    fn to_payload(&self) -> serde_json::Value {
        let mut payload = serde_json::Map::new();
        if let Some(title) = &self.title {
            payload.insert("title".to_string(), serde_json::json!(title));
        }
        if let Some(description) = &self.description {
            payload.insert("description".to_string(), serde_json::json!(description));
        }
        if let Some(state) = &self.state {
            payload.insert("state".to_string(), serde_json::json!(state));
        }
        if let Some(due_on) = &self.due_on {
            // Empty string clears: explicit null, distinct from omission.
            let value = if due_on.is_empty() {
                serde_json::Value::Null
            } else {
                serde_json::json!(due_on)
            };
            payload.insert("due_on".to_string(), value);
        }
        serde_json::Value::Object(payload)
    }
}

impl GiteaClient {
    fn milestone_url(&self, owner: &str, repo: &str, rest: &str) -> Result<String, ApiError> {
        Ok(self.api_url(&format!(
            "repos/{}/{}/milestones{rest}",
            encode_segment(owner)?,
            encode_segment(repo)?
        )))
    }

    async fn fetch_all_milestones(
        &self,
        owner: &str,
        repo: &str,
        state: &str,
    ) -> Result<Vec<Milestone>, ApiError> {
        let url = self.milestone_url(owner, repo, "")?;
        let paged = fetch_all(
            |page, limit| {
                let url = url.clone();
                let state = state.to_string();
                async move {
                    self.get_json(
                        url,
                        &[
                            ("state", state),
                            ("page", page.to_string()),
                            ("limit", limit.to_string()),
                        ],
                    )
                    .await
                }
            },
            DEFAULT_LIMIT,
            DEFAULT_MAX_PAGES,
        )
        .await?;
        Ok(paged.into_items("milestone"))
    }

    fn milestone_table(milestones: &[Milestone]) -> HashMap<String, i64> {
        // First match wins on duplicate titles; later entries must not
        // overwrite the one a lookup would have found first.
        let mut table = HashMap::with_capacity(milestones.len());
        for ms in milestones {
            table.entry(ms.title.clone()).or_insert(ms.id);
        }
        table
    }

    /// Lists milestones, filtered by state (`open`, `closed`, `all`).
    ///
    /// This is the user-facing listing; it repopulates the milestone cache
    /// for the repository under the filter it ran with. Resolution only
    /// trusts tables populated under `all`.
    pub async fn list_milestones(
        &self,
        owner: &str,
        repo: &str,
        state: &str,
    ) -> Result<Vec<Milestone>, ApiError> {
        let milestones = self.fetch_all_milestones(owner, repo, state).await?;
        self.milestones.replace(
            &repo_key(owner, repo),
            Self::milestone_table(&milestones),
            Some(state),
        );
        Ok(milestones)
    }

    /// Fetches one milestone by id.
    pub async fn get_milestone(
        &self,
        owner: &str,
        repo: &str,
        id: i64,
    ) -> Result<Milestone, ApiError> {
        let url = self.milestone_url(owner, repo, &format!("/{id}"))?;
        self.get_json(url, &[]).await
    }

    /// Creates a milestone and records its title in the cache in place.
    pub async fn create_milestone(
        &self,
        owner: &str,
        repo: &str,
        title: &str,
        description: &str,
        due_on: Option<&str>,
    ) -> Result<Milestone, ApiError> {
        let url = self.milestone_url(owner, repo, "")?;
        let body = CreateMilestoneRequest {
            title: title.to_string(),
            description: description.to_string(),
            due_on: due_on.map(str::to_string),
        };
        let milestone: Milestone = self.post_json(url, &body).await?;
        self.milestones
            .insert(&repo_key(owner, repo), &milestone.title, milestone.id);
        Ok(milestone)
    }

    /// Updates a milestone.
    ///
    /// When the title changes, the old title stops resolving immediately:
    /// the cache drops every key mapping to this id before inserting the
    /// new title. State-only updates leave the title mapping untouched.
    pub async fn update_milestone(
        &self,
        owner: &str,
        repo: &str,
        id: i64,
        edit: &MilestoneEdit,
    ) -> Result<Milestone, ApiError> {
        let url = self.milestone_url(owner, repo, &format!("/{id}"))?;
        let milestone: Milestone = self.patch_json(url, &edit.to_payload()).await?;
        if edit.title.is_some() {
            self.milestones
                .rename(&repo_key(owner, repo), &milestone.title, milestone.id);
        }
        Ok(milestone)
    }

    /// Resolves a milestone reference (id or title) to its id.
    ///
    /// Integer references are validated by direct fetch — a missing id is
    /// a hard [`ApiError::Http`] failure, never a title lookup. Title
    /// references go through the cache: the table must have been populated
    /// under the `all` filter (refetched otherwise), one refresh is allowed
    /// on a miss, and a still-missing title fails naming the milestone.
    ///
    /// Duplicate titles resolve to the first match.
    pub async fn resolve_milestone(
        &self,
        owner: &str,
        repo: &str,
        reference: &str,
    ) -> Result<i64, ApiError> {
        if let Ok(id) = reference.trim().parse::<i64>() {
            let milestone = self.get_milestone(owner, repo, id).await?;
            return Ok(milestone.id);
        }

        let key = repo_key(owner, repo);
        if !self.milestones.populated_under(&key, Some(ALL_STATES)) {
            let milestones = self.fetch_all_milestones(owner, repo, ALL_STATES).await?;
            self.milestones
                .replace(&key, Self::milestone_table(&milestones), Some(ALL_STATES));
        }

        if let Some(id) = self.milestones.lookup(&key, reference) {
            return Ok(id);
        }

        // One refresh for the miss, then give up.
        let milestones = self.fetch_all_milestones(owner, repo, ALL_STATES).await?;
        self.milestones
            .replace(&key, Self::milestone_table(&milestones), Some(ALL_STATES));

        self.milestones
            .lookup(&key, reference)
            .ok_or_else(|| ApiError::NotFound {
                kind: "Milestone",
                name: reference.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::labels::tests::test_client;

    const MILESTONES: &str = r#"[
        {"id": 5, "title": "Sprint 1", "state": "open"},
        {"id": 6, "title": "Sprint 2", "state": "closed"}
    ]"#;

    #[tokio::test]
    async fn test_numeric_reference_is_validated_by_id() {
        let mut server = mockito::Server::new_async().await;
        // No milestone titled "5" exists anywhere; the id fetch is
        // authoritative.
        let get = server
            .mock("GET", "/api/v1/repos/owner/repo/milestones/5")
            .with_body(r#"{"id": 5, "title": "Sprint 1", "state": "open"}"#)
            .create_async()
            .await;

        let client = test_client(&server);
        let id = client.resolve_milestone("owner", "repo", "5").await.unwrap();
        assert_eq!(id, 5);
        get.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_id_is_a_hard_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v1/repos/owner/repo/milestones/999")
            .with_status(404)
            .with_body(r#"{"message": "milestone does not exist"}"#)
            .create_async()
            .await;

        let client = test_client(&server);
        let err = client
            .resolve_milestone("owner", "repo", "999")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Http { .. }));
    }

    #[tokio::test]
    async fn test_title_resolution_populates_under_all_and_caches() {
        let mut server = mockito::Server::new_async().await;
        let list = server
            .mock("GET", "/api/v1/repos/owner/repo/milestones")
            .match_query(mockito::Matcher::UrlEncoded("state".into(), "all".into()))
            .with_body(MILESTONES)
            .expect(1)
            .create_async()
            .await;

        let client = test_client(&server);
        assert_eq!(
            client
                .resolve_milestone("owner", "repo", "Sprint 1")
                .await
                .unwrap(),
            5
        );
        // Repeating the lookup makes no additional fetch.
        assert_eq!(
            client
                .resolve_milestone("owner", "repo", "Sprint 1")
                .await
                .unwrap(),
            5
        );
        list.assert_async().await;
    }

    #[tokio::test]
    async fn test_narrow_filter_table_is_stale_for_resolution() {
        let mut server = mockito::Server::new_async().await;
        let open_list = server
            .mock("GET", "/api/v1/repos/owner/repo/milestones")
            .match_query(mockito::Matcher::UrlEncoded("state".into(), "open".into()))
            .with_body(r#"[{"id": 5, "title": "Sprint 1", "state": "open"}]"#)
            .expect(1)
            .create_async()
            .await;
        let all_list = server
            .mock("GET", "/api/v1/repos/owner/repo/milestones")
            .match_query(mockito::Matcher::UrlEncoded("state".into(), "all".into()))
            .with_body(MILESTONES)
            .expect(1)
            .create_async()
            .await;

        let client = test_client(&server);
        // User-facing listing populates under "open"...
        client.list_milestones("owner", "repo", "open").await.unwrap();
        // ...which resolution must not trust: "Sprint 2" is closed and
        // only visible under "all".
        assert_eq!(
            client
                .resolve_milestone("owner", "repo", "Sprint 2")
                .await
                .unwrap(),
            6
        );

        open_list.assert_async().await;
        all_list.assert_async().await;
    }

    #[tokio::test]
    async fn test_unknown_title_refreshes_once_then_fails() {
        let mut server = mockito::Server::new_async().await;
        let list = server
            .mock("GET", "/api/v1/repos/owner/repo/milestones")
            .match_query(mockito::Matcher::UrlEncoded("state".into(), "all".into()))
            .with_body(MILESTONES)
            .expect(2)
            .create_async()
            .await;

        let client = test_client(&server);
        let err = client
            .resolve_milestone("owner", "repo", "Sprint 99")
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Milestone 'Sprint 99' not found in repository"
        );
        list.assert_async().await;
    }

    #[tokio::test]
    async fn test_update_due_date_empty_clears_with_null() {
        let mut server = mockito::Server::new_async().await;
        let patch = server
            .mock("PATCH", "/api/v1/repos/owner/repo/milestones/5")
            .match_body(mockito::Matcher::Json(serde_json::json!({
                "due_on": null
            })))
            .with_body(r#"{"id": 5, "title": "Sprint 1", "state": "open"}"#)
            .create_async()
            .await;

        let client = test_client(&server);
        client
            .update_milestone(
                "owner",
                "repo",
                5,
                &MilestoneEdit {
                    due_on: Some(String::new()),
                    ..MilestoneEdit::default()
                },
            )
            .await
            .unwrap();
        patch.assert_async().await;
    }

    #[tokio::test]
    async fn test_retitle_drops_old_cache_key() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v1/repos/owner/repo/milestones")
            .match_query(mockito::Matcher::UrlEncoded("state".into(), "all".into()))
            .with_body(MILESTONES)
            .expect(1)
            .create_async()
            .await;
        server
            .mock("PATCH", "/api/v1/repos/owner/repo/milestones/5")
            .with_body(r#"{"id": 5, "title": "Sprint 1 (final)", "state": "open"}"#)
            .create_async()
            .await;
        // The old title must now MISS in cache; resolution refreshes once
        // and, with the rename reflected server-side, fails cleanly.
        let client = test_client(&server);
        client
            .resolve_milestone("owner", "repo", "Sprint 1")
            .await
            .unwrap();

        client
            .update_milestone(
                "owner",
                "repo",
                5,
                &MilestoneEdit {
                    title: Some("Sprint 1 (final)".to_string()),
                    ..MilestoneEdit::default()
                },
            )
            .await
            .unwrap();

        // The new title resolves from cache without any further listing.
        assert_eq!(
            client
                .resolve_milestone("owner", "repo", "Sprint 1 (final)")
                .await
                .unwrap(),
            5
        );
    }

    #[tokio::test]
    async fn test_state_only_update_keeps_title_mapping() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v1/repos/owner/repo/milestones")
            .match_query(mockito::Matcher::UrlEncoded("state".into(), "all".into()))
            .with_body(MILESTONES)
            .expect(1)
            .create_async()
            .await;
        server
            .mock("PATCH", "/api/v1/repos/owner/repo/milestones/5")
            .match_body(mockito::Matcher::Json(serde_json::json!({"state": "closed"})))
            .with_body(r#"{"id": 5, "title": "Sprint 1", "state": "closed"}"#)
            .create_async()
            .await;

        let client = test_client(&server);
        client
            .resolve_milestone("owner", "repo", "Sprint 1")
            .await
            .unwrap();
        client
            .update_milestone(
                "owner",
                "repo",
                5,
                &MilestoneEdit {
                    state: Some("closed".to_string()),
                    ..MilestoneEdit::default()
                },
            )
            .await
            .unwrap();

        // Still resolvable from cache: one listing total.
        assert_eq!(
            client
                .resolve_milestone("owner", "repo", "Sprint 1")
                .await
                .unwrap(),
            5
        );
    }

    #[tokio::test]
    async fn test_duplicate_titles_resolve_to_first_match() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v1/repos/owner/repo/milestones")
            .match_query(mockito::Matcher::UrlEncoded("state".into(), "all".into()))
            .with_body(
                r#"[
                    {"id": 7, "title": "Sprint 1", "state": "open"},
                    {"id": 9, "title": "Sprint 1", "state": "closed"}
                ]"#,
            )
            .create_async()
            .await;

        let client = test_client(&server);
        assert_eq!(
            client
                .resolve_milestone("owner", "repo", "Sprint 1")
                .await
                .unwrap(),
            7
        );
    }
}
