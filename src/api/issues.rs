//
//  teax
//  api/issues.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/09.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! Issues, issue labels, dependency edges and comments.
//!
//! # Overview
//!
//! Issue mutation has two presence-sensitive payloads worth calling out:
//!
//! - **Edit**: only the fields being changed are serialized; an omitted
//!   field means "leave unchanged". The milestone field uses `0` as the
//!   "clear" sentinel, which serializes as an explicit JSON `null`.
//! - **Create**: a title-only create sends exactly `{"title": ...}`.
//!
//! Dependency edges are directed: "issue X depends on Y" and "issue X
//! blocks Y" are the same edge-creation primitive with the operands
//! swapped. Cross-repository edges are permitted; cycle policy belongs to
//! the server.

use serde::{Deserialize, Serialize};

use crate::api::common::{
    encode_segment, fetch_all, null_default, ApiError, DEFAULT_LIMIT, DEFAULT_MAX_PAGES,
};
use crate::api::labels::Label;
use crate::api::milestones::Milestone;
use crate::api::GiteaClient;

/// A Gitea user reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Server-assigned numeric id.
    pub id: i64,

    /// Login name.
    pub login: String,

    /// Display name; often empty.
    #[serde(default)]
    pub full_name: String,
}

/// An issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    /// Server-global numeric id.
    pub id: i64,

    /// Issue number within the repository.
    pub number: i64,

    /// Title line.
    pub title: String,

    /// `open` or `closed`.
    pub state: String,

    /// Body text; empty when the issue has none.
    #[serde(default)]
    pub body: String,

    /// Attached labels. The server reports `null` for none.
    #[serde(default, deserialize_with = "null_default")]
    pub labels: Vec<Label>,

    /// Assigned users. The server reports `null` for none.
    #[serde(default, deserialize_with = "null_default")]
    pub assignees: Vec<User>,

    /// The issue's milestone, if any.
    #[serde(default)]
    pub milestone: Option<Milestone>,
}

/// The repository half of a dependency edge.
///
/// The `owner` field arrives either as a bare login string or as a full
/// user object depending on the endpoint; both are accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryRef {
    /// Server-assigned numeric id.
    pub id: i64,

    /// Repository name.
    pub name: String,

    /// `owner/repo` form.
    pub full_name: String,

    /// Owner as either a login string or a user record.
    #[serde(default)]
    pub owner: Option<OwnerRef>,
}

/// Owner of a repository reference: some endpoints send the login string,
/// others the full user record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OwnerRef {
    /// Bare login string.
    Login(String),
    /// Full user record.
    User(User),
}

/// One endpoint of a dependency relation, as returned by the dependency
/// and blocks listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dependency {
    /// Server-global numeric id of the related issue.
    pub id: i64,

    /// Issue number within its repository.
    pub number: i64,

    /// Title of the related issue.
    pub title: String,

    /// `open` or `closed`.
    pub state: String,

    /// The repository the related issue lives in.
    pub repository: RepositoryRef,
}

/// A comment on an issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    /// Server-assigned numeric id.
    pub id: i64,

    /// Comment body text.
    pub body: String,

    /// The comment's author.
    pub user: User,

    /// Creation timestamp.
    pub created_at: String,

    /// Last-update timestamp; empty when never edited.
    #[serde(default)]
    pub updated_at: String,
}

/// Fields for creating an issue. Only `title` is required; absent fields
/// are not serialized at all.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NewIssue {
    /// The issue title.
    pub title: String,

    /// Optional body text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    /// Optional assignee login names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignees: Option<Vec<String>>,

    /// Optional label ids (already resolved).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<i64>>,

    /// Optional milestone id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone: Option<i64>,
}

/// Fields for editing an issue. `None` means "leave unchanged".
///
/// `milestone` uses the sentinel `0` for "clear the milestone", which is
/// serialized as an explicit `null` (distinct from the field being
/// omitted).
#[derive(Debug, Clone, Default)]
pub struct IssueEdit {
    /// New title.
    pub title: Option<String>,

    /// New body.
    pub body: Option<String>,

    /// Replacement assignee list.
    pub assignees: Option<Vec<String>>,

    /// New milestone id, or `0` to clear.
    pub milestone: Option<i64>,
}

impl IssueEdit {
    /// Whether the edit changes anything at all.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.body.is_none()
            && self.assignees.is_none()
            && self.milestone.is_none()
    }

    fn to_payload(&self) -> serde_json::Value {
        let mut payload = serde_json::Map::new();
        if let Some(title) = &self.title {
            payload.insert("title".to_string(), serde_json::json!(title));
        }
        if let Some(body) = &self.body {
            payload.insert("body".to_string(), serde_json::json!(body));
        }
        if let Some(assignees) = &self.assignees {
            payload.insert("assignees".to_string(), serde_json::json!(assignees));
        }
        if let Some(milestone) = self.milestone {
            // 0 is the "clear" sentinel: an explicit null, not an omission.
            let value = if milestone > 0 {
                serde_json::json!(milestone)
            } else {
                serde_json::Value::Null
            };
            payload.insert("milestone".to_string(), value);
        }
        serde_json::Value::Object(payload)
    }
}

/// Server-side filters for the issue listing.
#[derive(Debug, Clone, Default)]
pub struct IssueFilter {
    /// `open`, `closed` or `all`.
    pub state: Option<String>,

    /// Label names; matched server-side.
    pub labels: Vec<String>,

    /// Milestone title or id.
    pub milestone: Option<String>,

    /// Assignee login.
    pub assignee: Option<String>,
}

/// Body shared by dependency creation and removal.
#[derive(Debug, Clone, Serialize)]
struct DependencyEdge {
    #[serde(rename = "dependentOwner")]
    owner: String,
    #[serde(rename = "dependentRepo")]
    repo: String,
    #[serde(rename = "dependentIndex")]
    index: i64,
}

#[derive(Debug, Clone, Serialize)]
struct CommentBody {
    body: String,
}

#[derive(Debug, Clone, Serialize)]
struct LabelIds {
    labels: Vec<i64>,
}

impl GiteaClient {
    fn issue_url(&self, owner: &str, repo: &str, rest: &str) -> Result<String, ApiError> {
        Ok(self.api_url(&format!(
            "repos/{}/{}/issues{rest}",
            encode_segment(owner)?,
            encode_segment(repo)?
        )))
    }

    /// Fetches one issue by number.
    pub async fn get_issue(&self, owner: &str, repo: &str, index: i64) -> Result<Issue, ApiError> {
        let url = self.issue_url(owner, repo, &format!("/{index}"))?;
        self.get_json(url, &[]).await
    }

    /// Creates an issue. Only the populated fields of [`NewIssue`] are
    /// sent.
    pub async fn create_issue(
        &self,
        owner: &str,
        repo: &str,
        issue: &NewIssue,
    ) -> Result<Issue, ApiError> {
        let url = self.issue_url(owner, repo, "")?;
        self.post_json(url, issue).await
    }

    /// Edits an issue. Omitted fields are left unchanged; `milestone: 0`
    /// clears the milestone.
    pub async fn edit_issue(
        &self,
        owner: &str,
        repo: &str,
        index: i64,
        edit: &IssueEdit,
    ) -> Result<Issue, ApiError> {
        let url = self.issue_url(owner, repo, &format!("/{index}"))?;
        self.patch_json(url, &edit.to_payload()).await
    }

    /// Lists issues matching the filter, fetching every page.
    pub async fn list_issues(
        &self,
        owner: &str,
        repo: &str,
        filter: &IssueFilter,
    ) -> Result<Vec<Issue>, ApiError> {
        let url = self.issue_url(owner, repo, "")?;
        let paged = fetch_all(
            |page, limit| {
                let url = url.clone();
                async move {
                    let mut query = vec![("page", page.to_string()), ("limit", limit.to_string())];
                    if let Some(state) = &filter.state {
                        query.push(("state", state.clone()));
                    }
                    if !filter.labels.is_empty() {
                        query.push(("labels", filter.labels.join(",")));
                    }
                    if let Some(milestone) = &filter.milestone {
                        query.push(("milestones", milestone.clone()));
                    }
                    if let Some(assignee) = &filter.assignee {
                        query.push(("assigned_by", assignee.clone()));
                    }
                    self.get_json(url, &query).await
                }
            },
            DEFAULT_LIMIT,
            DEFAULT_MAX_PAGES,
        )
        .await?;
        Ok(paged.into_items("issue"))
    }

    // --- Issue labels ---

    /// Lists the labels attached to an issue.
    pub async fn get_issue_labels(
        &self,
        owner: &str,
        repo: &str,
        index: i64,
    ) -> Result<Vec<Label>, ApiError> {
        let url = self.issue_url(owner, repo, &format!("/{index}/labels"))?;
        self.get_json(url, &[]).await
    }

    /// Adds labels (by name) to an issue, resolving names through the
    /// label cache first.
    pub async fn add_issue_labels(
        &self,
        owner: &str,
        repo: &str,
        index: i64,
        names: &[String],
    ) -> Result<Vec<Label>, ApiError> {
        let labels = self.resolve_label_ids(owner, repo, names).await?;
        let url = self.issue_url(owner, repo, &format!("/{index}/labels"))?;
        self.post_json(url, &LabelIds { labels }).await
    }

    /// Replaces all labels on an issue with the given names.
    pub async fn set_issue_labels(
        &self,
        owner: &str,
        repo: &str,
        index: i64,
        names: &[String],
    ) -> Result<Vec<Label>, ApiError> {
        let labels = self.resolve_label_ids(owner, repo, names).await?;
        let url = self.issue_url(owner, repo, &format!("/{index}/labels"))?;
        self.put_json(url, &LabelIds { labels }).await
    }

    /// Removes one label (by name) from an issue.
    pub async fn remove_issue_label(
        &self,
        owner: &str,
        repo: &str,
        index: i64,
        name: &str,
    ) -> Result<(), ApiError> {
        let ids = self
            .resolve_label_ids(owner, repo, &[name.to_string()])
            .await?;
        let url = self.issue_url(owner, repo, &format!("/{index}/labels/{}", ids[0]))?;
        self.delete(url).await
    }

    // --- Dependencies ---

    /// Lists the issues this issue depends on.
    pub async fn list_dependencies(
        &self,
        owner: &str,
        repo: &str,
        index: i64,
    ) -> Result<Vec<Dependency>, ApiError> {
        let url = self.issue_url(owner, repo, &format!("/{index}/dependencies"))?;
        self.get_json(url, &[]).await
    }

    /// Lists the issues this issue blocks.
    pub async fn list_blocks(
        &self,
        owner: &str,
        repo: &str,
        index: i64,
    ) -> Result<Vec<Dependency>, ApiError> {
        let url = self.issue_url(owner, repo, &format!("/{index}/blocks"))?;
        self.get_json(url, &[]).await
    }

    /// Records that `owner/repo#index` depends on
    /// `dep_owner/dep_repo#dep_index`.
    ///
    /// "X blocks Y" is this same call with the operands swapped.
    pub async fn add_dependency(
        &self,
        owner: &str,
        repo: &str,
        index: i64,
        dep_owner: &str,
        dep_repo: &str,
        dep_index: i64,
    ) -> Result<(), ApiError> {
        let url = self.issue_url(owner, repo, &format!("/{index}/dependencies"))?;
        let edge = DependencyEdge {
            owner: dep_owner.to_string(),
            repo: dep_repo.to_string(),
            index: dep_index,
        };
        self.post_empty(url, &edge).await
    }

    /// Removes a dependency edge previously created with
    /// [`add_dependency`](Self::add_dependency).
    pub async fn remove_dependency(
        &self,
        owner: &str,
        repo: &str,
        index: i64,
        dep_owner: &str,
        dep_repo: &str,
        dep_index: i64,
    ) -> Result<(), ApiError> {
        let url = self.issue_url(owner, repo, &format!("/{index}/dependencies"))?;
        let edge = DependencyEdge {
            owner: dep_owner.to_string(),
            repo: dep_repo.to_string(),
            index: dep_index,
        };
        self.delete_with_body(url, &edge).await
    }

    // --- Comments ---

    /// Lists the comments on an issue, fetching every page.
    pub async fn list_comments(
        &self,
        owner: &str,
        repo: &str,
        index: i64,
    ) -> Result<Vec<Comment>, ApiError> {
        let url = self.issue_url(owner, repo, &format!("/{index}/comments"))?;
        let paged = fetch_all(
            |page, limit| {
                let url = url.clone();
                async move {
                    self.get_json(url, &[("page", page.to_string()), ("limit", limit.to_string())])
                        .await
                }
            },
            DEFAULT_LIMIT,
            DEFAULT_MAX_PAGES,
        )
        .await?;
        Ok(paged.into_items("comment"))
    }

    /// Adds a comment to an issue.
    pub async fn create_comment(
        &self,
        owner: &str,
        repo: &str,
        index: i64,
        body: &str,
    ) -> Result<Comment, ApiError> {
        let url = self.issue_url(owner, repo, &format!("/{index}/comments"))?;
        self.post_json(
            url,
            &CommentBody {
                body: body.to_string(),
            },
        )
        .await
    }

    /// Replaces a comment's body. Comment ids are repository-scoped, not
    /// issue-scoped.
    pub async fn edit_comment(
        &self,
        owner: &str,
        repo: &str,
        comment_id: i64,
        body: &str,
    ) -> Result<Comment, ApiError> {
        let url = self.issue_url(owner, repo, &format!("/comments/{comment_id}"))?;
        self.patch_json(
            url,
            &CommentBody {
                body: body.to_string(),
            },
        )
        .await
    }

    /// Deletes a comment.
    pub async fn delete_comment(
        &self,
        owner: &str,
        repo: &str,
        comment_id: i64,
    ) -> Result<(), ApiError> {
        let url = self.issue_url(owner, repo, &format!("/comments/{comment_id}"))?;
        self.delete(url).await
    }
}
