//
//  teax
//  api/actions.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/09.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! Gitea Actions: runners, workflows, runs, jobs, secrets and variables.
//!
//! # Scopes
//!
//! Runner endpoints exist at repository, organisation and global (admin)
//! level; secrets and variables at repository, organisation and user
//! level. Every operation here takes the corresponding tagged scope and
//! builds its path from the scope's prefix.
//!
//! # Response shapes
//!
//! This family is where the server is least consistent about list shapes:
//! runs arrive wrapped in `{"workflow_runs": [...]}`, jobs in
//! `{"jobs": [...]}`, workflows either wrapped in `{"workflows": [...]}`
//! or as a bare array depending on server version; runners, secrets and
//! variables are bare arrays. Each decoder accepts exactly the shapes
//! documented for its resource and fails with a decode error otherwise.
//!
//! # Run references
//!
//! The native run object carries two numbers: the repository-sequential
//! `run_number` users see in the UI, and the server-global `id` every
//! endpoint wants. [`GiteaClient::resolve_run_id`] converts between them
//! with a small-number heuristic that callers can override.

use serde::{Deserialize, Serialize};

use crate::api::common::{
    encode_segment, fetch_all, null_default, ApiError, Scope, SecretScope, DEFAULT_LIMIT,
    DEFAULT_MAX_PAGES,
};
use crate::api::GiteaClient;
use crate::util::extract_workflow_name;

/// Run numbers below this are tried as `run_number` first; anything
/// larger is assumed to be a server-global run id.
const RUN_NUMBER_CUTOFF: i64 = 10_000;

/// An Actions runner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Runner {
    /// Server-assigned numeric id.
    pub id: i64,

    /// Runner name as registered.
    pub name: String,

    /// `online`, `offline`, `idle` or `active`.
    pub status: String,

    /// Whether the runner is currently executing a job.
    #[serde(default)]
    pub busy: bool,

    /// Labels the runner accepts jobs for.
    #[serde(default, deserialize_with = "null_default")]
    pub labels: Vec<String>,

    /// act_runner version string; may be empty.
    #[serde(default)]
    pub version: String,
}

/// A one-time runner registration token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationToken {
    /// The token to pass to `act_runner register`.
    pub token: String,
}

/// An Actions workflow (one workflow file).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workflow {
    /// Workflow id; the server uses the file name.
    pub id: String,

    /// Display name from the workflow file.
    #[serde(default)]
    pub name: String,

    /// Path of the workflow file in the repository.
    pub path: String,

    /// `active` or one of the `disabled_*` states.
    #[serde(default)]
    pub state: String,
}

/// One execution of a workflow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowRun {
    /// Server-global numeric id.
    pub id: i64,

    /// Repository-sequential run number.
    pub run_number: i64,

    /// `queued`, `in_progress`, `completed` or `waiting`.
    pub status: String,

    /// `success`, `failure`, `cancelled`, `skipped`; absent while running.
    #[serde(default)]
    pub conclusion: Option<String>,

    /// Commit the run executed against.
    #[serde(default)]
    pub head_sha: String,

    /// Branch; may be empty for dispatch events.
    #[serde(default)]
    pub head_branch: String,

    /// Trigger event (`push`, `pull_request`, `workflow_dispatch`, ...).
    #[serde(default)]
    pub event: String,

    /// Human title of the run.
    #[serde(default)]
    pub display_title: String,

    /// Workflow file path, sometimes suffixed with `@<ref-spec>`.
    pub path: String,
}

/// One step of a job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowStep {
    /// Step ordinal within the job.
    pub number: i64,

    /// Step name.
    pub name: String,

    /// `queued`, `in_progress` or `completed`.
    pub status: String,

    /// Step conclusion once completed.
    #[serde(default)]
    pub conclusion: Option<String>,
}

/// One job of a workflow run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowJob {
    /// Server-global numeric id.
    pub id: i64,

    /// The run this job belongs to.
    pub run_id: i64,

    /// Job name from the workflow file.
    pub name: String,

    /// `queued`, `in_progress`, `completed` or `waiting`.
    pub status: String,

    /// Job conclusion once completed.
    #[serde(default)]
    pub conclusion: Option<String>,

    /// Name of the runner that took the job, if any.
    #[serde(default)]
    pub runner_name: Option<String>,

    /// Steps; the server reports `null` before the job starts.
    #[serde(default, deserialize_with = "null_default")]
    pub steps: Vec<WorkflowStep>,
}

/// An Actions secret (metadata only; values are never returned).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Secret {
    /// Secret name.
    pub name: String,

    /// Creation timestamp; may be empty.
    #[serde(default)]
    pub created_at: String,
}

/// An Actions variable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variable {
    /// Variable name.
    pub name: String,

    /// The variable value. The server reports it as `data`.
    #[serde(alias = "value")]
    pub data: String,

    /// Optional description.
    #[serde(default)]
    pub description: String,
}

/// Wrapped-or-bare decoder for the workflows listing.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WorkflowPage {
    Wrapped { workflows: Vec<Workflow> },
    Bare(Vec<Workflow>),
}

impl WorkflowPage {
    fn into_vec(self) -> Vec<Workflow> {
        match self {
            Self::Wrapped { workflows } => workflows,
            Self::Bare(workflows) => workflows,
        }
    }
}

/// Runs arrive wrapped under `workflow_runs`.
#[derive(Debug, Deserialize)]
struct RunPage {
    #[serde(default, deserialize_with = "null_default")]
    workflow_runs: Vec<WorkflowRun>,
}

/// Jobs arrive wrapped under `jobs`.
#[derive(Debug, Deserialize)]
struct JobPage {
    #[serde(default, deserialize_with = "null_default")]
    jobs: Vec<WorkflowJob>,
}

#[derive(Debug, Serialize)]
struct DispatchRequest {
    #[serde(rename = "ref")]
    git_ref: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    inputs: Option<serde_json::Map<String, serde_json::Value>>,
}

#[derive(Debug, Serialize)]
struct SecretPayload {
    data: String,
}

#[derive(Debug, Serialize)]
struct VariablePayload {
    value: String,
}

impl GiteaClient {
    // --- Runners ---

    /// Lists the runners visible at a scope.
    pub async fn list_runners(&self, scope: &Scope) -> Result<Vec<Runner>, ApiError> {
        let url = self.api_url(&format!("{}/actions/runners", scope.actions_prefix()?));
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
        Ok(paged.into_items("runner"))
    }

    /// Fetches one runner by id.
    pub async fn get_runner(&self, scope: &Scope, id: i64) -> Result<Runner, ApiError> {
        let url = self.api_url(&format!("{}/actions/runners/{id}", scope.actions_prefix()?));
        self.get_json(url, &[]).await
    }

    /// Deletes a runner.
    pub async fn delete_runner(&self, scope: &Scope, id: i64) -> Result<(), ApiError> {
        let url = self.api_url(&format!("{}/actions/runners/{id}", scope.actions_prefix()?));
        self.delete(url).await
    }

    /// Fetches a registration token for attaching new runners at a scope.
    pub async fn runner_registration_token(
        &self,
        scope: &Scope,
    ) -> Result<RegistrationToken, ApiError> {
        let url = self.api_url(&format!(
            "{}/actions/runners/registration-token",
            scope.actions_prefix()?
        ));
        self.get_json(url, &[]).await
    }

    // --- Workflows ---

    fn workflow_url(&self, owner: &str, repo: &str, rest: &str) -> Result<String, ApiError> {
        Ok(self.api_url(&format!(
            "repos/{}/{}/actions/workflows{rest}",
            encode_segment(owner)?,
            encode_segment(repo)?
        )))
    }

    /// Lists the workflows of a repository.
    ///
    /// Accepts both the wrapped (`{"workflows": [...]}`) and the bare-array
    /// response shape.
    pub async fn list_workflows(&self, owner: &str, repo: &str) -> Result<Vec<Workflow>, ApiError> {
        let url = self.workflow_url(owner, repo, "")?;
        let paged = fetch_all(
            |page, limit| {
                let url = url.clone();
                async move {
                    let page: WorkflowPage = self
                        .get_json(url, &[("page", page.to_string()), ("limit", limit.to_string())])
                        .await?;
                    Ok(page.into_vec())
                }
            },
            DEFAULT_LIMIT,
            DEFAULT_MAX_PAGES,
        )
        .await?;
        Ok(paged.into_items("workflow"))
    }

    /// Fetches one workflow by id (file name).
    pub async fn get_workflow(
        &self,
        owner: &str,
        repo: &str,
        workflow_id: &str,
    ) -> Result<Workflow, ApiError> {
        let url = self.workflow_url(owner, repo, &format!("/{}", encode_segment(workflow_id)?))?;
        self.get_json(url, &[]).await
    }

    /// Enables a disabled workflow.
    pub async fn enable_workflow(
        &self,
        owner: &str,
        repo: &str,
        workflow_id: &str,
    ) -> Result<(), ApiError> {
        let url = self.workflow_url(
            owner,
            repo,
            &format!("/{}/enable", encode_segment(workflow_id)?),
        )?;
        self.execute(reqwest::Method::PUT, url, &[], None).await?;
        Ok(())
    }

    /// Disables a workflow.
    pub async fn disable_workflow(
        &self,
        owner: &str,
        repo: &str,
        workflow_id: &str,
    ) -> Result<(), ApiError> {
        let url = self.workflow_url(
            owner,
            repo,
            &format!("/{}/disable", encode_segment(workflow_id)?),
        )?;
        self.execute(reqwest::Method::PUT, url, &[], None).await?;
        Ok(())
    }

    /// Triggers a `workflow_dispatch` event for a workflow on a ref.
    pub async fn dispatch_workflow(
        &self,
        owner: &str,
        repo: &str,
        workflow_id: &str,
        git_ref: &str,
        inputs: Option<serde_json::Map<String, serde_json::Value>>,
    ) -> Result<(), ApiError> {
        let url = self.workflow_url(
            owner,
            repo,
            &format!("/{}/dispatches", encode_segment(workflow_id)?),
        )?;
        self.post_empty(
            url,
            &DispatchRequest {
                git_ref: git_ref.to_string(),
                inputs,
            },
        )
        .await
    }

    // --- Runs and jobs ---

    fn runs_url(&self, owner: &str, repo: &str, rest: &str) -> Result<String, ApiError> {
        Ok(self.api_url(&format!(
            "repos/{}/{}/actions/runs{rest}",
            encode_segment(owner)?,
            encode_segment(repo)?
        )))
    }

    /// Lists workflow runs, newest first, honouring custom page limits.
    ///
    /// Runs arrive wrapped under `workflow_runs`; any other shape is a
    /// decode error.
    pub async fn list_runs(
        &self,
        owner: &str,
        repo: &str,
        limit: u32,
        max_pages: u32,
    ) -> Result<Vec<WorkflowRun>, ApiError> {
        let url = self.runs_url(owner, repo, "")?;
        let paged = fetch_all(
            |page, limit| {
                let url = url.clone();
                async move {
                    let page: RunPage = self
                        .get_json(url, &[("page", page.to_string()), ("limit", limit.to_string())])
                        .await?;
                    Ok(page.workflow_runs)
                }
            },
            limit,
            max_pages,
        )
        .await?;
        Ok(paged.into_items("workflow run"))
    }

    /// Fetches one run by server-global id.
    ///
    /// There is no direct run-by-id endpoint; existence is probed through
    /// the run's job list and the record located in the runs listing.
    pub async fn get_run(&self, owner: &str, repo: &str, run_id: i64) -> Result<WorkflowRun, ApiError> {
        // Probing the jobs endpoint first turns an unknown id into a
        // proper 404 instead of an empty scan.
        self.list_run_jobs(owner, repo, run_id).await?;

        let runs = self.list_runs(owner, repo, 100, 5).await?;
        runs.into_iter()
            .find(|r| r.id == run_id)
            .ok_or_else(|| ApiError::NotFound {
                kind: "Run",
                name: run_id.to_string(),
            })
    }

    /// Deletes a workflow run.
    pub async fn delete_run(&self, owner: &str, repo: &str, run_id: i64) -> Result<(), ApiError> {
        let url = self.runs_url(owner, repo, &format!("/{run_id}"))?;
        self.delete(url).await
    }

    /// Re-runs a workflow run by dispatching its workflow on the run's
    /// branch.
    ///
    /// The server has no native rerun endpoint; dispatch only works for
    /// workflows with a `workflow_dispatch` trigger, and the original
    /// event context is not preserved.
    pub async fn rerun_run(&self, owner: &str, repo: &str, run_id: i64) -> Result<WorkflowRun, ApiError> {
        let run = self.get_run(owner, repo, run_id).await?;
        let workflow = extract_workflow_name(&run.path);
        let git_ref = if run.head_branch.is_empty() {
            run.head_sha.clone()
        } else {
            run.head_branch.clone()
        };
        self.dispatch_workflow(owner, repo, &workflow, &git_ref, None)
            .await?;
        Ok(run)
    }

    /// Lists the jobs of a run. Jobs arrive wrapped under `jobs`.
    pub async fn list_run_jobs(
        &self,
        owner: &str,
        repo: &str,
        run_id: i64,
    ) -> Result<Vec<WorkflowJob>, ApiError> {
        let url = self.runs_url(owner, repo, &format!("/{run_id}/jobs"))?;
        let page: JobPage = self.get_json(url, &[]).await?;
        Ok(page.jobs)
    }

    /// Fetches the plain-text logs of a job.
    pub async fn job_logs(&self, owner: &str, repo: &str, job_id: i64) -> Result<String, ApiError> {
        let url = self.api_url(&format!(
            "repos/{}/{}/actions/jobs/{job_id}/logs",
            encode_segment(owner)?,
            encode_segment(repo)?
        ));
        self.get_text(url).await
    }

    /// Resolves a CLI run reference to a server-global run id.
    ///
    /// References below 10 000 are looked up as repository `run_number`s
    /// first (falling back to treating them as ids); larger values are
    /// taken as ids directly. `force_number` / `force_id` override the
    /// heuristic; both at once is a validation error.
    pub async fn resolve_run_id(
        &self,
        owner: &str,
        repo: &str,
        reference: &str,
        force_number: bool,
        force_id: bool,
    ) -> Result<i64, ApiError> {
        if force_number && force_id {
            return Err(ApiError::Validation(
                "Cannot specify both --by-number and --by-id".to_string(),
            ));
        }

        let value: i64 = reference.trim().parse().map_err(|_| {
            ApiError::Validation(format!("Invalid run reference: {reference}"))
        })?;
        if value <= 0 {
            return Err(ApiError::Validation(format!(
                "Run reference must be positive, got: {value}"
            )));
        }

        if force_id {
            return Ok(value);
        }

        if force_number || value < RUN_NUMBER_CUTOFF {
            let runs = self.list_runs(owner, repo, 100, 5).await?;
            if let Some(run) = runs.iter().find(|r| r.run_number == value) {
                return Ok(run.id);
            }
            if force_number {
                return Err(ApiError::Validation(format!(
                    "No run with run_number {value} found"
                )));
            }
        }
        Ok(value)
    }

    // --- Secrets ---

    /// Lists the secrets at a scope (names only; values are never
    /// returned by the server).
    pub async fn list_secrets(&self, scope: &SecretScope) -> Result<Vec<Secret>, ApiError> {
        let url = self.api_url(&format!("{}/actions/secrets", scope.actions_prefix()?));
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
        Ok(paged.into_items("secret"))
    }

    /// Creates or updates a secret. Returns `true` when the secret was
    /// created, `false` when an existing one was updated.
    pub async fn set_secret(
        &self,
        scope: &SecretScope,
        name: &str,
        value: &str,
    ) -> Result<bool, ApiError> {
        let url = self.api_url(&format!(
            "{}/actions/secrets/{}",
            scope.actions_prefix()?,
            encode_segment(name)?
        ));
        let status = self
            .put_status(
                url,
                &SecretPayload {
                    data: value.to_string(),
                },
            )
            .await?;
        Ok(status == reqwest::StatusCode::CREATED)
    }

    /// Deletes a secret.
    pub async fn delete_secret(&self, scope: &SecretScope, name: &str) -> Result<(), ApiError> {
        let url = self.api_url(&format!(
            "{}/actions/secrets/{}",
            scope.actions_prefix()?,
            encode_segment(name)?
        ));
        self.delete(url).await
    }

    // --- Variables ---

    /// Lists the variables at a scope.
    pub async fn list_variables(&self, scope: &SecretScope) -> Result<Vec<Variable>, ApiError> {
        let url = self.api_url(&format!("{}/actions/variables", scope.actions_prefix()?));
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
        Ok(paged.into_items("variable"))
    }

    /// Fetches one variable by name.
    pub async fn get_variable(
        &self,
        scope: &SecretScope,
        name: &str,
    ) -> Result<Variable, ApiError> {
        let url = self.api_url(&format!(
            "{}/actions/variables/{}",
            scope.actions_prefix()?,
            encode_segment(name)?
        ));
        self.get_json(url, &[]).await
    }

    /// Creates or updates a variable. Returns `true` when the variable
    /// was created, `false` when an existing one was updated.
    pub async fn set_variable(
        &self,
        scope: &SecretScope,
        name: &str,
        value: &str,
    ) -> Result<bool, ApiError> {
        let url = self.api_url(&format!(
            "{}/actions/variables/{}",
            scope.actions_prefix()?,
            encode_segment(name)?
        ));
        let payload = VariablePayload {
            value: value.to_string(),
        };
        match self.post_empty(url.clone(), &payload).await {
            Ok(()) => Ok(true),
            Err(ApiError::Http { status, .. }) if status == reqwest::StatusCode::CONFLICT => {
                self.put_status(url, &payload).await?;
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Deletes a variable.
    pub async fn delete_variable(&self, scope: &SecretScope, name: &str) -> Result<(), ApiError> {
        let url = self.api_url(&format!(
            "{}/actions/variables/{}",
            scope.actions_prefix()?,
            encode_segment(name)?
        ));
        self.delete(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::labels::tests::test_client;

    const RUNNER: &str = r#"{
        "id": 1, "name": "runner-1", "status": "online", "busy": false,
        "labels": ["ubuntu-latest"], "version": "v0.2.6"
    }"#;

    fn repo_scope() -> Scope {
        Scope::Repo {
            owner: "owner".to_string(),
            repo: "repo".to_string(),
        }
    }

    #[tokio::test]
    async fn test_runner_scopes_build_distinct_paths() {
        let mut server = mockito::Server::new_async().await;
        let repo = server
            .mock("GET", "/api/v1/repos/owner/repo/actions/runners")
            .match_query(mockito::Matcher::Any)
            .with_body(format!("[{RUNNER}]"))
            .create_async()
            .await;
        let org = server
            .mock("GET", "/api/v1/orgs/myorg/actions/runners")
            .match_query(mockito::Matcher::Any)
            .with_body("[]")
            .create_async()
            .await;
        let admin = server
            .mock("GET", "/api/v1/admin/actions/runners")
            .match_query(mockito::Matcher::Any)
            .with_body("[]")
            .create_async()
            .await;

        let client = test_client(&server);
        let runners = client.list_runners(&repo_scope()).await.unwrap();
        assert_eq!(runners.len(), 1);
        assert_eq!(runners[0].name, "runner-1");

        client
            .list_runners(&Scope::Org {
                name: "myorg".to_string(),
            })
            .await
            .unwrap();
        client.list_runners(&Scope::Global).await.unwrap();

        repo.assert_async().await;
        org.assert_async().await;
        admin.assert_async().await;
    }

    #[tokio::test]
    async fn test_registration_token() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock(
                "GET",
                "/api/v1/repos/owner/repo/actions/runners/registration-token",
            )
            .with_body(r#"{"token": "REG-TOKEN-123"}"#)
            .create_async()
            .await;

        let client = test_client(&server);
        let token = client
            .runner_registration_token(&repo_scope())
            .await
            .unwrap();
        assert_eq!(token.token, "REG-TOKEN-123");
    }

    #[tokio::test]
    async fn test_list_workflows_accepts_wrapped_and_bare() {
        let wrapped = r#"{"workflows": [
            {"id": "ci.yml", "name": "CI", "path": ".gitea/workflows/ci.yml", "state": "active"}
        ]}"#;
        let bare = r#"[
            {"id": "ci.yml", "name": "CI", "path": ".gitea/workflows/ci.yml", "state": "active"}
        ]"#;

        for body in [wrapped, bare] {
            let mut server = mockito::Server::new_async().await;
            server
                .mock("GET", "/api/v1/repos/owner/repo/actions/workflows")
                .match_query(mockito::Matcher::Any)
                .with_body(body)
                .create_async()
                .await;

            let client = test_client(&server);
            let workflows = client.list_workflows("owner", "repo").await.unwrap();
            assert_eq!(workflows.len(), 1);
            assert_eq!(workflows[0].id, "ci.yml");
        }
    }

    #[tokio::test]
    async fn test_runs_wrong_wrapper_is_a_decode_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v1/repos/owner/repo/actions/runs")
            .match_query(mockito::Matcher::Any)
            .with_body(r#"{"total_count": 0}"#)
            .create_async()
            .await;

        let client = test_client(&server);
        // Missing "workflow_runs" key decodes as the default empty list;
        // a wrapper of the wrong type must not.
        let runs = client.list_runs("owner", "repo", 50, 100).await.unwrap();
        assert!(runs.is_empty());

        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v1/repos/owner/repo/actions/runs")
            .match_query(mockito::Matcher::Any)
            .with_body(r#"{"workflow_runs": "oops"}"#)
            .create_async()
            .await;
        let client = test_client(&server);
        let err = client.list_runs("owner", "repo", 50, 100).await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    const RUN: &str = r#"{
        "id": 42000, "run_number": 15, "status": "completed",
        "conclusion": "failure", "head_sha": "abc12345", "head_branch": "main",
        "event": "push", "display_title": "CI",
        "path": ".gitea/workflows/ci.yml@refs/heads/main"
    }"#;

    #[tokio::test]
    async fn test_resolve_run_id_heuristics() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v1/repos/owner/repo/actions/runs")
            .match_query(mockito::Matcher::Any)
            .with_body(format!(r#"{{"workflow_runs": [{RUN}]}}"#))
            .create_async()
            .await;

        let client = test_client(&server);
        // Small number resolves through run_number.
        assert_eq!(
            client
                .resolve_run_id("owner", "repo", "15", false, false)
                .await
                .unwrap(),
            42000
        );
        // Large number is taken as an id without any listing.
        assert_eq!(
            client
                .resolve_run_id("owner", "repo", "42000", false, false)
                .await
                .unwrap(),
            42000
        );
        // Forced id skips resolution even for small values.
        assert_eq!(
            client
                .resolve_run_id("owner", "repo", "15", false, true)
                .await
                .unwrap(),
            15
        );
        // Conflicting overrides are rejected up front.
        assert!(matches!(
            client
                .resolve_run_id("owner", "repo", "15", true, true)
                .await,
            Err(ApiError::Validation(_))
        ));
        assert!(matches!(
            client
                .resolve_run_id("owner", "repo", "abc", false, false)
                .await,
            Err(ApiError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_rerun_dispatches_workflow_on_run_branch() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v1/repos/owner/repo/actions/runs/42000/jobs")
            .with_body(r#"{"jobs": [{"id": 123, "run_id": 42000, "name": "build", "status": "completed", "conclusion": "failure", "steps": null}]}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/api/v1/repos/owner/repo/actions/runs")
            .match_query(mockito::Matcher::Any)
            .with_body(format!(r#"{{"workflow_runs": [{RUN}]}}"#))
            .create_async()
            .await;
        let dispatch = server
            .mock(
                "POST",
                "/api/v1/repos/owner/repo/actions/workflows/ci.yml/dispatches",
            )
            .match_body(mockito::Matcher::Json(serde_json::json!({"ref": "main"})))
            .with_status(204)
            .create_async()
            .await;

        let client = test_client(&server);
        let run = client.rerun_run("owner", "repo", 42000).await.unwrap();
        assert_eq!(run.run_number, 15);
        dispatch.assert_async().await;
    }

    #[tokio::test]
    async fn test_set_secret_reports_created_vs_updated() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("PUT", "/api/v1/repos/owner/repo/actions/secrets/DEPLOY_KEY")
            .match_body(mockito::Matcher::Json(serde_json::json!({"data": "s3cret"})))
            .with_status(201)
            .create_async()
            .await;
        server
            .mock("PUT", "/api/v1/orgs/myorg/actions/secrets/DEPLOY_KEY")
            .with_status(204)
            .create_async()
            .await;

        let client = test_client(&server);
        let created = client
            .set_secret(
                &SecretScope::Repo {
                    owner: "owner".to_string(),
                    repo: "repo".to_string(),
                },
                "DEPLOY_KEY",
                "s3cret",
            )
            .await
            .unwrap();
        assert!(created);

        let created = client
            .set_secret(
                &SecretScope::Org {
                    name: "myorg".to_string(),
                },
                "DEPLOY_KEY",
                "s3cret",
            )
            .await
            .unwrap();
        assert!(!created);
    }

    #[tokio::test]
    async fn test_set_variable_falls_back_to_update_on_conflict() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/v1/user/actions/variables/BUILD_FLAGS")
            .with_status(409)
            .with_body(r#"{"message": "variable already exists"}"#)
            .create_async()
            .await;
        let update = server
            .mock("PUT", "/api/v1/user/actions/variables/BUILD_FLAGS")
            .match_body(mockito::Matcher::Json(serde_json::json!({"value": "-O2"})))
            .with_status(204)
            .create_async()
            .await;

        let client = test_client(&server);
        let created = client
            .set_variable(&SecretScope::User, "BUILD_FLAGS", "-O2")
            .await
            .unwrap();
        assert!(!created);
        update.assert_async().await;
    }

    #[tokio::test]
    async fn test_variable_accepts_data_or_value_key() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v1/user/actions/variables/NAME")
            .with_body(r#"{"name": "NAME", "data": "from-data"}"#)
            .create_async()
            .await;

        let client = test_client(&server);
        let var = client
            .get_variable(&SecretScope::User, "NAME")
            .await
            .unwrap();
        assert_eq!(var.data, "from-data");

        let from_value: Variable =
            serde_json::from_str(r#"{"name": "NAME", "value": "from-value"}"#).unwrap();
        assert_eq!(from_value.data, "from-value");
    }

    #[tokio::test]
    async fn test_job_logs_are_plain_text() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v1/repos/owner/repo/actions/jobs/123/logs")
            .with_body("line 1\nline 2\n")
            .create_async()
            .await;

        let client = test_client(&server);
        let logs = client.job_logs("owner", "repo", 123).await.unwrap();
        assert_eq!(logs, "line 1\nline 2\n");
    }
}
