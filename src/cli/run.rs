//
//  teax
//  cli/run.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/09.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! Actions workflow run commands
//!
//! Run references accept either the repository-sequential run number or
//! the server-global run id; `--by-number`/`--by-id` override the
//! small-number heuristic. `--workflow` filters the listing on the run's
//! recorded workflow path, with any `@<ref-spec>` suffix stripped first.

use anyhow::Result;
use clap::{Args, Subcommand};
use dialoguer::Confirm;

use crate::api::actions::WorkflowRun;
use crate::output::RowOutput;
use crate::util::{extract_workflow_name, parse_repo, truncate, workflow_path_matches};

use super::GlobalOptions;

/// Inspect Actions workflow runs and jobs
#[derive(Args, Debug)]
pub struct RunsCommand {
    #[command(subcommand)]
    pub command: RunsSubcommand,
}

/// Run-reference flags shared by run-addressing subcommands.
#[derive(Args, Debug, Clone)]
pub struct RunRefArgs {
    /// Run number or run id
    pub run: String,

    /// Repository in owner/repo format
    #[arg(long, short = 'r', required = true)]
    pub repo: String,

    /// Force interpretation as a run number
    #[arg(long, conflicts_with = "by_id")]
    pub by_number: bool,

    /// Force interpretation as a run id
    #[arg(long)]
    pub by_id: bool,
}

#[derive(Subcommand, Debug)]
pub enum RunsSubcommand {
    /// List workflow runs
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Get one run
    Get(RunRefArgs),

    /// List the jobs of a run
    Jobs(RunRefArgs),

    /// Show the logs of a job
    Logs(LogsArgs),

    /// Re-run a workflow run (via workflow dispatch)
    Rerun(RunRefArgs),

    /// Delete a run
    Delete(DeleteArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Repository in owner/repo format
    #[arg(long, short = 'r', required = true)]
    pub repo: String,

    /// Only runs of this workflow (file name, e.g. ci.yml)
    #[arg(long, short = 'w')]
    pub workflow: Option<String>,

    /// Maximum runs to list
    #[arg(long, short = 'l', default_value = "50")]
    pub limit: u32,
}

#[derive(Args, Debug)]
pub struct LogsArgs {
    /// Job id
    pub job_id: i64,

    /// Repository in owner/repo format
    #[arg(long, short = 'r', required = true)]
    pub repo: String,

    /// Only show the last N lines
    #[arg(long)]
    pub tail: Option<usize>,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    #[command(flatten)]
    pub run: RunRefArgs,

    /// Skip confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

struct RunRow {
    id: i64,
    number: i64,
    workflow: String,
    status: String,
    conclusion: String,
    branch: String,
    sha: String,
    title: String,
}

impl RunRow {
    fn from_run(run: &WorkflowRun) -> Self {
        Self {
            id: run.id,
            number: run.run_number,
            workflow: extract_workflow_name(&run.path),
            status: run.status.clone(),
            conclusion: run.conclusion.clone().unwrap_or_default(),
            branch: run.head_branch.clone(),
            sha: run.head_sha.chars().take(8).collect(),
            title: truncate(&run.display_title, 40),
        }
    }
}

impl RowOutput for RunRow {
    fn headers() -> Vec<&'static str> {
        vec![
            "number", "id", "workflow", "status", "conclusion", "branch", "sha", "title",
        ]
    }

    fn row(&self) -> Vec<String> {
        vec![
            format!("#{}", self.number),
            self.id.to_string(),
            self.workflow.clone(),
            self.status.clone(),
            self.conclusion.clone(),
            self.branch.clone(),
            self.sha.clone(),
            self.title.clone(),
        ]
    }

    fn simple(&self) -> String {
        let outcome = if self.conclusion.is_empty() {
            &self.status
        } else {
            &self.conclusion
        };
        format!("{} {} {}", self.number, self.workflow, outcome)
    }
}

struct JobRow {
    id: i64,
    name: String,
    status: String,
    conclusion: String,
    runner: String,
}

impl RowOutput for JobRow {
    fn headers() -> Vec<&'static str> {
        vec!["id", "name", "status", "conclusion", "runner"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.status.clone(),
            self.conclusion.clone(),
            self.runner.clone(),
        ]
    }

    fn simple(&self) -> String {
        let outcome = if self.conclusion.is_empty() {
            &self.status
        } else {
            &self.conclusion
        };
        format!("{} {} {}", self.id, self.name, outcome)
    }
}

impl RunsCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            RunsSubcommand::List(args) => self.list(args, global).await,
            RunsSubcommand::Get(args) => self.get(args, global).await,
            RunsSubcommand::Jobs(args) => self.jobs(args, global).await,
            RunsSubcommand::Logs(args) => self.logs(args, global).await,
            RunsSubcommand::Rerun(args) => self.rerun(args, global).await,
            RunsSubcommand::Delete(args) => self.delete(args, global).await,
        }
    }

    async fn list(&self, args: &ListArgs, global: &GlobalOptions) -> Result<()> {
        let (owner, repo) = parse_repo(&args.repo)?;
        let client = global.client()?;
        let writer = global.writer();

        let mut runs = client.list_runs(&owner, &repo, args.limit, 5).await?;
        if let Some(workflow) = &args.workflow {
            runs.retain(|r| workflow_path_matches(&r.path, workflow));
        }

        let rows: Vec<RunRow> = runs.iter().map(RunRow::from_run).collect();
        writer.write_list(&rows, "No workflow runs found");

        client.close();
        Ok(())
    }

    async fn get(&self, args: &RunRefArgs, global: &GlobalOptions) -> Result<()> {
        let (owner, repo) = parse_repo(&args.repo)?;
        let client = global.client()?;
        let writer = global.writer();

        let run_id = client
            .resolve_run_id(&owner, &repo, &args.run, args.by_number, args.by_id)
            .await?;
        let run = client.get_run(&owner, &repo, run_id).await?;
        writer.write_one(&RunRow::from_run(&run));

        client.close();
        Ok(())
    }

    async fn jobs(&self, args: &RunRefArgs, global: &GlobalOptions) -> Result<()> {
        let (owner, repo) = parse_repo(&args.repo)?;
        let client = global.client()?;
        let writer = global.writer();

        let run_id = client
            .resolve_run_id(&owner, &repo, &args.run, args.by_number, args.by_id)
            .await?;
        let jobs = client.list_run_jobs(&owner, &repo, run_id).await?;
        let rows: Vec<JobRow> = jobs
            .iter()
            .map(|j| JobRow {
                id: j.id,
                name: j.name.clone(),
                status: j.status.clone(),
                conclusion: j.conclusion.clone().unwrap_or_default(),
                runner: j.runner_name.clone().unwrap_or_default(),
            })
            .collect();
        writer.write_list(&rows, "No jobs found");

        client.close();
        Ok(())
    }

    async fn logs(&self, args: &LogsArgs, global: &GlobalOptions) -> Result<()> {
        let (owner, repo) = parse_repo(&args.repo)?;
        let client = global.client()?;

        let logs = client.job_logs(&owner, &repo, args.job_id).await?;
        match args.tail {
            Some(count) => {
                let lines: Vec<&str> = logs.lines().collect();
                let start = lines.len().saturating_sub(count);
                for line in &lines[start..] {
                    println!("{line}");
                }
            }
            None => print!("{logs}"),
        }

        client.close();
        Ok(())
    }

    async fn rerun(&self, args: &RunRefArgs, global: &GlobalOptions) -> Result<()> {
        let (owner, repo) = parse_repo(&args.repo)?;
        let client = global.client()?;
        let writer = global.writer();

        let run_id = client
            .resolve_run_id(&owner, &repo, &args.run, args.by_number, args.by_id)
            .await?;
        let run = client.rerun_run(&owner, &repo, run_id).await?;

        eprintln!("Note: rerun uses workflow dispatch; the original event context is not preserved");
        writer.write_mutation(
            "dispatched",
            &format!(
                "{} on {}",
                extract_workflow_name(&run.path),
                run.head_branch
            ),
        );

        client.close();
        Ok(())
    }

    async fn delete(&self, args: &DeleteArgs, global: &GlobalOptions) -> Result<()> {
        let (owner, repo) = parse_repo(&args.run.repo)?;
        let client = global.client()?;
        let writer = global.writer();

        let run_id = client
            .resolve_run_id(&owner, &repo, &args.run.run, args.run.by_number, args.run.by_id)
            .await?;
        let run = client.get_run(&owner, &repo, run_id).await?;

        if !args.yes {
            let prompt = format!(
                "Delete run #{} ({}, {})?",
                run.run_number,
                extract_workflow_name(&run.path),
                &run.head_sha.chars().take(8).collect::<String>()
            );
            if !Confirm::new().with_prompt(prompt).default(false).interact()? {
                println!("Cancelled");
                return Ok(());
            }
        }

        client.delete_run(&owner, &repo, run_id).await?;
        writer.write_mutation("deleted", &format!("run #{}", run.run_number));

        client.close();
        Ok(())
    }
}
