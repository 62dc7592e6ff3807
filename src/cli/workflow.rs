//
//  teax
//  cli/workflow.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/09.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! Actions workflow commands

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::api::actions::Workflow;
use crate::output::RowOutput;
use crate::util::parse_repo;

use super::GlobalOptions;

/// Manage Actions workflows
#[derive(Args, Debug)]
pub struct WorkflowCommand {
    #[command(subcommand)]
    pub command: WorkflowSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum WorkflowSubcommand {
    /// List workflows
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Get one workflow
    Get(RefArgs),

    /// Enable a workflow
    Enable(RefArgs),

    /// Disable a workflow
    Disable(RefArgs),

    /// Trigger a workflow_dispatch event
    Dispatch(DispatchArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Repository in owner/repo format
    #[arg(long, short = 'r', required = true)]
    pub repo: String,
}

#[derive(Args, Debug)]
pub struct RefArgs {
    /// Workflow id (the workflow file name, e.g. ci.yml)
    pub workflow: String,

    /// Repository in owner/repo format
    #[arg(long, short = 'r', required = true)]
    pub repo: String,
}

#[derive(Args, Debug)]
pub struct DispatchArgs {
    /// Workflow id (the workflow file name, e.g. ci.yml)
    pub workflow: String,

    /// Repository in owner/repo format
    #[arg(long, short = 'r', required = true)]
    pub repo: String,

    /// Git ref to run on
    #[arg(long, default_value = "main")]
    pub r#ref: String,

    /// Workflow inputs as key=value (repeatable)
    #[arg(long = "input", short = 'i')]
    pub inputs: Vec<String>,
}

struct WorkflowRow {
    id: String,
    name: String,
    state: String,
    path: String,
}

impl WorkflowRow {
    fn from_workflow(wf: &Workflow) -> Self {
        Self {
            id: wf.id.clone(),
            name: wf.name.clone(),
            state: wf.state.clone(),
            path: wf.path.clone(),
        }
    }
}

impl RowOutput for WorkflowRow {
    fn headers() -> Vec<&'static str> {
        vec!["id", "name", "state", "path"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.state.clone(),
            self.path.clone(),
        ]
    }

    fn simple(&self) -> String {
        format!("{} {}", self.id, self.state)
    }
}

impl WorkflowCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            WorkflowSubcommand::List(args) => self.list(args, global).await,
            WorkflowSubcommand::Get(args) => self.get(args, global).await,
            WorkflowSubcommand::Enable(args) => self.toggle(args, global, true).await,
            WorkflowSubcommand::Disable(args) => self.toggle(args, global, false).await,
            WorkflowSubcommand::Dispatch(args) => self.dispatch(args, global).await,
        }
    }

    async fn list(&self, args: &ListArgs, global: &GlobalOptions) -> Result<()> {
        let (owner, repo) = parse_repo(&args.repo)?;
        let client = global.client()?;
        let writer = global.writer();

        let workflows = client.list_workflows(&owner, &repo).await?;
        let rows: Vec<WorkflowRow> = workflows.iter().map(WorkflowRow::from_workflow).collect();
        writer.write_list(&rows, "No workflows found");

        client.close();
        Ok(())
    }

    async fn get(&self, args: &RefArgs, global: &GlobalOptions) -> Result<()> {
        let (owner, repo) = parse_repo(&args.repo)?;
        let client = global.client()?;
        let writer = global.writer();

        let workflow = client.get_workflow(&owner, &repo, &args.workflow).await?;
        writer.write_one(&WorkflowRow::from_workflow(&workflow));

        client.close();
        Ok(())
    }

    async fn toggle(&self, args: &RefArgs, global: &GlobalOptions, enable: bool) -> Result<()> {
        let (owner, repo) = parse_repo(&args.repo)?;
        let client = global.client()?;
        let writer = global.writer();

        if enable {
            client.enable_workflow(&owner, &repo, &args.workflow).await?;
            writer.write_mutation("enabled", &args.workflow);
        } else {
            client.disable_workflow(&owner, &repo, &args.workflow).await?;
            writer.write_mutation("disabled", &args.workflow);
        }

        client.close();
        Ok(())
    }

    async fn dispatch(&self, args: &DispatchArgs, global: &GlobalOptions) -> Result<()> {
        let inputs = if args.inputs.is_empty() {
            None
        } else {
            let mut map = serde_json::Map::new();
            for input in &args.inputs {
                let (key, value) = input.split_once('=').ok_or_else(|| {
                    anyhow::anyhow!("Invalid input '{input}': expected key=value")
                })?;
                map.insert(key.to_string(), serde_json::json!(value));
            }
            Some(map)
        };

        let (owner, repo) = parse_repo(&args.repo)?;
        let client = global.client()?;
        let writer = global.writer();

        client
            .dispatch_workflow(&owner, &repo, &args.workflow, &args.r#ref, inputs)
            .await?;
        writer.write_mutation("dispatched", &format!("{} on {}", args.workflow, args.r#ref));

        client.close();
        Ok(())
    }
}
