//
//  teax
//  cli/runner.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/09.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! Actions runner commands
//!
//! All runner operations take exactly one of `--repo`, `--org` or
//! `--global`; the scope is validated before any request is built.

use anyhow::Result;
use clap::{Args, Subcommand};
use dialoguer::Confirm;

use crate::api::common::Scope;
use crate::api::actions::Runner;
use crate::output::{OutputFormat, RowOutput};

use super::GlobalOptions;

/// Manage Actions runners
#[derive(Args, Debug)]
pub struct RunnersCommand {
    #[command(subcommand)]
    pub command: RunnersSubcommand,
}

/// Scope flags shared by every runner operation.
#[derive(Args, Debug, Clone)]
pub struct ScopeArgs {
    /// Repository (owner/repo)
    #[arg(long, short = 'r')]
    pub repo: Option<String>,

    /// Organisation name
    #[arg(long)]
    pub org: Option<String>,

    /// Global scope (admin)
    #[arg(long = "global")]
    pub global_scope: bool,
}

impl ScopeArgs {
    pub fn scope(&self) -> Result<Scope> {
        Ok(Scope::from_flags(
            self.repo.as_deref(),
            self.org.as_deref(),
            self.global_scope,
        )?)
    }
}

#[derive(Subcommand, Debug)]
pub enum RunnersSubcommand {
    /// List runners
    #[command(visible_alias = "ls")]
    List(ScopeOnlyArgs),

    /// Get details for a specific runner
    Get(RunnerRefArgs),

    /// Delete a runner
    Delete(DeleteArgs),

    /// Get a runner registration token
    Token(ScopeOnlyArgs),
}

#[derive(Args, Debug)]
pub struct ScopeOnlyArgs {
    #[command(flatten)]
    pub scope: ScopeArgs,
}

#[derive(Args, Debug)]
pub struct RunnerRefArgs {
    /// Runner id
    pub runner_id: i64,

    #[command(flatten)]
    pub scope: ScopeArgs,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Runner id
    pub runner_id: i64,

    #[command(flatten)]
    pub scope: ScopeArgs,

    /// Skip confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

struct RunnerRow {
    id: i64,
    name: String,
    status: String,
    busy: bool,
    labels: String,
    version: String,
}

impl RunnerRow {
    fn from_runner(runner: &Runner) -> Self {
        Self {
            id: runner.id,
            name: runner.name.clone(),
            status: runner.status.clone(),
            busy: runner.busy,
            labels: runner.labels.join(","),
            version: runner.version.clone(),
        }
    }
}

impl RowOutput for RunnerRow {
    fn headers() -> Vec<&'static str> {
        vec!["id", "name", "status", "busy", "labels", "version"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.status.clone(),
            if self.busy { "yes" } else { "no" }.to_string(),
            self.labels.clone(),
            self.version.clone(),
        ]
    }

    fn simple(&self) -> String {
        format!("{} {} {}", self.id, self.name, self.status)
    }
}

impl RunnersCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            RunnersSubcommand::List(args) => self.list(args, global).await,
            RunnersSubcommand::Get(args) => self.get(args, global).await,
            RunnersSubcommand::Delete(args) => self.delete(args, global).await,
            RunnersSubcommand::Token(args) => self.token(args, global).await,
        }
    }

    async fn list(&self, args: &ScopeOnlyArgs, global: &GlobalOptions) -> Result<()> {
        let scope = args.scope.scope()?;
        let client = global.client()?;
        let writer = global.writer();

        let runners = client.list_runners(&scope).await?;
        let rows: Vec<RunnerRow> = runners.iter().map(RunnerRow::from_runner).collect();
        writer.write_list(&rows, "No runners found");

        client.close();
        Ok(())
    }

    async fn get(&self, args: &RunnerRefArgs, global: &GlobalOptions) -> Result<()> {
        let scope = args.scope.scope()?;
        let client = global.client()?;
        let writer = global.writer();

        let runner = client.get_runner(&scope, args.runner_id).await?;
        writer.write_one(&RunnerRow::from_runner(&runner));

        client.close();
        Ok(())
    }

    async fn delete(&self, args: &DeleteArgs, global: &GlobalOptions) -> Result<()> {
        let scope = args.scope.scope()?;

        if !args.yes {
            let prompt = format!(
                "Delete runner {} from {}?",
                args.runner_id,
                scope.describe()
            );
            if !Confirm::new().with_prompt(prompt).default(false).interact()? {
                println!("Aborted");
                return Ok(());
            }
        }

        let client = global.client()?;
        let writer = global.writer();

        client.delete_runner(&scope, args.runner_id).await?;
        writer.write_mutation("deleted", &format!("runner {}", args.runner_id));

        client.close();
        Ok(())
    }

    async fn token(&self, args: &ScopeOnlyArgs, global: &GlobalOptions) -> Result<()> {
        let scope = args.scope.scope()?;
        let client = global.client()?;
        let writer = global.writer();

        let token = client.runner_registration_token(&scope).await?;

        if global.output == OutputFormat::Table {
            // The token is a credential; remind interactive users.
            eprintln!("Warning: this token should be kept secret. Use -o simple for scripting.");
        }
        writer.write_value("Registration token", &token.token);

        client.close();
        Ok(())
    }
}
