//
//  teax
//  cli/deps.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/09.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! Issue dependency commands
//!
//! The dependency graph is the main gap teax fills: the first-party CLI
//! has no way to list, add or remove issue dependency edges. "X blocks Y"
//! is expressed through the same edge as "Y depends on X", so `--blocks`
//! simply swaps the operands before calling the API.

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::api::issues::Dependency;
use crate::output::RowOutput;
use crate::util::parse_repo;

use super::GlobalOptions;

/// Manage issue dependencies
#[derive(Args, Debug)]
pub struct DepsCommand {
    #[command(subcommand)]
    pub command: DepsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum DepsSubcommand {
    /// List dependencies of an issue (both directions)
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Add dependency edges to an issue
    Add(EditArgs),

    /// Remove dependency edges from an issue
    Rm(EditArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Issue number
    pub issue: i64,

    /// Repository in owner/repo format
    #[arg(long, short = 'r', required = true)]
    pub repo: String,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    /// Issue number
    pub issue: i64,

    /// Repository in owner/repo format
    #[arg(long, short = 'r', required = true)]
    pub repo: String,

    /// Issue number this issue depends on
    #[arg(long)]
    pub depends_on: Option<i64>,

    /// Issue number this issue blocks
    #[arg(long)]
    pub blocks: Option<i64>,
}

#[derive(Debug)]
struct DepRow {
    direction: &'static str,
    number: i64,
    state: String,
    title: String,
    repository: String,
}

impl DepRow {
    fn from_dependency(direction: &'static str, dep: &Dependency) -> Self {
        Self {
            direction,
            number: dep.number,
            state: dep.state.clone(),
            title: dep.title.clone(),
            repository: dep.repository.full_name.clone(),
        }
    }
}

impl RowOutput for DepRow {
    fn headers() -> Vec<&'static str> {
        vec!["direction", "number", "state", "title", "repository"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.direction.to_string(),
            format!("#{}", self.number),
            self.state.clone(),
            self.title.clone(),
            self.repository.clone(),
        ]
    }

    fn simple(&self) -> String {
        format!("{} {} {}", self.direction, self.number, self.title)
    }
}

impl DepsCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            DepsSubcommand::List(args) => self.list(args, global).await,
            DepsSubcommand::Add(args) => self.edit(args, global, true).await,
            DepsSubcommand::Rm(args) => self.edit(args, global, false).await,
        }
    }

    async fn list(&self, args: &ListArgs, global: &GlobalOptions) -> Result<()> {
        let (owner, repo) = parse_repo(&args.repo)?;
        let client = global.client()?;
        let writer = global.writer();

        let depends_on = client.list_dependencies(&owner, &repo, args.issue).await?;
        let blocks = client.list_blocks(&owner, &repo, args.issue).await?;

        let rows: Vec<DepRow> = depends_on
            .iter()
            .map(|d| DepRow::from_dependency("depends-on", d))
            .chain(blocks.iter().map(|d| DepRow::from_dependency("blocks", d)))
            .collect();
        writer.write_list(&rows, "No dependencies");

        client.close();
        Ok(())
    }

    async fn edit(&self, args: &EditArgs, global: &GlobalOptions, add: bool) -> Result<()> {
        if args.depends_on.is_none() && args.blocks.is_none() {
            anyhow::bail!("Specify --depends-on and/or --blocks");
        }

        let (owner, repo) = parse_repo(&args.repo)?;
        let client = global.client()?;
        let writer = global.writer();
        let verb = if add { "added" } else { "removed" };

        if let Some(target) = args.depends_on {
            if add {
                client
                    .add_dependency(&owner, &repo, args.issue, &owner, &repo, target)
                    .await?;
            } else {
                client
                    .remove_dependency(&owner, &repo, args.issue, &owner, &repo, target)
                    .await?;
            }
            writer.write_mutation(verb, &format!("#{} depends on #{target}", args.issue));
        }

        if let Some(target) = args.blocks {
            // blocks(X, Y) is depends_on(Y, X): same edge, operands swapped.
            if add {
                client
                    .add_dependency(&owner, &repo, target, &owner, &repo, args.issue)
                    .await?;
            } else {
                client
                    .remove_dependency(&owner, &repo, target, &owner, &repo, args.issue)
                    .await?;
            }
            writer.write_mutation(verb, &format!("#{} blocks #{target}", args.issue));
        }

        client.close();
        Ok(())
    }
}
