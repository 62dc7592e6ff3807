//
//  teax
//  cli/milestone.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/09.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! Milestone commands
//!
//! Milestones are addressed by id or title everywhere; `close` and `open`
//! are state-only updates, `update` can also retitle, redescribe, and set
//! or clear the due date (`--due-date ""` clears).

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::api::milestones::{Milestone, MilestoneEdit};
use crate::output::{OutputFormat, RowOutput};
use crate::util::{parse_due_date, parse_repo};

use super::GlobalOptions;

/// Manage milestones
#[derive(Args, Debug)]
pub struct MilestoneCommand {
    #[command(subcommand)]
    pub command: MilestoneSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum MilestoneSubcommand {
    /// List milestones
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Create a milestone
    Create(CreateArgs),

    /// Close a milestone
    Close(RefArgs),

    /// Reopen a milestone
    Open(RefArgs),

    /// Update a milestone's title, description or due date
    Update(UpdateArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Repository in owner/repo format
    #[arg(long, short = 'r', required = true)]
    pub repo: String,

    /// Filter by state
    #[arg(long, value_parser = ["open", "closed", "all"], default_value = "all")]
    pub state: String,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Milestone title
    pub title: String,

    /// Repository in owner/repo format
    #[arg(long, short = 'r', required = true)]
    pub repo: String,

    /// Milestone description
    #[arg(long, short = 'd', default_value = "")]
    pub description: String,

    /// Due date in YYYY-MM-DD format
    #[arg(long)]
    pub due_date: Option<String>,
}

#[derive(Args, Debug)]
pub struct RefArgs {
    /// Milestone id or title
    pub milestone: String,

    /// Repository in owner/repo format
    #[arg(long, short = 'r', required = true)]
    pub repo: String,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Milestone id or title
    pub milestone: String,

    /// Repository in owner/repo format
    #[arg(long, short = 'r', required = true)]
    pub repo: String,

    /// New title
    #[arg(long, short = 't')]
    pub title: Option<String>,

    /// New description
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// New due date in YYYY-MM-DD format; pass an empty value to clear
    #[arg(long)]
    pub due_date: Option<String>,
}

struct MilestoneRow {
    id: i64,
    title: String,
    state: String,
    due_on: String,
}

impl MilestoneRow {
    fn from_milestone(ms: &Milestone) -> Self {
        Self {
            id: ms.id,
            title: ms.title.clone(),
            state: ms.state.clone(),
            due_on: ms.due_on.clone().unwrap_or_default(),
        }
    }
}

impl RowOutput for MilestoneRow {
    fn headers() -> Vec<&'static str> {
        vec!["id", "title", "state", "due"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.title.clone(),
            self.state.clone(),
            self.due_on.clone(),
        ]
    }

    fn simple(&self) -> String {
        format!("{} {}", self.id, self.title)
    }
}

impl MilestoneCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            MilestoneSubcommand::List(args) => self.list(args, global).await,
            MilestoneSubcommand::Create(args) => self.create(args, global).await,
            MilestoneSubcommand::Close(args) => self.set_state(args, global, "closed").await,
            MilestoneSubcommand::Open(args) => self.set_state(args, global, "open").await,
            MilestoneSubcommand::Update(args) => self.update(args, global).await,
        }
    }

    async fn list(&self, args: &ListArgs, global: &GlobalOptions) -> Result<()> {
        let (owner, repo) = parse_repo(&args.repo)?;
        let client = global.client()?;
        let writer = global.writer();

        let milestones = client.list_milestones(&owner, &repo, &args.state).await?;
        let rows: Vec<MilestoneRow> = milestones.iter().map(MilestoneRow::from_milestone).collect();
        writer.write_list(&rows, "No milestones");

        client.close();
        Ok(())
    }

    async fn create(&self, args: &CreateArgs, global: &GlobalOptions) -> Result<()> {
        let (owner, repo) = parse_repo(&args.repo)?;
        let due_on = match &args.due_date {
            Some(date) => Some(parse_due_date(date)?),
            None => None,
        };

        let client = global.client()?;
        let writer = global.writer();

        let milestone = client
            .create_milestone(&owner, &repo, &args.title, &args.description, due_on.as_deref())
            .await?;

        match global.output {
            OutputFormat::Simple => println!("{}", milestone.id),
            _ => writer.write_mutation(
                "created",
                &format!("milestone {} (ID: {})", milestone.title, milestone.id),
            ),
        }

        client.close();
        Ok(())
    }

    async fn set_state(&self, args: &RefArgs, global: &GlobalOptions, state: &str) -> Result<()> {
        let (owner, repo) = parse_repo(&args.repo)?;
        let client = global.client()?;
        let writer = global.writer();

        let id = client.resolve_milestone(&owner, &repo, &args.milestone).await?;
        let milestone = client
            .update_milestone(
                &owner,
                &repo,
                id,
                &MilestoneEdit {
                    state: Some(state.to_string()),
                    ..MilestoneEdit::default()
                },
            )
            .await?;

        match global.output {
            OutputFormat::Simple => println!("{}", milestone.state),
            _ => writer.write_mutation(
                if state == "closed" { "closed" } else { "reopened" },
                &format!("milestone {}", milestone.title),
            ),
        }

        client.close();
        Ok(())
    }

    async fn update(&self, args: &UpdateArgs, global: &GlobalOptions) -> Result<()> {
        if args.title.is_none() && args.description.is_none() && args.due_date.is_none() {
            anyhow::bail!("Nothing to change; see 'teax milestone update --help'");
        }

        let (owner, repo) = parse_repo(&args.repo)?;
        // Empty string clears the due date; anything else must parse.
        let due_on = match &args.due_date {
            Some(date) if date.is_empty() => Some(String::new()),
            Some(date) => Some(parse_due_date(date)?),
            None => None,
        };

        let client = global.client()?;
        let writer = global.writer();

        let id = client.resolve_milestone(&owner, &repo, &args.milestone).await?;
        let milestone = client
            .update_milestone(
                &owner,
                &repo,
                id,
                &MilestoneEdit {
                    title: args.title.clone(),
                    description: args.description.clone(),
                    due_on,
                    ..MilestoneEdit::default()
                },
            )
            .await?;

        match global.output {
            OutputFormat::Simple => println!("{}", milestone.id),
            _ => writer.write_mutation("updated", &format!("milestone {}", milestone.title)),
        }

        client.close();
        Ok(())
    }
}
