//
//  teax
//  cli/label.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/09.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! Repository label commands

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::output::{OutputFormat, RowOutput};
use crate::util::parse_repo;

use super::GlobalOptions;

/// Manage repository labels
#[derive(Args, Debug)]
pub struct LabelCommand {
    #[command(subcommand)]
    pub command: LabelSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum LabelSubcommand {
    /// List all labels in a repository
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Create a label
    Create(CreateArgs),

    /// Create a label only if it does not exist yet
    Ensure(CreateArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Repository in owner/repo format
    #[arg(long, short = 'r', required = true)]
    pub repo: String,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Label name
    pub name: String,

    /// Repository in owner/repo format
    #[arg(long, short = 'r', required = true)]
    pub repo: String,

    /// Hex color, with or without a leading '#'
    #[arg(long, short = 'c', default_value = "cccccc")]
    pub color: String,

    /// Label description
    #[arg(long, short = 'd', default_value = "")]
    pub description: String,
}

struct LabelRow {
    id: i64,
    name: String,
    color: String,
    description: String,
}

impl RowOutput for LabelRow {
    fn headers() -> Vec<&'static str> {
        vec!["id", "name", "color", "description"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.color.clone(),
            self.description.clone(),
        ]
    }

    fn simple(&self) -> String {
        format!("{} {}", self.id, self.name)
    }
}

impl LabelCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            LabelSubcommand::List(args) => self.list(args, global).await,
            LabelSubcommand::Create(args) => self.create(args, global).await,
            LabelSubcommand::Ensure(args) => self.ensure(args, global).await,
        }
    }

    async fn list(&self, args: &ListArgs, global: &GlobalOptions) -> Result<()> {
        let (owner, repo) = parse_repo(&args.repo)?;
        let client = global.client()?;
        let writer = global.writer();

        let labels = client.list_labels(&owner, &repo).await?;
        let rows: Vec<LabelRow> = labels
            .iter()
            .map(|l| LabelRow {
                id: l.id,
                name: l.name.clone(),
                color: l.color.clone(),
                description: l.description.clone(),
            })
            .collect();
        writer.write_list(&rows, "No labels");

        client.close();
        Ok(())
    }

    async fn create(&self, args: &CreateArgs, global: &GlobalOptions) -> Result<()> {
        let (owner, repo) = parse_repo(&args.repo)?;
        let client = global.client()?;
        let writer = global.writer();

        let label = client
            .create_label(&owner, &repo, &args.name, &args.color, &args.description)
            .await?;

        match global.output {
            OutputFormat::Simple => println!("{}", label.id),
            _ => writer.write_mutation("created", &format!("label {} (ID: {})", label.name, label.id)),
        }

        client.close();
        Ok(())
    }

    async fn ensure(&self, args: &CreateArgs, global: &GlobalOptions) -> Result<()> {
        let (owner, repo) = parse_repo(&args.repo)?;
        let client = global.client()?;
        let writer = global.writer();

        let (id, created) = client
            .ensure_label(&owner, &repo, &args.name, &args.color, &args.description)
            .await?;

        match global.output {
            OutputFormat::Simple => println!("{id}"),
            _ if created => writer.write_mutation("created", &format!("label {} (ID: {id})", args.name)),
            _ => writer.write_mutation("exists", &format!("label {} (ID: {id})", args.name)),
        }

        client.close();
        Ok(())
    }
}
