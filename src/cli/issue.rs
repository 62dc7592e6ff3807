//
//  teax
//  cli/issue.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/09.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! Issue commands
//!
//! View, list, create and edit issues, with the label/assignee/milestone
//! edits the first-party CLI lacks. `bulk` applies one edit across an
//! issue specification like `17,19-21`, pre-validating the milestone so a
//! typo cannot mutate half the range before failing.

use anyhow::Result;
use clap::{Args, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::api::issues::{Issue, IssueEdit, IssueFilter, NewIssue};
use crate::api::GiteaClient;
use crate::output::{OutputFormat, RowOutput};
use crate::util::{parse_issue_spec, parse_repo, truncate};

use super::GlobalOptions;

/// View and edit issues
#[derive(Args, Debug)]
pub struct IssueCommand {
    #[command(subcommand)]
    pub command: IssueSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum IssueSubcommand {
    /// View an issue
    View(ViewArgs),

    /// List issues
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Create a new issue
    Create(CreateArgs),

    /// Edit an issue
    Edit(EditArgs),

    /// Show the labels attached to an issue
    Labels(LabelsArgs),

    /// Apply one edit across a set of issues (e.g. 17,19-21)
    Bulk(BulkArgs),
}

#[derive(Args, Debug)]
pub struct ViewArgs {
    /// Issue number
    pub issue: i64,

    /// Repository in owner/repo format
    #[arg(long, short = 'r', required = true)]
    pub repo: String,

    /// Include comments
    #[arg(long, short = 'c')]
    pub comments: bool,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Repository in owner/repo format
    #[arg(long, short = 'r', required = true)]
    pub repo: String,

    /// Filter by state
    #[arg(long, short = 's', value_parser = ["open", "closed", "all"])]
    pub state: Option<String>,

    /// Filter by label name (repeatable)
    #[arg(long = "label", short = 'l')]
    pub labels: Vec<String>,

    /// Filter by milestone name
    #[arg(long)]
    pub milestone: Option<String>,

    /// Filter by assignee
    #[arg(long, short = 'a')]
    pub assignee: Option<String>,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Repository in owner/repo format
    #[arg(long, short = 'r', required = true)]
    pub repo: String,

    /// Issue title
    #[arg(long, short = 't', required = true)]
    pub title: String,

    /// Issue body
    #[arg(long, short = 'b')]
    pub body: Option<String>,

    /// Label names to attach (repeatable)
    #[arg(long = "label", short = 'l')]
    pub labels: Vec<String>,

    /// Assignee login names (repeatable)
    #[arg(long = "assignee", short = 'a')]
    pub assignees: Vec<String>,

    /// Milestone (id or title)
    #[arg(long, short = 'm')]
    pub milestone: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct EditFlags {
    /// Label names to add (repeatable)
    #[arg(long = "add-label")]
    pub add_labels: Vec<String>,

    /// Label names to remove (repeatable)
    #[arg(long = "rm-label")]
    pub rm_labels: Vec<String>,

    /// Replace all labels with this set (repeatable)
    #[arg(long = "set-label", conflicts_with_all = ["add_labels", "rm_labels"])]
    pub set_labels: Vec<String>,

    /// Replace the assignee list (repeatable)
    #[arg(long = "assignee")]
    pub assignees: Vec<String>,

    /// Set the milestone (id or title; empty or "none" to clear)
    #[arg(long, short = 'm')]
    pub milestone: Option<String>,
}

impl EditFlags {
    fn is_empty(&self) -> bool {
        self.add_labels.is_empty()
            && self.rm_labels.is_empty()
            && self.set_labels.is_empty()
            && self.assignees.is_empty()
            && self.milestone.is_none()
    }
}

#[derive(Args, Debug)]
pub struct EditArgs {
    /// Issue number
    pub issue: i64,

    /// Repository in owner/repo format
    #[arg(long, short = 'r', required = true)]
    pub repo: String,

    /// New title
    #[arg(long, short = 't')]
    pub title: Option<String>,

    /// New body
    #[arg(long, short = 'b')]
    pub body: Option<String>,

    #[command(flatten)]
    pub edit: EditFlags,
}

#[derive(Args, Debug)]
pub struct LabelsArgs {
    /// Issue number
    pub issue: i64,

    /// Repository in owner/repo format
    #[arg(long, short = 'r', required = true)]
    pub repo: String,
}

#[derive(Args, Debug)]
pub struct BulkArgs {
    /// Issue specification: numbers and ranges, e.g. 17,19-21
    pub spec: String,

    /// Repository in owner/repo format
    #[arg(long, short = 'r', required = true)]
    pub repo: String,

    #[command(flatten)]
    pub edit: EditFlags,
}

// Display types

#[derive(Debug)]
struct IssueRow {
    number: i64,
    state: String,
    title: String,
    labels: String,
    assignees: String,
    milestone: String,
}

impl IssueRow {
    fn from_issue(issue: &Issue) -> Self {
        Self {
            number: issue.number,
            state: issue.state.clone(),
            title: truncate(&issue.title, 60),
            labels: issue
                .labels
                .iter()
                .map(|l| l.name.as_str())
                .collect::<Vec<_>>()
                .join(","),
            assignees: issue
                .assignees
                .iter()
                .map(|a| a.login.as_str())
                .collect::<Vec<_>>()
                .join(","),
            milestone: issue
                .milestone
                .as_ref()
                .map(|m| m.title.clone())
                .unwrap_or_default(),
        }
    }
}

impl RowOutput for IssueRow {
    fn headers() -> Vec<&'static str> {
        vec!["number", "state", "title", "labels", "assignees", "milestone"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            format!("#{}", self.number),
            self.state.clone(),
            self.title.clone(),
            self.labels.clone(),
            self.assignees.clone(),
            self.milestone.clone(),
        ]
    }

    fn simple(&self) -> String {
        format!("{} {} {}", self.number, self.state, self.title)
    }
}

struct LabelRow {
    name: String,
    color: String,
    description: String,
}

impl RowOutput for LabelRow {
    fn headers() -> Vec<&'static str> {
        vec!["name", "color", "description"]
    }

    fn row(&self) -> Vec<String> {
        vec![self.name.clone(), self.color.clone(), self.description.clone()]
    }

    fn simple(&self) -> String {
        self.name.clone()
    }
}

impl IssueCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            IssueSubcommand::View(args) => self.view(args, global).await,
            IssueSubcommand::List(args) => self.list(args, global).await,
            IssueSubcommand::Create(args) => self.create(args, global).await,
            IssueSubcommand::Edit(args) => self.edit(args, global).await,
            IssueSubcommand::Labels(args) => self.labels(args, global).await,
            IssueSubcommand::Bulk(args) => self.bulk(args, global).await,
        }
    }

    async fn view(&self, args: &ViewArgs, global: &GlobalOptions) -> Result<()> {
        let (owner, repo) = parse_repo(&args.repo)?;
        let client = global.client()?;
        let writer = global.writer();

        let issue = client.get_issue(&owner, &repo, args.issue).await?;

        if global.output == OutputFormat::Table {
            println!(
                "{} #{}: {}",
                style("Issue").cyan().bold(),
                issue.number,
                style(&issue.title).bold()
            );
            println!();
            println!("  State:     {}", issue.state);
            if !issue.labels.is_empty() {
                let names: Vec<&str> = issue.labels.iter().map(|l| l.name.as_str()).collect();
                println!("  Labels:    {}", names.join(", "));
            }
            if !issue.assignees.is_empty() {
                let names: Vec<&str> = issue.assignees.iter().map(|a| a.login.as_str()).collect();
                println!("  Assignees: {}", names.join(", "));
            }
            if let Some(milestone) = &issue.milestone {
                println!("  Milestone: {} (ID: {})", milestone.title, milestone.id);
            }
            if !issue.body.is_empty() {
                println!();
                for line in issue.body.lines() {
                    println!("  {line}");
                }
            }
        } else {
            writer.write_one(&IssueRow::from_issue(&issue));
        }

        if args.comments {
            let comments = client.list_comments(&owner, &repo, args.issue).await?;
            if global.output == OutputFormat::Table {
                println!();
                if comments.is_empty() {
                    println!("No comments");
                }
                for comment in &comments {
                    println!(
                        "{} commented on {}:",
                        style(&comment.user.login).cyan().bold(),
                        comment.created_at
                    );
                    for line in comment.body.lines() {
                        println!("  {line}");
                    }
                    println!();
                }
            } else {
                for comment in &comments {
                    println!("{} {}", comment.user.login, comment.body.replace('\n', " "));
                }
            }
        }

        client.close();
        Ok(())
    }

    async fn list(&self, args: &ListArgs, global: &GlobalOptions) -> Result<()> {
        let (owner, repo) = parse_repo(&args.repo)?;
        let client = global.client()?;
        let writer = global.writer();

        let filter = IssueFilter {
            state: args.state.clone(),
            labels: args.labels.clone(),
            milestone: args.milestone.clone(),
            assignee: args.assignee.clone(),
        };
        let issues = client.list_issues(&owner, &repo, &filter).await?;
        let rows: Vec<IssueRow> = issues.iter().map(IssueRow::from_issue).collect();
        writer.write_list(&rows, "No issues found");

        client.close();
        Ok(())
    }

    async fn create(&self, args: &CreateArgs, global: &GlobalOptions) -> Result<()> {
        let (owner, repo) = parse_repo(&args.repo)?;
        let client = global.client()?;
        let writer = global.writer();

        let labels = if args.labels.is_empty() {
            None
        } else {
            Some(
                client
                    .resolve_label_ids(&owner, &repo, &args.labels)
                    .await?,
            )
        };
        let milestone = match &args.milestone {
            Some(reference) => Some(client.resolve_milestone(&owner, &repo, reference).await?),
            None => None,
        };

        let issue = client
            .create_issue(
                &owner,
                &repo,
                &NewIssue {
                    title: args.title.clone(),
                    body: args.body.clone(),
                    assignees: if args.assignees.is_empty() {
                        None
                    } else {
                        Some(args.assignees.clone())
                    },
                    labels,
                    milestone,
                },
            )
            .await?;

        match global.output {
            OutputFormat::Simple => println!("{}", issue.number),
            _ => writer.write_mutation("created", &format!("issue #{}: {}", issue.number, issue.title)),
        }

        client.close();
        Ok(())
    }

    /// Applies the shared label/assignee/milestone flags to one issue.
    ///
    /// `milestone_id` carries a pre-resolved milestone (bulk mode resolves
    /// once up front); `None` means resolve here if requested.
    async fn apply_edit(
        client: &GiteaClient,
        owner: &str,
        repo: &str,
        issue: i64,
        title: Option<&str>,
        body: Option<&str>,
        flags: &EditFlags,
        milestone_id: Option<i64>,
    ) -> Result<()> {
        if !flags.set_labels.is_empty() {
            client
                .set_issue_labels(owner, repo, issue, &flags.set_labels)
                .await?;
        }
        if !flags.add_labels.is_empty() {
            client
                .add_issue_labels(owner, repo, issue, &flags.add_labels)
                .await?;
        }
        for label in &flags.rm_labels {
            client.remove_issue_label(owner, repo, issue, label).await?;
        }

        let mut edit = IssueEdit {
            title: title.map(str::to_string),
            body: body.map(str::to_string),
            ..IssueEdit::default()
        };
        if !flags.assignees.is_empty() {
            edit.assignees = Some(flags.assignees.clone());
        }
        if let Some(reference) = &flags.milestone {
            if reference.is_empty() || reference.eq_ignore_ascii_case("none") {
                edit.milestone = Some(0);
            } else if let Some(id) = milestone_id {
                edit.milestone = Some(id);
            } else {
                edit.milestone = Some(client.resolve_milestone(owner, repo, reference).await?);
            }
        }

        if !edit.is_empty() {
            client.edit_issue(owner, repo, issue, &edit).await?;
        }
        Ok(())
    }

    async fn edit(&self, args: &EditArgs, global: &GlobalOptions) -> Result<()> {
        if args.title.is_none() && args.body.is_none() && args.edit.is_empty() {
            anyhow::bail!("Nothing to change; see 'teax issue edit --help'");
        }

        let (owner, repo) = parse_repo(&args.repo)?;
        let client = global.client()?;
        let writer = global.writer();

        Self::apply_edit(
            &client,
            &owner,
            &repo,
            args.issue,
            args.title.as_deref(),
            args.body.as_deref(),
            &args.edit,
            None,
        )
        .await?;

        writer.write_mutation("updated", &format!("issue #{}", args.issue));
        client.close();
        Ok(())
    }

    async fn labels(&self, args: &LabelsArgs, global: &GlobalOptions) -> Result<()> {
        let (owner, repo) = parse_repo(&args.repo)?;
        let client = global.client()?;
        let writer = global.writer();

        let labels = client.get_issue_labels(&owner, &repo, args.issue).await?;
        let rows: Vec<LabelRow> = labels
            .iter()
            .map(|l| LabelRow {
                name: l.name.clone(),
                color: l.color.clone(),
                description: l.description.clone(),
            })
            .collect();
        writer.write_list(&rows, "No labels");

        client.close();
        Ok(())
    }

    async fn bulk(&self, args: &BulkArgs, global: &GlobalOptions) -> Result<()> {
        if args.edit.is_empty() {
            anyhow::bail!("Nothing to change; see 'teax issue bulk --help'");
        }

        let issues = parse_issue_spec(&args.spec)?;
        let (owner, repo) = parse_repo(&args.repo)?;
        let client = global.client()?;
        let writer = global.writer();

        // Pre-validate the milestone so a bad reference fails before any
        // issue is touched.
        let milestone_id = match &args.edit.milestone {
            Some(reference)
                if !reference.is_empty() && !reference.eq_ignore_ascii_case("none") =>
            {
                Some(client.resolve_milestone(&owner, &repo, reference).await?)
            }
            _ => None,
        };

        let bar = if global.output == OutputFormat::Table {
            let bar = ProgressBar::new(issues.len() as u64);
            bar.set_style(
                ProgressStyle::with_template("{bar:30} {pos}/{len} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            Some(bar)
        } else {
            None
        };

        for issue in &issues {
            if let Some(bar) = &bar {
                bar.set_message(format!("#{issue}"));
            }
            Self::apply_edit(
                &client,
                &owner,
                &repo,
                *issue,
                None,
                None,
                &args.edit,
                milestone_id,
            )
            .await?;
            if let Some(bar) = &bar {
                bar.inc(1);
            }
        }
        if let Some(bar) = bar {
            bar.finish_and_clear();
        }

        writer.write_mutation("updated", &format!("{} issue(s)", issues.len()));
        client.close();
        Ok(())
    }
}
