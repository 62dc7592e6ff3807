//
//  teax
//  cli/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/09.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! CLI command definitions using clap derive macros

mod completion;
mod deps;
mod issue;
mod label;
mod milestone;
mod pkg;
mod run;
mod runner;
mod secret;
mod token;
mod workflow;

pub use completion::CompletionCommand;
pub use deps::DepsCommand;
pub use issue::IssueCommand;
pub use label::LabelCommand;
pub use milestone::MilestoneCommand;
pub use pkg::PkgCommand;
pub use run::RunsCommand;
pub use runner::RunnersCommand;
pub use secret::{SecretsCommand, VarsCommand};
pub use token::TokenCommand;
pub use workflow::WorkflowCommand;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::api::GiteaClient;
use crate::config::resolve_login;
use crate::output::{OutputFormat, OutputWriter};

/// teax - companion CLI for the Gitea API
#[derive(Parser, Debug)]
#[command(
    name = "teax",
    version,
    about = "Gitea operations the tea CLI does not cover",
    long_about = "teax is a companion to the tea CLI: issue dependencies, bulk \
                  label and milestone edits, Actions runners and workflows, \
                  packages, and access tokens.\n\n\
                  Credentials are read from tea's own config (~/.config/tea/config.yml).",
    propagate_version = true,
    after_help = "Use 'teax <command> --help' for more information about a command."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOptions,
}

/// Global options available to all commands
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Use a specific login from the tea config (defaults to the default login)
    #[arg(long, global = true, env = "TEAX_LOGIN")]
    pub login: Option<String>,

    /// Output format
    #[arg(long, short = 'o', global = true, value_enum, default_value = "table")]
    pub output: OutputFormat,
}

impl GlobalOptions {
    /// The output writer for this invocation.
    pub fn writer(&self) -> OutputWriter {
        OutputWriter::new(self.output)
    }

    /// Builds an authenticated client session from the selected login.
    pub fn client(&self) -> Result<GiteaClient> {
        let login = resolve_login(self.login.as_deref())?;
        Ok(GiteaClient::new(&login)?)
    }
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage issue dependencies
    Deps(DepsCommand),

    /// View and edit issues (labels, assignees, milestones)
    Issue(IssueCommand),

    /// Manage repository labels
    Label(LabelCommand),

    /// Manage milestones
    Milestone(MilestoneCommand),

    /// Manage Actions runners
    Runners(RunnersCommand),

    /// Manage Actions workflows
    Workflow(WorkflowCommand),

    /// Inspect Actions workflow runs and jobs
    Runs(RunsCommand),

    /// Manage Actions secrets
    Secrets(SecretsCommand),

    /// Manage Actions variables
    Vars(VarsCommand),

    /// Manage packages (PyPI, Container, Generic, ...)
    Pkg(PkgCommand),

    /// Manage API access tokens
    Token(TokenCommand),

    /// Generate shell completion scripts
    Completion(CompletionCommand),
}
