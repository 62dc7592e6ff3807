//
//  teax
//  cli/secret.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/09.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! Actions secret and variable commands
//!
//! Secrets and variables share the repo/org/user scope selection. Secret
//! values can come from an environment variable (`--value-env`) so they
//! never appear in shell history; the server never returns secret values.

use anyhow::Result;
use clap::{Args, Subcommand};
use dialoguer::Confirm;

use crate::api::common::SecretScope;
use crate::output::RowOutput;

use super::GlobalOptions;

/// Scope flags shared by secrets and variables.
#[derive(Args, Debug, Clone)]
pub struct SecretScopeArgs {
    /// Repository (owner/repo)
    #[arg(long, short = 'r')]
    pub repo: Option<String>,

    /// Organisation name
    #[arg(long)]
    pub org: Option<String>,

    /// User-level scope
    #[arg(long)]
    pub user: bool,
}

impl SecretScopeArgs {
    pub fn scope(&self) -> Result<SecretScope> {
        Ok(SecretScope::from_flags(
            self.repo.as_deref(),
            self.org.as_deref(),
            self.user,
        )?)
    }
}

/// Manage Actions secrets
#[derive(Args, Debug)]
pub struct SecretsCommand {
    #[command(subcommand)]
    pub command: SecretsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum SecretsSubcommand {
    /// List secrets (names only; values are never returned)
    #[command(visible_alias = "ls")]
    List(SecretScopeOnlyArgs),

    /// Create or update a secret
    Set(SetArgs),

    /// Delete a secret
    Delete(NameArgs),
}

#[derive(Args, Debug)]
pub struct SecretScopeOnlyArgs {
    #[command(flatten)]
    pub scope: SecretScopeArgs,
}

#[derive(Args, Debug)]
pub struct SetArgs {
    /// Secret/variable name
    pub name: String,

    #[command(flatten)]
    pub scope: SecretScopeArgs,

    /// The value
    #[arg(long, short = 'v', conflicts_with = "value_env")]
    pub value: Option<String>,

    /// Environment variable to read the value from
    #[arg(long)]
    pub value_env: Option<String>,
}

impl SetArgs {
    fn resolve_value(&self) -> Result<String> {
        if let Some(value) = &self.value {
            return Ok(value.clone());
        }
        if let Some(var) = &self.value_env {
            return std::env::var(var)
                .map_err(|_| anyhow::anyhow!("Environment variable {var} not set or empty"));
        }
        anyhow::bail!("Provide --value or --value-env")
    }
}

#[derive(Args, Debug)]
pub struct NameArgs {
    /// Secret/variable name
    pub name: String,

    #[command(flatten)]
    pub scope: SecretScopeArgs,

    /// Skip confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

struct SecretRow {
    name: String,
    created_at: String,
}

impl RowOutput for SecretRow {
    fn headers() -> Vec<&'static str> {
        vec!["name", "created"]
    }

    fn row(&self) -> Vec<String> {
        vec![self.name.clone(), self.created_at.clone()]
    }

    fn simple(&self) -> String {
        self.name.clone()
    }
}

impl SecretsCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            SecretsSubcommand::List(args) => self.list(args, global).await,
            SecretsSubcommand::Set(args) => self.set(args, global).await,
            SecretsSubcommand::Delete(args) => self.delete(args, global).await,
        }
    }

    async fn list(&self, args: &SecretScopeOnlyArgs, global: &GlobalOptions) -> Result<()> {
        let scope = args.scope.scope()?;
        let client = global.client()?;
        let writer = global.writer();

        let secrets = client.list_secrets(&scope).await?;
        let rows: Vec<SecretRow> = secrets
            .iter()
            .map(|s| SecretRow {
                name: s.name.clone(),
                created_at: s.created_at.clone(),
            })
            .collect();
        writer.write_list(&rows, "No secrets");

        client.close();
        Ok(())
    }

    async fn set(&self, args: &SetArgs, global: &GlobalOptions) -> Result<()> {
        let scope = args.scope.scope()?;
        let value = args.resolve_value()?;
        let client = global.client()?;
        let writer = global.writer();

        let created = client.set_secret(&scope, &args.name, &value).await?;
        writer.write_mutation(if created { "created" } else { "updated" }, &args.name);

        client.close();
        Ok(())
    }

    async fn delete(&self, args: &NameArgs, global: &GlobalOptions) -> Result<()> {
        let scope = args.scope.scope()?;

        if !args.yes {
            let prompt = format!("Delete secret {}?", args.name);
            if !Confirm::new().with_prompt(prompt).default(false).interact()? {
                println!("Aborted");
                return Ok(());
            }
        }

        let client = global.client()?;
        let writer = global.writer();

        client.delete_secret(&scope, &args.name).await?;
        writer.write_mutation("deleted", &args.name);

        client.close();
        Ok(())
    }
}

/// Manage Actions variables
#[derive(Args, Debug)]
pub struct VarsCommand {
    #[command(subcommand)]
    pub command: VarsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum VarsSubcommand {
    /// List variables
    #[command(visible_alias = "ls")]
    List(SecretScopeOnlyArgs),

    /// Show one variable
    Get(NameOnlyArgs),

    /// Create or update a variable
    Set(SetArgs),

    /// Delete a variable
    Delete(NameArgs),
}

#[derive(Args, Debug)]
pub struct NameOnlyArgs {
    /// Variable name
    pub name: String,

    #[command(flatten)]
    pub scope: SecretScopeArgs,
}

struct VariableRow {
    name: String,
    data: String,
}

impl RowOutput for VariableRow {
    fn headers() -> Vec<&'static str> {
        vec!["name", "value"]
    }

    fn row(&self) -> Vec<String> {
        vec![self.name.clone(), self.data.clone()]
    }

    fn simple(&self) -> String {
        format!("{} {}", self.name, self.data)
    }
}

impl VarsCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            VarsSubcommand::List(args) => self.list(args, global).await,
            VarsSubcommand::Get(args) => self.get(args, global).await,
            VarsSubcommand::Set(args) => self.set(args, global).await,
            VarsSubcommand::Delete(args) => self.delete(args, global).await,
        }
    }

    async fn list(&self, args: &SecretScopeOnlyArgs, global: &GlobalOptions) -> Result<()> {
        let scope = args.scope.scope()?;
        let client = global.client()?;
        let writer = global.writer();

        let variables = client.list_variables(&scope).await?;
        let rows: Vec<VariableRow> = variables
            .iter()
            .map(|v| VariableRow {
                name: v.name.clone(),
                data: v.data.clone(),
            })
            .collect();
        writer.write_list(&rows, "No variables");

        client.close();
        Ok(())
    }

    async fn get(&self, args: &NameOnlyArgs, global: &GlobalOptions) -> Result<()> {
        let scope = args.scope.scope()?;
        let client = global.client()?;
        let writer = global.writer();

        let variable = client.get_variable(&scope, &args.name).await?;
        writer.write_one(&VariableRow {
            name: variable.name.clone(),
            data: variable.data.clone(),
        });

        client.close();
        Ok(())
    }

    async fn set(&self, args: &SetArgs, global: &GlobalOptions) -> Result<()> {
        let scope = args.scope.scope()?;
        let value = args.resolve_value()?;
        let client = global.client()?;
        let writer = global.writer();

        let created = client.set_variable(&scope, &args.name, &value).await?;
        writer.write_mutation(if created { "created" } else { "updated" }, &args.name);

        client.close();
        Ok(())
    }

    async fn delete(&self, args: &NameArgs, global: &GlobalOptions) -> Result<()> {
        let scope = args.scope.scope()?;

        if !args.yes {
            let prompt = format!("Delete variable {}?", args.name);
            if !Confirm::new().with_prompt(prompt).default(false).interact()? {
                println!("Aborted");
                return Ok(());
            }
        }

        let client = global.client()?;
        let writer = global.writer();

        client.delete_variable(&scope, &args.name).await?;
        writer.write_mutation("deleted", &args.name);

        client.close();
        Ok(())
    }
}
