//
//  teax
//  cli/token.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/09.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! Access token commands
//!
//! Token creation authenticates with the account password (the server
//! refuses to mint tokens under token auth). The password comes from an
//! environment variable or an interactive hidden prompt; it is never
//! logged or echoed. The created token value is shown exactly once.

use anyhow::Result;
use clap::{Args, Subcommand};
use console::style;
use dialoguer::Password;

use crate::output::OutputFormat;

use super::GlobalOptions;

/// Manage API access tokens
#[derive(Args, Debug)]
pub struct TokenCommand {
    #[command(subcommand)]
    pub command: TokenSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum TokenSubcommand {
    /// Create a new API access token
    Create(CreateArgs),
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Token name
    pub name: String,

    /// Comma-separated scopes (e.g. write:repository,write:package)
    #[arg(long, short = 's')]
    pub scopes: Option<String>,

    /// Environment variable containing the password (default: prompt)
    #[arg(long, short = 'p')]
    pub password_env: Option<String>,
}

impl TokenCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            TokenSubcommand::Create(args) => self.create(args, global).await,
        }
    }

    async fn create(&self, args: &CreateArgs, global: &GlobalOptions) -> Result<()> {
        let password = match &args.password_env {
            Some(var) => std::env::var(var)
                .ok()
                .filter(|p| !p.is_empty())
                .ok_or_else(|| {
                    anyhow::anyhow!("Environment variable {var} not set or empty")
                })?,
            None => Password::new().with_prompt("Password").interact()?,
        };
        if password.is_empty() {
            anyhow::bail!("Password cannot be empty");
        }

        let scopes = args.scopes.as_ref().map(|s| {
            s.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        });

        let client = global.client()?;
        let username = client.login_user().to_string();
        if username.is_empty() {
            anyhow::bail!("No username in the tea config. Run 'tea login add' to configure one.");
        }

        let token = client
            .create_access_token(&username, &password, &args.name, scopes)
            .await?;

        match global.output {
            OutputFormat::Simple => println!("{}", token.sha1),
            OutputFormat::Csv => {
                println!("name,token");
                println!(
                    "{},{}",
                    crate::output::csv_safe(&token.name),
                    crate::output::csv_safe(&token.sha1)
                );
            }
            OutputFormat::Table => {
                println!(
                    "{} Created token: {}",
                    style("\u{2713}").green().bold(),
                    token.name
                );
                println!();
                println!("{} {}", style("Token:").bold(), token.sha1);
                println!();
                println!("Warning: this token is only shown once. Store it securely.");
                if !token.scopes.is_empty() {
                    println!("Scopes: {}", token.scopes.join(", "));
                }
            }
        }

        client.close();
        Ok(())
    }
}
