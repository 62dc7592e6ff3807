//
//  teax
//  main.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/09.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use teax::cli::{Cli, Commands};
use teax::exit_codes;

#[tokio::main]
async fn main() {
    // Initialize logging
    init_logging();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Execute command, map every caught error to stderr + exit 1
    match run(cli).await {
        Ok(()) => std::process::exit(exit_codes::SUCCESS),
        Err(e) => {
            eprintln!("Error: {e:#}");
            std::process::exit(exit_codes::ERROR);
        }
    }
}

/// Initialize logging based on environment
fn init_logging() {
    let filter = EnvFilter::try_from_env("TEAX_DEBUG").unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Main command dispatcher
async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Deps(cmd) => cmd.run(&cli.global).await,
        Commands::Issue(cmd) => cmd.run(&cli.global).await,
        Commands::Label(cmd) => cmd.run(&cli.global).await,
        Commands::Milestone(cmd) => cmd.run(&cli.global).await,
        Commands::Runners(cmd) => cmd.run(&cli.global).await,
        Commands::Workflow(cmd) => cmd.run(&cli.global).await,
        Commands::Runs(cmd) => cmd.run(&cli.global).await,
        Commands::Secrets(cmd) => cmd.run(&cli.global).await,
        Commands::Vars(cmd) => cmd.run(&cli.global).await,
        Commands::Pkg(cmd) => cmd.run(&cli.global).await,
        Commands::Token(cmd) => cmd.run(&cli.global).await,
        Commands::Completion(cmd) => cmd.run(&cli.global).await,
    }
}
