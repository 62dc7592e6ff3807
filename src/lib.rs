//
//  teax
//  lib.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/09.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! # teax Library
//!
//! A companion command-line interface for the Gitea REST API, covering the
//! operations the first-party `tea` CLI does not: issue dependency graphs,
//! bulk label/milestone edits, Actions runners/workflows/runs, package
//! management, and access-token bootstrap.
//!
//! ## Overview
//!
//! teax reads credentials from tea's own config file and translates typed
//! subcommands into authenticated HTTP calls. Name-addressed resources
//! (labels, milestones) are resolved to numeric ids through a
//! per-repository cache with a bounded refresh policy; list endpoints are
//! paginated with truncation detection; results render as tables, simple
//! script-friendly lines, or CSV.
//!
//! ## Module Structure
//!
//! - [`cli`]: Command-line interface definitions using clap
//! - [`api`]: The Gitea API client (session, resources, caches)
//! - [`config`]: tea config loading and login resolution
//! - [`output`]: Output formatting (Table, Simple, CSV)
//! - [`util`]: Small pure helpers
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use teax::api::GiteaClient;
//! use teax::config::resolve_login;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let login = resolve_login(None)?;
//! let client = GiteaClient::new(&login)?;
//!
//! let issue = client.get_issue("homelab", "myproject", 25).await?;
//! println!("#{}: {}", issue.number, issue.title);
//! # Ok(())
//! # }
//! ```
//!
//! ## Security posture
//!
//! The access token rides in a header on every request, so the transport
//! layer is strict by default: HTTPS required (explicit opt-out only),
//! certificate verification on, ambient proxies ignored, and tokens held
//! behind [`secrecy::SecretString`] end to end.

/// Command-line interface definitions.
///
/// Contains all CLI commands, arguments, and subcommands defined using the
/// clap derive API.
pub mod cli;

/// The Gitea API client.
///
/// Session construction (URL normalization, TLS policy), the shared
/// building blocks (encoder, paginator, name cache, scopes), and one
/// operation set per resource family.
pub mod api;

/// tea configuration loading and login resolution.
pub mod config;

/// Output formatting for the three output modes.
pub mod output;

/// Small pure helper functions.
pub mod util;

/// Re-export of the main CLI struct for convenient access.
pub use cli::Cli;

/// Application name constant.
pub const APP_NAME: &str = "teax";

/// Application version, derived from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Exit codes for the CLI.
///
/// The contract is deliberately small: 0 on success, 1 on any caught
/// error (the message goes to stderr). clap exits 2 on usage errors by
/// its own convention.
pub mod exit_codes {
    /// Successful execution.
    pub const SUCCESS: i32 = 0;

    /// Any caught error.
    pub const ERROR: i32 = 1;
}
