//
//  teax
//  cli/pkg.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/09.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! Package commands
//!
//! `delete` and `prune` refuse `pypi`-type packages up front (the registry
//! cannot delete them through the API); `prune` is a dry run unless
//! `--execute` is passed.

use anyhow::Result;
use clap::{Args, Subcommand};
use dialoguer::Confirm;

use crate::api::packages::{Package, PackageVersion};
use crate::output::{OutputFormat, RowOutput};

use super::GlobalOptions;

/// Manage packages
#[derive(Args, Debug)]
pub struct PkgCommand {
    #[command(subcommand)]
    pub command: PkgSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum PkgSubcommand {
    /// List packages for an owner
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Show the versions of a package
    Info(PkgRefArgs),

    /// Show the latest version of a package
    Latest(PkgRefArgs),

    /// Delete a package version
    Delete(DeleteArgs),

    /// Delete old versions, keeping the N most recent
    Prune(PruneArgs),

    /// Link a package to a repository
    Link(LinkArgs),

    /// Unlink a package from its repository
    Unlink(PkgRefArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Package owner (user or org)
    #[arg(long, short = 'O', required = true)]
    pub owner: String,

    /// Filter by type (pypi, container, generic, ...)
    #[arg(long = "type", short = 't')]
    pub kind: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct PkgRefArgs {
    /// Package name
    pub name: String,

    /// Package owner (user or org)
    #[arg(long, short = 'O', required = true)]
    pub owner: String,

    /// Package type
    #[arg(long = "type", short = 't', required = true)]
    pub kind: String,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    #[command(flatten)]
    pub package: PkgRefArgs,

    /// Version to delete
    #[arg(long, short = 'v', required = true)]
    pub version: String,

    /// Skip confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

#[derive(Args, Debug)]
pub struct PruneArgs {
    #[command(flatten)]
    pub package: PkgRefArgs,

    /// Versions to keep
    #[arg(long, short = 'k', default_value = "3")]
    pub keep: usize,

    /// Actually delete (default: dry run)
    #[arg(long)]
    pub execute: bool,
}

#[derive(Args, Debug)]
pub struct LinkArgs {
    #[command(flatten)]
    pub package: PkgRefArgs,

    /// Repository name to link to (same owner)
    #[arg(long, short = 'r', required = true)]
    pub repo: String,
}

struct PackageRow {
    name: String,
    kind: String,
    version: String,
    created_at: String,
}

impl PackageRow {
    fn from_package(pkg: &Package) -> Self {
        Self {
            name: pkg.name.clone(),
            kind: pkg.kind.clone(),
            version: pkg.version.clone(),
            created_at: pkg.created_at.clone(),
        }
    }
}

impl RowOutput for PackageRow {
    fn headers() -> Vec<&'static str> {
        vec!["name", "type", "version", "created"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.kind.clone(),
            self.version.clone(),
            self.created_at.clone(),
        ]
    }

    fn simple(&self) -> String {
        format!("{} {} {}", self.name, self.kind, self.version)
    }
}

struct VersionRow {
    version: String,
    created_at: String,
}

impl VersionRow {
    fn from_version(version: &PackageVersion) -> Self {
        Self {
            version: version.version.clone(),
            created_at: version.created_at.clone(),
        }
    }
}

impl RowOutput for VersionRow {
    fn headers() -> Vec<&'static str> {
        vec!["version", "created"]
    }

    fn row(&self) -> Vec<String> {
        vec![self.version.clone(), self.created_at.clone()]
    }

    fn simple(&self) -> String {
        self.version.clone()
    }
}

impl PkgCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            PkgSubcommand::List(args) => self.list(args, global).await,
            PkgSubcommand::Info(args) => self.info(args, global).await,
            PkgSubcommand::Latest(args) => self.latest(args, global).await,
            PkgSubcommand::Delete(args) => self.delete(args, global).await,
            PkgSubcommand::Prune(args) => self.prune(args, global).await,
            PkgSubcommand::Link(args) => self.link(args, global).await,
            PkgSubcommand::Unlink(args) => self.unlink(args, global).await,
        }
    }

    async fn list(&self, args: &ListArgs, global: &GlobalOptions) -> Result<()> {
        let client = global.client()?;
        let writer = global.writer();

        let packages = client
            .list_packages(&args.owner, args.kind.as_deref())
            .await?;
        let rows: Vec<PackageRow> = packages.iter().map(PackageRow::from_package).collect();
        writer.write_list(&rows, "No packages found");

        client.close();
        Ok(())
    }

    async fn info(&self, args: &PkgRefArgs, global: &GlobalOptions) -> Result<()> {
        let client = global.client()?;
        let writer = global.writer();

        let versions = client
            .list_package_versions(&args.owner, &args.kind, &args.name)
            .await?;
        let rows: Vec<VersionRow> = versions.iter().map(VersionRow::from_version).collect();
        writer.write_list(&rows, "No versions found");

        client.close();
        Ok(())
    }

    async fn latest(&self, args: &PkgRefArgs, global: &GlobalOptions) -> Result<()> {
        let client = global.client()?;
        let writer = global.writer();

        let latest = client
            .latest_package_version(&args.owner, &args.kind, &args.name)
            .await?;
        writer.write_one(&VersionRow::from_version(&latest));

        client.close();
        Ok(())
    }

    async fn delete(&self, args: &DeleteArgs, global: &GlobalOptions) -> Result<()> {
        let pkg = &args.package;

        if !args.yes {
            let prompt = format!(
                "Delete {}/{}:{} from {}?",
                pkg.kind, pkg.name, args.version, pkg.owner
            );
            if !Confirm::new().with_prompt(prompt).default(false).interact()? {
                println!("Aborted");
                return Ok(());
            }
        }

        let client = global.client()?;
        let writer = global.writer();

        client
            .delete_package_version(&pkg.owner, &pkg.kind, &pkg.name, &args.version)
            .await?;
        writer.write_mutation(
            "deleted",
            &format!("{}/{}:{}", pkg.kind, pkg.name, args.version),
        );

        client.close();
        Ok(())
    }

    async fn prune(&self, args: &PruneArgs, global: &GlobalOptions) -> Result<()> {
        let pkg = &args.package;
        // Same restriction as delete, checked before the version listing
        // so a dry run against a PyPI package fails loudly too.
        if pkg.kind.eq_ignore_ascii_case("pypi") {
            anyhow::bail!(
                "PyPI package versions cannot be deleted through this API; \
                 use the web UI: Settings > Packages > Delete"
            );
        }
        let client = global.client()?;
        let writer = global.writer();

        let mut versions = client
            .list_package_versions(&pkg.owner, &pkg.kind, &pkg.name)
            .await?;
        versions.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        if versions.len() <= args.keep {
            if global.output == OutputFormat::Table {
                println!(
                    "Nothing to prune: {} version(s), keeping {}",
                    versions.len(),
                    args.keep
                );
            }
            client.close();
            return Ok(());
        }

        let doomed = versions.split_off(args.keep);
        if !args.execute {
            if global.output == OutputFormat::Table {
                println!("Dry run: would delete {} version(s); pass --execute to delete", doomed.len());
            }
            let rows: Vec<VersionRow> = doomed.iter().map(VersionRow::from_version).collect();
            writer.write_list(&rows, "");
            client.close();
            return Ok(());
        }

        for version in &doomed {
            client
                .delete_package_version(&pkg.owner, &pkg.kind, &pkg.name, &version.version)
                .await?;
        }
        writer.write_mutation("pruned", &format!("{} version(s) of {}", doomed.len(), pkg.name));

        client.close();
        Ok(())
    }

    async fn link(&self, args: &LinkArgs, global: &GlobalOptions) -> Result<()> {
        let pkg = &args.package;
        let client = global.client()?;
        let writer = global.writer();

        client
            .link_package(&pkg.owner, &pkg.kind, &pkg.name, &args.repo)
            .await?;
        writer.write_mutation("linked", &format!("{} to {}", pkg.name, args.repo));

        client.close();
        Ok(())
    }

    async fn unlink(&self, args: &PkgRefArgs, global: &GlobalOptions) -> Result<()> {
        let client = global.client()?;
        let writer = global.writer();

        client
            .unlink_package(&args.owner, &args.kind, &args.name)
            .await?;
        writer.write_mutation("unlinked", &args.name);

        client.close();
        Ok(())
    }
}
