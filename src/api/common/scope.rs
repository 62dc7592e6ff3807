//
//  teax
//  api/common/scope.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/09.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! Authorization Scope Selection
//!
//! Runner endpoints exist at three levels (repository, organisation,
//! global/admin) and Actions secrets/variables at three slightly different
//! ones (repository, organisation, user). Exactly one level must be chosen
//! per call; picking zero or several is a client-side validation failure
//! raised before any path is built.
//!
//! # Example
//!
//! ```rust
//! use teax::api::common::Scope;
//!
//! let scope = Scope::from_flags(Some("owner/repo"), None, false).unwrap();
//! assert_eq!(scope.actions_prefix().unwrap(), "repos/owner/repo");
//!
//! // zero flags
//! assert!(Scope::from_flags(None, None, false).is_err());
//! // conflicting flags
//! assert!(Scope::from_flags(Some("o/r"), Some("org"), false).is_err());
//! ```

use super::{encode_segment, ApiError};
use crate::util::parse_repo;

/// The authorization level a runner/workflow call operates at.
///
/// # Variants
///
/// * `Repo` - A single repository (`repos/{owner}/{repo}/...`)
/// * `Org` - An organisation (`orgs/{name}/...`)
/// * `Global` - The whole instance (`admin/...`, requires admin rights)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// Repository scope.
    Repo {
        /// Repository owner (user or organisation).
        owner: String,
        /// Repository name.
        repo: String,
    },
    /// Organisation scope.
    Org {
        /// Organisation name.
        name: String,
    },
    /// Instance-wide (admin) scope.
    Global,
}

impl Scope {
    /// Builds a scope from the CLI's `--repo` / `--org` / `--global` flags.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] when no flag or more than one flag
    /// is given, or when the repository reference is malformed.
    pub fn from_flags(
        repo: Option<&str>,
        org: Option<&str>,
        global: bool,
    ) -> Result<Self, ApiError> {
        let picked = usize::from(repo.is_some()) + usize::from(org.is_some()) + usize::from(global);
        if picked == 0 {
            return Err(ApiError::Validation(
                "Must specify --repo, --org, or --global".to_string(),
            ));
        }
        if picked > 1 {
            return Err(ApiError::Validation(
                "Specify only one of --repo, --org, or --global".to_string(),
            ));
        }

        if let Some(repo) = repo {
            let (owner, repo) = parse_repo(repo).map_err(|e| ApiError::Validation(e.to_string()))?;
            Ok(Self::Repo { owner, repo })
        } else if let Some(name) = org {
            Ok(Self::Org {
                name: name.to_string(),
            })
        } else {
            Ok(Self::Global)
        }
    }

    /// Renders the encoded path prefix for Actions endpoints at this scope.
    pub fn actions_prefix(&self) -> Result<String, ApiError> {
        match self {
            Self::Repo { owner, repo } => Ok(format!(
                "repos/{}/{}",
                encode_segment(owner)?,
                encode_segment(repo)?
            )),
            Self::Org { name } => Ok(format!("orgs/{}", encode_segment(name)?)),
            Self::Global => Ok("admin".to_string()),
        }
    }

    /// Human-readable description for confirmation prompts.
    pub fn describe(&self) -> String {
        match self {
            Self::Repo { owner, repo } => format!("repo '{owner}/{repo}'"),
            Self::Org { name } => format!("org '{name}'"),
            Self::Global => "global scope".to_string(),
        }
    }
}

/// The authorization level an Actions secret/variable call operates at.
///
/// Same exclusivity contract as [`Scope`], but the third level is the
/// authenticated user rather than the whole instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretScope {
    /// Repository scope.
    Repo {
        /// Repository owner (user or organisation).
        owner: String,
        /// Repository name.
        repo: String,
    },
    /// Organisation scope.
    Org {
        /// Organisation name.
        name: String,
    },
    /// The authenticated user's own scope.
    User,
}

impl SecretScope {
    /// Builds a scope from the CLI's `--repo` / `--org` / `--user` flags.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] when no flag or more than one flag
    /// is given, or when the repository reference is malformed.
    pub fn from_flags(
        repo: Option<&str>,
        org: Option<&str>,
        user: bool,
    ) -> Result<Self, ApiError> {
        let picked = usize::from(repo.is_some()) + usize::from(org.is_some()) + usize::from(user);
        if picked == 0 {
            return Err(ApiError::Validation(
                "Must specify --repo, --org, or --user".to_string(),
            ));
        }
        if picked > 1 {
            return Err(ApiError::Validation(
                "Specify only one of --repo, --org, or --user".to_string(),
            ));
        }

        if let Some(repo) = repo {
            let (owner, repo) = parse_repo(repo).map_err(|e| ApiError::Validation(e.to_string()))?;
            Ok(Self::Repo { owner, repo })
        } else if let Some(name) = org {
            Ok(Self::Org {
                name: name.to_string(),
            })
        } else {
            Ok(Self::User)
        }
    }

    /// Renders the encoded path prefix for Actions endpoints at this scope.
    pub fn actions_prefix(&self) -> Result<String, ApiError> {
        match self {
            Self::Repo { owner, repo } => Ok(format!(
                "repos/{}/{}",
                encode_segment(owner)?,
                encode_segment(repo)?
            )),
            Self::Org { name } => Ok(format!("orgs/{}", encode_segment(name)?)),
            Self::User => Ok("user".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exactly_one_flag_required() {
        assert!(matches!(
            Scope::from_flags(None, None, false),
            Err(ApiError::Validation(_))
        ));
        assert!(matches!(
            Scope::from_flags(Some("o/r"), None, true),
            Err(ApiError::Validation(_))
        ));
        assert!(matches!(
            Scope::from_flags(Some("o/r"), Some("org"), true),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn test_prefixes() {
        let repo = Scope::from_flags(Some("owner/repo"), None, false).unwrap();
        assert_eq!(repo.actions_prefix().unwrap(), "repos/owner/repo");

        let org = Scope::from_flags(None, Some("myorg"), false).unwrap();
        assert_eq!(org.actions_prefix().unwrap(), "orgs/myorg");

        let global = Scope::from_flags(None, None, true).unwrap();
        assert_eq!(global.actions_prefix().unwrap(), "admin");
    }

    #[test]
    fn test_owner_with_slash_cannot_escape_slot() {
        let scope = Scope::Repo {
            owner: "a/b".to_string(),
            repo: "c".to_string(),
        };
        assert_eq!(scope.actions_prefix().unwrap(), "repos/a%2Fb/c");
    }

    #[test]
    fn test_secret_scope_user_prefix() {
        let user = SecretScope::from_flags(None, None, true).unwrap();
        assert_eq!(user.actions_prefix().unwrap(), "user");
        assert!(SecretScope::from_flags(None, None, false).is_err());
    }

    #[test]
    fn test_bad_repo_reference_rejected() {
        assert!(Scope::from_flags(Some("not-a-repo"), None, false).is_err());
    }
}
