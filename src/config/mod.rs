//
//  teax
//  config/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/09.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! # Credential Resolution
//!
//! teax piggybacks on the tea CLI's configuration: a YAML document at
//! `~/.config/tea/config.yml` holding a `logins` list, each entry a named
//! credential/endpoint pair for one Gitea instance. This module loads that
//! file and resolves the login a session should use.
//!
//! ## Resolution order
//!
//! 1. A login named explicitly (`--login <name>`)
//! 2. The entry marked `default: true`
//! 3. The first entry in the list
//!
//! ## Error hygiene
//!
//! The file carries access tokens, so failures here are deliberately
//! tight-lipped: a YAML parse failure reports only the location of the
//! problem, never the offending document text, and tokens are held in
//! [`secrecy::SecretString`] so they cannot leak through `Debug` formatting.
//!
//! ## Example
//!
//! ```rust,no_run
//! use teax::config::resolve_login;
//!
//! # fn example() -> anyhow::Result<()> {
//! let login = resolve_login(None)?; // the default login
//! println!("using {} at {}", login.name, login.url);
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use directories::BaseDirs;
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

/// Failures while loading or resolving tea credentials.
///
/// All variants are fatal and carry guidance; none of them ever embeds raw
/// config-file text.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file does not exist.
    #[error("tea config not found at {path}. Configure tea first: tea login add")]
    NotFound {
        /// The path that was probed.
        path: PathBuf,
    },

    /// The config file exists but cannot be read.
    #[error("Cannot read tea config at {path}: {reason}")]
    Unreadable {
        /// The path that was probed.
        path: PathBuf,
        /// Why reading failed (I/O error kind, "is a directory", ...).
        reason: String,
    },

    /// The file is not valid YAML or does not match the expected schema.
    ///
    /// Only the location of the problem is reported; the raw parser
    /// message may quote document text, which can contain token material.
    #[error("Invalid tea config{location}: the file could not be parsed")]
    Parse {
        /// A ` at line L column C` suffix when the parser knows it.
        location: String,
    },

    /// The home directory cannot be determined.
    #[error("Cannot determine the home directory to locate the tea config")]
    NoHome,

    /// The config parsed but holds no logins at all.
    #[error("No tea logins configured. Add one first: tea login add")]
    NoLogins,

    /// No login matches the requested name.
    #[error("Login '{name}' not found. Available: {available}")]
    UnknownLogin {
        /// The requested name.
        name: String,
        /// Comma-separated names that do exist.
        available: String,
    },

    /// A login entry fails validation.
    #[error("Invalid login '{name}': {reason}")]
    InvalidLogin {
        /// The offending entry's name.
        name: String,
        /// What is wrong with it.
        reason: String,
    },
}

/// One named credential/endpoint pair for a Gitea instance.
///
/// Immutable once loaded; owned by the session for its lifetime.
///
/// # Fields
///
/// * `name` - The login's name in the tea config
/// * `url` - Base URL of the instance (http/https, normalized later)
/// * `token` - The API access token, kept behind [`SecretString`]
/// * `default` - Whether this is the config's default login
/// * `user` - The username, needed by the token bootstrap call
#[derive(Debug, Deserialize)]
pub struct Login {
    /// The login's name in the tea config.
    #[serde(default)]
    pub name: String,

    /// Base URL of the Gitea instance.
    pub url: String,

    /// The API access token. Never printed; exposed only at
    /// header-construction time.
    pub token: SecretString,

    /// Whether this entry is marked as the default login.
    #[serde(default)]
    pub default: bool,

    /// Username belonging to the token.
    #[serde(default)]
    pub user: String,
}

/// The subset of the tea config file teax reads.
#[derive(Debug, Default, Deserialize)]
pub struct TeaConfig {
    /// All configured logins, in file order.
    #[serde(default)]
    pub logins: Vec<Login>,
}

/// The per-user path of the tea config file.
///
/// tea writes `~/.config/tea/config.yml` on every platform, so teax reads
/// the same fixed location rather than a platform-specific config dir.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    let base = BaseDirs::new().ok_or(ConfigError::NoHome)?;
    Ok(base
        .home_dir()
        .join(".config")
        .join("tea")
        .join("config.yml"))
}

/// Loads and validates the tea config from an explicit path.
///
/// # Errors
///
/// See [`ConfigError`]; notably, parse failures report location only.
pub fn load_config_from(path: &Path) -> Result<TeaConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }
    if path.is_dir() {
        return Err(ConfigError::Unreadable {
            path: path.to_path_buf(),
            reason: "is a directory".to_string(),
        });
    }

    let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Unreadable {
        path: path.to_path_buf(),
        reason: e.kind().to_string(),
    })?;

    // An empty file is a valid, empty config.
    let config: Option<TeaConfig> =
        serde_yaml::from_str(&raw).map_err(|e| ConfigError::Parse {
            location: e
                .location()
                .map(|l| format!(" at line {} column {}", l.line(), l.column()))
                .unwrap_or_default(),
        })?;
    let config = config.unwrap_or_default();

    for login in &config.logins {
        validate_login(login)?;
    }
    Ok(config)
}

/// Loads the tea config from its fixed per-user path.
pub fn load_config() -> Result<TeaConfig, ConfigError> {
    load_config_from(&config_path()?)
}

fn validate_login(login: &Login) -> Result<(), ConfigError> {
    let url = login.url.trim();
    if url.is_empty() {
        return Err(ConfigError::InvalidLogin {
            name: login.name.clone(),
            reason: "URL cannot be empty".to_string(),
        });
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::InvalidLogin {
            name: login.name.clone(),
            reason: "URL must start with http:// or https://".to_string(),
        });
    }
    Ok(())
}

/// Returns the config's default login: the entry marked `default: true`,
/// falling back to the first entry.
///
/// # Errors
///
/// [`ConfigError::NoLogins`] when the config holds no logins.
pub fn default_login(config: TeaConfig) -> Result<Login, ConfigError> {
    let mut logins = config.logins;
    if logins.is_empty() {
        return Err(ConfigError::NoLogins);
    }
    let position = logins.iter().position(|l| l.default).unwrap_or(0);
    Ok(logins.swap_remove(position))
}

/// Returns the login with the given name.
///
/// # Errors
///
/// [`ConfigError::UnknownLogin`] listing the names that do exist.
pub fn login_by_name(config: TeaConfig, name: &str) -> Result<Login, ConfigError> {
    let mut logins = config.logins;
    match logins.iter().position(|l| l.name == name) {
        Some(position) => Ok(logins.swap_remove(position)),
        None => Err(ConfigError::UnknownLogin {
            name: name.to_string(),
            available: logins
                .iter()
                .map(|l| l.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        }),
    }
}

/// Resolves the login a session should use: the named one when a name is
/// given, the default otherwise.
pub fn resolve_login(name: Option<&str>) -> Result<Login, ConfigError> {
    let config = load_config()?;
    match name {
        Some(name) => login_by_name(config, name),
        None => default_login(config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "\
logins:
  - name: gitea.example.com
    url: https://gitea.example.com
    token: secret-token-123
    default: true
    user: testuser
  - name: backup.example.com
    url: https://backup.example.com
    token: backup-token
    default: false
    user: backupuser
";

    fn write_config(content: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join("config.yml")).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        dir
    }

    #[test]
    fn test_load_valid_config() {
        let dir = write_config(SAMPLE);
        let config = load_config_from(&dir.path().join("config.yml")).unwrap();
        assert_eq!(config.logins.len(), 2);
        assert_eq!(config.logins[0].name, "gitea.example.com");
        assert!(config.logins[0].default);
        assert_eq!(config.logins[1].user, "backupuser");
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config_from(&dir.path().join("nope.yml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
        assert!(err.to_string().contains("tea login add"));
    }

    #[test]
    fn test_directory_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config_from(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Unreadable { .. }));
    }

    #[test]
    fn test_empty_file_is_empty_config() {
        let dir = write_config("");
        let config = load_config_from(&dir.path().join("config.yml")).unwrap();
        assert!(config.logins.is_empty());
        assert!(matches!(default_login(config), Err(ConfigError::NoLogins)));
    }

    #[test]
    fn test_parse_error_never_echoes_document_text() {
        // Broken YAML that embeds a token-looking string.
        let dir = write_config("logins:\n  - name: x\n    token: hunter2-secret\n  url: [broken");
        let err = load_config_from(&dir.path().join("config.yml")).unwrap_err();
        let message = err.to_string();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(!message.contains("hunter2-secret"));
    }

    #[test]
    fn test_token_debug_is_redacted() {
        let dir = write_config(SAMPLE);
        let config = load_config_from(&dir.path().join("config.yml")).unwrap();
        let debug = format!("{:?}", config.logins[0]);
        assert!(!debug.contains("secret-token-123"));
    }

    #[test]
    fn test_default_login_prefers_marked_entry() {
        let dir = write_config(SAMPLE);
        let config = load_config_from(&dir.path().join("config.yml")).unwrap();
        assert_eq!(default_login(config).unwrap().name, "gitea.example.com");
    }

    #[test]
    fn test_default_login_falls_back_to_first() {
        let yaml = "\
logins:
  - name: only.example.com
    url: https://only.example.com
    token: tok
";
        let dir = write_config(yaml);
        let config = load_config_from(&dir.path().join("config.yml")).unwrap();
        assert_eq!(default_login(config).unwrap().name, "only.example.com");
    }

    #[test]
    fn test_login_by_name_lists_available_on_miss() {
        let dir = write_config(SAMPLE);
        let path = dir.path().join("config.yml");

        let config = load_config_from(&path).unwrap();
        assert_eq!(
            login_by_name(config, "backup.example.com").unwrap().name,
            "backup.example.com"
        );

        let config = load_config_from(&path).unwrap();
        let err = login_by_name(config, "missing").unwrap_err();
        assert!(err.to_string().contains("gitea.example.com"));
        assert!(err.to_string().contains("backup.example.com"));
    }

    #[test]
    fn test_bad_url_scheme_rejected() {
        let yaml = "\
logins:
  - name: bad
    url: ftp://files.example.com
    token: tok
";
        let dir = write_config(yaml);
        let err = load_config_from(&dir.path().join("config.yml")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLogin { .. }));
    }
}
