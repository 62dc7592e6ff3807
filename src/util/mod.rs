//
//  teax
//  util/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/09.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! # Utility Functions
//!
//! Small pure helpers used throughout the codebase:
//!
//! - Repository reference parsing (`owner/repo`)
//! - Issue specification parsing (`17,19-21` ranges)
//! - Workflow filename extraction from API path fields
//! - String truncation for table cells
//! - Due date parsing for milestone flags

use anyhow::{bail, Result};
use chrono::NaiveDate;

/// Splits an `owner/repo` reference into its two parts.
///
/// # Parameters
///
/// * `reference` - The combined reference, e.g. `"homelab/myproject"`
///
/// # Returns
///
/// The `(owner, repo)` pair.
///
/// # Errors
///
/// Returns an error when the reference does not contain exactly one `/`
/// separating two non-empty parts.
///
/// # Example
///
/// ```rust
/// use teax::util::parse_repo;
///
/// let (owner, repo) = parse_repo("homelab/myproject").unwrap();
/// assert_eq!(owner, "homelab");
/// assert_eq!(repo, "myproject");
///
/// assert!(parse_repo("no-slash").is_err());
/// assert!(parse_repo("a/b/c").is_err());
/// ```
pub fn parse_repo(reference: &str) -> Result<(String, String)> {
    match reference.split('/').collect::<Vec<_>>().as_slice() {
        [owner, repo] if !owner.is_empty() && !repo.is_empty() => {
            Ok((owner.to_string(), repo.to_string()))
        }
        _ => bail!("Invalid repository reference '{reference}': expected owner/repo"),
    }
}

/// Parses an issue specification into a sorted list of issue numbers.
///
/// Accepts comma-separated entries where each entry is a single number or
/// an inclusive `start-end` range: `"17,19-21"` yields `[17, 19, 20, 21]`.
/// Duplicates are removed and the result is ascending.
///
/// # Errors
///
/// Returns an error for empty specs, non-numeric entries, zero/negative
/// numbers, reversed ranges, and ranges spanning more than 100 issues
/// (a typo guard for bulk edits).
pub fn parse_issue_spec(spec: &str) -> Result<Vec<i64>> {
    let mut numbers = Vec::new();

    for part in spec.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        if let Some((start, end)) = part.split_once('-') {
            let start: i64 = start
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid issue number: {start}"))?;
            let end: i64 = end
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid issue number: {end}"))?;
            if start <= 0 || end <= 0 {
                bail!("Issue numbers must be positive: {part}");
            }
            if end < start {
                bail!("Invalid range {part}: end is before start");
            }
            if end - start >= 100 {
                bail!("Range {part} spans more than 100 issues");
            }
            numbers.extend(start..=end);
        } else {
            let number: i64 = part
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid issue number: {part}"))?;
            if number <= 0 {
                bail!("Issue numbers must be positive: {part}");
            }
            numbers.push(number);
        }
    }

    if numbers.is_empty() {
        bail!("Empty issue specification");
    }

    numbers.sort_unstable();
    numbers.dedup();
    Ok(numbers)
}

/// Extracts the workflow filename from a run's `path` field.
///
/// The server records the workflow file path, sometimes with a ref suffix
/// appended: `.gitea/workflows/ci.yml` or
/// `.gitea/workflows/staging-deploy.yml@refs/heads/main`. Both yield the
/// bare filename.
///
/// # Example
///
/// ```rust
/// use teax::util::extract_workflow_name;
///
/// assert_eq!(extract_workflow_name(".gitea/workflows/ci.yml"), "ci.yml");
/// assert_eq!(
///     extract_workflow_name(".gitea/workflows/deploy.yml@refs/heads/main"),
///     "deploy.yml"
/// );
/// ```
pub fn extract_workflow_name(path: &str) -> String {
    let without_ref = match path.split_once('@') {
        Some((before, _)) => before,
        None => path,
    };
    without_ref
        .rsplit('/')
        .next()
        .unwrap_or(without_ref)
        .to_string()
}

/// Whether a run's recorded workflow path refers to the given workflow name.
///
/// Matches the bare filename either exactly or with a trailing
/// `@<ref-spec>` suffix stripped first.
pub fn workflow_path_matches(path: &str, workflow: &str) -> bool {
    extract_workflow_name(path) == workflow || path == workflow
}

/// Truncates a string to a maximum length, appending `...` when shortened.
///
/// # Example
///
/// ```rust
/// use teax::util::truncate;
///
/// assert_eq!(truncate("hello", 10), "hello");
/// assert_eq!(truncate("hello world", 8), "hello...");
/// ```
pub fn truncate(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_len.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}

/// Parses a `YYYY-MM-DD` flag value into the timestamp format the API
/// expects for due dates.
///
/// # Errors
///
/// Returns an error for anything that is not a valid calendar date in
/// `YYYY-MM-DD` form.
pub fn parse_due_date(value: &str) -> Result<String> {
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| anyhow::anyhow!("Invalid date '{value}': expected YYYY-MM-DD"))?;
    Ok(format!("{}T00:00:00Z", date.format("%Y-%m-%d")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_repo() {
        assert_eq!(
            parse_repo("owner/repo").unwrap(),
            ("owner".to_string(), "repo".to_string())
        );
        assert!(parse_repo("owner").is_err());
        assert!(parse_repo("owner/").is_err());
        assert!(parse_repo("/repo").is_err());
        assert!(parse_repo("a/b/c").is_err());
    }

    #[test]
    fn test_parse_issue_spec_single_and_ranges() {
        assert_eq!(parse_issue_spec("17").unwrap(), vec![17]);
        assert_eq!(parse_issue_spec("17,19-21").unwrap(), vec![17, 19, 20, 21]);
        assert_eq!(parse_issue_spec("3,1,2-3").unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_parse_issue_spec_rejects_garbage() {
        assert!(parse_issue_spec("").is_err());
        assert!(parse_issue_spec("abc").is_err());
        assert!(parse_issue_spec("0").is_err());
        assert!(parse_issue_spec("5-2").is_err());
        assert!(parse_issue_spec("1-500").is_err());
    }

    #[test]
    fn test_extract_workflow_name() {
        assert_eq!(extract_workflow_name(".gitea/workflows/ci.yml"), "ci.yml");
        assert_eq!(
            extract_workflow_name(".gitea/workflows/deploy.yml@refs/heads/main"),
            "deploy.yml"
        );
        assert_eq!(extract_workflow_name("ci.yml"), "ci.yml");
    }

    #[test]
    fn test_workflow_path_matches() {
        assert!(workflow_path_matches(".gitea/workflows/ci.yml", "ci.yml"));
        assert!(workflow_path_matches(
            ".gitea/workflows/ci.yml@refs/heads/main",
            "ci.yml"
        ));
        assert!(!workflow_path_matches(".gitea/workflows/ci.yml", "deploy.yml"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 8), "hello...");
    }

    #[test]
    fn test_parse_due_date() {
        assert_eq!(parse_due_date("2026-03-01").unwrap(), "2026-03-01T00:00:00Z");
        assert!(parse_due_date("03/01/2026").is_err());
        assert!(parse_due_date("2026-13-01").is_err());
    }
}
