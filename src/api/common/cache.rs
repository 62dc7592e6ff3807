//
//  teax
//  api/common/cache.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/09.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! Name Resolution Cache
//!
//! Labels are addressed by name and milestones by title on the CLI, but the
//! API mutates them by numeric id. [`NameCache`] memoizes the name → id
//! mapping per repository so a burst of operations against one repo pays
//! for at most one full listing (plus at most one refresh per resolution
//! call for names that appear mid-session).
//!
//! # Structure
//!
//! One cache instance holds one table per `owner/repo` key. Each table is a
//! flat `name -> id` map plus an optional tag recording the state filter the
//! table was populated under; milestone resolution only trusts tables
//! populated under the `all` filter, since a table fetched with a narrower
//! filter is missing every milestone outside that state.
//!
//! # Consistency rules
//!
//! - Creating an entry inserts the new pair in place; the rest of the table
//!   stays valid.
//! - Renames remove the stale key before inserting the new one.
//! - A user-facing listing replaces the whole table for that repo.
//! - Closing the session clears every table unconditionally.
//!
//! The resolve-once-refresh-once policy itself lives with the resource
//! clients; this type only stores state.
//!
//! # Notes
//!
//! The session is sequential, so the interior `Mutex` is uncontended; it
//! exists because the client hands out `&self` across await points. Guards
//! are held only for map access, never across awaits.

use std::collections::HashMap;
use std::sync::Mutex;

/// Builds the `owner/repo` cache partition key.
pub fn repo_key(owner: &str, repo: &str) -> String {
    format!("{owner}/{repo}")
}

/// One repository's memoized `name -> id` table.
#[derive(Debug, Default)]
struct NameTable {
    ids: HashMap<String, i64>,
    /// State filter the table was populated under (`None` for resources
    /// without a state dimension, e.g. labels).
    filter: Option<String>,
}

/// Per-repository name → id cache shared by the label and milestone clients.
///
/// # Example
///
/// ```rust
/// use teax::api::common::{repo_key, NameCache};
/// use std::collections::HashMap;
///
/// let cache = NameCache::default();
/// let key = repo_key("owner", "repo");
///
/// cache.replace(&key, HashMap::from([("bug".to_string(), 1)]), None);
/// assert_eq!(cache.lookup(&key, "bug"), Some(1));
/// assert_eq!(cache.lookup(&key, "feature"), None);
/// ```
#[derive(Debug, Default)]
pub struct NameCache {
    tables: Mutex<HashMap<String, NameTable>>,
}

impl NameCache {
    /// Looks up a name in the repository's table.
    ///
    /// Returns `None` both when the table exists but lacks the name and
    /// when no table has been populated for the repository yet; callers
    /// distinguish the two with [`populated_under`](Self::populated_under).
    pub fn lookup(&self, key: &str, name: &str) -> Option<i64> {
        let tables = self.tables.lock().unwrap();
        tables.get(key).and_then(|t| t.ids.get(name).copied())
    }

    /// Whether the repository's table exists and was populated under the
    /// given filter.
    ///
    /// A table populated under a different (narrower) filter is treated as
    /// absent for the caller's purpose.
    pub fn populated_under(&self, key: &str, filter: Option<&str>) -> bool {
        let tables = self.tables.lock().unwrap();
        tables
            .get(key)
            .map(|t| t.filter.as_deref() == filter)
            .unwrap_or(false)
    }

    /// Replaces the repository's entire table.
    ///
    /// Used after a full listing; records the filter the listing ran under.
    pub fn replace(&self, key: &str, ids: HashMap<String, i64>, filter: Option<&str>) {
        let mut tables = self.tables.lock().unwrap();
        tables.insert(
            key.to_string(),
            NameTable {
                ids,
                filter: filter.map(str::to_string),
            },
        );
    }

    /// Inserts one pair in place, leaving the rest of the table untouched.
    ///
    /// The mutation hook for create operations. A no-op when the table has
    /// not been populated yet (nothing stale to keep consistent).
    pub fn insert(&self, key: &str, name: &str, id: i64) {
        let mut tables = self.tables.lock().unwrap();
        if let Some(table) = tables.get_mut(key) {
            table.ids.insert(name.to_string(), id);
        }
    }

    /// Removes every key mapping to `id`, then inserts `name -> id`.
    ///
    /// The mutation hook for rename operations: the old name must stop
    /// resolving the moment the new one starts.
    pub fn rename(&self, key: &str, name: &str, id: i64) {
        let mut tables = self.tables.lock().unwrap();
        if let Some(table) = tables.get_mut(key) {
            table.ids.retain(|_, v| *v != id);
            table.ids.insert(name.to_string(), id);
        }
    }

    /// Drops the repository's table entirely.
    pub fn invalidate(&self, key: &str) {
        let mut tables = self.tables.lock().unwrap();
        tables.remove(key);
    }

    /// Drops every table. Called on session close.
    pub fn clear(&self) {
        let mut tables = self.tables.lock().unwrap();
        tables.clear();
    }

    /// Whether the cache currently holds no tables at all.
    pub fn is_empty(&self) -> bool {
        self.tables.lock().unwrap().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn populated() -> (NameCache, String) {
        let cache = NameCache::default();
        let key = repo_key("owner", "repo");
        cache.replace(
            &key,
            HashMap::from([("bug".to_string(), 1), ("feature".to_string(), 2)]),
            None,
        );
        (cache, key)
    }

    #[test]
    fn test_lookup_after_replace() {
        let (cache, key) = populated();
        assert_eq!(cache.lookup(&key, "bug"), Some(1));
        assert_eq!(cache.lookup(&key, "missing"), None);
        assert_eq!(cache.lookup("other/repo", "bug"), None);
    }

    #[test]
    fn test_insert_keeps_existing_entries() {
        let (cache, key) = populated();
        cache.insert(&key, "docs", 3);
        assert_eq!(cache.lookup(&key, "docs"), Some(3));
        assert_eq!(cache.lookup(&key, "bug"), Some(1));
    }

    #[test]
    fn test_insert_without_table_is_noop() {
        let cache = NameCache::default();
        cache.insert("owner/repo", "bug", 1);
        assert_eq!(cache.lookup("owner/repo", "bug"), None);
    }

    #[test]
    fn test_rename_drops_old_key() {
        let (cache, key) = populated();
        cache.rename(&key, "defect", 1);
        assert_eq!(cache.lookup(&key, "bug"), None);
        assert_eq!(cache.lookup(&key, "defect"), Some(1));
        assert_eq!(cache.lookup(&key, "feature"), Some(2));
    }

    #[test]
    fn test_populated_under_tracks_filter() {
        let cache = NameCache::default();
        let key = repo_key("owner", "repo");
        cache.replace(&key, HashMap::new(), Some("open"));

        assert!(cache.populated_under(&key, Some("open")));
        assert!(!cache.populated_under(&key, Some("all")));
        assert!(!cache.populated_under("other/repo", Some("open")));
    }

    #[test]
    fn test_clear_removes_everything() {
        let (cache, key) = populated();
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.lookup(&key, "bug"), None);
    }
}
