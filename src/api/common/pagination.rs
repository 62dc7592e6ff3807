//
//  teax
//  api/common/pagination.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/09.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! Pagination Loop for List Endpoints
//!
//! Every list-returning resource (issues, labels, milestones, comments,
//! runners, packages, secrets, variables, workflow runs) pages the same
//! way: 1-indexed `page` and `limit` query parameters, with the last page
//! signalled by a short or empty batch. This module provides the one loop
//! all of them share.
//!
//! # Termination
//!
//! The loop stops **normally** when a page comes back empty, or comes back
//! with fewer than `limit` items (that page's items are still included).
//! It stops **abnormally** when `max_pages` pages have been fetched without
//! a natural terminator; this is reported as [`Paged::truncated`] and must
//! be surfaced by the caller as a warning, never dropped. The ceiling
//! bounds the work done against a server that never terminates pagination.
//!
//! # Example
//!
//! ```rust,no_run
//! use teax::api::common::{fetch_all, ApiError, DEFAULT_LIMIT, DEFAULT_MAX_PAGES};
//!
//! # async fn example() -> Result<(), ApiError> {
//! let paged = fetch_all(
//!     |page, limit| async move {
//!         // one HTTP request for `page`
//!         Ok::<Vec<u32>, ApiError>(vec![])
//!     },
//!     DEFAULT_LIMIT,
//!     DEFAULT_MAX_PAGES,
//! )
//! .await?;
//!
//! paged.warn_if_truncated("items");
//! println!("fetched {} items", paged.items.len());
//! # Ok(())
//! # }
//! ```

use std::future::Future;

use super::ApiError;

/// Default page size requested from list endpoints.
pub const DEFAULT_LIMIT: u32 = 50;

/// Default ceiling on the number of pages fetched in one listing.
pub const DEFAULT_MAX_PAGES: u32 = 100;

/// The accumulated result of a pagination loop.
///
/// # Fields
///
/// * `items` - Every item collected, in server order
/// * `truncated` - `true` when the page ceiling was hit before the server
///   signalled end-of-data; the result may be incomplete
#[derive(Debug)]
pub struct Paged<T> {
    /// Every item collected across all fetched pages.
    pub items: Vec<T>,

    /// Whether the loop stopped at the page ceiling instead of a
    /// natural terminator.
    pub truncated: bool,

    /// The page ceiling the loop ran under; named in the warning.
    pub max_pages: u32,
}

impl<T> Paged<T> {
    /// Emits the mandatory truncation warning when the ceiling was hit.
    ///
    /// Truncation is non-fatal: the (possibly incomplete) items are still
    /// returned to the caller, but the condition is never silent.
    pub fn warn_if_truncated(&self, what: &str) {
        if self.truncated {
            tracing::warn!(
                "{} listing stopped at the page ceiling ({} pages); \
                 collected {} items, results may be incomplete",
                what,
                self.max_pages,
                self.items.len()
            );
        }
    }

    /// Consumes the page set, emitting the truncation warning on the way.
    pub fn into_items(self, what: &str) -> Vec<T> {
        self.warn_if_truncated(what);
        self.items
    }
}

/// Fetches every page of a list endpoint up to a ceiling.
///
/// Calls `fetch_page(page, limit)` for `page = 1, 2, ...`, accumulating
/// items until a page comes back empty or short, or `max_pages` pages have
/// been fetched.
///
/// # Parameters
///
/// * `fetch_page` - Issues one request for the given 1-indexed page
/// * `limit` - Page size passed through to `fetch_page`
/// * `max_pages` - Ceiling on the number of pages fetched
///
/// # Returns
///
/// A [`Paged`] with every collected item and the truncation flag.
///
/// # Errors
///
/// Any error from `fetch_page` aborts the loop and propagates unchanged;
/// items collected before the failure are discarded.
pub async fn fetch_all<T, F, Fut>(
    mut fetch_page: F,
    limit: u32,
    max_pages: u32,
) -> Result<Paged<T>, ApiError>
where
    F: FnMut(u32, u32) -> Fut,
    Fut: Future<Output = Result<Vec<T>, ApiError>>,
{
    let mut items = Vec::new();

    for page in 1..=max_pages {
        let batch = fetch_page(page, limit).await?;
        let fetched = batch.len() as u32;

        if fetched == 0 {
            return Ok(Paged {
                items,
                truncated: false,
                max_pages,
            });
        }

        items.extend(batch);

        if fetched < limit {
            // A short page is the server saying "last page".
            return Ok(Paged {
                items,
                truncated: false,
                max_pages,
            });
        }
    }

    Ok(Paged {
        items,
        truncated: true,
        max_pages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_stops_on_empty_page() {
        let calls = AtomicU32::new(0);
        let paged = fetch_all(
            |page, limit| {
                calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if page == 1 {
                        Ok((0..limit).collect::<Vec<u32>>())
                    } else {
                        Ok(vec![])
                    }
                }
            },
            50,
            100,
        )
        .await
        .unwrap();

        assert_eq!(paged.items.len(), 50);
        assert!(!paged.truncated);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_short_page_terminates_and_is_included() {
        let calls = AtomicU32::new(0);
        let paged = fetch_all(
            |page, limit| {
                calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if page < 3 {
                        Ok(vec![0u32; limit as usize])
                    } else {
                        Ok(vec![0u32; 7])
                    }
                }
            },
            50,
            100,
        )
        .await
        .unwrap();

        assert_eq!(paged.items.len(), 107);
        assert!(!paged.truncated);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_page_ceiling_reports_truncation() {
        let paged = fetch_all(
            |_page, limit| async move { Ok(vec![0u32; limit as usize]) },
            50,
            100,
        )
        .await
        .unwrap();

        assert_eq!(paged.items.len(), 50 * 100);
        assert!(paged.truncated);
    }

    #[tokio::test]
    async fn test_error_propagates() {
        let result: Result<Paged<u32>, _> = fetch_all(
            |page, _limit| async move {
                if page == 2 {
                    Err(ApiError::Validation("boom".to_string()))
                } else {
                    Ok(vec![0u32; 50])
                }
            },
            50,
            100,
        )
        .await;

        assert!(matches!(result, Err(ApiError::Validation(_))));
    }
}
