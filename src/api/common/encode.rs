//
//  teax
//  api/common/encode.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/09.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! Path Segment Encoding
//!
//! Owners, repository names, label names, package names and versions all end
//! up interpolated into request paths. This module encodes one path slot at
//! a time so that a hostile value cannot escape its slot: every character
//! outside the RFC 3986 unreserved set is percent-encoded, including `/`,
//! `?` and `#`.
//!
//! # Example
//!
//! ```rust
//! use teax::api::common::encode_segment;
//!
//! assert_eq!(encode_segment("my-repo").unwrap(), "my-repo");
//! assert_eq!(encode_segment("../admin").unwrap(), "..%2Fadmin");
//! assert!(encode_segment("..").is_err());
//! ```
//!
//! # Notes
//!
//! - Inputs equal to exactly `.` or `..` are rejected as traversal attempts;
//!   names that merely contain dots (`.gitignore`, `a.b.c`) are fine.
//! - Empty segments are rejected too: they would collapse a path slot and
//!   shift every following segment one level up.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use super::ApiError;

/// Everything outside RFC 3986 unreserved (`ALPHA DIGIT - . _ ~`) is encoded.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Encodes a single path segment for safe interpolation into a request path.
///
/// # Parameters
///
/// * `segment` - The raw value destined for one path slot
///
/// # Returns
///
/// The percent-encoded segment, or [`ApiError::Validation`] for values that
/// can never be a legal single segment (`.`, `..`, the empty string).
///
/// # Errors
///
/// Returns an error if the segment is empty or is exactly a dot-segment.
///
/// # Example
///
/// ```rust
/// use teax::api::common::encode_segment;
///
/// assert_eq!(encode_segment(".gitignore").unwrap(), ".gitignore");
/// assert_eq!(encode_segment("a/b").unwrap(), "a%2Fb");
/// assert_eq!(encode_segment("50%").unwrap(), "50%25");
/// ```
pub fn encode_segment(segment: &str) -> Result<String, ApiError> {
    if segment.is_empty() {
        return Err(ApiError::Validation(
            "Path segment cannot be empty".to_string(),
        ));
    }
    if segment == "." || segment == ".." {
        return Err(ApiError::Validation(format!(
            "Invalid path segment '{segment}': dot segments are not allowed"
        )));
    }
    Ok(utf8_percent_encode(segment, SEGMENT).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_segments_pass_through() {
        assert_eq!(encode_segment("owner").unwrap(), "owner");
        assert_eq!(encode_segment("my-repo_2.0~rc1").unwrap(), "my-repo_2.0~rc1");
    }

    #[test]
    fn test_dots_inside_names_are_fine() {
        assert_eq!(encode_segment(".gitignore").unwrap(), ".gitignore");
        assert_eq!(encode_segment("a.b.c").unwrap(), "a.b.c");
        assert_eq!(encode_segment("test..file").unwrap(), "test..file");
    }

    #[test]
    fn test_dot_segments_rejected() {
        assert!(matches!(encode_segment("."), Err(ApiError::Validation(_))));
        assert!(matches!(encode_segment(".."), Err(ApiError::Validation(_))));
    }

    #[test]
    fn test_empty_rejected() {
        assert!(matches!(encode_segment(""), Err(ApiError::Validation(_))));
    }

    #[test]
    fn test_url_specials_are_encoded() {
        assert_eq!(encode_segment("../admin").unwrap(), "..%2Fadmin");
        assert_eq!(encode_segment("a/b").unwrap(), "a%2Fb");
        assert_eq!(encode_segment("what?").unwrap(), "what%3F");
        assert_eq!(encode_segment("frag#ment").unwrap(), "frag%23ment");
        assert_eq!(encode_segment("épic").unwrap(), "%C3%A9pic");
    }
}
