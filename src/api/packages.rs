//
//  teax
//  api/packages.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/09.
//  Copyright (c) 2026 IAMNGONI. All rights reserved.
//

//! Package registry operations.
//!
//! Packages live under their own base path, `<root>/api/packages/` — a
//! sibling of `/api/v1/`, not nested inside it. Listing is paginated like
//! every other resource; deletion and linking are direct calls.
//!
//! # The PyPI restriction
//!
//! The upstream registry cannot delete PyPI package versions through this
//! API; the call appears to work and does nothing. Deleting (or pruning)
//! a `pypi`-type version is therefore rejected client-side, before any
//! request is sent, with an error explaining where to do it instead.

use serde::{Deserialize, Serialize};

use crate::api::common::{
    encode_segment, fetch_all, ApiError, DEFAULT_LIMIT, DEFAULT_MAX_PAGES,
};
use crate::api::issues::User;
use crate::api::GiteaClient;

/// A package (one version of one package, as the registry lists them).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Package {
    /// Server-assigned numeric id.
    pub id: i64,

    /// The owning user or organisation.
    pub owner: User,

    /// Package name.
    pub name: String,

    /// Registry type (`pypi`, `container`, `generic`, `npm`, ...).
    #[serde(rename = "type")]
    pub kind: String,

    /// Version string.
    pub version: String,

    /// Creation timestamp.
    pub created_at: String,

    /// Web URL of the version; may be empty.
    #[serde(default)]
    pub html_url: String,
}

/// One version of a package, as returned by the per-package listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageVersion {
    /// Server-assigned numeric id.
    pub id: i64,

    /// Version string.
    pub version: String,

    /// Creation timestamp.
    pub created_at: String,

    /// Web URL of the version; may be empty.
    #[serde(default)]
    pub html_url: String,
}

/// Rejects `pypi` (any case) before a deletion-style call goes out.
fn reject_pypi(kind: &str) -> Result<(), ApiError> {
    if kind.eq_ignore_ascii_case("pypi") {
        return Err(ApiError::Validation(
            "PyPI package versions cannot be deleted through this API; \
             use the web UI: Settings > Packages > Delete"
                .to_string(),
        ));
    }
    Ok(())
}

impl GiteaClient {
    fn package_path(&self, owner: &str, kind: &str, name: &str) -> Result<String, ApiError> {
        Ok(format!(
            "{}/{}/{}",
            encode_segment(owner)?,
            encode_segment(kind)?,
            encode_segment(name)?
        ))
    }

    /// Lists an owner's packages, optionally filtered by registry type.
    pub async fn list_packages(
        &self,
        owner: &str,
        kind: Option<&str>,
    ) -> Result<Vec<Package>, ApiError> {
        let url = self.pkg_url(&encode_segment(owner)?);
        let paged = fetch_all(
            |page, limit| {
                let url = url.clone();
                let kind = kind.map(str::to_string);
                async move {
                    let mut query = vec![("page", page.to_string()), ("limit", limit.to_string())];
                    if let Some(kind) = kind {
                        query.push(("type", kind));
                    }
                    self.get_json(url, &query).await
                }
            },
            DEFAULT_LIMIT,
            DEFAULT_MAX_PAGES,
        )
        .await?;
        Ok(paged.into_items("package"))
    }

    /// Lists every version of one package.
    pub async fn list_package_versions(
        &self,
        owner: &str,
        kind: &str,
        name: &str,
    ) -> Result<Vec<PackageVersion>, ApiError> {
        let url = self.pkg_url(&self.package_path(owner, kind, name)?);
        let paged = fetch_all(
            |page, limit| {
                let url = url.clone();
                async move {
                    self.get_json(url, &[("page", page.to_string()), ("limit", limit.to_string())])
                        .await
                }
            },
            DEFAULT_LIMIT,
            DEFAULT_MAX_PAGES,
        )
        .await?;
        Ok(paged.into_items("package version"))
    }

    /// Returns the newest version of a package by creation time.
    pub async fn latest_package_version(
        &self,
        owner: &str,
        kind: &str,
        name: &str,
    ) -> Result<PackageVersion, ApiError> {
        let mut versions = self.list_package_versions(owner, kind, name).await?;
        versions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        versions.into_iter().next().ok_or_else(|| ApiError::NotFound {
            kind: "Package",
            name: name.to_string(),
        })
    }

    /// Deletes one package version.
    ///
    /// `pypi`-type packages are rejected before any request is sent; see
    /// the module documentation.
    pub async fn delete_package_version(
        &self,
        owner: &str,
        kind: &str,
        name: &str,
        version: &str,
    ) -> Result<(), ApiError> {
        reject_pypi(kind)?;
        let url = self.pkg_url(&format!(
            "{}/{}",
            self.package_path(owner, kind, name)?,
            encode_segment(version)?
        ));
        self.delete(url).await
    }

    /// Links a package to a repository of the same owner.
    pub async fn link_package(
        &self,
        owner: &str,
        kind: &str,
        name: &str,
        repo: &str,
    ) -> Result<(), ApiError> {
        let url = self.pkg_url(&format!(
            "{}/-/link/{}",
            self.package_path(owner, kind, name)?,
            encode_segment(repo)?
        ));
        self.post_empty(url, &serde_json::json!({})).await
    }

    /// Unlinks a package from its repository.
    pub async fn unlink_package(
        &self,
        owner: &str,
        kind: &str,
        name: &str,
    ) -> Result<(), ApiError> {
        let url = self.pkg_url(&format!("{}/-/unlink", self.package_path(owner, kind, name)?));
        self.post_empty(url, &serde_json::json!({})).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::labels::tests::test_client;

    const PACKAGE: &str = r#"{
        "id": 1,
        "owner": {"id": 1, "login": "myorg", "full_name": "My Org"},
        "name": "mypackage", "type": "generic", "version": "1.0.0",
        "created_at": "2024-01-01T00:00:00Z",
        "html_url": ""
    }"#;

    #[tokio::test]
    async fn test_list_packages_uses_sibling_base_path() {
        let mut server = mockito::Server::new_async().await;
        let list = server
            .mock("GET", "/api/packages/myorg")
            .match_query(mockito::Matcher::UrlEncoded("type".into(), "generic".into()))
            .with_body(format!("[{PACKAGE}]"))
            .create_async()
            .await;

        let client = test_client(&server);
        let packages = client.list_packages("myorg", Some("generic")).await.unwrap();
        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].kind, "generic");
        list.assert_async().await;
    }

    #[tokio::test]
    async fn test_pypi_delete_fails_before_any_request() {
        // No mock server: a request would fail loudly if one were sent.
        let server = mockito::Server::new_async().await;
        let client = test_client(&server);

        for kind in ["pypi", "PyPI", "PYPI"] {
            let err = client
                .delete_package_version("myorg", kind, "teax", "1.0.0")
                .await
                .unwrap_err();
            assert!(matches!(err, ApiError::Validation(_)), "{kind} must be rejected");
            assert!(err.to_string().contains("web UI"));
        }
    }

    #[tokio::test]
    async fn test_delete_other_types_sends_request() {
        let mut server = mockito::Server::new_async().await;
        let delete = server
            .mock("DELETE", "/api/packages/myorg/generic/mypackage/1.0.0")
            .with_status(204)
            .create_async()
            .await;

        let client = test_client(&server);
        client
            .delete_package_version("myorg", "generic", "mypackage", "1.0.0")
            .await
            .unwrap();
        delete.assert_async().await;
    }

    #[tokio::test]
    async fn test_latest_version_is_newest_by_created_at() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/packages/myorg/container/myimage")
            .match_query(mockito::Matcher::Any)
            .with_body(
                r#"[
                    {"id": 1, "version": "v1.0.0", "created_at": "2024-01-01T00:00:00Z"},
                    {"id": 3, "version": "v1.2.0", "created_at": "2024-03-01T00:00:00Z"},
                    {"id": 2, "version": "v1.1.0", "created_at": "2024-02-01T00:00:00Z"}
                ]"#,
            )
            .create_async()
            .await;

        let client = test_client(&server);
        let latest = client
            .latest_package_version("myorg", "container", "myimage")
            .await
            .unwrap();
        assert_eq!(latest.version, "v1.2.0");
    }

    #[tokio::test]
    async fn test_link_and_unlink_paths() {
        let mut server = mockito::Server::new_async().await;
        let link = server
            .mock("POST", "/api/packages/myorg/container/myimage/-/link/myproject")
            .with_status(201)
            .create_async()
            .await;
        let unlink = server
            .mock("POST", "/api/packages/myorg/container/myimage/-/unlink")
            .with_status(204)
            .create_async()
            .await;

        let client = test_client(&server);
        client
            .link_package("myorg", "container", "myimage", "myproject")
            .await
            .unwrap();
        client
            .unlink_package("myorg", "container", "myimage")
            .await
            .unwrap();

        link.assert_async().await;
        unlink.assert_async().await;
    }
}
