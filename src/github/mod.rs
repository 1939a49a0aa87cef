//! Read-only access to the GitHub REST API plus the OAuth code exchange.

mod client;
pub mod metadata;
pub mod oauth;
pub mod repo_url;
pub mod tree;

use crate::error::Result;
use crate::models::{Credential, MetadataFetch, RepoRef, RepoTree};
use async_trait::async_trait;

pub use client::GithubClient;
pub use metadata::rejection_message;
pub use repo_url::parse_repo_url;

/// Where the tool dispatcher gets repository data from.
#[async_trait]
pub trait RepoSource: Send + Sync {
    /// `Ok(Rejected)` for non-2xx answers, `Err` only when GitHub could not
    /// be reached or the body could not be decoded.
    async fn fetch_metadata(
        &self,
        repo: &RepoRef,
        credential: Option<&Credential>,
    ) -> Result<MetadataFetch>;

    /// Never fails: every problem collapses to an empty tree.
    async fn fetch_tree(
        &self,
        repo: &RepoRef,
        branch: Option<&str>,
        credential: Option<&Credential>,
    ) -> RepoTree;
}

#[async_trait]
impl RepoSource for GithubClient {
    async fn fetch_metadata(
        &self,
        repo: &RepoRef,
        credential: Option<&Credential>,
    ) -> Result<MetadataFetch> {
        metadata::fetch_repo_metadata(self, repo, credential).await
    }

    async fn fetch_tree(
        &self,
        repo: &RepoRef,
        branch: Option<&str>,
        credential: Option<&Credential>,
    ) -> RepoTree {
        tree::fetch_repo_tree(self, repo, branch, credential).await
    }
}
