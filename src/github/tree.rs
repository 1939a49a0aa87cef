use super::metadata::fetch_repo_metadata;
use super::GithubClient;
use crate::error::{ReadmeError, Result};
use crate::models::{Credential, MetadataFetch, RepoRef, RepoTree};
use serde_json::Value;
use tracing::{debug, warn};

/// Used when the default branch cannot be looked up.
pub const FALLBACK_BRANCH: &str = "main";

/// Recursive listing of `branch`, or of the repository's default branch when
/// none is given. Any failure yields an empty tree.
pub async fn fetch_repo_tree(
    client: &GithubClient,
    repo: &RepoRef,
    branch: Option<&str>,
    credential: Option<&Credential>,
) -> RepoTree {
    let branch = match branch.map(str::trim).filter(|b| !b.is_empty()) {
        Some(branch) => branch.to_string(),
        None => resolve_default_branch(client, repo, credential).await,
    };

    match request_tree(client, repo, &branch, credential).await {
        Ok(tree) => {
            debug!(repo = %repo, %branch, entries = tree.tree.len(), "repository tree fetched");
            tree
        }
        Err(e) => {
            warn!(repo = %repo, %branch, error = %e, "error fetching tree, using empty tree");
            RepoTree::empty()
        }
    }
}

async fn resolve_default_branch(
    client: &GithubClient,
    repo: &RepoRef,
    credential: Option<&Credential>,
) -> String {
    match fetch_repo_metadata(client, repo, credential).await {
        Ok(MetadataFetch::Found(metadata)) => metadata.default_branch,
        _ => FALLBACK_BRANCH.to_string(),
    }
}

async fn request_tree(
    client: &GithubClient,
    repo: &RepoRef,
    branch: &str,
    credential: Option<&Credential>,
) -> Result<RepoTree> {
    let url = client.api_url(&["repos", &repo.owner, &repo.repo, "git", "trees", branch])?;
    debug!(%url, "fetching repository tree");

    let response = client
        .get(url, credential)
        .query(&[("recursive", "1")])
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        return Err(ReadmeError::ApiError {
            status: status.as_u16(),
            message,
        });
    }

    let body: Value = response.json().await?;
    parse_tree_body(body)
}

/// Accepts a tree response only when it carries an array-typed `tree` field.
pub fn parse_tree_body(body: Value) -> Result<RepoTree> {
    match body.get("tree") {
        Some(Value::Array(_)) => Ok(serde_json::from_value(body)?),
        _ => Err(ReadmeError::Other("Invalid tree data".to_string())),
    }
}
