use super::GithubClient;
use crate::error::Result;
use crate::models::{Credential, MetadataFetch, RepoMetadata, RepoRef};
use tracing::{debug, warn};

/// Human-readable reason for a non-2xx metadata answer.
pub fn rejection_message(status: u16) -> String {
    match status {
        401 => "Unauthorized: Access token may be expired".to_string(),
        403 => "Forbidden: rate limit exceeded or access denied".to_string(),
        404 => "Repository not found".to_string(),
        other => format!("GitHub API error (status {})", other),
    }
}

/// `GET /repos/{owner}/{repo}`.
pub async fn fetch_repo_metadata(
    client: &GithubClient,
    repo: &RepoRef,
    credential: Option<&Credential>,
) -> Result<MetadataFetch> {
    let url = client.api_url(&["repos", &repo.owner, &repo.repo])?;
    debug!(%url, authenticated = credential.is_some(), "fetching repository metadata");

    let response = client.get(url, credential).send().await.map_err(|e| {
        warn!(repo = %repo, error = %e, "metadata request failed");
        e
    })?;

    let status = response.status();
    if !status.is_success() {
        let error = rejection_message(status.as_u16());
        warn!(repo = %repo, status = status.as_u16(), "{}", error);
        return Ok(MetadataFetch::Rejected {
            status: status.as_u16(),
            error,
        });
    }

    let metadata: RepoMetadata = response.json().await.map_err(|e| {
        warn!(repo = %repo, error = %e, "metadata body could not be decoded");
        e
    })?;

    debug!(
        repo = %repo,
        default_branch = %metadata.default_branch,
        "repository metadata fetched"
    );
    Ok(MetadataFetch::Found(metadata))
}
