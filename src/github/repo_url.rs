use crate::error::{ReadmeError, Result};
use crate::models::RepoRef;
use url::Url;

const GITHUB_HOSTS: &[&str] = &["github.com", "www.github.com"];

/// Parse `https://github.com/<owner>/<repo>[/...]` into a [`RepoRef`].
///
/// Extra path segments (`/tree/main/src`, ...) are ignored and a trailing
/// `.git` is dropped from the repository name.
pub fn parse_repo_url(raw: &str) -> Result<RepoRef> {
    let parsed = Url::parse(raw.trim()).map_err(|_| ReadmeError::MalformedUrl)?;

    let host = parsed.host_str().unwrap_or_default().to_lowercase();
    if !GITHUB_HOSTS.contains(&host.as_str()) {
        return Err(ReadmeError::InvalidUrl("Not a GitHub domain".to_string()));
    }

    let parts: Vec<&str> = parsed
        .path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();

    if parts.len() < 2 {
        return Err(ReadmeError::InvalidUrl(
            "Missing owner or repository name".to_string(),
        ));
    }

    let owner = parts[0];
    let repo = parts[1].strip_suffix(".git").unwrap_or(parts[1]);
    if repo.is_empty() {
        return Err(ReadmeError::InvalidUrl(
            "Missing owner or repository name".to_string(),
        ));
    }

    Ok(RepoRef::new(owner, repo))
}
