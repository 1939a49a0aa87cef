use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;

/// Owner/name pair identifying one GitHub repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    pub owner: String,
    pub repo: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Access token scoped to a single request. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn token(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct License {
    #[serde(default)]
    pub key: Option<String>,
    pub name: String,
    #[serde(default)]
    pub spdx_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoMetadata {
    pub name: String,
    #[serde(default)]
    pub full_name: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub license: Option<License>,
    #[serde(default = "default_branch_name")]
    pub default_branch: String,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    /// Every other field GitHub returns, passed through to the model untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_branch_name() -> String {
    "main".to_string()
}

/// Outcome of a metadata read that reached GitHub.
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataFetch {
    Found(RepoMetadata),
    Rejected { status: u16, error: String },
}

impl MetadataFetch {
    pub fn metadata(&self) -> Option<&RepoMetadata> {
        match self {
            MetadataFetch::Found(metadata) => Some(metadata),
            MetadataFetch::Rejected { .. } => None,
        }
    }

    /// Tool payload. Rejections keep the `{tree: [], error}` shape so the
    /// model reacts to them like any other data.
    pub fn to_payload(&self) -> Value {
        match self {
            MetadataFetch::Found(metadata) => {
                serde_json::to_value(metadata).unwrap_or_else(|_| json!({}))
            }
            MetadataFetch::Rejected { error, .. } => json!({ "tree": [], "error": error }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    #[serde(rename = "blob")]
    File,
    #[serde(rename = "tree")]
    Directory,
    #[serde(rename = "commit")]
    Submodule,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub sha: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepoTree {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
    pub tree: Vec<TreeEntry>,
    #[serde(default)]
    pub truncated: bool,
}

impl RepoTree {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn to_payload(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| json!({ "tree": [] }))
    }
}
