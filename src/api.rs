//! Typed shapes for the Artifactory REST responses the plugin interprets.
//!
//! Only the fields the plugin acts on are named; everything else rides
//! along in a flattened map so metadata results stay complete. A body that
//! fails to decode into these shapes is a [`crate::errors::ClientError::Decode`],
//! never a silent null.

use serde::Deserialize;
use serde_json::{Map, Value};

/// One element of the `GET /api/repositories?type=<t>` response array.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositorySummary {
    pub key: String,
    #[serde(default, rename = "type")]
    pub repo_type: Option<String>,
    #[serde(default)]
    pub package_type: Option<String>,
    /// Remaining listing fields, kept as the repository's partial metadata
    /// snapshot until a full metadata call refines it.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Response of `GET api/storage/<path>?list&listFolders=1&mdTimestamps=1`.
#[derive(Debug, Clone, Deserialize)]
pub struct FolderListing {
    #[serde(default)]
    pub files: Vec<ListedEntry>,
}

/// One child in a folder listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListedEntry {
    /// Slash-prefixed path relative to the listed folder.
    pub uri: String,
    #[serde(default)]
    pub folder: bool,
    #[serde(default)]
    pub last_modified: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
