//! Root, repository-type and repository entries.

use serde_json::{Map, Value};
use vfs_plugin_api::{EntryDescriptor, EntryRef, PluginResult};

use super::{list_folder, storage_info};
use crate::api::RepositorySummary;
use crate::client::{RestClient, encode_path};

/// The repository classes the plugin groups by.
const REPOSITORY_TYPES: [&str; 3] = ["local", "remote", "virtual"];

/// Singleton plugin root.
pub struct Root;

impl Root {
    /// Always the three fixed repository-type children; no network involved.
    pub fn list(&self) -> Vec<EntryDescriptor> {
        REPOSITORY_TYPES
            .iter()
            .map(|name| {
                EntryDescriptor::new(
                    *name,
                    EntryRef::RepositoryType {
                        name: (*name).to_string(),
                    },
                )
            })
            .collect()
    }
}

/// Grouping node for one repository class (local, remote or virtual).
pub struct RepositoryType {
    name: String,
}

impl RepositoryType {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }

    /// One Repository entry per element of `GET /api/repositories?type=`.
    /// Server response order is preserved.
    pub fn list(&self, client: &RestClient) -> PluginResult<Vec<EntryDescriptor>> {
        let repos: Vec<RepositorySummary> =
            client.get_json(&format!("api/repositories?type={}", self.name))?;
        Ok(repos
            .into_iter()
            .map(|repo| {
                let snapshot = summary_snapshot(&repo);
                EntryDescriptor::new(
                    repo.key.clone(),
                    EntryRef::Repository { key: repo.key },
                )
                .with_partial_metadata(snapshot)
            })
            .collect())
    }
}

/// Rebuild the listing fragment for the repository's partial metadata.
fn summary_snapshot(repo: &RepositorySummary) -> Value {
    let mut snapshot = repo.extra.clone();
    snapshot.insert("key".to_string(), Value::String(repo.key.clone()));
    if let Some(repo_type) = &repo.repo_type {
        snapshot.insert("type".to_string(), Value::String(repo_type.clone()));
    }
    if let Some(package_type) = &repo.package_type {
        snapshot.insert("packageType".to_string(), Value::String(package_type.clone()));
    }
    Value::Object(snapshot)
}

/// A repository, addressed by its key.
pub struct Repository {
    key: String,
}

impl Repository {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
        }
    }

    /// Folder listing rooted at `<key>/`.
    pub fn list(&self, client: &RestClient) -> PluginResult<Vec<EntryDescriptor>> {
        Ok(list_folder(
            client,
            &format!("{}/", encode_path(&self.key)),
        )?)
    }

    /// Storage info for the repository root, with the repository's
    /// configuration object merged in under `config`.
    pub fn metadata(&self, client: &RestClient) -> PluginResult<Value> {
        let escaped = encode_path(&self.key);
        let mut info = storage_info(client, &escaped)?;
        let config: Map<String, Value> =
            client.get_json(&format!("api/repositories/{escaped}"))?;
        info.insert("config".to_string(), Value::Object(config));
        Ok(Value::Object(info))
    }

    pub fn delete(&self, client: &RestClient) -> PluginResult<()> {
        client.delete(&format!("api/repositories/{}", encode_path(&self.key)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_lists_exactly_the_three_types() {
        let entries = Root.list();
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["local", "remote", "virtual"]);
        for entry in &entries {
            assert!(matches!(entry.entry, EntryRef::RepositoryType { .. }));
            assert!(entry.mtime.is_none());
            assert!(entry.size.is_none());
        }
    }

    #[test]
    fn snapshot_keeps_listing_fields() {
        let summary: RepositorySummary = serde_json::from_str(
            r#"{"key": "libs-release", "type": "LOCAL", "url": "https://x/libs-release",
                "packageType": "Maven"}"#,
        )
        .unwrap();
        let snapshot = summary_snapshot(&summary);
        assert_eq!(snapshot["key"], "libs-release");
        assert_eq!(snapshot["type"], "LOCAL");
        assert_eq!(snapshot["packageType"], "Maven");
        assert_eq!(snapshot["url"], "https://x/libs-release");
    }
}
