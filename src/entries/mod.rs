//! The entry hierarchy the plugin exposes to the host:
//! Root → RepositoryType → Repository → Folder/File artifacts (recursive).
//!
//! Entries are stateless value-holders rebuilt from their persisted
//! [`EntryRef`] on every invocation; each verb opens its own requests
//! through the shared [`RestClient`].

mod artifact;
mod repo;

pub use artifact::{FileArtifact, FolderArtifact};
pub use repo::{Repository, RepositoryType, Root};

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use vfs_plugin_api::{EntryDescriptor, EntryRef, EntrySchema, PluginError, PluginResult};

use crate::api::FolderListing;
use crate::client::RestClient;
use crate::errors::ClientError;

const ROOT_DESCRIPTION: &str = "\
A plugin for managing Artifactory. It parses credentials from JFrog's config file, \
typically located at ~/.jfrog/jfrog-cli.conf.

Repositories are organized by their repository type; currently 'local', 'remote' \
and 'virtual' are supported. Artifacts (and repositories) can be viewed and \
deleted, and filtered on things like their mtime or their item properties.";

/// One entry reconstructed from its persisted identity.
pub enum Entry {
    Root(Root),
    RepositoryType(RepositoryType),
    Repository(Repository),
    Folder(FolderArtifact),
    File(FileArtifact),
}

impl Entry {
    pub fn from_ref(entry: &EntryRef) -> Self {
        match entry {
            EntryRef::Root => Entry::Root(Root),
            EntryRef::RepositoryType { name } => {
                Entry::RepositoryType(RepositoryType::new(name))
            }
            EntryRef::Repository { key } => Entry::Repository(Repository::new(key)),
            EntryRef::Folder { path } => Entry::Folder(FolderArtifact::new(path)),
            EntryRef::File { path } => Entry::File(FileArtifact::new(path)),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Entry::Root(_) => "artifactory",
            Entry::RepositoryType(_) => "repository_type",
            Entry::Repository(_) => "repository",
            Entry::Folder(_) => "folder",
            Entry::File(_) => "file",
        }
    }

    pub fn list(&self, client: &RestClient) -> PluginResult<Vec<EntryDescriptor>> {
        match self {
            Entry::Root(root) => Ok(root.list()),
            Entry::RepositoryType(t) => t.list(client),
            Entry::Repository(r) => r.list(client),
            Entry::Folder(f) => f.list(client),
            Entry::File(_) => Err(self.unsupported("list")),
        }
    }

    pub fn read(&self, client: &RestClient) -> PluginResult<Vec<u8>> {
        match self {
            Entry::File(f) => f.read(client),
            _ => Err(self.unsupported("read")),
        }
    }

    pub fn metadata(&self, client: &RestClient) -> PluginResult<Value> {
        match self {
            Entry::Repository(r) => r.metadata(client),
            Entry::Folder(f) => f.metadata(client),
            Entry::File(f) => f.metadata(client),
            _ => Err(self.unsupported("metadata")),
        }
    }

    pub fn delete(&self, client: &RestClient) -> PluginResult<()> {
        match self {
            Entry::Repository(r) => r.delete(client),
            Entry::Folder(f) => f.delete(client),
            Entry::File(f) => f.delete(client),
            _ => Err(self.unsupported("delete")),
        }
    }

    fn unsupported(&self, verb: &str) -> PluginError {
        PluginError::NotSupported(format!("{} entries do not support {}", self.label(), verb))
    }
}

/// The schema table declared to the host, keyed by entry label.
pub fn schemas() -> BTreeMap<String, EntrySchema> {
    let table = [
        EntrySchema::new("artifactory")
            .singleton()
            .parent_of(&["repository_type"])
            .description(ROOT_DESCRIPTION),
        EntrySchema::new("repository_type").parent_of(&["repository"]),
        EntrySchema::new("repository")
            .parent_of(&["folder", "file"])
            .description("This is a repository."),
        EntrySchema::new("folder")
            .parent_of(&["folder", "file"])
            .attributes(&["mtime"])
            .state("path"),
        EntrySchema::new("file")
            .attributes(&["mtime", "size"])
            .state("path"),
    ];
    table
        .into_iter()
        .map(|schema| (schema.label.clone(), schema))
        .collect()
}

/// The single listing primitive shared by Repository and FolderArtifact.
///
/// `path` is already percent-encoded; for a repository root it carries a
/// trailing slash.
pub(crate) fn list_folder(
    client: &RestClient,
    path: &str,
) -> Result<Vec<EntryDescriptor>, ClientError> {
    let listing: FolderListing = client.get_json(&format!(
        "api/storage/{path}?list&listFolders=1&mdTimestamps=1"
    ))?;
    Ok(listing
        .files
        .iter()
        .map(|item| artifact::descriptor(path, item))
        .collect())
}

/// Storage info for `path`, merged with the item's properties.
///
/// The storage and properties records need separate requests; a repository
/// or artifact without properties answers 404 on the sub-resource, which is
/// not an error.
pub(crate) fn storage_info(
    client: &RestClient,
    path: &str,
) -> Result<Map<String, Value>, ClientError> {
    let url = format!("api/storage/{path}");
    let mut info: Map<String, Value> = client.get_json(&url)?;
    // `children` duplicates what list already returns
    info.remove("children");
    let properties = client.get_json::<Map<String, Value>>(&format!("{url}?properties"));
    merge_properties(&mut info, properties)?;
    Ok(info)
}

/// Merge a properties lookup into the base storage record. A 404 means the
/// item has no properties and leaves the base record unchanged; every other
/// failure propagates.
fn merge_properties(
    info: &mut Map<String, Value>,
    properties: Result<Map<String, Value>, ClientError>,
) -> Result<(), ClientError> {
    match properties {
        Ok(props) => {
            info.extend(props);
            Ok(())
        }
        Err(err) if err.status() == Some(404) => Ok(()),
        Err(err) => Err(err),
    }
}
