//! Folder and file artifacts inside a repository.

use serde_json::Value;
use vfs_plugin_api::{EntryDescriptor, EntryRef, PluginResult};

use super::{list_folder, storage_info};
use crate::api::ListedEntry;
use crate::client::{RestClient, encode_path};

/// Build the descriptor for one listing fragment under `parent`.
///
/// `parent` is the percent-encoded path the listing was rooted at; the
/// fragment's `uri` is slash-prefixed, so the concatenation yields the
/// child's full repository-relative path. The display name is the raw uri
/// with the leading separator stripped.
pub(crate) fn descriptor(parent: &str, item: &ListedEntry) -> EntryDescriptor {
    let path = format!(
        "{}{}",
        parent.trim_end_matches('/'),
        encode_path(&item.uri)
    );
    let name = item.uri.trim_start_matches('/');
    let entry = if item.folder {
        EntryRef::Folder { path }
    } else {
        EntryRef::File { path }
    };
    let mut desc = EntryDescriptor::new(name, entry)
        .with_mtime(item.last_modified.clone())
        .with_partial_metadata(fragment_snapshot(item));
    if !item.folder {
        desc = desc.with_size(item.size);
    }
    desc
}

fn fragment_snapshot(item: &ListedEntry) -> Value {
    let mut snapshot = item.extra.clone();
    snapshot.insert("uri".to_string(), Value::String(item.uri.clone()));
    snapshot.insert("folder".to_string(), Value::Bool(item.folder));
    if let Some(mtime) = &item.last_modified {
        snapshot.insert("lastModified".to_string(), Value::String(mtime.clone()));
    }
    if let Some(size) = item.size {
        snapshot.insert("size".to_string(), Value::from(size));
    }
    Value::Object(snapshot)
}

/// A folder inside a repository. `path` is percent-encoded and
/// repository-relative, starting with the repository key.
pub struct FolderArtifact {
    path: String,
}

impl FolderArtifact {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
        }
    }

    /// The folder-listing primitive, rooted at this folder's own path.
    pub fn list(&self, client: &RestClient) -> PluginResult<Vec<EntryDescriptor>> {
        Ok(list_folder(client, &self.path)?)
    }

    pub fn metadata(&self, client: &RestClient) -> PluginResult<Value> {
        Ok(Value::Object(storage_info(client, &self.path)?))
    }

    pub fn delete(&self, client: &RestClient) -> PluginResult<()> {
        client.delete(&self.path)?;
        Ok(())
    }
}

/// A file inside a repository.
pub struct FileArtifact {
    path: String,
}

impl FileArtifact {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
        }
    }

    /// Full synchronous download; chunks are concatenated in delivery order.
    pub fn read(&self, client: &RestClient) -> PluginResult<Vec<u8>> {
        Ok(client.get_raw(&self.path)?)
    }

    pub fn metadata(&self, client: &RestClient) -> PluginResult<Value> {
        Ok(Value::Object(storage_info(client, &self.path)?))
    }

    pub fn delete(&self, client: &RestClient) -> PluginResult<()> {
        client.delete(&self.path)?;
        Ok(())
    }
}
