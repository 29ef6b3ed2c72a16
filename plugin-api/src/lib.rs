//! VFS Plugin API
//!
//! This crate defines the contract between provider plugins and the
//! virtual-filesystem host. A provider plugin exposes a tree of entries
//! (repositories, folders, files, ...) and implements a subset of the
//! verbs {list, read, metadata, delete} for each entry kind.
//!
//! Plugins are external executables that communicate via newline-delimited
//! JSON over stdin/stdout. Protocol:
//! - `--plugin-info`: print plugin metadata as JSON and exit
//! - stdin: one [`Request`] per line; stdout: one [`Response`] per line
//!
//! The host does not keep plugin objects resident: after a `list` call it
//! persists each returned descriptor's [`EntryRef`] and sends it back
//! verbatim when the user invokes a verb on that entry. Every entry must
//! therefore be fully reconstructible from its `EntryRef` alone.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// PLUGIN INFO
// ============================================================================

/// Metadata printed in response to `--plugin-info`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginInfo {
    /// Plugin name (e.g., "Artifactory Provider")
    pub name: String,
    /// Plugin version
    pub version: String,
    /// Label of the root entry this plugin mounts (e.g., "artifactory")
    pub label: String,
    /// Short description shown in the host's plugin listing
    pub description: String,
}

impl PluginInfo {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            label: label.into(),
            description: String::new(),
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }
}

// ============================================================================
// ENTRY IDENTITY
// ============================================================================

/// Persisted identity of an entry.
///
/// This is the only state the host stores between invocations; a verb
/// request carries the `EntryRef` of the entry it targets and the plugin
/// rebuilds everything else from fresh server queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntryRef {
    /// Singleton plugin root.
    Root,
    /// A grouping node for one repository class.
    RepositoryType { name: String },
    /// A repository, identified by its key.
    Repository { key: String },
    /// A folder inside a repository; `path` is repository-relative and
    /// percent-encoded.
    Folder { path: String },
    /// A file inside a repository; `path` is repository-relative and
    /// percent-encoded.
    File { path: String },
}

/// One entry as returned by a `list` call.
///
/// `name` is the display name (decoded leaf name). `mtime` and `size` are
/// the displayable attributes; kinds that don't carry them leave them
/// unset. The flattened [`EntryRef`] is what the host persists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryDescriptor {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mtime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    /// Metadata snapshot already known from the listing call, if any. The
    /// host may show it without a further `metadata` round-trip.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partial_metadata: Option<serde_json::Value>,
    #[serde(flatten)]
    pub entry: EntryRef,
}

impl EntryDescriptor {
    pub fn new(name: impl Into<String>, entry: EntryRef) -> Self {
        Self {
            name: name.into(),
            mtime: None,
            size: None,
            partial_metadata: None,
            entry,
        }
    }

    pub fn with_mtime(mut self, mtime: Option<String>) -> Self {
        self.mtime = mtime;
        self
    }

    pub fn with_size(mut self, size: Option<u64>) -> Self {
        self.size = size;
        self
    }

    pub fn with_partial_metadata(mut self, snapshot: serde_json::Value) -> Self {
        self.partial_metadata = Some(snapshot);
        self
    }
}

// ============================================================================
// ENTRY SCHEMAS
// ============================================================================

/// Static description of one entry kind, declared once per plugin.
///
/// The host uses schemas to know the tree shape ahead of time (which kinds
/// can appear under which), which attributes to display, and which field of
/// the descriptor to persist as the entry's state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntrySchema {
    /// Label identifying the kind (matches the `kind` tag of [`EntryRef`],
    /// except for the plugin root, which carries the plugin's own label).
    pub label: String,
    /// Whether exactly one entry of this kind exists.
    #[serde(default)]
    pub singleton: bool,
    /// Labels of the kinds this entry's children may have.
    #[serde(default)]
    pub children: Vec<String>,
    /// JSON schema for this kind's `metadata` result.
    pub metadata_schema: serde_json::Value,
    /// Descriptor attributes the host should display (e.g., "mtime").
    #[serde(default)]
    pub attributes: Vec<String>,
    /// Descriptor field persisted as the entry's state, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_key: Option<String>,
    /// Optional help text shown by the host.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl EntrySchema {
    /// A schema with the maximally permissive metadata shape.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            singleton: false,
            children: Vec::new(),
            metadata_schema: serde_json::json!({"type": "object"}),
            attributes: Vec::new(),
            state_key: None,
            description: None,
        }
    }

    pub fn singleton(mut self) -> Self {
        self.singleton = true;
        self
    }

    pub fn parent_of(mut self, labels: &[&str]) -> Self {
        self.children = labels.iter().map(|l| (*l).to_string()).collect();
        self
    }

    pub fn attributes(mut self, attrs: &[&str]) -> Self {
        self.attributes = attrs.iter().map(|a| (*a).to_string()).collect();
        self
    }

    pub fn state(mut self, key: &str) -> Self {
        self.state_key = Some(key.to_string());
        self
    }

    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }
}

// ============================================================================
// WIRE PROTOCOL
// ============================================================================

/// One command line sent by the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Request {
    /// Return the entry-schema table.
    Schemas,
    /// List the children of `entry`.
    List { entry: EntryRef },
    /// Read the full content of a file entry, base64-encoded.
    Read { entry: EntryRef },
    /// Return the merged metadata record for `entry`.
    Metadata { entry: EntryRef },
    /// Delete `entry` on the server.
    Delete { entry: EntryRef },
}

/// One response line printed by the plugin.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Response {
    Schemas {
        schemas: BTreeMap<String, EntrySchema>,
    },
    Entries {
        entries: Vec<EntryDescriptor>,
    },
    Data {
        /// Base64-encoded file content.
        data: String,
    },
    Metadata {
        metadata: serde_json::Value,
    },
    Success {
        success: bool,
    },
    Error {
        error: String,
    },
}

impl Response {
    pub fn success() -> Self {
        Response::Success { success: true }
    }

    pub fn error(err: impl std::fmt::Display) -> Self {
        Response::Error {
            error: err.to_string(),
        }
    }
}

// ============================================================================
// ERRORS
// ============================================================================

/// Result type for plugin verb implementations.
pub type PluginResult<T> = Result<T, PluginError>;

/// Errors a plugin reports back to the host.
#[derive(Error, Debug)]
pub enum PluginError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Connection error: {0}")]
    Connection(String),
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },
    #[error("Decode error: {0}")]
    Decode(String),
    #[error("Not supported: {0}")]
    NotSupported(String),
    #[error("{0}")]
    Other(String),
}
