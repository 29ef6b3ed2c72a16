use std::path::PathBuf;

use thiserror::Error;
use vfs_plugin_api::PluginError;

/// Failure to obtain usable credentials. Fatal at startup: without a
/// configured instance no verb can run.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}", path = .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot parse {path}: {source}", path = .path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error(
        "no artifactory instance configured in {path}; run 'jfrog config add' first",
        path = .path.display()
    )]
    NoInstance { path: PathBuf },
}

/// Failure of a single REST round-trip.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The request never produced a response.
    #[error("request to {path} failed: {source}")]
    Transport {
        path: String,
        source: reqwest::Error,
    },

    /// The server answered with a non-2xx status.
    #[error("HTTP {status} from {path}: {body}")]
    Http {
        status: u16,
        path: String,
        body: String,
    },

    /// The response body did not match the expected shape.
    #[error("cannot decode response from {path}: {source}")]
    Decode {
        path: String,
        source: serde_json::Error,
    },

    /// The connection dropped while streaming a response body.
    #[error("error reading body from {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

impl ClientError {
    /// HTTP status of the response, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<ConfigError> for PluginError {
    fn from(err: ConfigError) -> Self {
        PluginError::Config(err.to_string())
    }
}

impl From<ClientError> for PluginError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Transport { .. } | ClientError::Io { .. } => {
                PluginError::Connection(err.to_string())
            }
            ClientError::Http { status, path, body } => PluginError::Http {
                status,
                message: format!("{path}: {body}"),
            },
            ClientError::Decode { .. } => PluginError::Decode(err.to_string()),
        }
    }
}
