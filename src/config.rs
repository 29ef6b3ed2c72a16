//! Credential loading from JFrog's CLI configuration file.
//!
//! The plugin does not have its own credential store; it reuses whatever
//! `jfrog config add` wrote, typically `~/.jfrog/jfrog-cli.conf`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::errors::ConfigError;

const CONF_FILE: &str = "jfrog-cli.conf";

/// Top-level shape of jfrog-cli.conf. Fields we don't use are ignored.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct JfrogConfig {
    #[serde(default)]
    pub artifactory: Vec<ServerProfile>,
}

/// One configured Artifactory instance.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerProfile {
    pub url: String,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
}

/// Resolve the config file path: `$JFROG_CLI_HOME_DIR/jfrog-cli.conf` when
/// the override is set, otherwise `~/.jfrog/jfrog-cli.conf`.
pub fn config_path() -> PathBuf {
    resolve_config_path(
        std::env::var("JFROG_CLI_HOME_DIR").ok(),
        std::env::var("HOME").unwrap_or_default(),
    )
}

fn resolve_config_path(override_dir: Option<String>, home: String) -> PathBuf {
    if let Some(dir) = override_dir
        && !dir.is_empty()
    {
        return PathBuf::from(dir).join(CONF_FILE);
    }
    PathBuf::from(home).join(".jfrog").join(CONF_FILE)
}

/// Load the first configured profile from the default location.
pub fn load_profile() -> Result<ServerProfile, ConfigError> {
    load_profile_from(&config_path())
}

/// Load the first configured profile from `path`.
///
/// Only the first `artifactory` array element is used; additional
/// configured instances are ignored.
pub fn load_profile_from(path: &Path) -> Result<ServerProfile, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config: JfrogConfig =
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    config
        .artifactory
        .into_iter()
        .next()
        .ok_or_else(|| ConfigError::NoInstance {
            path: path.to_path_buf(),
        })
}
