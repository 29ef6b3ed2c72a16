//! Blocking REST client bound to one Artifactory instance.
//!
//! Every verb the plugin implements routes through this adapter. Calls are
//! synchronous round-trips with no retry or backoff; a non-2xx response
//! surfaces as [`ClientError::Http`] for the caller to interpret.

use std::io::Read;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::ServerProfile;
use crate::errors::ClientError;

/// Credentials attached to every request.
enum Auth {
    Basic { user: String, password: String },
    ApiKey(String),
    Anonymous,
}

/// A configured HTTP client plus the instance endpoint.
///
/// Entries never hold a live network handle; they borrow this client per
/// verb invocation. One client is built at startup and shared for the
/// plugin's lifetime.
pub struct RestClient {
    http: reqwest::blocking::Client,
    endpoint: String,
    auth: Auth,
}

impl RestClient {
    /// Build a client from a configured server profile.
    pub fn from_profile(profile: &ServerProfile) -> Result<Self, ClientError> {
        let http = reqwest::blocking::Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|source| ClientError::Transport {
                path: profile.url.clone(),
                source,
            })?;

        // The API key wins over basic auth when a profile carries both.
        let auth = match (&profile.api_key, &profile.user) {
            (Some(key), _) if !key.is_empty() => Auth::ApiKey(key.clone()),
            (_, Some(user)) if !user.is_empty() => Auth::Basic {
                user: user.clone(),
                password: profile.password.clone().unwrap_or_default(),
            },
            _ => Auth::Anonymous,
        };

        Ok(Self {
            http,
            endpoint: profile.url.trim_end_matches('/').to_string(),
            auth,
        })
    }

    /// Build a client from parts. Used by tests to point at a local server.
    pub fn with_endpoint(endpoint: &str) -> Result<Self, ClientError> {
        Self::from_profile(&ServerProfile {
            url: endpoint.to_string(),
            user: None,
            password: None,
            api_key: None,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.endpoint, path.trim_start_matches('/'))
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::blocking::RequestBuilder {
        let mut req = self
            .http
            .request(method, url)
            .timeout(Duration::from_secs(60));
        match &self.auth {
            Auth::Basic { user, password } => {
                req = req.basic_auth(user, Some(password));
            }
            Auth::ApiKey(key) => {
                req = req.header("X-JFrog-Art-Api", key);
            }
            Auth::Anonymous => {}
        }
        req
    }

    fn send(
        &self,
        method: reqwest::Method,
        path: &str,
    ) -> Result<reqwest::blocking::Response, ClientError> {
        let url = self.url(path);
        debug!(%method, %url, "artifactory request");

        let response =
            self.request(method, &url)
                .send()
                .map_err(|source| ClientError::Transport {
                    path: path.to_string(),
                    source,
                })?;

        let status = response.status();
        debug!(%url, status = status.as_u16(), "artifactory response");
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ClientError::Http {
                status: status.as_u16(),
                path: path.to_string(),
                body,
            });
        }
        Ok(response)
    }

    /// GET `path` (which may carry a query string) and decode the JSON body.
    pub fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = self.send(reqwest::Method::GET, path)?;
        let body = response.text().map_err(|source| ClientError::Transport {
            path: path.to_string(),
            source,
        })?;
        serde_json::from_str(&body).map_err(|source| ClientError::Decode {
            path: path.to_string(),
            source,
        })
    }

    /// GET `path` as a byte stream, concatenating chunks in delivery order.
    pub fn get_raw(&self, path: &str) -> Result<Vec<u8>, ClientError> {
        let mut response = self.send(reqwest::Method::GET, path)?;
        let mut content = Vec::new();
        response
            .read_to_end(&mut content)
            .map_err(|source| ClientError::Io {
                path: path.to_string(),
                source,
            })?;
        Ok(content)
    }

    /// DELETE `path`. Success is the absence of an error.
    pub fn delete(&self, path: &str) -> Result<(), ClientError> {
        self.send(reqwest::Method::DELETE, path)?;
        Ok(())
    }
}

/// Percent-encode a repository-relative path, keeping `/` separators as-is.
/// RFC 3986 unreserved characters pass through unchanged.
pub fn encode_path(path: &str) -> String {
    let mut encoded = String::with_capacity(path.len() * 2);
    for byte in path.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' | b'/' => {
                encoded.push(byte as char);
            }
            _ => {
                encoded.push_str(&format!("%{:02X}", byte));
            }
        }
    }
    encoded
}
