//! End-to-end checks of the REST adapter and entry verbs against a canned
//! in-process HTTP server. Each test spawns a listener on a loopback port,
//! points a [`RestClient`] at it and drives the entry verbs.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use vfs_plugin_api::{EntryRef, PluginError};

use artifactory_plugin::client::RestClient;
use artifactory_plugin::config::ServerProfile;
use artifactory_plugin::entries::{FileArtifact, Repository, RepositoryType};

/// Minimal HTTP/1.1 server answering each connection with a canned
/// response. Records "METHOD target | headers" lines for assertions. The
/// response body is written in two separate chunks.
struct MockServer {
    endpoint: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockServer {
    fn spawn<F>(handler: F) -> Self
    where
        F: Fn(&str, &str) -> (u16, Vec<u8>) + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let endpoint = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&requests);

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { break };
                let mut reader = BufReader::new(stream.try_clone().unwrap());

                let mut request_line = String::new();
                if reader.read_line(&mut request_line).unwrap_or(0) == 0 {
                    continue;
                }
                let mut headers = Vec::new();
                loop {
                    let mut line = String::new();
                    if reader.read_line(&mut line).unwrap_or(0) == 0 {
                        break;
                    }
                    if line == "\r\n" || line == "\n" {
                        break;
                    }
                    headers.push(line.trim_end().to_lowercase());
                }

                let mut parts = request_line.split_whitespace();
                let method = parts.next().unwrap_or("").to_string();
                let target = parts.next().unwrap_or("").to_string();
                log.lock()
                    .unwrap()
                    .push(format!("{} {} | {}", method, target, headers.join("; ")));

                let (status, body) = handler(&method, &target);
                let reason = match status {
                    200 => "OK",
                    204 => "No Content",
                    404 => "Not Found",
                    500 => "Internal Server Error",
                    _ => "Status",
                };
                let head = format!(
                    "HTTP/1.1 {status} {reason}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    body.len()
                );
                stream.write_all(head.as_bytes()).ok();
                let mid = body.len() / 2;
                stream.write_all(&body[..mid]).ok();
                stream.flush().ok();
                thread::sleep(Duration::from_millis(2));
                stream.write_all(&body[mid..]).ok();
                stream.flush().ok();
            }
        });

        Self { endpoint, requests }
    }

    fn client(&self) -> RestClient {
        RestClient::with_endpoint(&self.endpoint).unwrap()
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

fn body(status: u16, json: &str) -> (u16, Vec<u8>) {
    (status, json.as_bytes().to_vec())
}

#[test]
fn repository_type_lists_server_repositories() {
    let server = MockServer::spawn(|method, target| match (method, target) {
        ("GET", "/api/repositories?type=local") => body(
            200,
            r#"[{"key": "libs-release", "type": "LOCAL", "packageType": "Maven"},
                {"key": "npm-local", "type": "LOCAL", "packageType": "Npm"}]"#,
        ),
        _ => body(404, "{}"),
    });

    let entries = RepositoryType::new("local").list(&server.client()).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].name, "libs-release");
    assert_eq!(
        entries[0].entry,
        EntryRef::Repository {
            key: "libs-release".to_string()
        }
    );
    assert_eq!(entries[1].name, "npm-local");
}

#[test]
fn repository_list_maps_folders_and_files() {
    let server = MockServer::spawn(|method, target| match (method, target) {
        ("GET", "/api/storage/libs-release/?list&listFolders=1&mdTimestamps=1") => body(
            200,
            r#"{"files": [
                {"uri": "/a", "folder": true, "lastModified": "2024-01-01T00:00:00Z"},
                {"uri": "/b.txt", "folder": false, "size": 512,
                 "lastModified": "2024-02-02T00:00:00Z"}
            ]}"#,
        ),
        _ => body(404, "{}"),
    });

    let entries = Repository::new("libs-release")
        .list(&server.client())
        .unwrap();
    assert_eq!(entries.len(), 2);

    assert_eq!(entries[0].name, "a");
    assert_eq!(
        entries[0].entry,
        EntryRef::Folder {
            path: "libs-release/a".to_string()
        }
    );

    assert_eq!(entries[1].name, "b.txt");
    assert_eq!(entries[1].size, Some(512));
    assert_eq!(
        entries[1].entry,
        EntryRef::File {
            path: "libs-release/b.txt".to_string()
        }
    );
}

#[test]
fn repository_metadata_merges_config_and_drops_children() {
    let server = MockServer::spawn(|method, target| match (method, target) {
        ("GET", "/api/storage/libs-release") => body(
            200,
            r#"{"repo": "libs-release", "path": "/",
                "children": [{"uri": "/a", "folder": true}],
                "created": "2024-01-01T00:00:00Z"}"#,
        ),
        ("GET", "/api/storage/libs-release?properties") => body(
            404,
            r#"{"errors":[{"status":404,"message":"No properties could be found."}]}"#,
        ),
        ("GET", "/api/repositories/libs-release") => body(
            200,
            r#"{"key": "libs-release", "rclass": "local", "packageType": "maven"}"#,
        ),
        _ => body(404, "{}"),
    });

    let metadata = Repository::new("libs-release")
        .metadata(&server.client())
        .unwrap();

    assert!(metadata.get("children").is_none());
    assert_eq!(metadata["repo"], "libs-release");
    assert_eq!(metadata["config"]["rclass"], "local");
}

#[test]
fn artifact_metadata_merges_present_properties() {
    let server = MockServer::spawn(|method, target| match (method, target) {
        ("GET", "/api/storage/libs-release/b.txt") => body(
            200,
            r#"{"repo": "libs-release", "path": "/b.txt", "size": "512"}"#,
        ),
        ("GET", "/api/storage/libs-release/b.txt?properties") => body(
            200,
            r#"{"properties": {"build.name": ["app"]}}"#,
        ),
        _ => body(404, "{}"),
    });

    let metadata = FileArtifact::new("libs-release/b.txt")
        .metadata(&server.client())
        .unwrap();
    assert_eq!(metadata["path"], "/b.txt");
    assert_eq!(metadata["properties"]["build.name"][0], "app");
}

#[test]
fn artifact_metadata_propagates_non_404_property_errors() {
    let server = MockServer::spawn(|method, target| match (method, target) {
        ("GET", "/api/storage/libs-release/b.txt") => {
            body(200, r#"{"repo": "libs-release", "path": "/b.txt"}"#)
        }
        ("GET", "/api/storage/libs-release/b.txt?properties") => body(500, "boom"),
        _ => body(404, "{}"),
    });

    let err = FileArtifact::new("libs-release/b.txt")
        .metadata(&server.client())
        .unwrap_err();
    match err {
        PluginError::Http { status, .. } => assert_eq!(status, 500),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn file_read_concatenates_streamed_chunks() {
    let content: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
    let expected = content.clone();
    let server = MockServer::spawn(move |method, target| match (method, target) {
        ("GET", "/libs-release/a/b.bin") => (200, content.clone()),
        _ => (404, Vec::new()),
    });

    let data = FileArtifact::new("libs-release/a/b.bin")
        .read(&server.client())
        .unwrap();
    assert_eq!(data, expected);
}

#[test]
fn delete_issues_exactly_one_request_per_entry() {
    let server = MockServer::spawn(|method, _| match method {
        "DELETE" => (204, Vec::new()),
        _ => (404, Vec::new()),
    });
    let client = server.client();

    Repository::new("old-repo").delete(&client).unwrap();
    FileArtifact::new("libs-release/a%20b.txt")
        .delete(&client)
        .unwrap();

    let deletes: Vec<String> = server
        .requests()
        .into_iter()
        .filter(|r| r.starts_with("DELETE"))
        .collect();
    assert_eq!(deletes.len(), 2);
    assert!(deletes[0].starts_with("DELETE /api/repositories/old-repo "));
    assert!(deletes[1].starts_with("DELETE /libs-release/a%20b.txt "));
}

#[test]
fn delete_failure_surfaces_http_error() {
    let server = MockServer::spawn(|_, _| (404, b"not found".to_vec()));

    let err = Repository::new("missing").delete(&server.client()).unwrap_err();
    match err {
        PluginError::Http { status, .. } => assert_eq!(status, 404),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn api_key_profile_sends_jfrog_header() {
    let server = MockServer::spawn(|_, _| body(200, "[]"));
    let profile = ServerProfile {
        url: server.endpoint.clone(),
        user: None,
        password: None,
        api_key: Some("AKC123".to_string()),
    };
    let client = RestClient::from_profile(&profile).unwrap();

    RepositoryType::new("remote").list(&client).unwrap();

    let requests = server.requests();
    assert!(requests[0].contains("x-jfrog-art-api"), "missing api key header: {}", requests[0]);
}

#[test]
fn api_key_wins_over_basic_auth_when_both_configured() {
    let server = MockServer::spawn(|_, _| body(200, "[]"));
    let profile = ServerProfile {
        url: server.endpoint.clone(),
        user: Some("alice".to_string()),
        password: Some("s3cret".to_string()),
        api_key: Some("AKC123".to_string()),
    };
    let client = RestClient::from_profile(&profile).unwrap();

    RepositoryType::new("local").list(&client).unwrap();

    let requests = server.requests();
    assert!(
        requests[0].contains("x-jfrog-art-api"),
        "missing api key header: {}",
        requests[0]
    );
    assert!(
        !requests[0].contains("authorization:"),
        "unexpected basic auth alongside api key: {}",
        requests[0]
    );
}

#[test]
fn basic_auth_profile_sends_authorization_header() {
    let server = MockServer::spawn(|_, _| body(200, "[]"));
    let profile = ServerProfile {
        url: server.endpoint.clone(),
        user: Some("alice".to_string()),
        password: Some("s3cret".to_string()),
        api_key: None,
    };
    let client = RestClient::from_profile(&profile).unwrap();

    RepositoryType::new("virtual").list(&client).unwrap();

    let requests = server.requests();
    assert!(requests[0].contains("authorization: basic"));
}
