//! Artifactory provider plugin executable.
//!
//! An external plugin that communicates with its host via newline-delimited
//! JSON over stdin/stdout. Protocol:
//! - `--plugin-info`: print plugin metadata as JSON and exit
//! - stdin/stdout: one request per line, one response per line
//!
//! Logging goes to stderr only; stdout belongs to the host protocol.

use std::io::{self, BufRead, Write};

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use vfs_plugin_api::{PluginError, PluginInfo, Request, Response};

use artifactory_plugin::client::RestClient;
use artifactory_plugin::config;
use artifactory_plugin::entries::{self, Entry};

const DESCRIPTION: &str = "Browse, read and delete Artifactory repositories and artifacts";

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 && args[1] == "--plugin-info" {
        print_plugin_info();
        return;
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    // Without credentials no verb can run, so fail before entering the loop.
    let client = match startup() {
        Ok(client) => client,
        Err(err) => {
            eprintln!("artifactory-fs: {err}");
            std::process::exit(1);
        }
    };

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };
        if line.trim().is_empty() {
            continue;
        }

        let response = handle_line(&line, &client);
        let serialized = serde_json::to_string(&response)
            .unwrap_or_else(|err| format!(r#"{{"error":"cannot serialize response: {err}"}}"#));
        writeln!(stdout, "{serialized}").ok();
        stdout.flush().ok();
    }
}

fn startup() -> Result<RestClient, PluginError> {
    let profile = config::load_profile()?;
    info!(url = %profile.url, "configured artifactory instance");
    let client = RestClient::from_profile(&profile)?;
    Ok(client)
}

fn print_plugin_info() {
    let plugin_info = PluginInfo::new(
        "Artifactory Provider",
        env!("CARGO_PKG_VERSION"),
        "artifactory",
    )
    .with_description(DESCRIPTION);
    println!(
        "{}",
        serde_json::to_string(&plugin_info).unwrap_or_default()
    );
}

fn handle_line(line: &str, client: &RestClient) -> Response {
    let request: Request = match serde_json::from_str(line) {
        Ok(request) => request,
        Err(err) => return Response::error(format!("invalid request: {err}")),
    };
    debug!(?request, "dispatching");
    handle_request(request, client)
}

fn handle_request(request: Request, client: &RestClient) -> Response {
    match request {
        Request::Schemas => Response::Schemas {
            schemas: entries::schemas(),
        },
        Request::List { entry } => match Entry::from_ref(&entry).list(client) {
            Ok(entries) => Response::Entries { entries },
            Err(err) => Response::error(err),
        },
        Request::Read { entry } => match Entry::from_ref(&entry).read(client) {
            Ok(content) => Response::Data {
                data: BASE64.encode(content),
            },
            Err(err) => Response::error(err),
        },
        Request::Metadata { entry } => match Entry::from_ref(&entry).metadata(client) {
            Ok(metadata) => Response::Metadata { metadata },
            Err(err) => Response::error(err),
        },
        Request::Delete { entry } => match Entry::from_ref(&entry).delete(client) {
            Ok(()) => Response::success(),
            Err(err) => Response::error(err),
        },
    }
}
