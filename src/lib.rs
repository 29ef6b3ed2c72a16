//! Artifactory provider plugin.
//!
//! Exposes a JFrog Artifactory instance as a navigable entry tree for a
//! virtual-filesystem host. The binary in `main.rs` speaks the host
//! protocol; these modules hold the behavior.

pub mod api;
pub mod client;
pub mod config;
pub mod entries;
pub mod errors;
