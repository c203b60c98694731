//! Environment lookups and default locations

use std::path::{Path, PathBuf};

const PLUGIN_ID: &str = "PLUGIN_ID";

const DEFAULT_PLUGIN_ID: &str = "scope-plugin";

pub fn get_default_plugin_id() -> String {
    DEFAULT_PLUGIN_ID.to_string()
}

pub fn get_plugin_id() -> Option<String> {
    std::env::var(PLUGIN_ID).ok()
}

const PLUGIN_SOCKET_ROOT: &str = "PLUGIN_SOCKET_ROOT";

const DEFAULT_SOCKET_ROOT: &str = "/var/run/scope/plugins";

pub fn get_default_socket_root() -> PathBuf {
    PathBuf::from(DEFAULT_SOCKET_ROOT)
}

pub fn get_socket_root() -> Option<PathBuf> {
    std::env::var(PLUGIN_SOCKET_ROOT).ok().map(PathBuf::from)
}

/// Socket path the host looks for plugin `plugin_id` under `root`.
///
/// The socket sits in its own `<plugin_id>/` sub-directory so its permissions
/// can be controlled.
pub fn socket_path(root: &Path, plugin_id: &str) -> PathBuf {
    root.join(plugin_id).join(format!("{plugin_id}.sock"))
}

const PLUGIN_HOST_ID: &str = "PLUGIN_HOST_ID";

pub fn get_host_id() -> Option<String> {
    std::env::var(PLUGIN_HOST_ID).ok()
}
