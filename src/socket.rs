//! Plugin socket lifecycle
//!
//! The socket lives alone in its own `<id>/` directory. That directory is
//! wiped and recreated with mode 0700 on startup and removed again on
//! shutdown. Paths of any other shape are refused, so nothing outside the
//! plugin's own directory is ever removed.

use std::os::unix::fs::DirBuilderExt;
use std::path::Path;

use anyhow::{Context, anyhow};
use tokio::net::UnixListener;
use tracing::{debug, info, warn};

use crate::config::validate_plugin_id;

/// The directory owned by the plugin for `socket_path`.
///
/// `socket_path` must look like `<root>/<id>/<id>.sock` with a valid id.
pub fn owned_socket_dir(socket_path: &Path) -> anyhow::Result<&Path> {
    let not_owned = || {
        anyhow!(
            "socket path {} is not of the form <root>/<id>/<id>.sock",
            socket_path.display()
        )
    };

    let dir = socket_path.parent().ok_or_else(not_owned)?;
    let dir_name = dir.file_name().and_then(|n| n.to_str()).ok_or_else(not_owned)?;
    let file_name = socket_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(not_owned)?;

    if file_name.strip_suffix(".sock") != Some(dir_name) {
        return Err(not_owned());
    }
    validate_plugin_id(dir_name)?;

    Ok(dir)
}

/// Prepare the socket directory and bind a listener on `socket_path`.
pub fn setup_socket(socket_path: &Path) -> anyhow::Result<UnixListener> {
    let dir = owned_socket_dir(socket_path)?;

    remove_socket_dir(socket_path);
    std::fs::DirBuilder::new()
        .recursive(true)
        .mode(0o700)
        .create(dir)
        .with_context(|| format!("failed to create directory {}", dir.display()))?;

    let listener = UnixListener::bind(socket_path)
        .with_context(|| format!("failed to listen on {}", socket_path.display()))?;

    info!("listening on unix://{}", socket_path.display());
    Ok(listener)
}

/// Remove the plugin directory holding `socket_path`, if any.
pub fn remove_socket_dir(socket_path: &Path) {
    let dir = match owned_socket_dir(socket_path) {
        Ok(dir) => dir,
        Err(e) => {
            warn!("not removing socket directory: {e:#}");
            return;
        }
    };
    match std::fs::remove_dir_all(dir) {
        Ok(()) => debug!("removed {}", dir.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("failed to remove {}: {e}", dir.display()),
    }
}
