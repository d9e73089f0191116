//! Installation context from command-line locations
//!
//! Paths are resolved against the working directory once, here, so the
//! library never consults the process state.

use pack_core::InstallationContext;
use pack_fs::NormalizedPath;

use crate::cli::Locations;
use crate::error::Result;

/// Build the context for `locations`.
///
/// Without `--host-config` the default host documents under the target are
/// tried; `--no-host` disables host integration altogether.
pub fn resolve(locations: &Locations) -> Result<InstallationContext> {
    let pack_root = NormalizedPath::canonical(&locations.pack);
    let target_root = NormalizedPath::canonical(&locations.target);

    let host_config = if locations.no_host {
        None
    } else {
        match &locations.host_config {
            Some(path) => Some(NormalizedPath::canonical(path)),
            None => InstallationContext::discover_host_config(&target_root),
        }
    };
    tracing::debug!(pack = %pack_root, target = %target_root, host = ?host_config, "resolved context");

    let ctx = InstallationContext::new(pack_root, target_root).with_host_config(host_config);
    match &locations.install_dir {
        Some(name) => Ok(ctx.with_install_dir(name.clone())?),
        None => Ok(ctx),
    }
}

/// Context for commands that only read the pack.
pub fn pack_only(pack: &std::path::Path) -> InstallationContext {
    let pack_root = NormalizedPath::canonical(pack);
    InstallationContext::new(pack_root.clone(), pack_root)
}
