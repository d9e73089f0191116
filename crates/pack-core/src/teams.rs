//! Team bundles shipped in the pack's `teams/` directory

use pack_fs::{NormalizedPath, PackPath, io, is_plain_file_name};

use crate::context::InstallationContext;
use crate::error::{Error, Result};

const TEAM_EXTENSION: &str = "txt";

/// Team file names in the pack, sorted. Empty when the pack has no teams
/// directory.
pub fn list_team_files(ctx: &InstallationContext) -> Result<Vec<String>> {
    let dir = ctx.pack_root.join(PackPath::TeamsDir.as_str());
    let Some(files) = io::list_files(&dir)? else {
        return Ok(Vec::new());
    };
    Ok(files
        .iter()
        .filter(|f| {
            f.extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(TEAM_EXTENSION))
        })
        .filter_map(NormalizedPath::file_name)
        .map(str::to_string)
        .collect())
}

/// Copy the team file `name` to `destination`.
///
/// A destination that is an existing directory receives the file under its
/// own name. Returns the written path.
pub fn copy_team_file(
    ctx: &InstallationContext,
    name: &str,
    destination: &NormalizedPath,
) -> Result<NormalizedPath> {
    if !is_plain_file_name(name) {
        return Err(Error::InvalidTeamFileName {
            name: name.to_string(),
        });
    }
    let source = ctx.pack_root.join(PackPath::TeamsDir.as_str()).join(name);
    if !source.is_file() {
        return Err(Error::TeamFileNotFound {
            name: name.to_string(),
        });
    }

    let destination = if destination.is_dir() {
        destination.join(name)
    } else {
        destination.clone()
    };
    io::copy_file(&source, &destination)?;
    tracing::info!(from = %source, to = %destination, "copied team file");
    Ok(destination)
}
