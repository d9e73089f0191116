//! Team-files command implementation

use std::path::{Path, PathBuf};

use colored::Colorize;
use pack_core::{copy_team_file, list_team_files};
use pack_fs::NormalizedPath;

use crate::context;
use crate::error::Result;

/// Run the team-files command: list, or copy `copy` to `to`.
pub fn run_team_files(pack: &Path, copy: Option<&str>, to: Option<PathBuf>) -> Result<()> {
    let ctx = context::pack_only(pack);

    if let Some(name) = copy {
        let destination = NormalizedPath::canonical(to.unwrap_or_else(|| PathBuf::from(".")));
        let written = copy_team_file(&ctx, name, &destination)?;
        println!("{} Copied {} to {}", "OK".green().bold(), name.cyan(), written);
        return Ok(());
    }

    let teams = list_team_files(&ctx)?;
    if teams.is_empty() {
        println!("{}", "No team files in this pack".dimmed());
        return Ok(());
    }
    println!("{}:", "Team files".bold());
    for name in teams {
        println!("  {} {}", "+".green(), name.cyan());
    }
    Ok(())
}
