//! Status command implementation

use colored::Colorize;
use pack_core::{DriftReport, InstallManifest, ManifestBuilder};
use serde::Serialize;

use crate::cli::Locations;
use crate::context;
use crate::error::Result;

#[derive(Serialize)]
struct StatusJson<'a> {
    installed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    manifest: Option<&'a InstallManifest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    drift: Option<&'a DriftReport>,
}

/// Run the status command
pub fn run_status(locations: &Locations, json: bool) -> Result<()> {
    let ctx = context::resolve(locations)?;
    let layout = ctx.resolve_layout()?;

    if !layout.manifest_path().is_file() {
        if json {
            let out = StatusJson {
                installed: false,
                manifest: None,
                drift: None,
            };
            println!("{}", serde_json::to_string_pretty(&out)?);
        } else {
            println!("{}", "Not installed".red().bold());
            println!();
            println!("Run {} to install.", "pack install".cyan());
        }
        return Ok(());
    }

    let manifest = ManifestBuilder::load(&layout)?;
    let drift = ManifestBuilder::check_drift(&manifest, &layout)?;
    let manifest = manifest.with_drift(&drift);

    if json {
        let out = StatusJson {
            installed: true,
            manifest: Some(&manifest),
            drift: Some(&drift),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("{}", "Installation Status".bold());
    println!();
    println!("{}:      {}", "Pack".dimmed(), manifest.expansion_pack_name.cyan());
    println!("{}:   {}", "Version".dimmed(), manifest.version);
    println!("{}: {}", "Installed".dimmed(), manifest.installed_at.to_rfc3339());
    println!("{}:      {}", "Root".dimmed(), layout.root());
    if !manifest.ides_setup.is_empty() {
        println!("{}:      {}", "IDEs".dimmed(), manifest.ides_setup.join(", "));
    }
    println!();

    if drift.is_clean() {
        println!(
            "{} All {} files match the install manifest.",
            "OK".green().bold(),
            drift.unchanged
        );
        return Ok(());
    }

    for path in &drift.modified {
        println!("   {} {}", "~".yellow(), path.cyan());
    }
    for path in &drift.missing {
        println!("   {} {} (missing)", "-".red(), path.cyan());
    }
    println!();
    println!(
        "{} {} modified, {} missing, {} unchanged",
        "DRIFTED".yellow().bold(),
        drift.modified.len(),
        drift.missing.len(),
        drift.unchanged
    );
    println!("Run {} to restore the pack files.", "pack install".cyan());
    Ok(())
}
