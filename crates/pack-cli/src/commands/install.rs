//! Install command implementation

use colored::Colorize;
use pack_core::{InstallOptions, InstallPreview, InstallReport, Installer, MergeOutcome};
use pack_meta::PackDescriptor;
use serde::Serialize;

use crate::cli::Locations;
use crate::context;
use crate::error::Result;

/// JSON shape of `install --dry-run`
#[derive(Serialize)]
struct PreviewJson<'a> {
    pack: &'a str,
    version: &'a str,
    install_root: String,
    files: Vec<String>,
    skipped_categories: &'a [String],
    host: &'a MergeOutcome,
    host_diff: Option<&'a str>,
    warnings: &'a [String],
}

/// Run the install command
pub fn run_install(
    locations: &Locations,
    ides: &[String],
    framework_version: Option<String>,
    dry_run: bool,
    json: bool,
) -> Result<()> {
    let ctx = context::resolve(locations)?.with_ide_targets(ides.iter().cloned());
    let options = InstallOptions {
        framework_version,
        ..InstallOptions::default()
    };
    let installer = Installer::new(&ctx);

    if dry_run {
        let preview = installer.preview(&options)?;
        if json {
            print_preview_json(&preview)?;
        } else {
            print_preview(&preview);
        }
        return Ok(());
    }

    if !json {
        println!(
            "{} Installing pack from {}...",
            "=>".blue().bold(),
            ctx.pack_root.as_str().cyan()
        );
    }
    let report = installer.install(&options)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_preview_json(preview: &InstallPreview) -> Result<()> {
    let layout = &preview.plan.layout;
    let files = preview
        .plan
        .copies
        .iter()
        .map(|c| {
            layout
                .record_path(&c.destination)
                .unwrap_or_else(|| c.destination.to_string())
        })
        .collect();
    let out = PreviewJson {
        pack: preview.descriptor.id(),
        version: &preview.descriptor.version,
        install_root: layout.root().to_string(),
        files,
        skipped_categories: &preview.plan.skipped_categories,
        host: &preview.merge,
        host_diff: preview.host_diff.as_deref(),
        warnings: &preview.warnings,
    };
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn print_preview(preview: &InstallPreview) {
    let layout = &preview.plan.layout;
    println!(
        "{} Dry run: {} {} -> {}",
        "=>".blue().bold(),
        preview.descriptor.title().cyan(),
        preview.descriptor.version,
        layout.root()
    );
    if layout.root().is_dir() {
        println!("   {} existing installation will be replaced", "!".yellow());
    }
    for copy in &preview.plan.copies {
        let shown = layout
            .record_path(&copy.destination)
            .unwrap_or_else(|| copy.destination.to_string());
        println!("   {} {} ({})", "+".green(), shown, copy.category.dimmed());
    }
    for category in &preview.plan.skipped_categories {
        println!("   {} {} (no source directory)", "-".dimmed(), category.dimmed());
    }
    println!("   {} host configuration: {}", "*".blue(), preview.merge);
    if let Some(diff) = &preview.host_diff {
        println!();
        print!("{diff}");
    }
    print_warnings(&preview.warnings);
}

fn print_report(report: &InstallReport) {
    let verb = if report.reinstalled {
        "Reinstalled"
    } else {
        "Installed"
    };
    println!(
        "{} {} {} {} ({} files)",
        "OK".green().bold(),
        verb,
        report.descriptor.title().cyan(),
        report.manifest.version,
        report.manifest.files.len()
    );
    println!("   {} host configuration: {}", "*".blue(), report.merge);
    print_warnings(&report.warnings);
    print_guide(&report.descriptor);
}

fn print_warnings(warnings: &[String]) {
    if warnings.is_empty() {
        return;
    }
    println!();
    for warning in warnings {
        println!("{} {}", "WARN".yellow().bold(), warning);
    }
}

/// How to invoke what was just installed.
fn print_guide(descriptor: &PackDescriptor) {
    let agents = descriptor.agent_invocations();
    let commands = descriptor.slash_commands();
    if agents.is_empty() && commands.is_empty() {
        return;
    }
    println!();
    println!("{}:", "Getting started".bold());
    for agent in agents {
        println!("  {} activate agent", agent.cyan());
    }
    for command in commands {
        println!("  {}", command.cyan());
    }
}
