//! Validate command implementation

use colored::Colorize;
use pack_core::{InstallationValidator, ValidationReport};
use pack_meta::default_categories;

use crate::cli::Locations;
use crate::context;
use crate::error::{CliError, Result};

/// Run the validate command
///
/// Prints the report, then fails when it holds errors so the exit code
/// reflects validity.
pub fn run_validate(locations: &Locations, installed: bool, json: bool) -> Result<()> {
    let ctx = context::resolve(locations)?;
    let categories = default_categories();
    let validator = InstallationValidator::new(&ctx, &categories);

    let (subject, report) = if installed {
        ("installation", validator.validate_installation()?)
    } else {
        ("pack", validator.validate_pack()?)
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(subject, &report);
    }

    if report.valid {
        Ok(())
    } else {
        Err(CliError::ValidationFailed {
            errors: report.errors.len(),
        })
    }
}

fn print_report(subject: &str, report: &ValidationReport) {
    for error in &report.errors {
        println!("   {} {}", "!".red(), error);
    }
    for warning in &report.warnings {
        println!("   {} {}", "-".yellow(), warning);
    }
    for path in &report.modified {
        println!("   {} {} (modified since install)", "~".blue(), path.cyan());
    }

    if report.valid {
        println!("{} The {subject} is valid.", "OK".green().bold());
    } else {
        println!(
            "{} The {subject} has {} error(s).",
            "INVALID".red().bold(),
            report.errors.len()
        );
    }
}
