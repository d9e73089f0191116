//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// Expansion-pack installer - copy a content pack into a project and keep it in check
#[derive(Parser, Debug)]
#[command(name = "pack")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Pack source, target project and host configuration
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct Locations {
    /// Pack source directory (holds config.yaml)
    #[arg(long, env = "PACK_ROOT", default_value = ".", value_name = "DIR")]
    pub pack: PathBuf,

    /// Project to install into
    #[arg(long, default_value = ".", value_name = "DIR")]
    pub target: PathBuf,

    /// Host configuration document (default: discovered under the target)
    #[arg(long, value_name = "FILE", conflicts_with = "no_host")]
    pub host_config: Option<PathBuf>,

    /// Do not touch any host configuration
    #[arg(long)]
    pub no_host: bool,

    /// Installation directory name (default: .<pack-id>)
    #[arg(long, value_name = "NAME")]
    pub install_dir: Option<String>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Install the pack into the target project
    ///
    /// Replaces any previous installation of the same pack, writes
    /// install-manifest.yaml and registers the pack in the host configuration.
    ///
    /// Examples:
    ///   pack install --pack ./bmad-odoo-dev --target ~/project
    ///   pack install --ide claude-code --ide cursor
    ///   pack install --dry-run          # Show the plan and host diff
    Install {
        #[command(flatten)]
        locations: Locations,

        /// IDE integration to record in the manifest (repeatable)
        #[arg(long = "ide", value_name = "NAME")]
        ides: Vec<String>,

        /// Host framework version to check compatibility against
        #[arg(long, value_name = "VERSION")]
        framework_version: Option<String>,

        /// Preview the installation without writing anything
        #[arg(long)]
        dry_run: bool,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Validate the pack source, or an existing installation
    Validate {
        #[command(flatten)]
        locations: Locations,

        /// Validate the installation in the target instead of the pack
        #[arg(long)]
        installed: bool,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Show installed files changed since install
    Status {
        #[command(flatten)]
        locations: Locations,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// List the pack's team files, or copy one
    ///
    /// Examples:
    ///   pack team-files
    ///   pack team-files --copy odoo-team.txt --to ./bundles/
    TeamFiles {
        /// Pack source directory
        #[arg(long, env = "PACK_ROOT", default_value = ".", value_name = "DIR")]
        pack: PathBuf,

        /// Team file to copy
        #[arg(long, value_name = "NAME")]
        copy: Option<String>,

        /// Copy destination, file or directory (default: current directory)
        #[arg(long, value_name = "PATH", requires = "copy")]
        to: Option<PathBuf>,
    },

    /// List the pack's agents and commands
    Agents {
        /// Pack source directory
        #[arg(long, env = "PACK_ROOT", default_value = ".", value_name = "DIR")]
        pack: PathBuf,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    ///
    /// Examples:
    ///   pack completions bash > ~/.local/share/bash-completion/completions/pack
    ///   pack completions zsh > ~/.zfunc/_pack
    ///   pack completions fish > ~/.config/fish/completions/pack.fish
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
