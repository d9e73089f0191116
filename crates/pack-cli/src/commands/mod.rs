//! Command implementations for pack-cli

pub mod agents;
pub mod install;
pub mod status;
pub mod team_files;
pub mod validate;

pub use agents::run_agents;
pub use install::run_install;
pub use status::run_status;
pub use team_files::run_team_files;
pub use validate::run_validate;
