//! Agents command implementation

use std::path::Path;

use colored::Colorize;
use serde::Serialize;

use crate::context;
use crate::error::Result;

#[derive(Serialize)]
struct AgentJson<'a> {
    id: &'a str,
    invocation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
}

#[derive(Serialize)]
struct AgentsJson<'a> {
    pack: &'a str,
    version: &'a str,
    agents: Vec<AgentJson<'a>>,
    commands: Vec<String>,
}

/// Run the agents command
pub fn run_agents(pack: &Path, json: bool) -> Result<()> {
    let descriptor = context::pack_only(pack).load_descriptor()?;

    if json {
        let out = AgentsJson {
            pack: descriptor.id(),
            version: &descriptor.version,
            agents: descriptor
                .agents
                .iter()
                .map(|agent| AgentJson {
                    id: agent.id(),
                    invocation: format!("*{}", agent.id()),
                    description: agent.description(),
                })
                .collect(),
            commands: descriptor.slash_commands(),
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!(
        "{} {}",
        descriptor.title().bold(),
        descriptor.version.dimmed()
    );
    println!();
    println!("{}:", "Agents".bold());
    if descriptor.agents.is_empty() {
        println!("  {}", "None".dimmed());
    }
    for agent in &descriptor.agents {
        match agent.description() {
            Some(description) => {
                println!("  {} {}", format!("*{}", agent.id()).cyan(), description)
            }
            None => println!("  {}", format!("*{}", agent.id()).cyan()),
        }
    }

    let commands = descriptor.slash_commands();
    if !commands.is_empty() {
        println!();
        println!("{}:", "Commands".bold());
        for command in commands {
            println!("  {}", command.cyan());
        }
    }
    Ok(())
}
