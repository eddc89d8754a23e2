//! `foreman` CLI entry point.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use foreman::cli::commands::{agent, audit, task};
use foreman::cli::{Cli, Commands, TaskCommands};
use foreman::infrastructure::config::ConfigLoader;
use foreman::infrastructure::logging::LoggerImpl;
use foreman::Kernel;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = ConfigLoader::load().context("failed to load kernel configuration")?;
    let _logger = LoggerImpl::init(&config.logging).context("failed to initialize logging")?;

    let kernel = Kernel::bootstrap(&config.database.url, PathBuf::from(&config.base_dir))
        .await
        .context("failed to bootstrap kernel")?;

    match cli.command {
        Commands::Hire { role, goal, manager, can_hire, max_subordinates, hiring_budget } => {
            agent::handle_hire(&kernel, role, goal, manager, can_hire, max_subordinates, hiring_budget, cli.json)
                .await?;
        }
        Commands::Pause { id } => agent::handle_pause(&kernel, id, cli.json).await?,
        Commands::Resume { id } => agent::handle_resume(&kernel, id, cli.json).await?,
        Commands::Fire { id } => agent::handle_fire(&kernel, id, cli.json).await?,
        Commands::OrgChart => agent::handle_org_chart(&kernel, cli.json).await?,
        Commands::Audit { agent: agent_id } => audit::handle_audit(&kernel, agent_id, cli.json).await?,
        Commands::Task(task_cmd) => match task_cmd {
            TaskCommands::Create { agent, title, parent, blocked_by, priority } => {
                task::handle_create(&kernel, agent, title, parent, blocked_by, priority, cli.json).await?;
            }
            TaskCommands::Update { id, status, version } => {
                task::handle_update(&kernel, id, status, version, cli.json).await?;
            }
            TaskCommands::Progress { id, percent, version } => {
                task::handle_progress(&kernel, id, percent, version, cli.json).await?;
            }
            TaskCommands::Delegate { id, to, version } => {
                task::handle_delegate(&kernel, id, to, version, cli.json).await?;
            }
            TaskCommands::List { agent, blocked_only } => {
                task::handle_list(&kernel, agent, blocked_only, cli.json).await?;
            }
        },
    }

    Ok(())
}
