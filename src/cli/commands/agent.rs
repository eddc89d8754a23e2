//! `hire` / `pause` / `resume` / `fire` / `org-chart` command handlers.

use anyhow::{Context, Result};

use crate::cli::display::TableFormatter;
use crate::domain::models::{Behavior, Communication, Identity, Permissions};
use crate::services::config_service;
use crate::Kernel;

#[allow(clippy::too_many_arguments)]
pub async fn handle_hire(
    kernel: &Kernel,
    role: String,
    goal: String,
    manager: Option<String>,
    can_hire: bool,
    max_subordinates: u32,
    hiring_budget: u32,
    json: bool,
) -> Result<()> {
    let mut config = config_service::generate_default_config(&role, &goal, None, manager.clone(), None)
        .context("failed to generate default agent config")?;
    config.permissions = Permissions { can_hire, max_subordinates, hiring_budget, ..Permissions::default() };
    config.behavior = Behavior::default();
    config.communication = Communication::default();
    config.identity = Identity {
        id: config.identity.id,
        role,
        display_name: config.identity.display_name,
        reporting_to: manager.clone(),
    };

    let agent = kernel.lifecycle.hire_agent(manager, config).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&agent)?);
    } else {
        println!("Hired agent {} ({}), status={}", agent.id, agent.role, agent.status);
    }
    Ok(())
}

pub async fn handle_pause(kernel: &Kernel, id: String, json: bool) -> Result<()> {
    let result = kernel.lifecycle.pause_agent(&id).await?;
    if json {
        println!(
            "{}",
            serde_json::json!({
                "agentId": result.agent_id,
                "notificationsSent": result.notifications_sent,
                "totalTasks": result.total_tasks,
                "tasksBlocked": result.blocked_count,
                "alreadyBlocked": result.already_blocked,
            })
        );
    } else {
        println!(
            "Paused {}: {} task(s) auto-blocked, {} already blocked, {} notification(s) sent",
            result.agent_id, result.blocked_count, result.already_blocked, result.notifications_sent
        );
    }
    Ok(())
}

pub async fn handle_resume(kernel: &Kernel, id: String, json: bool) -> Result<()> {
    let result = kernel.lifecycle.resume_agent(&id).await?;
    if json {
        println!(
            "{}",
            serde_json::json!({
                "agentId": result.agent_id,
                "notificationsSent": result.notifications_sent,
                "unblockedCount": result.unblocked_count,
            })
        );
    } else {
        println!(
            "Resumed {}: {} task(s) unblocked, {} notification(s) sent",
            result.agent_id, result.unblocked_count, result.notifications_sent
        );
    }
    Ok(())
}

pub async fn handle_fire(kernel: &Kernel, id: String, json: bool) -> Result<()> {
    let agent = kernel.lifecycle.fire_agent(&id).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&agent)?);
    } else {
        println!("Fired agent {}", agent.id);
    }
    Ok(())
}

pub async fn handle_org_chart(kernel: &Kernel, json: bool) -> Result<()> {
    let agents = kernel.agents.get_org_chart().await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&agents)?);
    } else {
        println!("{}", TableFormatter::new().format_org_chart(&agents));
    }
    Ok(())
}
