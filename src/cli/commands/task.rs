//! `task create/update/progress/delegate/list` command handlers.

use anyhow::{anyhow, Result};

use crate::cli::display::TableFormatter;
use crate::domain::models::{NewTask, TaskPriority, TaskStatus};
use crate::Kernel;

#[allow(clippy::too_many_arguments)]
pub async fn handle_create(
    kernel: &Kernel,
    agent: String,
    title: String,
    parent: Option<String>,
    blocked_by: Vec<String>,
    priority: Option<String>,
    json: bool,
) -> Result<()> {
    let priority = priority
        .map(|p| TaskPriority::from_str(&p).ok_or_else(|| anyhow!("unknown priority: {p}")))
        .transpose()?;

    let task = kernel
        .tasks
        .create_task(NewTask {
            id: None,
            agent_id: agent,
            title,
            priority,
            parent_task_id: parent,
            delegated_to: None,
            task_path: None,
            blocked_by,
        })
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&task)?);
    } else {
        println!("Created task {} (status={})", task.id, task.status);
    }
    Ok(())
}

pub async fn handle_update(kernel: &Kernel, id: String, status: String, version: u32, json: bool) -> Result<()> {
    let status = TaskStatus::from_str(&status).ok_or_else(|| anyhow!("unknown status: {status}"))?;
    let task = kernel.tasks.update_status(&id, status, version).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&task)?);
    } else {
        println!("Task {} is now {} (version={})", task.id, task.status, task.version);
    }
    Ok(())
}

pub async fn handle_progress(kernel: &Kernel, id: String, percent: i32, version: u32, json: bool) -> Result<()> {
    let task = kernel.tasks.update_progress(&id, percent, version).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&task)?);
    } else {
        println!("Task {} is now {}% complete (version={})", task.id, task.percent_complete, task.version);
    }
    Ok(())
}

pub async fn handle_delegate(kernel: &Kernel, id: String, to: String, version: Option<u32>, json: bool) -> Result<()> {
    let task = kernel.tasks.delegate_task(&id, &to, version).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&task)?);
    } else {
        println!("Task {} delegated to {}", task.id, to);
    }
    Ok(())
}

pub async fn handle_list(kernel: &Kernel, agent: String, blocked_only: bool, json: bool) -> Result<()> {
    let tasks = if blocked_only {
        kernel.tasks.blocked_tasks(&agent).await?
    } else {
        kernel.tasks.active_tasks(&agent).await?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&tasks)?);
    } else {
        println!("{}", TableFormatter::new().format_tasks(&tasks));
    }
    Ok(())
}
