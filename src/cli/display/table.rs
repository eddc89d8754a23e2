//! Table output formatting for CLI commands: UTF8 preset, color-coded
//! status cells, `NO_COLOR`/`TERM=dumb` awareness.

use std::env;

use comfy_table::{presets, Attribute, Cell, Color, ContentArrangement, Table};

use crate::domain::models::{Agent, AgentStatus, AuditEvent, Task, TaskStatus};

pub struct TableFormatter {
    use_colors: bool,
}

impl TableFormatter {
    pub fn new() -> Self {
        Self { use_colors: supports_color() }
    }

    fn base_table(&self) -> Table {
        let mut table = Table::new();
        table.load_preset(presets::UTF8_FULL).set_content_arrangement(ContentArrangement::Dynamic);
        table
    }

    pub fn format_org_chart(&self, agents: &[Agent]) -> String {
        let mut table = self.base_table();
        table.set_header(vec![
            Cell::new("ID").add_attribute(Attribute::Bold),
            Cell::new("Role").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
            Cell::new("Reports To").add_attribute(Attribute::Bold),
            Cell::new("Goal").add_attribute(Attribute::Bold),
        ]);
        for agent in agents {
            let status_cell = if self.use_colors {
                Cell::new(agent.status.as_str()).fg(agent_status_color(agent.status))
            } else {
                Cell::new(agent.status.as_str())
            };
            table.add_row(vec![
                Cell::new(&agent.id),
                Cell::new(&agent.role),
                status_cell,
                Cell::new(agent.reporting_to.as_deref().unwrap_or("-")),
                Cell::new(truncate(&agent.main_goal, 40)),
            ]);
        }
        table.to_string()
    }

    pub fn format_tasks(&self, tasks: &[Task]) -> String {
        let mut table = self.base_table();
        table.set_header(vec![
            Cell::new("ID").add_attribute(Attribute::Bold),
            Cell::new("Title").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
            Cell::new("Priority").add_attribute(Attribute::Bold),
            Cell::new("Progress").add_attribute(Attribute::Bold),
            Cell::new("Version").add_attribute(Attribute::Bold),
        ]);
        for task in tasks {
            let status_cell = if self.use_colors {
                Cell::new(task.status.as_str()).fg(task_status_color(task.status))
            } else {
                Cell::new(task.status.as_str())
            };
            table.add_row(vec![
                Cell::new(&task.id),
                Cell::new(truncate(&task.title, 40)),
                status_cell,
                Cell::new(task.priority.as_str()),
                Cell::new(format!("{}%", task.percent_complete)),
                Cell::new(task.version),
            ]);
        }
        table.to_string()
    }

    pub fn format_audit(&self, events: &[AuditEvent]) -> String {
        let mut table = self.base_table();
        table.set_header(vec![
            Cell::new("#").add_attribute(Attribute::Bold),
            Cell::new("Timestamp").add_attribute(Attribute::Bold),
            Cell::new("Actor").add_attribute(Attribute::Bold),
            Cell::new("Action").add_attribute(Attribute::Bold),
            Cell::new("Target").add_attribute(Attribute::Bold),
            Cell::new("Success").add_attribute(Attribute::Bold),
        ]);
        for event in events {
            let success_cell = if self.use_colors {
                Cell::new(event.success).fg(if event.success { Color::Green } else { Color::Red })
            } else {
                Cell::new(event.success)
            };
            table.add_row(vec![
                Cell::new(event.id),
                Cell::new(event.timestamp.to_rfc3339()),
                Cell::new(event.actor_agent_id.as_deref().unwrap_or("-")),
                Cell::new(event.action.as_str()),
                Cell::new(event.target_agent_id.as_deref().unwrap_or("-")),
                success_cell,
            ]);
        }
        table.to_string()
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn supports_color() -> bool {
    if env::var("NO_COLOR").is_ok() {
        return false;
    }
    if let Ok(term) = env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }
    true
}

fn agent_status_color(status: AgentStatus) -> Color {
    match status {
        AgentStatus::Active => Color::Green,
        AgentStatus::Paused => Color::Yellow,
        AgentStatus::Fired => Color::DarkGrey,
    }
}

fn task_status_color(status: TaskStatus) -> Color {
    match status {
        TaskStatus::Pending => Color::Grey,
        TaskStatus::InProgress => Color::Cyan,
        TaskStatus::Blocked => Color::Red,
        TaskStatus::Completed => Color::Green,
        TaskStatus::Archived => Color::DarkGrey,
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        format!("{}...", s.chars().take(max.saturating_sub(3)).collect::<String>())
    }
}
