//! CLI type definitions: clap command structures for the `foreman` binary.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "foreman")]
#[command(about = "Persistent state-keeping and coordination kernel for a hierarchical multi-agent orchestrator")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output machine-readable JSON instead of a table.
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Hire a new agent, optionally reporting to an existing manager.
    Hire {
        /// Role name, e.g. "CTO" or "Backend Engineer".
        #[arg(long)]
        role: String,

        /// The agent's main goal.
        #[arg(long)]
        goal: String,

        /// Manager agent id. Omit to hire a root agent.
        #[arg(long)]
        manager: Option<String>,

        /// Grant this agent permission to hire its own subordinates.
        #[arg(long)]
        can_hire: bool,

        /// Maximum direct subordinates this agent may hire.
        #[arg(long, default_value_t = 0)]
        max_subordinates: u32,

        /// Hiring budget (must be <= max-subordinates).
        #[arg(long, default_value_t = 0)]
        hiring_budget: u32,
    },

    /// Pause an active agent.
    Pause {
        /// Agent id.
        id: String,
    },

    /// Resume a paused agent.
    Resume {
        /// Agent id.
        id: String,
    },

    /// Fire an agent. The agent row is retained with status = fired.
    Fire {
        /// Agent id.
        id: String,
    },

    /// Print the full org chart.
    OrgChart,

    /// Task management commands.
    #[command(subcommand)]
    Task(TaskCommands),

    /// Print the audit log, optionally filtered to one agent.
    Audit {
        /// Restrict to rows where this agent is the actor or the target.
        #[arg(long)]
        agent: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum TaskCommands {
    /// Create a new task.
    Create {
        /// Owning agent id.
        #[arg(long)]
        agent: String,

        /// Task title.
        #[arg(long)]
        title: String,

        /// Parent task id, for a subtask.
        #[arg(long)]
        parent: Option<String>,

        /// Task ids that must complete or archive before this one can run.
        #[arg(long = "blocked-by", value_delimiter = ',')]
        blocked_by: Vec<String>,

        /// Priority: urgent, high, medium (default), or low.
        #[arg(long)]
        priority: Option<String>,
    },

    /// Update a task's status, subject to optimistic-lock version check.
    Update {
        /// Task id.
        id: String,

        /// New status: pending, in-progress, blocked, completed, archived.
        #[arg(long)]
        status: String,

        /// Expected current version.
        #[arg(long)]
        version: u32,
    },

    /// Update a task's progress percentage (clamped to 0..=100).
    Progress {
        /// Task id.
        id: String,

        /// New percent-complete value.
        #[arg(long)]
        percent: i32,

        /// Expected current version.
        #[arg(long)]
        version: u32,
    },

    /// Delegate a task to a transitive subordinate of its owner.
    Delegate {
        /// Task id.
        id: String,

        /// Target agent id; must be a transitive subordinate of the owner.
        #[arg(long)]
        to: String,

        /// Expected current version, if optimistic locking is desired.
        #[arg(long)]
        version: Option<u32>,
    },

    /// List an agent's active (pending/in-progress/blocked) tasks.
    List {
        /// Owning agent id.
        #[arg(long)]
        agent: String,

        /// Restrict the listing to blocked tasks only.
        #[arg(long)]
        blocked_only: bool,
    },
}
