//! Argument parsing for the ambient CLI shell, exercised directly through
//! `Cli::try_parse_from` against the exported clap types rather than by
//! spawning the compiled binary.

use foreman::cli::{Cli, Commands, TaskCommands};

#[test]
fn help_and_version_exit_early() {
    assert!(Cli::try_parse_from(["foreman", "--help"]).is_err());
    assert!(Cli::try_parse_from(["foreman", "--version"]).is_err());
}

#[test]
fn json_flag_is_global() {
    let cli = Cli::try_parse_from(["foreman", "--json", "org-chart"]).unwrap();
    assert!(cli.json);

    let cli = Cli::try_parse_from(["foreman", "org-chart", "--json"]).unwrap();
    assert!(cli.json);
}

#[test]
fn hire_requires_role_and_goal() {
    let cli = Cli::try_parse_from([
        "foreman",
        "hire",
        "--role",
        "CTO",
        "--goal",
        "ship the platform",
        "--manager",
        "ceo",
        "--can-hire",
        "--max-subordinates",
        "5",
        "--hiring-budget",
        "5",
    ])
    .unwrap();

    match cli.command {
        Commands::Hire { role, goal, manager, can_hire, max_subordinates, hiring_budget } => {
            assert_eq!(role, "CTO");
            assert_eq!(goal, "ship the platform");
            assert_eq!(manager, Some("ceo".to_string()));
            assert!(can_hire);
            assert_eq!(max_subordinates, 5);
            assert_eq!(hiring_budget, 5);
        }
        _ => panic!("expected Commands::Hire"),
    }

    assert!(Cli::try_parse_from(["foreman", "hire", "--role", "CTO"]).is_err());
}

#[test]
fn hire_defaults_omit_manager_and_hiring_permissions() {
    let cli = Cli::try_parse_from(["foreman", "hire", "--role", "Developer", "--goal", "ship"]).unwrap();

    match cli.command {
        Commands::Hire { manager, can_hire, max_subordinates, hiring_budget, .. } => {
            assert_eq!(manager, None);
            assert!(!can_hire);
            assert_eq!(max_subordinates, 0);
            assert_eq!(hiring_budget, 0);
        }
        _ => panic!("expected Commands::Hire"),
    }
}

#[test]
fn pause_resume_fire_take_a_bare_agent_id() {
    let cli = Cli::try_parse_from(["foreman", "pause", "agent-1"]).unwrap();
    assert!(matches!(cli.command, Commands::Pause { id } if id == "agent-1"));

    let cli = Cli::try_parse_from(["foreman", "resume", "agent-1"]).unwrap();
    assert!(matches!(cli.command, Commands::Resume { id } if id == "agent-1"));

    let cli = Cli::try_parse_from(["foreman", "fire", "agent-1"]).unwrap();
    assert!(matches!(cli.command, Commands::Fire { id } if id == "agent-1"));
}

#[test]
fn audit_agent_filter_is_optional() {
    let cli = Cli::try_parse_from(["foreman", "audit"]).unwrap();
    assert!(matches!(cli.command, Commands::Audit { agent: None }));

    let cli = Cli::try_parse_from(["foreman", "audit", "--agent", "agent-1"]).unwrap();
    assert!(matches!(cli.command, Commands::Audit { agent: Some(a) } if a == "agent-1"));
}

#[test]
fn task_create_parses_comma_delimited_blockers() {
    let cli = Cli::try_parse_from([
        "foreman",
        "task",
        "create",
        "--agent",
        "agent-1",
        "--title",
        "ship it",
        "--parent",
        "task-1-root",
        "--blocked-by",
        "task-1-a,task-1-b",
        "--priority",
        "high",
    ])
    .unwrap();

    match cli.command {
        Commands::Task(TaskCommands::Create { agent, title, parent, blocked_by, priority }) => {
            assert_eq!(agent, "agent-1");
            assert_eq!(title, "ship it");
            assert_eq!(parent, Some("task-1-root".to_string()));
            assert_eq!(blocked_by, vec!["task-1-a".to_string(), "task-1-b".to_string()]);
            assert_eq!(priority, Some("high".to_string()));
        }
        _ => panic!("expected Commands::Task(TaskCommands::Create)"),
    }
}

#[test]
fn task_create_defaults_to_no_parent_no_blockers_no_priority() {
    let cli = Cli::try_parse_from(["foreman", "task", "create", "--agent", "agent-1", "--title", "ship it"]).unwrap();

    match cli.command {
        Commands::Task(TaskCommands::Create { parent, blocked_by, priority, .. }) => {
            assert_eq!(parent, None);
            assert!(blocked_by.is_empty());
            assert_eq!(priority, None);
        }
        _ => panic!("expected Commands::Task(TaskCommands::Create)"),
    }
}

#[test]
fn task_update_requires_status_and_version() {
    let cli = Cli::try_parse_from(["foreman", "task", "update", "task-1-a", "--status", "completed", "--version", "2"]).unwrap();

    match cli.command {
        Commands::Task(TaskCommands::Update { id, status, version }) => {
            assert_eq!(id, "task-1-a");
            assert_eq!(status, "completed");
            assert_eq!(version, 2);
        }
        _ => panic!("expected Commands::Task(TaskCommands::Update)"),
    }

    assert!(Cli::try_parse_from(["foreman", "task", "update", "task-1-a", "--status", "completed"]).is_err());
}

#[test]
fn task_delegate_version_is_optional() {
    let cli = Cli::try_parse_from(["foreman", "task", "delegate", "task-1-a", "--to", "agent-2"]).unwrap();
    match cli.command {
        Commands::Task(TaskCommands::Delegate { id, to, version }) => {
            assert_eq!(id, "task-1-a");
            assert_eq!(to, "agent-2");
            assert_eq!(version, None);
        }
        _ => panic!("expected Commands::Task(TaskCommands::Delegate)"),
    }
}

#[test]
fn task_list_blocked_only_defaults_false() {
    let cli = Cli::try_parse_from(["foreman", "task", "list", "--agent", "agent-1"]).unwrap();
    match cli.command {
        Commands::Task(TaskCommands::List { agent, blocked_only }) => {
            assert_eq!(agent, "agent-1");
            assert!(!blocked_only);
        }
        _ => panic!("expected Commands::Task(TaskCommands::List)"),
    }

    let cli = Cli::try_parse_from(["foreman", "task", "list", "--agent", "agent-1", "--blocked-only"]).unwrap();
    assert!(matches!(cli.command, Commands::Task(TaskCommands::List { blocked_only: true, .. })));
}

#[test]
fn invalid_top_level_command_is_rejected() {
    assert!(Cli::try_parse_from(["foreman", "not-a-command"]).is_err());
}

#[test]
fn missing_required_argument_is_rejected() {
    assert!(Cli::try_parse_from(["foreman", "task", "create", "--agent", "agent-1"]).is_err());
}
