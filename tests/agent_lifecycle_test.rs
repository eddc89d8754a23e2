//! End-to-end agent lifecycle scenarios driven through the `Kernel` facade
//! rather than a single service in isolation, exercising the full hire ->
//! materialize -> notify wiring the inline per-service unit tests don't
//! reach together.

mod common;

use foreman::domain::models::{AgentConfig, Behavior, Communication, Identity, Permissions};
use foreman::infrastructure::fs::AgentPaths;

fn config(id: &str, role: &str, reporting_to: Option<String>, permissions: Permissions) -> AgentConfig {
    AgentConfig {
        identity: Identity { id: id.to_string(), role: role.to_string(), display_name: role.to_string(), reporting_to },
        permissions,
        behavior: Behavior::default(),
        communication: Communication::default(),
        main_goal: "run the org".to_string(),
    }
}

fn hiring_permissions(max_subordinates: u32, hiring_budget: u32) -> Permissions {
    Permissions { can_hire: true, max_subordinates, hiring_budget, ..Permissions::default() }
}

#[tokio::test]
async fn ceo_cto_developer_org_chart_and_hierarchy_materialize_on_disk() {
    let (tmp, kernel) = common::kernel().await;

    let ceo = kernel
        .lifecycle
        .hire_agent(None, config("ceo", "CEO", None, hiring_permissions(5, 5)))
        .await
        .unwrap();
    let cto = kernel
        .lifecycle
        .hire_agent(Some(ceo.id.clone()), config("cto", "CTO", Some(ceo.id.clone()), hiring_permissions(5, 5)))
        .await
        .unwrap();
    let dev = kernel
        .lifecycle
        .hire_agent(Some(cto.id.clone()), config("dev", "Developer", Some(cto.id.clone()), Permissions::default()))
        .await
        .unwrap();

    let mut subordinate_ids: Vec<_> = kernel.agents.get_subordinates(&ceo.id).await.unwrap().into_iter().map(|a| a.id).collect();
    subordinate_ids.sort();
    assert_eq!(subordinate_ids, vec![cto.id.clone(), dev.id.clone()]);

    let org_chart = kernel.agents.get_org_chart().await.unwrap();
    assert_eq!(org_chart.len(), 3);

    // Every agent in the chain got its own materialized directory tree.
    for id in [&ceo.id, &cto.id, &dev.id] {
        let paths = AgentPaths::new(tmp.path(), id);
        assert!(tokio::fs::metadata(paths.config_json()).await.is_ok());
        assert!(tokio::fs::metadata(paths.tasks_active_dir()).await.is_ok());
    }

    // The CEO's subordinate registry lists only its direct report, the CTO.
    let ceo_registry = tokio::fs::read(AgentPaths::new(tmp.path(), &ceo.id).subordinates_registry_json()).await.unwrap();
    let entries: serde_json::Value = serde_json::from_slice(&ceo_registry).unwrap();
    assert_eq!(entries.as_array().unwrap().len(), 1);
    assert_eq!(entries[0]["id"], serde_json::json!("cto"));
}

#[tokio::test]
async fn hiring_budget_exhausts_and_registry_and_metadata_reflect_it() {
    let (tmp, kernel) = common::kernel().await;

    let manager = kernel
        .lifecycle
        .hire_agent(None, config("mgr", "Manager", None, hiring_permissions(2, 2)))
        .await
        .unwrap();

    for i in 0..2 {
        kernel
            .lifecycle
            .hire_agent(
                Some(manager.id.clone()),
                config(&format!("dev-{i}"), "Developer", Some(manager.id.clone()), Permissions::default()),
            )
            .await
            .unwrap();
    }

    let err = kernel
        .lifecycle
        .hire_agent(
            Some(manager.id.clone()),
            config("dev-2", "Developer", Some(manager.id.clone()), Permissions::default()),
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        foreman::services::HireAgentError::Validation(foreman::KernelError::LimitExceeded(_))
    ));

    let registry_bytes = tokio::fs::read(AgentPaths::new(tmp.path(), &manager.id).subordinates_registry_json()).await.unwrap();
    let entries: serde_json::Value = serde_json::from_slice(&registry_bytes).unwrap();
    assert_eq!(entries.as_array().unwrap().len(), 2);

    let metadata_bytes = tokio::fs::read(AgentPaths::new(tmp.path(), &manager.id).metadata_json()).await.unwrap();
    let metadata: serde_json::Value = serde_json::from_slice(&metadata_bytes).unwrap();
    assert_eq!(metadata["hiring_budget_remaining"], serde_json::json!(0));
}

#[tokio::test]
async fn pausing_a_developer_notifies_both_developer_and_manager_inboxes() {
    let (tmp, kernel) = common::kernel().await;

    let manager = kernel
        .lifecycle
        .hire_agent(None, config("mgr", "Manager", None, hiring_permissions(5, 5)))
        .await
        .unwrap();
    let developer = kernel
        .lifecycle
        .hire_agent(
            Some(manager.id.clone()),
            config("dev", "Developer", Some(manager.id.clone()), Permissions::default()),
        )
        .await
        .unwrap();

    let pause = kernel.lifecycle.pause_agent(&developer.id).await.unwrap();
    assert_eq!(pause.notifications_sent, 2, "developer and manager both get a notice");

    let dev_inbox = AgentPaths::new(tmp.path(), &developer.id).inbox_unread_dir();
    let mut dev_messages = tokio::fs::read_dir(&dev_inbox).await.unwrap();
    let dev_file = dev_messages.next_entry().await.unwrap().expect("developer inbox message");
    let dev_body = tokio::fs::read_to_string(dev_file.path()).await.unwrap();
    assert!(dev_body.contains("Paused"));

    let mgr_inbox = AgentPaths::new(tmp.path(), &manager.id).inbox_unread_dir();
    let mut mgr_messages = tokio::fs::read_dir(&mgr_inbox).await.unwrap();
    let mgr_file = mgr_messages.next_entry().await.unwrap().expect("manager inbox message");
    let mgr_body = tokio::fs::read_to_string(mgr_file.path()).await.unwrap();
    assert!(mgr_body.contains("Subordinate Paused"));

    // Pausing again is rejected; status is unchanged.
    let err = kernel.lifecycle.pause_agent(&developer.id).await.unwrap_err();
    assert!(matches!(err, foreman::KernelError::InvalidState { .. }));

    let audit_rows = kernel.audit.for_agent(&developer.id).await.unwrap();
    let pause_rows = audit_rows.iter().filter(|e| matches!(e.action, foreman::domain::models::AuditAction::Pause)).count();
    assert_eq!(pause_rows, 1, "only the successful pause appends a PAUSE row");
}
