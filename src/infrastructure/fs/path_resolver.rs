//! Deterministic on-disk layout for an agent's directory (§4.2, §6).
//!
//! The resolver is pure path arithmetic — it never creates directories.
//! Callers that need the tree to exist opt in explicitly via
//! `atomic_io::atomic_write`'s `create_dirs` flag.

use std::path::{Path, PathBuf};

/// Every path under `<base>/agents/<agentId>/` that the kernel writes to or
/// reads from.
#[derive(Debug, Clone)]
pub struct AgentPaths {
    pub root: PathBuf,
}

impl AgentPaths {
    pub fn new(base_dir: &Path, agent_id: &str) -> Self {
        Self {
            root: base_dir.join("agents").join(agent_id),
        }
    }

    pub fn config_json(&self) -> PathBuf {
        self.root.join("config.json")
    }

    pub fn schedule_json(&self) -> PathBuf {
        self.root.join("schedule.json")
    }

    pub fn metadata_json(&self) -> PathBuf {
        self.root.join("metadata.json")
    }

    pub fn subordinates_registry_json(&self) -> PathBuf {
        self.root.join("subordinates").join("registry.json")
    }

    pub fn tasks_active_dir(&self) -> PathBuf {
        self.root.join("tasks").join("active")
    }

    pub fn tasks_completed_dir(&self) -> PathBuf {
        self.root.join("tasks").join("completed")
    }

    pub fn tasks_archive_dir(&self) -> PathBuf {
        self.root.join("tasks").join("archive")
    }

    pub fn inbox_unread_dir(&self) -> PathBuf {
        self.root.join("inbox").join("unread")
    }

    pub fn inbox_read_dir(&self) -> PathBuf {
        self.root.join("inbox").join("read")
    }

    pub fn outbox_pending_dir(&self) -> PathBuf {
        self.root.join("outbox").join("pending")
    }

    pub fn outbox_sent_dir(&self) -> PathBuf {
        self.root.join("outbox").join("sent")
    }

    pub fn workspace_notes_dir(&self) -> PathBuf {
        self.root.join("workspace").join("notes")
    }

    pub fn workspace_research_dir(&self) -> PathBuf {
        self.root.join("workspace").join("research")
    }

    pub fn workspace_drafts_dir(&self) -> PathBuf {
        self.root.join("workspace").join("drafts")
    }

    pub fn workspace_cache_dir(&self) -> PathBuf {
        self.root.join("workspace").join("cache")
    }

    pub fn readme(&self) -> PathBuf {
        self.root.join("README.md")
    }

    /// All directories the hire workflow must create, in the order §4.8.1
    /// lists them.
    pub fn all_dirs(&self) -> Vec<PathBuf> {
        vec![
            self.tasks_active_dir(),
            self.tasks_completed_dir(),
            self.tasks_archive_dir(),
            self.inbox_unread_dir(),
            self.inbox_read_dir(),
            self.outbox_pending_dir(),
            self.outbox_sent_dir(),
            self.workspace_notes_dir(),
            self.workspace_research_dir(),
            self.workspace_drafts_dir(),
            self.workspace_cache_dir(),
            self.subordinates_registry_json()
                .parent()
                .expect("subordinates path has a parent")
                .to_path_buf(),
        ]
    }
}

/// Message file path for a given recipient, read flag, and message id.
pub fn message_path(base_dir: &Path, agent_id: &str, msg_id: &str, read: bool) -> PathBuf {
    let paths = AgentPaths::new(base_dir, agent_id);
    let dir = if read {
        paths.inbox_read_dir()
    } else {
        paths.inbox_unread_dir()
    };
    dir.join(format!("{msg_id}.md"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_matches_spec() {
        let base = Path::new("/data");
        let paths = AgentPaths::new(base, "cto-1");
        assert_eq!(paths.root, Path::new("/data/agents/cto-1"));
        assert_eq!(
            paths.config_json(),
            Path::new("/data/agents/cto-1/config.json")
        );
        assert_eq!(
            paths.inbox_unread_dir(),
            Path::new("/data/agents/cto-1/inbox/unread")
        );
        assert_eq!(
            paths.subordinates_registry_json(),
            Path::new("/data/agents/cto-1/subordinates/registry.json")
        );
    }
}
