//! Embedded schema for the store (§6).
//!
//! Applied as one raw-SQL batch by `DatabaseConnection::migrate`. This crate
//! has a single schema version and no external migration runner, so a
//! `migrations/*.sql` directory would be ceremony without payoff.

pub const SCHEMA_SQL: &str = r"
CREATE TABLE IF NOT EXISTS agents (
    id                      TEXT PRIMARY KEY,
    role                    TEXT NOT NULL,
    display_name            TEXT NOT NULL,
    created_at              TEXT NOT NULL,
    created_by              TEXT,
    reporting_to            TEXT REFERENCES agents(id),
    status                  TEXT NOT NULL,
    main_goal               TEXT NOT NULL,
    config_path             TEXT NOT NULL,
    last_execution_at       TEXT,
    total_executions        INTEGER NOT NULL DEFAULT 0,
    total_runtime_minutes   INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS org_hierarchy (
    agent_id     TEXT NOT NULL REFERENCES agents(id),
    ancestor_id  TEXT NOT NULL REFERENCES agents(id),
    depth        INTEGER NOT NULL,
    path         TEXT NOT NULL,
    PRIMARY KEY (agent_id, ancestor_id)
);

CREATE INDEX IF NOT EXISTS idx_org_hierarchy_ancestor ON org_hierarchy(ancestor_id);

CREATE TABLE IF NOT EXISTS tasks (
    id                          TEXT PRIMARY KEY,
    agent_id                    TEXT NOT NULL REFERENCES agents(id),
    title                       TEXT NOT NULL,
    status                      TEXT NOT NULL,
    priority                    TEXT NOT NULL,
    created_at                  TEXT NOT NULL,
    started_at                  TEXT,
    completed_at                TEXT,
    blocked_since               TEXT,
    parent_task_id              TEXT REFERENCES tasks(id),
    depth                       INTEGER NOT NULL DEFAULT 0,
    percent_complete            INTEGER NOT NULL DEFAULT 0,
    subtasks_completed          INTEGER NOT NULL DEFAULT 0,
    subtasks_total              INTEGER NOT NULL DEFAULT 0,
    delegated_to                TEXT REFERENCES agents(id),
    delegated_at                TEXT,
    blocked_by                  TEXT NOT NULL DEFAULT '[]',
    task_path                   TEXT NOT NULL DEFAULT '',
    version                     INTEGER NOT NULL DEFAULT 0,
    last_updated                TEXT NOT NULL,
    last_executed                TEXT,
    execution_count              INTEGER NOT NULL DEFAULT 0,
    auto_blocked_by_pause        INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_tasks_agent ON tasks(agent_id);
CREATE INDEX IF NOT EXISTS idx_tasks_parent ON tasks(parent_task_id);
CREATE INDEX IF NOT EXISTS idx_tasks_status ON tasks(status);

CREATE TABLE IF NOT EXISTS schedules (
    id                          TEXT PRIMARY KEY,
    agent_id                    TEXT NOT NULL REFERENCES agents(id),
    trigger_type                TEXT NOT NULL,
    cron_expression             TEXT,
    next_execution_at           TEXT,
    minimum_interval_seconds    INTEGER,
    enabled                     INTEGER NOT NULL DEFAULT 1,
    last_triggered_at           TEXT,
    created_at                  TEXT NOT NULL,
    updated_at                  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_schedules_agent ON schedules(agent_id);

CREATE TABLE IF NOT EXISTS messages (
    id               TEXT PRIMARY KEY,
    from_agent_id    TEXT NOT NULL,
    to_agent_id      TEXT NOT NULL,
    timestamp        TEXT NOT NULL,
    priority         TEXT NOT NULL,
    channel          TEXT NOT NULL,
    read             INTEGER NOT NULL DEFAULT 0,
    action_required  INTEGER NOT NULL DEFAULT 0,
    subject          TEXT,
    thread_id        TEXT,
    in_reply_to      TEXT,
    message_path     TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_messages_to ON messages(to_agent_id);

CREATE TABLE IF NOT EXISTS audit_log (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    timestamp        TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    agent_id         TEXT,
    action           TEXT NOT NULL,
    target_agent_id  TEXT,
    success          INTEGER NOT NULL,
    details          TEXT NOT NULL DEFAULT '{}',
    created_at       TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

CREATE INDEX IF NOT EXISTS idx_audit_log_timestamp ON audit_log(timestamp);
CREATE INDEX IF NOT EXISTS idx_audit_log_agent ON audit_log(agent_id);
CREATE INDEX IF NOT EXISTS idx_audit_log_action ON audit_log(action);

CREATE TRIGGER IF NOT EXISTS audit_log_immutable_update
BEFORE UPDATE ON audit_log
BEGIN
    SELECT RAISE(ABORT, 'audit_log rows are append-only: UPDATE is forbidden');
END;

CREATE TRIGGER IF NOT EXISTS audit_log_immutable_delete
BEFORE DELETE ON audit_log
BEGIN
    SELECT RAISE(ABORT, 'audit_log rows are append-only: DELETE is forbidden');
END;
";
