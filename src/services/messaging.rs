//! Message id generation, frontmatter formatting, and inbox delivery
//! (§4.9, §6).

use std::path::Path;

use rand::Rng;
use tracing::warn;

use crate::domain::errors::{KernelError, KernelResult};
use crate::domain::models::Message;
use crate::infrastructure::fs::{atomic_io, AgentPaths};

/// `msg-<unix-ms>-<6 lowercase alphanumerics>`.
pub fn generate_message_id() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: String = {
        let mut rng = rand::thread_rng();
        (0..6)
            .map(|_| {
                const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
                ALPHABET[rng.gen_range(0..ALPHABET.len())] as char
            })
            .collect()
    };
    format!("msg-{millis}-{suffix}")
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\\\""))
}

/// Render a message as a YAML-like frontmatter block followed by its body.
pub fn format_message_file(msg: &Message) -> String {
    let mut lines = vec!["---".to_string()];
    lines.push(format!("id: {}", quote(&msg.id)));
    lines.push(format!("from: {}", quote(&msg.from)));
    lines.push(format!("to: {}", quote(&msg.to)));
    lines.push(format!("timestamp: {}", quote(&msg.timestamp.to_rfc3339())));
    lines.push(format!("priority: {}", quote(msg.priority.as_str())));
    lines.push(format!("channel: {}", quote(msg.channel.as_str())));
    lines.push(format!("read: {}", msg.read));
    lines.push(format!("actionRequired: {}", msg.action_required));
    if let Some(subject) = &msg.subject {
        lines.push(format!("subject: {}", quote(subject)));
    }
    if let Some(thread_id) = &msg.thread_id {
        lines.push(format!("threadId: {}", quote(thread_id)));
    }
    if let Some(in_reply_to) = &msg.in_reply_to {
        lines.push(format!("inReplyTo: {}", quote(in_reply_to)));
    }
    lines.push("---".to_string());

    format!("{}\n\n\n{}", lines.join("\n"), msg.body)
}

/// Write `msg` atomically into `agent_id`'s inbox (unread or read, per
/// `msg.read`) under `base_dir`. If `require_agent_dir`, the agent's root
/// directory must already exist.
pub async fn write_message_to_inbox(
    base_dir: &Path,
    agent_id: &str,
    msg: &Message,
    require_agent_dir: bool,
) -> KernelResult<std::path::PathBuf> {
    let paths = AgentPaths::new(base_dir, agent_id);

    if require_agent_dir && tokio::fs::metadata(&paths.root).await.is_err() {
        return Err(KernelError::NotFound {
            entity: "agent directory",
            id: paths.root.display().to_string(),
        });
    }

    let dir = if msg.read {
        paths.inbox_read_dir()
    } else {
        paths.inbox_unread_dir()
    };
    let path = dir.join(format!("{}.md", msg.id));
    let content = format_message_file(msg);
    atomic_io::atomic_write(&path, content.as_bytes(), true, 0o644).await?;
    Ok(path)
}

/// Write every `(agent_id, message)` pair concurrently. Partial failures are
/// collected, logged as warnings, and excluded from the returned paths —
/// the caller never has to decide whether one failed delivery should abort
/// the rest of the batch.
pub async fn write_messages_in_batch(
    base_dir: &Path,
    batch: Vec<(String, Message)>,
) -> Vec<std::path::PathBuf> {
    let writes = batch.into_iter().map(|(agent_id, msg)| async move {
        let result = write_message_to_inbox(base_dir, &agent_id, &msg, false).await;
        (agent_id, msg.id, result)
    });

    let results = futures::future::join_all(writes).await;

    let mut written = Vec::new();
    for (agent_id, msg_id, result) in results {
        match result {
            Ok(path) => written.push(path),
            Err(e) => warn!(agent_id, msg_id, error = %e, "failed to write message in batch"),
        }
    }
    written
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{MessageChannel, MessagePriority};

    #[test]
    fn ids_are_distinct_across_calls() {
        let a = generate_message_id();
        let b = generate_message_id();
        assert_ne!(a, b);
        assert!(a.starts_with("msg-"));
    }

    #[test]
    fn frontmatter_escapes_embedded_quotes_and_separates_body() {
        let msg = Message::new(
            "msg-1",
            "cto-1",
            "ceo-1",
            MessagePriority::High,
            MessageChannel::Internal,
            Some(r#"Status: "blocked""#.to_string()),
            None,
            None,
            "body text",
        );
        let rendered = format_message_file(&msg);
        assert!(rendered.contains(r#"subject: "Status: \"blocked\"""#));
        assert!(rendered.contains("read: false"));
        assert!(rendered.ends_with("body text"));
        assert!(rendered.contains("---\n\n\nbody text"));
    }

    #[tokio::test]
    async fn writes_to_unread_or_read_based_on_flag() {
        let dir = tempfile::tempdir().unwrap();
        let mut msg = Message::new(
            "msg-2",
            "cto-1",
            "ceo-1",
            MessagePriority::Normal,
            MessageChannel::Internal,
            None,
            None,
            None,
            "hi",
        );

        let unread_path = write_message_to_inbox(dir.path(), "ceo-1", &msg, false)
            .await
            .unwrap();
        assert!(unread_path.to_string_lossy().contains("inbox/unread"));

        msg.read = true;
        let read_path = write_message_to_inbox(dir.path(), "ceo-1", &msg, false)
            .await
            .unwrap();
        assert!(read_path.to_string_lossy().contains("inbox/read"));
    }

    #[tokio::test]
    async fn require_agent_dir_rejects_missing_agent() {
        let dir = tempfile::tempdir().unwrap();
        let msg = Message::new(
            "msg-3", "cto-1", "ceo-1", MessagePriority::Low, MessageChannel::Internal, None, None, None, "hi",
        );
        let err = write_message_to_inbox(dir.path(), "ceo-1", &msg, true).await.unwrap_err();
        assert!(matches!(err, KernelError::NotFound { .. }));
    }
}
