//! Atomic file I/O (§4.3): temp-file + rename writes, backup-on-overwrite,
//! and corruption recovery by backup restoration.

use std::path::{Path, PathBuf};

use rand::Rng;
use tracing::warn;

use crate::domain::errors::{KernelError, KernelResult};

/// Write `bytes` to `path` via a same-directory temp file + rename, so a
/// reader never observes a partial file. Leaves no temp file behind on
/// success; removes it on failure.
pub async fn atomic_write(path: &Path, bytes: &[u8], create_dirs: bool, mode: u32) -> KernelResult<()> {
    let dir = path
        .parent()
        .ok_or_else(|| KernelError::WriteFailed(format!("{} has no parent directory", path.display())))?;

    if create_dirs {
        tokio::fs::create_dir_all(dir).await?;
    }

    let suffix: String = {
        let mut rng = rand::thread_rng();
        (0..8).map(|_| rng.sample(rand::distributions::Alphanumeric) as char).collect()
    };
    let tmp_path = path.with_extension(format!(
        "tmp.{suffix}.{}",
        path.extension().and_then(|e| e.to_str()).unwrap_or("tmp")
    ));

    let write_result = async {
        tokio::fs::write(&tmp_path, bytes).await?;
        let file = tokio::fs::File::open(&tmp_path).await?;
        file.sync_all().await?;
        set_mode(&tmp_path, mode).await?;
        tokio::fs::rename(&tmp_path, path).await?;
        Ok::<(), std::io::Error>(())
    }
    .await;

    if let Err(e) = write_result {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        return Err(KernelError::WriteFailed(format!("{}: {e}", path.display())));
    }

    Ok(())
}

#[cfg(unix)]
async fn set_mode(path: &Path, mode: u32) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let perms = std::fs::Permissions::from_mode(mode);
    tokio::fs::set_permissions(path, perms).await
}

#[cfg(not(unix))]
async fn set_mode(_path: &Path, _mode: u32) -> std::io::Result<()> {
    Ok(())
}

/// Copy `path` to a timestamped sibling before an overwrite. Best-effort:
/// failure is logged as a warning, never propagated.
pub async fn create_backup(path: &Path) -> Option<PathBuf> {
    if tokio::fs::metadata(path).await.is_err() {
        return None;
    }

    let backup_path = backup_path_for(path, chrono::Utc::now());
    match tokio::fs::copy(path, &backup_path).await {
        Ok(_) => Some(backup_path),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to create backup before overwrite");
            None
        }
    }
}

fn backup_path_for(path: &Path, at: chrono::DateTime<chrono::Utc>) -> PathBuf {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("file");
    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("json");
    let stamp = at.format("%Y-%m-%dT%H-%M-%S%.3fZ");
    dir.join(format!("{stem}.{stamp}.{ext}"))
}

/// Read `path`; if missing, `NotFound`. If `validator` rejects the content,
/// look for the most recent backup matching `basename.<ts>.ext` and
/// substitute it — re-validating. If no backup passes, `Corrupted`.
pub async fn safe_load(
    path: &Path,
    validator: impl Fn(&[u8]) -> bool,
) -> KernelResult<Vec<u8>> {
    let content = tokio::fs::read(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            KernelError::NotFound {
                entity: "file",
                id: path.display().to_string(),
            }
        } else {
            KernelError::Io(e)
        }
    })?;

    if validator(&content) {
        return Ok(content);
    }

    for candidate in latest_backups_first(path).await {
        if let Ok(backup_content) = tokio::fs::read(&candidate).await {
            if validator(&backup_content) {
                return Ok(backup_content);
            }
        }
    }

    Err(KernelError::Corrupted(path.display().to_string()))
}

/// Sibling backups of `path`, newest timestamp first. Backup file names are
/// `basename.<ISO8601>.ext`, which sort lexically in timestamp order.
async fn latest_backups_first(path: &Path) -> Vec<PathBuf> {
    let dir = match path.parent() {
        Some(d) => d,
        None => return Vec::new(),
    };
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("");

    let Ok(mut entries) = tokio::fs::read_dir(dir).await else {
        return Vec::new();
    };

    let mut candidates = Vec::new();
    while let Ok(Some(entry)) = entries.next_entry().await {
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        let prefix = format!("{stem}.");
        let suffix = format!(".{ext}");
        if name.starts_with(&prefix) && name.ends_with(&suffix) && name.len() > prefix.len() + suffix.len() {
            candidates.push(entry.path());
        }
    }
    candidates.sort_by(|a, b| b.file_name().cmp(&a.file_name()));
    candidates
}
