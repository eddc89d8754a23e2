//! Shared fixtures for integration tests.

use std::path::PathBuf;

use foreman::Kernel;
use tempfile::TempDir;

/// A fresh kernel over an in-memory database and a scratch agent-directory
/// tree. The `TempDir` must outlive the kernel or the directory tree
/// disappears out from under it.
pub async fn kernel() -> (TempDir, Kernel) {
    let tmp = tempfile::tempdir().expect("tempdir");
    let kernel = Kernel::bootstrap("sqlite::memory:", PathBuf::from(tmp.path()))
        .await
        .expect("bootstrap kernel");
    (tmp, kernel)
}
