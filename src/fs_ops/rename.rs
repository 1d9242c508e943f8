//! Batch rename: every entry moves, or none does.

use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

use super::Rename;
use super::helpers::{describe_io_error, is_cross_device};

/// Renames `from/<name>` to `to/<name>` for each name, in order.
///
/// On failure, entries already renamed are moved back (best-effort) before the
/// error is returned, so the caller's fallback sees the batch untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsRename;

impl Rename for FsRename {
    async fn attempt(&self, from: &Path, to: &Path, names: &[String]) -> io::Result<()> {
        let mut done: Vec<(PathBuf, PathBuf)> = Vec::with_capacity(names.len());
        for name in names {
            let src = from.join(name);
            let dst = to.join(name);
            match fs::rename(&src, &dst).await {
                Ok(()) => {
                    debug!(src = %src.display(), dst = %dst.display(), "renamed");
                    done.push((src, dst));
                }
                Err(e) => {
                    if is_cross_device(&e) {
                        debug!(src = %src.display(), "rename crosses filesystems");
                    } else {
                        debug!(error = %describe_io_error("rename", &src, &e), "rename failed");
                    }
                    rollback(done).await;
                    return Err(e);
                }
            }
        }
        Ok(())
    }
}

async fn rollback(done: Vec<(PathBuf, PathBuf)>) {
    for (src, dst) in done.into_iter().rev() {
        if let Err(e) = fs::rename(&dst, &src).await {
            warn!(
                error = %describe_io_error("restore renamed entry", &dst, &e),
                "could not undo partial rename"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn renames_every_name() {
        let td = tempdir().unwrap();
        let from = td.path().join("b");
        let to = td.path().join("a");
        std::fs::create_dir_all(from.join("dir")).unwrap();
        std::fs::create_dir_all(&to).unwrap();
        std::fs::write(from.join("README"), b"readme").unwrap();

        let names = vec!["README".to_string(), "dir".to_string()];
        FsRename.attempt(&from, &to, &names).await.unwrap();

        assert!(to.join("README").is_file());
        assert!(to.join("dir").is_dir());
        assert!(!from.join("README").exists());
    }

    #[tokio::test]
    async fn failure_restores_earlier_entries() {
        let td = tempdir().unwrap();
        let from = td.path().join("b");
        let to = td.path().join("a");
        std::fs::create_dir_all(&from).unwrap();
        std::fs::create_dir_all(&to).unwrap();
        std::fs::write(from.join("README"), b"readme").unwrap();

        let names = vec!["README".to_string(), "missing".to_string()];
        let err = FsRename.attempt(&from, &to, &names).await.unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(from.join("README").is_file(), "first entry should be restored");
        assert!(!to.join("README").exists());
    }
}
