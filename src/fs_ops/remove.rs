//! Recursive, forced removal of one path.

use std::io;
use std::path::Path;
use tokio::fs;
use tracing::trace;

use super::Remove;

/// `rm -rf` for a single path: directories recursively, anything else
/// (including symlinks) unlinked. A path that is already gone is success.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsRemover;

impl Remove for FsRemover {
    async fn remove(&self, path: &Path) -> io::Result<()> {
        let meta = match fs::symlink_metadata(path).await {
            Ok(m) => m,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e),
        };
        let res = if meta.is_dir() {
            fs::remove_dir_all(path).await
        } else {
            fs::remove_file(path).await
        };
        match res {
            Ok(()) => {
                trace!(path = %path.display(), "removed");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}
