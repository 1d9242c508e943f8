//! Filesystem collaborators of the move orchestrator.
//!
//! Each concern sits behind a small trait so the orchestrator can be driven by
//! scripted implementations in tests:
//! - [`Rename`]: relocate the whole batch by rename, all-or-nothing.
//! - [`CopyEngine`]: copy the batch in the background, reporting [`CopyEvent`]s.
//! - [`Remove`]: recursive, forced delete of one path.

mod copy;
mod helpers;
mod remove;
mod rename;

use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

use crate::control::CopyControl;
use crate::events::CopyEvent;

pub use copy::{CopyOptions, FsCopyEngine};
pub use helpers::{describe_io_error, io_hint, is_cross_device};
pub use remove::FsRemover;
pub use rename::FsRename;

/// Atomic relocation of a batch.
pub trait Rename: Send + Sync + 'static {
    /// Succeeds only if every entry was renamed.
    fn attempt(
        &self,
        from: &Path,
        to: &Path,
        names: &[String],
    ) -> impl Future<Output = io::Result<()>> + Send;
}

/// What a copy engine is asked to copy.
#[derive(Debug, Clone)]
pub struct CopyJob {
    pub from: PathBuf,
    pub to: PathBuf,
    pub names: Vec<String>,
}

/// Background copier. `start` must return without blocking; the work runs on
/// the current Tokio runtime and reports through the returned channel, ending
/// with [`CopyEvent::End`] unless aborted.
pub trait CopyEngine: Send + Sync + 'static {
    fn start(&self, job: CopyJob, control: CopyControl) -> mpsc::UnboundedReceiver<CopyEvent>;
}

/// Recursive, forced removal. A missing path counts as removed.
pub trait Remove: Send + Sync + 'static {
    fn remove(&self, path: &Path) -> impl Future<Output = io::Result<()>> + Send;
}
