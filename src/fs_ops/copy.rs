//! Pausable background copy of a batch of entries.
//!
//! The batch is planned up front with a blocking `walkdir` pass (pre-order,
//! symlinks not followed) so progress can be reported as a share of entries.
//! Copying then runs on the async runtime one entry at a time, checking the
//! control state between entries.
//!
//! Failure handling: a failed entry is recorded in the outcome, reported as
//! `CopyEvent::Error`, and the engine pauses itself there. Resuming skips the
//! failed entry; aborting stops without an `End` event.

use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::mpsc;
use tracing::{debug, trace, warn};
use walkdir::WalkDir;

use super::helpers::describe_io_error;
use super::{CopyEngine, CopyJob};
use crate::control::{Checkpoint, ControlWatcher, CopyControl};
use crate::errors::MoveError;
use crate::events::{CopyEvent, CopyFailure, CopyOutcome};

#[derive(Debug, Clone, Copy, Default)]
pub struct CopyOptions {
    /// Carry access/modification times over to copied files.
    pub preserve_metadata: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FsCopyEngine {
    options: CopyOptions,
}

impl FsCopyEngine {
    pub fn new(options: CopyOptions) -> Self {
        Self { options }
    }
}

impl CopyEngine for FsCopyEngine {
    fn start(&self, job: CopyJob, control: CopyControl) -> mpsc::UnboundedReceiver<CopyEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run(job, control, self.options, tx));
        rx
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    Dir,
    File,
    Symlink,
}

#[derive(Debug)]
struct PlanEntry {
    src: PathBuf,
    dst: PathBuf,
    kind: EntryKind,
}

/// An entry that could not be planned or copied.
#[derive(Debug)]
struct EntryError {
    op: &'static str,
    path: PathBuf,
    source: io::Error,
}

type Plan = Vec<Result<PlanEntry, EntryError>>;

fn plan(job: &CopyJob) -> Plan {
    let mut plan = Vec::new();
    for name in &job.names {
        let root = job.from.join(name);
        for entry in WalkDir::new(&root)
            .follow_links(false)
            .sort_by_file_name()
        {
            match entry {
                Ok(e) => {
                    let rel = e.path().strip_prefix(&job.from).unwrap_or(e.path());
                    let ft = e.file_type();
                    let kind = if ft.is_dir() {
                        EntryKind::Dir
                    } else if ft.is_symlink() {
                        EntryKind::Symlink
                    } else {
                        EntryKind::File
                    };
                    plan.push(Ok(PlanEntry {
                        src: e.path().to_path_buf(),
                        dst: job.to.join(rel),
                        kind,
                    }));
                }
                Err(e) => {
                    let path = e.path().unwrap_or(root.as_path()).to_path_buf();
                    let source = e
                        .into_io_error()
                        .unwrap_or_else(|| io::Error::other("filesystem loop detected"));
                    plan.push(Err(EntryError {
                        op: "read source tree",
                        path,
                        source,
                    }));
                }
            }
        }
    }
    plan
}

async fn run(
    job: CopyJob,
    control: CopyControl,
    options: CopyOptions,
    tx: mpsc::UnboundedSender<CopyEvent>,
) {
    let mut watcher = control.watcher();
    let from = job.from.clone();
    let plan = match tokio::task::spawn_blocking(move || plan(&job)).await {
        Ok(p) => p,
        Err(e) => vec![Err(EntryError {
            op: "read source tree",
            path: from,
            source: io::Error::other(e),
        })],
    };
    let total = plan.len().max(1);
    debug!(entries = plan.len(), "copy planned");

    let mut outcome = CopyOutcome::default();
    for (i, item) in plan.into_iter().enumerate() {
        if !hold(&mut watcher, &tx).await {
            return;
        }
        let result = match item {
            Ok(entry) => copy_entry(&entry, options).await.map(|()| entry),
            Err(e) => Err(e),
        };
        let event = match result {
            Ok(entry) => {
                trace!(src = %entry.src.display(), dst = %entry.dst.display(), "copied");
                match entry.kind {
                    EntryKind::Dir => CopyEvent::Directory(entry.src),
                    EntryKind::File | EntryKind::Symlink => CopyEvent::File(entry.src),
                }
            }
            Err(EntryError { op, path, source }) => {
                warn!(error = %describe_io_error(op, &path, &source), "copy entry failed");
                outcome.errors.push(CopyFailure::new(&path, &source));
                control.pause();
                CopyEvent::Error(MoveError::Copy { op, path, source })
            }
        };
        let percent = ((i + 1) * 100 / total) as u8;
        if tx.send(event).is_err() || tx.send(CopyEvent::Progress(percent)).is_err() {
            return;
        }
    }

    // A failure on the last entry still holds until the caller decides.
    if !hold(&mut watcher, &tx).await {
        return;
    }
    debug!(errors = outcome.errors.len(), "copy finished");
    let _ = tx.send(CopyEvent::End(outcome));
}

/// Wait out a pause. False when the copy must stop.
async fn hold(watcher: &mut ControlWatcher, tx: &mpsc::UnboundedSender<CopyEvent>) -> bool {
    match watcher.checkpoint().await {
        Checkpoint::Proceed => true,
        Checkpoint::Resumed => tx.send(CopyEvent::Continue).is_ok(),
        Checkpoint::Aborted => {
            debug!("copy aborted");
            false
        }
    }
}

async fn copy_entry(entry: &PlanEntry, options: CopyOptions) -> Result<(), EntryError> {
    let fail = |op: &'static str| {
        move |source: io::Error| EntryError {
            op,
            path: entry.src.clone(),
            source,
        }
    };
    match entry.kind {
        EntryKind::Dir => fs::create_dir_all(&entry.dst)
            .await
            .map_err(fail("create directory")),
        EntryKind::File => {
            ensure_parent(&entry.dst).await.map_err(fail("create directory"))?;
            fs::copy(&entry.src, &entry.dst).await.map_err(fail("copy file"))?;
            if options.preserve_metadata {
                preserve_times(&entry.src, &entry.dst)
                    .await
                    .map_err(fail("preserve timestamps"))?;
            }
            Ok(())
        }
        EntryKind::Symlink => {
            ensure_parent(&entry.dst).await.map_err(fail("create directory"))?;
            copy_symlink(&entry.src, &entry.dst).await.map_err(fail("copy symlink"))
        }
    }
}

async fn ensure_parent(dst: &Path) -> io::Result<()> {
    match dst.parent() {
        Some(parent) => fs::create_dir_all(parent).await,
        None => Ok(()),
    }
}

#[cfg(unix)]
async fn copy_symlink(src: &Path, dst: &Path) -> io::Result<()> {
    let target = fs::read_link(src).await?;
    fs::symlink(target, dst).await
}

#[cfg(not(unix))]
async fn copy_symlink(_src: &Path, _dst: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "symlinks are not copied on this platform",
    ))
}

async fn preserve_times(src: &Path, dst: &Path) -> io::Result<()> {
    let (src, dst) = (src.to_path_buf(), dst.to_path_buf());
    tokio::task::spawn_blocking(move || {
        let meta = std::fs::metadata(&src)?;
        filetime::set_file_times(
            &dst,
            filetime::FileTime::from_last_access_time(&meta),
            filetime::FileTime::from_last_modification_time(&meta),
        )
    })
    .await
    .map_err(io::Error::other)?
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;
    use std::time::Duration;

    fn job(from: &Path, to: &Path, names: &[&str]) -> CopyJob {
        CopyJob {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            names: names.iter().map(|s| s.to_string()).collect(),
        }
    }

    async fn drain(mut rx: mpsc::UnboundedReceiver<CopyEvent>) -> Vec<CopyEvent> {
        let mut out = Vec::new();
        while let Some(ev) = rx.recv().await {
            out.push(ev);
        }
        out
    }

    #[test]
    fn plan_walks_pre_order_relative_to_from() {
        let temp = assert_fs::TempDir::new().unwrap();
        let from = temp.child("b");
        from.child("dir").child("inner.txt").write_str("i").unwrap();
        from.child("README").write_str("r").unwrap();

        let p = plan(&job(from.path(), Path::new("/dest"), &["dir", "README"]));
        let entries: Vec<_> = p.into_iter().map(Result::unwrap).collect();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].kind, EntryKind::Dir);
        assert_eq!(entries[0].dst, Path::new("/dest/dir"));
        assert_eq!(entries[1].dst, Path::new("/dest/dir/inner.txt"));
        assert_eq!(entries[2].kind, EntryKind::File);
    }

    #[tokio::test]
    async fn copies_tree_and_reports_each_entry() {
        let temp = assert_fs::TempDir::new().unwrap();
        let from = temp.child("b");
        let to = temp.child("a");
        from.child("README").write_str("readme").unwrap();
        from.child("docs").child("guide.md").write_str("guide").unwrap();

        let rx = FsCopyEngine::default().start(
            job(from.path(), to.path(), &["README", "docs"]),
            CopyControl::new(),
        );
        let events = drain(rx).await;

        let files = events.iter().filter(|e| matches!(e, CopyEvent::File(_))).count();
        let dirs = events.iter().filter(|e| matches!(e, CopyEvent::Directory(_))).count();
        assert_eq!((files, dirs), (2, 1));
        assert!(matches!(events.last(), Some(CopyEvent::End(o)) if o.is_clean()));
        assert!(events.iter().any(|e| matches!(e, CopyEvent::Progress(100))));

        to.child("README").assert("readme");
        to.child("docs").child("guide.md").assert("guide");
        // Copy never touches the sources.
        from.child("README").assert("readme");
    }

    #[tokio::test]
    async fn missing_entry_pauses_until_resumed() {
        let temp = assert_fs::TempDir::new().unwrap();
        let from = temp.child("b");
        let to = temp.child("a");
        from.child("README").write_str("readme").unwrap();

        let control = CopyControl::new();
        let mut rx = FsCopyEngine::default().start(
            job(from.path(), to.path(), &["missing", "README"]),
            control.clone(),
        );

        let first = rx.recv().await.unwrap();
        assert!(matches!(first, CopyEvent::Error(MoveError::Copy { .. })));
        assert_eq!(control.state(), crate::control::ControlState::Paused);

        tokio::time::sleep(Duration::from_millis(20)).await;
        control.resume();

        let rest = drain(rx).await;
        assert!(rest.iter().any(|e| matches!(e, CopyEvent::Continue)));
        match rest.last() {
            Some(CopyEvent::End(outcome)) => {
                assert_eq!(outcome.errors.len(), 1);
                assert_eq!(outcome.errors[0].kind, io::ErrorKind::NotFound);
            }
            other => panic!("expected End, got {other:?}"),
        }
        to.child("README").assert("readme");
    }

    #[tokio::test]
    async fn abort_stops_without_end() {
        let temp = assert_fs::TempDir::new().unwrap();
        let from = temp.child("b");
        from.child("README").write_str("readme").unwrap();

        let control = CopyControl::new();
        control.abort();
        let rx = FsCopyEngine::default().start(
            job(from.path(), temp.child("a").path(), &["README"]),
            control,
        );
        let events = drain(rx).await;
        assert!(events.is_empty(), "aborted engine must not report: {events:?}");
    }
}
