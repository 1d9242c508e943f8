//! Move orchestration.
//!
//! One spawned task per move walks the state machine:
//!
//! ```text
//! AttemptingRename ──ok─────────────────────► Finalized
//!        │ err
//!        ▼
//!     Copying ──End(errors)─────────────────► Finalized
//!        │ End(clean)
//!        ▼
//!  AwaitingRemoval ──all removals settled───► Finalized
//! ```
//!
//! `Aborted` can be entered from any state through the handle.
//!
//! Progress: copy-phase values go through [`ProgressState`]; a 100 reported by
//! the copy engine is swallowed because the move is only complete once the
//! sources are gone. Completion (`Progress(100)` then `End`) is emitted only
//! at finalization.

use futures_util::future::join_all;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, trace, warn};

use crate::control::CopyControl;
use crate::errors::MoveError;
use crate::events::{CopyEvent, CopyOutcome, MoveEvent, MoveSummary};
use crate::fs_ops::{
    CopyEngine, CopyJob, CopyOptions, FsCopyEngine, FsRemover, FsRename, Remove, Rename,
    describe_io_error, is_cross_device,
};
use crate::handle::{EventSink, MoveControls, MoveHandle, MoveState};
use crate::progress::{COMPLETE, ProgressState};
use crate::request::MoveRequest;

/// Start a move with the filesystem collaborators.
///
/// Validates synchronously; all filesystem work happens on a task spawned on
/// the current Tokio runtime, so this must be called from within one.
pub fn move_files<I, S>(
    from: impl Into<std::path::PathBuf>,
    to: impl Into<std::path::PathBuf>,
    names: I,
) -> Result<MoveHandle, MoveError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let request = MoveRequest::builder().from(from).to(to).names(names).build()?;
    Ok(Mover::default().start(request))
}

/// Orchestrator factory, generic over its collaborators.
#[derive(Debug)]
pub struct Mover<R = FsRename, C = FsCopyEngine, D = FsRemover> {
    rename: Arc<R>,
    copier: Arc<C>,
    remover: Arc<D>,
}

impl<R, C, D> Clone for Mover<R, C, D> {
    fn clone(&self) -> Self {
        Self {
            rename: Arc::clone(&self.rename),
            copier: Arc::clone(&self.copier),
            remover: Arc::clone(&self.remover),
        }
    }
}

impl Default for Mover {
    fn default() -> Self {
        Self::with_options(CopyOptions::default())
    }
}

impl Mover {
    pub fn with_options(options: CopyOptions) -> Self {
        Self::new(FsRename, FsCopyEngine::new(options), FsRemover)
    }
}

impl<R: Rename, C: CopyEngine, D: Remove> Mover<R, C, D> {
    pub fn new(rename: R, copier: C, remover: D) -> Self {
        Self {
            rename: Arc::new(rename),
            copier: Arc::new(copier),
            remover: Arc::new(remover),
        }
    }

    /// Spawn the orchestrator for `request` and return its handle immediately.
    pub fn start(&self, request: MoveRequest) -> MoveHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let sink = Arc::new(EventSink::new(tx));
        let (state_tx, state_rx) = watch::channel(MoveState::AttemptingRename);
        let state_tx = Arc::new(state_tx);
        let control = CopyControl::new();

        let controls = MoveControls::new(control.clone(), Arc::clone(&sink), Arc::clone(&state_tx));
        let run = Run {
            mover: self.clone(),
            request,
            sink,
            state: state_tx,
            control,
            controls: controls.clone(),
            progress: ProgressState::new(),
        };
        tokio::spawn(run.drive());
        MoveHandle::new(rx, controls, state_rx)
    }
}

/// State owned by one move for its whole lifetime.
struct Run<R, C, D> {
    mover: Mover<R, C, D>,
    request: MoveRequest,
    sink: Arc<EventSink>,
    state: Arc<watch::Sender<MoveState>>,
    control: CopyControl,
    controls: MoveControls,
    progress: ProgressState,
}

impl<R: Rename, C: CopyEngine, D: Remove> Run<R, C, D> {
    async fn drive(mut self) {
        let req = &self.request;
        debug!(
            from = %req.from_dir().display(),
            to = %req.to_dir().display(),
            names = req.names().len(),
            "move started"
        );

        let renamed = self
            .mover
            .rename
            .attempt(req.from_dir(), req.to_dir(), req.names())
            .await;
        if self.control.is_aborted() {
            debug!("move aborted during rename attempt");
            return;
        }
        match renamed {
            Ok(()) => {
                info!(to = %self.request.to_dir().display(), "renamed batch atomically");
                self.finalize(MoveSummary::renamed());
                return;
            }
            Err(e) if is_cross_device(&e) => {
                info!("source and destination are on different filesystems; falling back to copy");
            }
            Err(e) => {
                let first = self.request.sources().next().unwrap_or_default();
                warn!(
                    error = %describe_io_error("rename", &first, &e),
                    "atomic rename failed, falling back to copy+remove"
                );
            }
        }

        let Some(outcome) = self.copy().await else {
            return;
        };
        if self.control.is_aborted() {
            return;
        }

        if !outcome.is_clean() {
            warn!(
                errors = outcome.errors.len(),
                "copy finished with errors; leaving sources in place"
            );
            self.finalize(MoveSummary::copied(outcome, Vec::new()));
            return;
        }

        let removal_failures = self.remove_sources().await;
        if self.control.is_aborted() {
            return;
        }
        self.finalize(MoveSummary::copied(outcome, removal_failures));
    }

    /// Run the copy engine to completion. `None` when the move must stop here.
    async fn copy(&mut self) -> Option<CopyOutcome> {
        self.set_state(MoveState::Copying);
        let job = CopyJob {
            from: self.request.from_dir().to_path_buf(),
            to: self.request.to_dir().to_path_buf(),
            names: self.request.names().to_vec(),
        };
        let mut events = self.mover.copier.start(job, self.control.clone());

        loop {
            let Some(event) = events.recv().await else {
                if !self.control.is_aborted() {
                    warn!("copy engine stopped without reporting completion");
                    self.sink.emit(MoveEvent::Error(MoveError::CopyEngineStopped));
                    self.sink.close();
                    self.set_state(MoveState::Finalized);
                }
                return None;
            };
            match event {
                CopyEvent::File(path) => {
                    self.sink.emit(MoveEvent::File(path));
                }
                CopyEvent::Directory(path) => {
                    self.sink.emit(MoveEvent::Directory(path));
                }
                CopyEvent::Progress(n) if n >= COMPLETE => {
                    trace!("copy reached 100%; completion waits for removal");
                }
                CopyEvent::Progress(n) => {
                    if let Some(emission) = self.progress.advance(n) {
                        self.sink.emit(MoveEvent::Progress(emission.value));
                    }
                }
                CopyEvent::Continue => {
                    debug!("copy engine resumed");
                    self.controls.resume();
                }
                CopyEvent::Error(e) => {
                    self.control.pause();
                    self.sink.emit(MoveEvent::Error(e));
                }
                CopyEvent::End(outcome) => return Some(outcome),
            }
        }
    }

    /// Remove every top-level source concurrently; returns the ones that failed.
    async fn remove_sources(&mut self) -> Vec<std::path::PathBuf> {
        self.set_state(MoveState::AwaitingRemoval);
        self.progress.record(COMPLETE);

        let targets: Vec<_> = self.request.sources().collect();
        let remover = &self.mover.remover;
        let results = join_all(targets.iter().map(|path| remover.remove(path))).await;

        let mut failed = Vec::new();
        for (path, result) in targets.into_iter().zip(results) {
            if let Err(e) = result {
                warn!(error = %describe_io_error("remove source", &path, &e), "removal failed");
                failed.push(path.clone());
                self.sink.emit(MoveEvent::Error(MoveError::Remove { path, source: e }));
            }
        }
        if failed.is_empty() {
            debug!(count = self.request.names().len(), "sources removed");
        }
        failed
    }

    /// Force progress to 100 and end the move with `summary`.
    fn finalize(&mut self, summary: MoveSummary) {
        self.set_state(MoveState::Finalized);
        if let Some(emission) = self.progress.advance(COMPLETE) {
            self.sink.emit(MoveEvent::Progress(emission.value));
            if emission.complete {
                self.sink.emit(MoveEvent::End(summary));
            }
        }
    }

    /// Advance the observable state. `Aborted` is final.
    fn set_state(&self, next: MoveState) {
        let mut prev = None;
        self.state.send_if_modified(|state| {
            if *state == MoveState::Aborted {
                return false;
            }
            prev = Some(std::mem::replace(state, next));
            true
        });
        if let Some(prev) = prev {
            debug!(?prev, ?next, "move state");
        }
    }
}
