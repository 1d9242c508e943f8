//! The caller's side of a running move: event stream plus controls.

use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, watch};
use tracing::debug;

use crate::config::OnCopyError;
use crate::control::CopyControl;
use crate::errors::MoveError;
use crate::events::{MoveEvent, MoveSummary};

/// Orchestrator states, observable through [`MoveHandle::state`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveState {
    AttemptingRename,
    Copying,
    AwaitingRemoval,
    Finalized,
    Aborted,
}

impl MoveState {
    pub fn is_terminal(self) -> bool {
        matches!(self, MoveState::Finalized | MoveState::Aborted)
    }
}

/// Ordered event delivery that closes after the first terminal event.
#[derive(Debug)]
pub(crate) struct EventSink {
    tx: Mutex<Option<mpsc::UnboundedSender<MoveEvent>>>,
}

impl EventSink {
    pub(crate) fn new(tx: mpsc::UnboundedSender<MoveEvent>) -> Self {
        Self {
            tx: Mutex::new(Some(tx)),
        }
    }

    /// Deliver `event`; terminal events close the sink. Returns false if already closed.
    pub(crate) fn emit(&self, event: MoveEvent) -> bool {
        let Ok(mut guard) = self.tx.lock() else {
            return false;
        };
        let terminal = event.is_terminal();
        let Some(tx) = guard.as_ref() else {
            debug!(?event, "dropping event after terminal event");
            return false;
        };
        // A dropped receiver only means nobody is listening.
        let _ = tx.send(event);
        if terminal {
            guard.take();
        }
        true
    }

    /// Close without a terminal event; the handle's stream ends.
    pub(crate) fn close(&self) {
        if let Ok(mut guard) = self.tx.lock() {
            guard.take();
        }
    }

    #[cfg(test)]
    pub(crate) fn is_closed(&self) -> bool {
        self.tx.lock().map(|g| g.is_none()).unwrap_or(true)
    }
}

/// Cloneable control surface, usable from other tasks or a signal handler.
#[derive(Debug, Clone)]
pub struct MoveControls {
    control: CopyControl,
    sink: Arc<EventSink>,
    state: Arc<watch::Sender<MoveState>>,
}

impl MoveControls {
    pub(crate) fn new(
        control: CopyControl,
        sink: Arc<EventSink>,
        state: Arc<watch::Sender<MoveState>>,
    ) -> Self {
        Self { control, sink, state }
    }

    pub fn pause(&self) {
        if self.control.pause() {
            debug!("move paused");
        }
    }

    /// Continue a paused copy.
    pub fn resume(&self) {
        if self.control.resume() {
            debug!("move resumed");
        }
    }

    /// Stop the copy engine and emit `Abort` right away, without waiting for it to settle.
    pub fn abort(&self) {
        self.control.abort();
        if self.sink.emit(MoveEvent::Abort) {
            debug!("move aborted");
            self.state.send_replace(MoveState::Aborted);
        }
    }
}

/// Returned by [`move_files`](crate::move_files) and [`Mover::start`](crate::Mover::start).
#[derive(Debug)]
pub struct MoveHandle {
    events: mpsc::UnboundedReceiver<MoveEvent>,
    controls: MoveControls,
    state: watch::Receiver<MoveState>,
}

impl MoveHandle {
    pub(crate) fn new(
        events: mpsc::UnboundedReceiver<MoveEvent>,
        controls: MoveControls,
        state: watch::Receiver<MoveState>,
    ) -> Self {
        Self {
            events,
            controls,
            state,
        }
    }

    /// Next event, or `None` once the move has finished.
    pub async fn next_event(&mut self) -> Option<MoveEvent> {
        self.events.recv().await
    }

    /// Non-blocking variant of [`next_event`](Self::next_event).
    pub fn try_next_event(&mut self) -> Option<MoveEvent> {
        self.events.try_recv().ok()
    }

    pub fn pause(&self) {
        self.controls.pause();
    }

    pub fn resume(&self) {
        self.controls.resume();
    }

    pub fn abort(&self) {
        self.controls.abort();
    }

    pub fn controls(&self) -> MoveControls {
        self.controls.clone()
    }

    pub fn state(&self) -> MoveState {
        *self.state.borrow()
    }

    /// Drain the remaining events into a report.
    ///
    /// A failed copy entry pauses the move; `on_copy_error` decides whether
    /// it is skipped (resume) or ends the move (abort).
    pub async fn wait(mut self, on_copy_error: OnCopyError) -> MoveReport {
        let mut report = MoveReport::default();
        while let Some(event) = self.next_event().await {
            if let MoveEvent::Error(MoveError::Copy { .. }) = &event {
                match on_copy_error {
                    OnCopyError::Skip => self.resume(),
                    OnCopyError::Abort => self.abort(),
                }
            }
            report.record(event);
        }
        report
    }
}

/// A handle dropped mid-move aborts it, so a paused engine is not left waiting.
impl Drop for MoveHandle {
    fn drop(&mut self) {
        if !self.state().is_terminal() {
            debug!(state = ?self.state(), "handle dropped before the move finished");
            self.controls.abort();
        }
    }
}

/// Everything observed on a handle, in order.
#[derive(Debug, Default)]
pub struct MoveReport {
    pub files: Vec<std::path::PathBuf>,
    pub directories: Vec<std::path::PathBuf>,
    pub progress: Vec<u8>,
    pub errors: Vec<MoveError>,
    pub aborted: bool,
    pub summary: Option<MoveSummary>,
}

impl MoveReport {
    pub fn record(&mut self, event: MoveEvent) {
        match event {
            MoveEvent::File(p) => self.files.push(p),
            MoveEvent::Directory(p) => self.directories.push(p),
            MoveEvent::Progress(n) => self.progress.push(n),
            MoveEvent::Error(e) => self.errors.push(e),
            MoveEvent::Abort => self.aborted = true,
            MoveEvent::End(summary) => self.summary = Some(summary),
        }
    }

    /// Ended normally with nothing left behind.
    pub fn succeeded(&self) -> bool {
        !self.aborted
            && self.errors.is_empty()
            && self.summary.as_ref().is_some_and(MoveSummary::is_clean)
    }
}
