//! Event types exchanged with the copy engine and delivered on a move handle.

use std::io;
use std::path::PathBuf;

use crate::errors::MoveError;

/// Events observed on a [`MoveHandle`](crate::MoveHandle).
///
/// `End` and `Abort` are terminal: nothing follows either of them.
#[derive(Debug)]
pub enum MoveEvent {
    /// A source file finished copying.
    File(PathBuf),
    /// A source directory finished copying.
    Directory(PathBuf),
    /// Overall progress, 0..=100, never decreasing.
    Progress(u8),
    Error(MoveError),
    Abort,
    End(MoveSummary),
}

impl MoveEvent {
    pub fn is_terminal(&self) -> bool {
        matches!(self, MoveEvent::Abort | MoveEvent::End(_))
    }
}

/// Events produced by a [`CopyEngine`](crate::fs_ops::CopyEngine).
#[derive(Debug)]
pub enum CopyEvent {
    File(PathBuf),
    Directory(PathBuf),
    Progress(u8),
    /// The engine resumed after a pause.
    Continue,
    /// A single entry failed; the engine holds until resumed or aborted.
    Error(MoveError),
    End(CopyOutcome),
}

/// One entry the copy engine could not copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyFailure {
    pub path: PathBuf,
    pub kind: io::ErrorKind,
    pub message: String,
}

impl CopyFailure {
    pub fn new(path: impl Into<PathBuf>, err: &io::Error) -> Self {
        Self {
            path: path.into(),
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// Delivered once when the copy engine finishes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyOutcome {
    pub errors: Vec<CopyFailure>,
}

impl CopyOutcome {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveStrategy {
    /// The whole batch was relocated by rename.
    Renamed,
    /// Copy-then-delete fallback.
    Copied,
}

/// Payload of the final `End` event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveSummary {
    pub strategy: MoveStrategy,
    /// Copy-phase failures; when non-empty, sources were left in place.
    pub copy_failures: Vec<CopyFailure>,
    /// Top-level sources that could not be removed after a clean copy.
    pub removal_failures: Vec<PathBuf>,
}

impl MoveSummary {
    pub fn renamed() -> Self {
        Self {
            strategy: MoveStrategy::Renamed,
            copy_failures: Vec::new(),
            removal_failures: Vec::new(),
        }
    }

    pub fn copied(outcome: CopyOutcome, removal_failures: Vec<PathBuf>) -> Self {
        Self {
            strategy: MoveStrategy::Copied,
            copy_failures: outcome.errors,
            removal_failures,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.copy_failures.is_empty() && self.removal_failures.is_empty()
    }
}
