//! Core library for `move_files`.
//!
//! Moves a batch of named entries from one directory to another. A single
//! atomic rename of the whole batch is tried first; when that fails (typically
//! across filesystems) the entries are copied by a pausable background engine
//! and the originals removed once the copy is clean.
//!
//! ```no_run
//! # async fn demo() -> Result<(), move_files::MoveError> {
//! use move_files::{MoveEvent, move_files};
//!
//! let mut handle = move_files("/tmp", "/mnt/other", ["ischanged"])?;
//! while let Some(event) = handle.next_event().await {
//!     match event {
//!         MoveEvent::File(path) => println!("{}", path.display()),
//!         MoveEvent::Error(e) => { eprintln!("{e}"); handle.resume(); }
//!         MoveEvent::End(_) => println!("done"),
//!         _ => {}
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod control;
pub mod errors;
pub mod events;
pub mod fs_ops;
pub mod handle;
pub mod mover;
pub mod output;
pub mod progress;
pub mod request;
pub mod shutdown;

pub use config::{
    Config, LogLevel, OnCopyError, default_config_path, default_log_path,
    path_has_symlink_ancestor,
};
pub use control::{Checkpoint, ControlState, ControlWatcher, CopyControl};
pub use errors::MoveError;
pub use events::{CopyEvent, CopyFailure, CopyOutcome, MoveEvent, MoveStrategy, MoveSummary};
pub use handle::{MoveControls, MoveHandle, MoveReport, MoveState};
pub use mover::{Mover, move_files};
pub use progress::{COMPLETE, Emission, ProgressState};
pub use request::{MoveRequest, MoveRequestBuilder};

/// Convenient imports for callers.
pub mod prelude {
    pub use crate::errors::MoveError as Error;
    pub use crate::fs_ops::{CopyEngine, CopyJob, CopyOptions, Remove, Rename};
    pub use crate::shutdown::request as request_shutdown;
    pub use crate::{
        Config, LogLevel, MoveEvent, MoveHandle, MoveRequest, MoveSummary, Mover, move_files,
    };
}
