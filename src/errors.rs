//! Typed error definitions for move_files.
//! Validation failures carry fixed messages callers match on; runtime failures
//! keep the underlying io::Error as their source.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MoveError {
    #[error("from should be a string!")]
    FromNotString,

    #[error("to should be a string!")]
    ToNotString,

    #[error("names should be an array!")]
    NamesNotArray,

    #[error("names should not be empty!")]
    EmptyNames,

    #[error("invalid entry name: {0:?}")]
    InvalidName(String),

    #[error("{op} '{}': {source}", path.display())]
    Copy {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("remove '{}': {source}", path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("copy engine stopped before completion")]
    CopyEngineStopped,
}

impl MoveError {
    /// Stable numeric code for structured logs and exit statuses.
    pub fn code(&self) -> i32 {
        match self {
            MoveError::FromNotString => 10,
            MoveError::ToNotString => 11,
            MoveError::NamesNotArray => 12,
            MoveError::EmptyNames => 13,
            MoveError::InvalidName(_) => 14,
            MoveError::Copy { .. } => 20,
            MoveError::Remove { .. } => 30,
            MoveError::CopyEngineStopped => 40,
        }
    }

    /// True for errors raised synchronously while building a request.
    pub fn is_validation(&self) -> bool {
        self.code() < 20
    }

    /// Path the failure relates to, if any.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            MoveError::Copy { path, .. } | MoveError::Remove { path, .. } => Some(path),
            _ => None,
        }
    }
}
