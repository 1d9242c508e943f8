//! Core configuration types.
//! - Config holds runtime settings with sensible defaults.
//! - LogLevel represents verbosity with simple parsing helpers.
//! - OnCopyError decides what a waiting caller does when a copy entry fails.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::fs_ops::CopyOptions;

/// Program-defined verbosity levels exposed to users/config.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Only errors
    Quiet,
    /// Informational output (default)
    #[default]
    Normal,
    /// More info (like verbose)
    Info,
    /// Debug/trace
    Debug,
}

impl LogLevel {
    /// Parse common string names into our LogLevel (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "quiet" | "error" | "none" => Some(LogLevel::Quiet),
            "normal" => Some(LogLevel::Normal),
            "info" | "verbose" | "detailed" => Some(LogLevel::Info),
            "debug" | "trace" => Some(LogLevel::Debug),
            _ => None,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        };
        f.write_str(s)
    }
}

impl FromStr for LogLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("invalid log level: '{s}'"))
    }
}

/// Reaction to a per-entry copy failure while the engine is paused on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnCopyError {
    /// Abort the whole move (sources stay untouched).
    #[default]
    Abort,
    /// Resume past the failed entry; sources are kept because the copy is incomplete.
    Skip,
}

impl FromStr for OnCopyError {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(OnCopyError::Abort),
            "skip" | "continue" => Ok(OnCopyError::Skip),
            other => Err(format!("invalid on_copy_error: '{other}'")),
        }
    }
}

/// Runtime configuration for the CLI.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Console verbosity
    pub log_level: LogLevel,
    /// Optional path to a log file
    pub log_file: Option<PathBuf>,
    /// Emit logs as JSON
    pub json: bool,
    /// Copy timestamps when falling back to copy
    pub preserve_metadata: bool,
    pub on_copy_error: OnCopyError,
}

impl Config {
    pub fn copy_options(&self) -> CopyOptions {
        CopyOptions {
            preserve_metadata: self.preserve_metadata,
        }
    }
}
