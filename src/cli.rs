//! CLI definition and parsing.
//! Defines Args and provides parse() for command-line handling.
//!
//! Notes:
//! - --debug is a shorthand for --log-level debug.
//! - FROM/TO are optional at the clap level so the library's own validation
//!   messages reach the user unchanged.

use clap::{Parser, ValueHint};
use std::path::PathBuf;

use crate::config::types::{Config, LogLevel, OnCopyError};

/// Move named entries from one directory to another.
/// CLI flags override config values (which are loaded from XML if present).
#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Move files and directories, renaming atomically or falling back to copy+remove"
)]
pub struct Args {
    /// Directory the entries currently live in.
    #[arg(value_name = "FROM", value_hint = ValueHint::DirPath)]
    pub from: Option<PathBuf>,

    /// Directory the entries should end up in.
    #[arg(value_name = "TO", value_hint = ValueHint::DirPath)]
    pub to: Option<PathBuf>,

    /// Entry names (basenames) inside FROM.
    #[arg(value_name = "NAMES")]
    pub names: Vec<String>,

    /// Read configuration from this XML file instead of the default location.
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Enable debug logging (equivalent to `--log-level debug`).
    #[arg(
        short = 'd',
        long,
        help = "Enable debug logging (shorthand for --log-level debug)"
    )]
    pub debug: bool,

    /// Set log level. One of: quiet, normal, info, debug.
    #[arg(long, help = "Set log level: quiet, normal, info, debug")]
    pub log_level: Option<String>,

    /// Also write logs to this file.
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub log_file: Option<PathBuf>,

    /// Emit logs in structured JSON (includes timestamp, level, and structured fields).
    #[arg(long, help = "Emit logs in structured JSON")]
    pub json: bool,

    /// Carry timestamps over when the move falls back to copying.
    #[arg(long, help = "Preserve timestamps of copied files")]
    pub preserve_metadata: bool,

    /// Keep going past entries that fail to copy instead of aborting.
    #[arg(long, help = "Skip entries that fail to copy (sources are then kept)")]
    pub skip_errors: bool,

    /// Print where move_files will look for the config file, then exit.
    #[arg(long, help = "Print the config file location and exit")]
    pub print_config: bool,
}

impl Args {
    /// Effective log level derived from flags.
    /// Precedence: --debug > --log-level value > None (use config default).
    pub fn effective_log_level(&self) -> Option<LogLevel> {
        if self.debug {
            return Some(LogLevel::Debug);
        }
        self.log_level.as_deref().and_then(LogLevel::parse)
    }

    /// Apply CLI overrides to a loaded Config (in-place). No-ops for unset flags.
    pub fn apply_overrides(&self, cfg: &mut Config) {
        if let Some(level) = self.effective_log_level() {
            cfg.log_level = level;
        }
        if let Some(path) = &self.log_file {
            cfg.log_file = Some(path.clone());
        }
        if self.json {
            cfg.json = true;
        }
        if self.preserve_metadata {
            cfg.preserve_metadata = true;
        }
        if self.skip_errors {
            cfg.on_copy_error = OnCopyError::Skip;
        }
    }

    /// Positional names, or `None` when none were given.
    pub fn names(&self) -> Option<&[String]> {
        if self.names.is_empty() {
            None
        } else {
            Some(&self.names)
        }
    }
}

pub fn parse() -> Args {
    Args::parse()
}
