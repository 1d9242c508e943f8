//! User-facing console lines.
//!
//! Colors are used only when the target stream is a TTY. Logs go through
//! `tracing`; these helpers are for the lines a user or script reads.

use owo_colors::OwoColorize;
use std::path::Path;

#[derive(Clone, Copy)]
enum Tone {
    Info,
    Warn,
    Error,
    Ok,
}

impl Tone {
    fn label(self) -> &'static str {
        match self {
            Tone::Info => "info:",
            Tone::Warn => "warn:",
            Tone::Error => "error:",
            Tone::Ok => "ok:",
        }
    }

    fn to_stderr(self) -> bool {
        matches!(self, Tone::Warn | Tone::Error)
    }
}

fn line(tone: Tone, msg: &str) {
    let stream = if tone.to_stderr() {
        atty::Stream::Stderr
    } else {
        atty::Stream::Stdout
    };
    let label = tone.label();
    let text = if atty::is(stream) {
        let painted = match tone {
            Tone::Info => label.cyan().bold().to_string(),
            Tone::Warn => label.yellow().bold().to_string(),
            Tone::Error => label.red().bold().to_string(),
            Tone::Ok => label.green().bold().to_string(),
        };
        format!("{painted} {msg}")
    } else {
        format!("{label} {msg}")
    };
    if tone.to_stderr() {
        eprintln!("{text}");
    } else {
        println!("{text}");
    }
}

pub fn print_info(msg: &str) {
    line(Tone::Info, msg);
}

pub fn print_warn(msg: &str) {
    line(Tone::Warn, msg);
}

pub fn print_error(msg: &str) {
    line(Tone::Error, msg);
}

pub fn print_success(msg: &str) {
    line(Tone::Ok, msg);
}

/// Print a plain user-facing line (no prefix). Scripts may parse these.
pub fn print_user(msg: &str) {
    println!("{msg}");
}

/// One line per copied entry: `file <path>` or `dir <path>`.
pub fn print_entry(is_dir: bool, path: &Path) {
    let kind = if is_dir { "dir " } else { "file" };
    print_user(&format!("{kind} {}", path.display()));
}

/// Progress as `NN%`.
pub fn format_progress(percent: u8) -> String {
    format!("{percent:>3}%")
}
