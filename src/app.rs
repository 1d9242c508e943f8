//! Application orchestrator.
//! Loads/merges config, initializes logging, builds the request, installs the
//! interrupt handler and drives the move to completion on a current-thread runtime.

use anyhow::{Context, Result};
use std::process::ExitCode;
use tracing::{debug, error, info, warn};

use move_files::cli::Args;
use move_files::config::{CONFIG_ENV, load_config};
use move_files::output as out;
use move_files::{
    Config, MoveError, MoveEvent, MoveRequest, MoveStrategy, Mover, OnCopyError,
    default_config_path, shutdown,
};

use crate::logging::init_tracing;

/// Exit status for a run cut short by an interrupt.
const EXIT_INTERRUPTED: u8 = 130;
const EXIT_USAGE: u8 = 2;

/// Run the CLI application.
pub fn run(args: Args) -> Result<ExitCode> {
    if args.print_config {
        print_config_location(&args);
        return Ok(ExitCode::SUCCESS);
    }

    let mut cfg = load_config(args.config.as_deref())?;
    args.apply_overrides(&mut cfg);

    let _guard = init_tracing(&cfg.log_level, cfg.log_file.as_deref(), cfg.json).map_err(|e| {
        out::print_error(&format!("Failed to initialize logging: {e}"));
        e
    })?;
    debug!(?args, "starting move_files");

    let request = match build_request(&args) {
        Ok(r) => r,
        Err(e) => {
            error!(code = e.code(), kind = "invalid_request", "{e}");
            out::print_error(&e.to_string());
            return Ok(ExitCode::from(EXIT_USAGE));
        }
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("build async runtime")?;
    runtime.block_on(drive(request, &cfg))
}

fn print_config_location(args: &Args) {
    if let Some(p) = &args.config {
        out::print_info(&format!("Using --config (explicit):\n  {}", p.display()));
        return;
    }
    if let Ok(p) = std::env::var(CONFIG_ENV) {
        out::print_info(&format!("Using {CONFIG_ENV} (explicit):\n  {p}"));
        return;
    }
    match default_config_path() {
        Some(p) => {
            out::print_info(&format!("Default move_files config path:\n  {}", p.display()));
            if !p.exists() {
                out::print_info("No config file exists there yet; built-in defaults apply.");
            }
        }
        None => out::print_error("Could not determine a default config path"),
    }
}

fn build_request(args: &Args) -> Result<MoveRequest, MoveError> {
    let mut builder = MoveRequest::builder();
    if let Some(from) = &args.from {
        builder = builder.from(from.clone());
    }
    if let Some(to) = &args.to {
        builder = builder.to(to.clone());
    }
    if let Some(names) = args.names() {
        builder = builder.names(names.iter().cloned());
    }
    builder.build()
}

async fn drive(request: MoveRequest, cfg: &Config) -> Result<ExitCode> {
    info!(
        from = %request.from_dir().display(),
        to = %request.to_dir().display(),
        names = ?request.names(),
        "moving"
    );
    let mut handle = Mover::with_options(cfg.copy_options()).start(request);

    let controls = handle.controls();
    ctrlc::set_handler(move || {
        shutdown::request();
        controls.abort();
    })
    .context("install interrupt handler")?;

    let mut failed = false;
    let mut aborted = false;
    while let Some(event) = handle.next_event().await {
        match event {
            MoveEvent::File(path) => out::print_entry(false, &path),
            MoveEvent::Directory(path) => out::print_entry(true, &path),
            MoveEvent::Progress(n) => {
                debug!(percent = n, "progress");
                out::print_user(&format!("progress {}", out::format_progress(n)));
            }
            MoveEvent::Error(e) => {
                failed = true;
                let path = e.path().map(|p| p.display().to_string());
                error!(code = e.code(), path = ?path, "{e}");
                out::print_error(&e.to_string());
                if matches!(e, MoveError::Copy { .. }) {
                    match cfg.on_copy_error {
                        OnCopyError::Skip => {
                            warn!("skipping failed entry");
                            handle.resume();
                        }
                        OnCopyError::Abort => handle.abort(),
                    }
                }
            }
            MoveEvent::Abort => aborted = true,
            MoveEvent::End(summary) => {
                let how = match summary.strategy {
                    MoveStrategy::Renamed => "renamed",
                    MoveStrategy::Copied => "copied",
                };
                if summary.is_clean() {
                    info!(strategy = how, "move completed");
                    out::print_success(&format!("move completed ({how})"));
                } else {
                    failed = true;
                    warn!(
                        strategy = how,
                        copy_failures = summary.copy_failures.len(),
                        removal_failures = summary.removal_failures.len(),
                        "move finished with failures"
                    );
                    out::print_warn(&format!(
                        "move finished with {} copy and {} removal failure(s); \
                         sources were kept where needed",
                        summary.copy_failures.len(),
                        summary.removal_failures.len()
                    ));
                }
            }
        }
    }

    if aborted {
        out::print_warn("move aborted");
        return Ok(if shutdown::is_requested() {
            ExitCode::from(EXIT_INTERRUPTED)
        } else {
            ExitCode::FAILURE
        });
    }
    Ok(if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}
