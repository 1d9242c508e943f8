use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use move_files::fs_ops::{FsCopyEngine, FsRemover, Rename};
use move_files::{MoveRequest, Mover, OnCopyError};
use tempfile::tempdir;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt as tsfmt, registry};

/// Appends written bytes into a shared in-memory buffer.
#[derive(Clone)]
struct BufferWriter(Arc<Mutex<Vec<u8>>>);

impl Write for BufferWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

struct CrossDevice;

impl Rename for CrossDevice {
    async fn attempt(&self, _from: &Path, _to: &Path, _names: &[String]) -> io::Result<()> {
        Err(io::Error::from(io::ErrorKind::CrossesDevices))
    }
}

#[tokio::test]
async fn fallback_and_state_changes_are_logged() {
    let buf = Arc::new(Mutex::new(Vec::new()));
    let make_writer = {
        let buf = buf.clone();
        move || BufferWriter(buf.clone())
    };
    let layer = tsfmt::layer()
        .with_writer(make_writer)
        .with_target(false)
        .with_ansi(false)
        .compact();
    let subscriber = registry().with(EnvFilter::new("debug")).with(layer);
    // Thread-local default; the current-thread test runtime runs spawned tasks here too.
    let _guard = tracing::subscriber::set_default(subscriber);

    let td = tempdir().unwrap();
    let (from, to) = (td.path().join("b"), td.path().join("a"));
    std::fs::create_dir_all(&from).unwrap();
    std::fs::write(from.join("README"), "readme").unwrap();

    let request = MoveRequest::builder()
        .from(&from)
        .to(&to)
        .names(["README"])
        .build()
        .unwrap();
    let report = Mover::new(CrossDevice, FsCopyEngine::default(), FsRemover)
        .start(request)
        .wait(OnCopyError::Abort)
        .await;
    assert!(report.succeeded());

    let out = String::from_utf8(buf.lock().unwrap().clone()).unwrap();
    assert!(out.contains("falling back to copy"), "{out}");
    assert!(out.contains("AwaitingRemoval"), "{out}");
    assert!(out.contains("sources removed"), "{out}");
}
