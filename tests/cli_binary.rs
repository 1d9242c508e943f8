use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::tempdir;

/// Run the binary with an isolated, empty config.
fn run(config_dir: &Path, args: &[&str]) -> Output {
    let cfg = config_dir.join("config.xml");
    fs::write(&cfg, "<config></config>").expect("write config");
    Command::new(assert_cmd::cargo::cargo_bin!("move_files"))
        .env("MOVE_FILES_CONFIG", &cfg)
        .args(args)
        .output()
        .expect("spawn binary")
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

#[test]
fn print_config_succeeds() {
    let td = tempdir().unwrap();
    let out = run(td.path(), &["--print-config"]);
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("MOVE_FILES_CONFIG"));
}

#[test]
fn missing_arguments_report_validation_messages() {
    let td = tempdir().unwrap();

    let out = run(td.path(), &[]);
    assert_eq!(out.status.code(), Some(2));
    assert!(stderr(&out).contains("from should be a string!"), "{}", stderr(&out));

    let out = run(td.path(), &["/b"]);
    assert!(stderr(&out).contains("to should be a string!"));

    let out = run(td.path(), &["/b", "/a"]);
    assert!(stderr(&out).contains("names should be an array!"));
}

#[test]
fn moves_entries_and_prints_progress() {
    let td = tempdir().unwrap();
    let from = td.path().join("b");
    let to = td.path().join("a");
    fs::create_dir_all(&from).unwrap();
    fs::create_dir_all(&to).unwrap();
    fs::write(from.join("README"), "readme").unwrap();
    fs::write(from.join("LICENSE"), "mit").unwrap();

    let out = run(
        td.path(),
        &[from.to_str().unwrap(), to.to_str().unwrap(), "README", "LICENSE"],
    );
    assert!(out.status.success(), "{}", stderr(&out));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("progress 100%"), "{stdout}");
    assert!(to.join("README").is_file());
    assert!(!from.join("LICENSE").exists());
}

#[test]
fn failed_move_exits_non_zero() {
    let td = tempdir().unwrap();
    let from = td.path().join("b");
    let to = td.path().join("a");
    fs::create_dir_all(&from).unwrap();
    fs::create_dir_all(&to).unwrap();

    let out = run(td.path(), &[from.to_str().unwrap(), to.to_str().unwrap(), "missing"]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("missing"), "{}", stderr(&out));
}
