//! End-to-end engine scenarios driven through the public library surface

use driftwatch::models::Valuables;
use driftwatch::monitor::{CheckPolicy, IntegrityMonitor};
use driftwatch::profile::{OsProfile, PathResolver};
use std::path::PathBuf;

fn monitor() -> IntegrityMonitor {
    IntegrityMonitor::new(PathResolver::new(OsProfile::detect()), CheckPolicy::default())
}

#[test]
fn test_overwrite_detected_once_then_clean() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("credentials.txt");
    std::fs::write(&target, "A").unwrap();

    let mut mon = monitor();
    mon.load(Valuables {
        files: vec![target.clone()],
        ..Default::default()
    });

    // Intruder overwrites the file with different content and size
    std::fs::write(&target, "BB").unwrap();

    let first = mon.check();
    assert_eq!(first.files, vec![target]);
    assert!(first.dirs.is_empty());
    assert!(first.logs.is_empty());

    // The unconditional rebase adopted the new state: next pass is clean
    let second = mon.check();
    assert!(second.is_empty());
}

#[test]
fn test_mixed_watch_list_reports_per_kind() {
    let root = tempfile::tempdir().unwrap();

    let file = root.path().join("watched.txt");
    std::fs::write(&file, "contents").unwrap();

    let logs = root.path().join("logs");
    std::fs::create_dir(&logs).unwrap();
    std::fs::write(logs.join("audit.0"), "entry").unwrap();
    std::fs::write(logs.join("audit.1"), "entry").unwrap();

    let mut mon = monitor();
    mon.load(Valuables {
        files: vec![file.clone()],
        dirs: vec![],
        logs: vec![logs.clone()],
    });

    // Purge a log entry and overwrite the file in the same tick
    std::fs::remove_file(logs.join("audit.0")).unwrap();
    std::fs::write(&file, "tampered contents").unwrap();

    let report = mon.check();
    assert_eq!(report.files, vec![file]);
    assert_eq!(report.logs, vec![logs]);
}

#[test]
fn test_watch_list_survives_unreadable_members() {
    let dir = tempfile::tempdir().unwrap();
    let stable = dir.path().join("stable.txt");
    let doomed = dir.path().join("doomed.txt");
    std::fs::write(&stable, "stable").unwrap();
    std::fs::write(&doomed, "doomed").unwrap();

    let mut mon = monitor();
    mon.load(Valuables {
        files: vec![stable.clone(), doomed.clone()],
        ..Default::default()
    });

    // One member vanishes; the other keeps being monitored correctly
    std::fs::remove_file(&doomed).unwrap();
    assert!(mon.check().is_empty());

    std::fs::write(&stable, "changed!").unwrap();
    let report = mon.check();
    assert_eq!(report.files, vec![stable]);
}

#[test]
fn test_load_ignores_misdeclared_kinds() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("file.txt");
    std::fs::write(&file, "x").unwrap();

    let mut mon = monitor();
    mon.load(Valuables {
        // Each entry declared with the wrong kind
        files: vec![dir.path().to_path_buf()],
        dirs: vec![file.clone()],
        logs: vec![PathBuf::from("/no/such/logs")],
    });

    assert!(mon.valuables().is_empty());
    assert!(mon.check().is_empty());
}
