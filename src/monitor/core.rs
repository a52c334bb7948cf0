//! Core integrity-monitoring engine shared between one-shot and polling modes
//!
//! Owns the watch list ("valuables") and their baseline snapshots, detects
//! drift from the baseline on each check pass, and rebases unconditionally
//! after every pass. Designed for a single caller thread; the engine has no
//! internal scheduler or locking.

use crate::models::{DirBaseline, DriftReport, FileBaseline, LogBaseline, ObjectKind, Valuables};
use crate::monitor::hash::hash_file;
use crate::profile::PathResolver;
use log::{debug, warn};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Tuning knobs for drift detection
#[derive(Debug, Clone)]
pub struct CheckPolicy {
    /// Expected interval between check passes, used by the directory
    /// access-time heuristic
    pub poll_interval: Duration,
    /// Enable the best-effort directory access-time heuristic. Off by
    /// default: atime semantics vary across platforms and mount options
    /// (relatime, noatime), so the modification-time comparison is the
    /// reliable directory signal.
    pub dir_atime_heuristic: bool,
}

impl Default for CheckPolicy {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            dir_atime_heuristic: false,
        }
    }
}

/// Integrity monitor for local filesystem objects
///
/// Baselines are ordinary process-local state with lifetime equal to this
/// instance; there is no persistence and no cross-object ordering guarantee.
#[derive(Debug)]
pub struct IntegrityMonitor {
    resolver: PathResolver,
    policy: CheckPolicy,
    valuables: Valuables,
    file_baselines: Vec<FileBaseline>,
    /// `None` marks a directory that could not be read at snapshot time;
    /// such entries contribute no drift signal until re-observed readable.
    dir_baselines: Vec<Option<DirBaseline>>,
    log_baselines: Vec<Option<LogBaseline>>,
    /// Hash recomputations taken on the stat-change fallback path,
    /// exposed for instrumentation in tests
    drift_hash_recomputes: u64,
}

impl IntegrityMonitor {
    pub fn new(resolver: PathResolver, policy: CheckPolicy) -> Self {
        Self {
            resolver,
            policy,
            valuables: Valuables::default(),
            file_baselines: Vec::new(),
            dir_baselines: Vec::new(),
            log_baselines: Vec::new(),
            drift_hash_recomputes: 0,
        }
    }

    /// Resolve, verify, and adopt a candidate watch list
    ///
    /// Candidate paths may contain profile placeholder tokens. Paths that
    /// fail verification for their declared kind are dropped silently
    /// (debug-logged only); callers needing diagnostics must re-verify
    /// independently. Always establishes an initial baseline before
    /// returning, so a subsequent `check()` is well-defined.
    pub fn load(&mut self, candidates: Valuables) {
        let filtered = Valuables {
            files: self.filter_kind(&candidates.files, ObjectKind::File),
            dirs: self.filter_kind(&candidates.dirs, ObjectKind::Dir),
            logs: self.filter_kind(&candidates.logs, ObjectKind::LogDir),
        };

        debug!(
            "watch list loaded: {} of {} candidates retained",
            filtered.len(),
            candidates.len()
        );

        self.valuables = filtered;
        self.rebase_all();
    }

    fn filter_kind(
        &self,
        candidates: &[std::path::PathBuf],
        kind: ObjectKind,
    ) -> Vec<std::path::PathBuf> {
        candidates
            .iter()
            .filter_map(|candidate| {
                let resolved = self.resolver.resolve(&candidate.to_string_lossy());
                if self.resolver.verify(&resolved, kind) {
                    Some(resolved)
                } else {
                    debug!(
                        "dropping {} candidate {}: failed verification",
                        kind.as_str(),
                        resolved.display()
                    );
                    None
                }
            })
            .collect()
    }

    /// Recompute every baseline snapshot
    ///
    /// Per-object read failures are recorded as the unavailable sentinel
    /// for that object; a rebase never aborts because one object is bad.
    pub fn rebase_all(&mut self) {
        self.file_baselines = self
            .valuables
            .files
            .iter()
            .map(|path| snapshot_file(path))
            .collect();
        self.dir_baselines = self
            .valuables
            .dirs
            .iter()
            .map(|path| snapshot_dir(path))
            .collect();
        self.log_baselines = self
            .valuables
            .logs
            .iter()
            .map(|path| snapshot_log(path))
            .collect();
    }

    /// Evaluate drift for every watched object, then rebase
    ///
    /// The rebase is unconditional: a sustained attack that repeatedly
    /// touches an object is reported once per change, not on every
    /// subsequent tick, and no stale dirty baseline can block the others.
    pub fn check(&mut self) -> DriftReport {
        let report = DriftReport {
            files: self.check_files(),
            dirs: self.check_dirs(),
            logs: self.check_logs(),
        };
        debug!(
            "check pass complete: {} drifted, {} hash recomputations so far",
            report.files.len() + report.dirs.len() + report.logs.len(),
            self.drift_hash_recomputes
        );
        self.rebase_all();
        report
    }

    /// Current watch list
    pub fn valuables(&self) -> &Valuables {
        &self.valuables
    }

    /// Replace the watch list wholesale and rebase
    ///
    /// Paths are adopted as-is (already resolved); this is the path the
    /// deception manager uses to register freshly written decoys so they
    /// start life with a real baseline instead of as instant drift.
    pub fn set_valuables(&mut self, new: Valuables) {
        self.valuables = new;
        self.rebase_all();
    }

    fn check_files(&mut self) -> Vec<std::path::PathBuf> {
        let mut suspects = Vec::new();
        let mut recomputes = 0;

        for (path, baseline) in self.valuables.files.iter().zip(&self.file_baselines) {
            let FileBaseline::Observed {
                content_hash,
                accessed,
                modified,
                size,
            } = baseline
            else {
                // Unavailable at the last rebase: skip until re-observed
                continue;
            };

            let Ok(meta) = fs::metadata(path) else {
                continue;
            };
            let (Ok(atime), Ok(mtime)) = (meta.accessed(), meta.modified()) else {
                continue;
            };

            if atime != *accessed {
                // Pure read: something opened the file since the baseline
                suspects.push(path.clone());
            } else if mtime != *modified || meta.len() != *size {
                // Stat changed without an access-time change. Recompute the
                // content hash for the stronger signal, but flag either way:
                // any observed stat change is suspicious.
                recomputes += 1;
                match hash_file(path) {
                    Ok(current_hash) => {
                        if current_hash != *content_hash {
                            debug!("content hash changed for {}", path.display());
                        }
                        suspects.push(path.clone());
                    }
                    Err(err) => {
                        warn!("skipping unreadable file {}: {}", path.display(), err);
                    }
                }
            }
        }

        self.drift_hash_recomputes += recomputes;
        suspects
    }

    fn check_dirs(&self) -> Vec<std::path::PathBuf> {
        let mut suspects = Vec::new();

        for (path, baseline) in self.valuables.dirs.iter().zip(&self.dir_baselines) {
            let Some(baseline) = baseline else {
                continue;
            };
            let Ok(meta) = fs::metadata(path) else {
                continue;
            };
            let (Ok(atime), Ok(mtime)) = (meta.accessed(), meta.modified()) else {
                continue;
            };

            if mtime != baseline.modified {
                if let Some(current) = read_child_names(path) {
                    let added: Vec<_> = current.difference(&baseline.children).collect();
                    let removed: Vec<_> = baseline.children.difference(&current).collect();
                    debug!(
                        "directory {} changed: {} added, {} removed",
                        path.display(),
                        added.len(),
                        removed.len()
                    );
                }
                suspects.push(path.clone());
            } else if self.policy.dir_atime_heuristic {
                // Best-effort: an access-time delta that does not line up
                // with the poll cadence suggests a visitor between ticks
                let elapsed = atime
                    .duration_since(baseline.accessed)
                    .unwrap_or(Duration::ZERO);
                if elapsed.as_secs() != self.policy.poll_interval.as_secs() {
                    suspects.push(path.clone());
                }
            }
        }

        suspects
    }

    fn check_logs(&self) -> Vec<std::path::PathBuf> {
        let mut suspects = Vec::new();

        for (path, baseline) in self.valuables.logs.iter().zip(&self.log_baselines) {
            let Some(baseline) = baseline else {
                continue;
            };
            let Some(current) = count_entries(path) else {
                continue;
            };

            // Growth is normal for a log directory; entries disappearing is
            // the interesting signal
            if current < baseline.entry_count {
                suspects.push(path.clone());
            }
        }

        suspects
    }

    #[cfg(test)]
    pub(crate) fn drift_hash_recomputes(&self) -> u64 {
        self.drift_hash_recomputes
    }
}

impl crate::registry::Monitor for IntegrityMonitor {
    fn load(&mut self, candidates: Valuables) {
        IntegrityMonitor::load(self, candidates)
    }

    fn check(&mut self) -> DriftReport {
        IntegrityMonitor::check(self)
    }

    fn valuables(&self) -> &Valuables {
        IntegrityMonitor::valuables(self)
    }

    fn set_valuables(&mut self, new: Valuables) {
        IntegrityMonitor::set_valuables(self, new)
    }
}

/// Snapshot a watched file, or the unavailable sentinel if unreadable
///
/// The content is hashed before the stat so the recorded access time
/// includes the read performed by hashing itself.
fn snapshot_file(path: &Path) -> FileBaseline {
    let Ok(content_hash) = hash_file(path) else {
        return FileBaseline::Unavailable;
    };
    let Ok(meta) = fs::metadata(path) else {
        return FileBaseline::Unavailable;
    };
    let (Ok(accessed), Ok(modified)) = (meta.accessed(), meta.modified()) else {
        return FileBaseline::Unavailable;
    };

    FileBaseline::Observed {
        content_hash,
        accessed,
        modified,
        size: meta.len(),
    }
}

fn snapshot_dir(path: &Path) -> Option<DirBaseline> {
    let meta = fs::metadata(path).ok()?;
    let accessed = meta.accessed().ok()?;
    let modified = meta.modified().ok()?;
    let children = read_child_names(path)?;

    Some(DirBaseline {
        accessed,
        modified,
        children,
    })
}

fn snapshot_log(path: &Path) -> Option<LogBaseline> {
    count_entries(path).map(|entry_count| LogBaseline { entry_count })
}

fn read_child_names(path: &Path) -> Option<BTreeSet<String>> {
    let entries = fs::read_dir(path).ok()?;
    Some(
        entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect(),
    )
}

fn count_entries(path: &Path) -> Option<usize> {
    Some(fs::read_dir(path).ok()?.filter(|e| e.is_ok()).count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{OsProfile, PathResolver};
    use std::path::PathBuf;

    fn test_resolver() -> PathResolver {
        PathResolver::new(OsProfile {
            username: "tester".to_string(),
            home: PathBuf::from("/home/tester"),
            roaming: PathBuf::from("/home/tester/.config"),
            local: PathBuf::from("/home/tester/.local/share"),
            public: PathBuf::from("/home/tester/Public"),
            temp: std::env::temp_dir(),
        })
    }

    fn monitor() -> IntegrityMonitor {
        IntegrityMonitor::new(test_resolver(), CheckPolicy::default())
    }

    // ==================== load() tests ====================

    #[test]
    fn test_load_drops_unverifiable_candidates() {
        let dir = tempfile::tempdir().unwrap();
        let real_file = dir.path().join("real.txt");
        std::fs::write(&real_file, "data").unwrap();

        let mut mon = monitor();
        mon.load(Valuables {
            files: vec![real_file.clone(), PathBuf::from("/no/such/file")],
            // A file path declared as a directory must also be dropped
            dirs: vec![real_file.clone(), dir.path().to_path_buf()],
            logs: vec![],
        });

        assert_eq!(mon.valuables().files, vec![real_file]);
        assert_eq!(mon.valuables().dirs, vec![dir.path().to_path_buf()]);
    }

    #[test]
    fn test_load_establishes_baselines() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("f");
        std::fs::write(&file, "x").unwrap();

        let mut mon = monitor();
        mon.load(Valuables {
            files: vec![file],
            dirs: vec![dir.path().to_path_buf()],
            logs: vec![dir.path().to_path_buf()],
        });

        assert_eq!(mon.file_baselines.len(), 1);
        assert!(!mon.file_baselines[0].is_unavailable());
        assert!(mon.dir_baselines[0].is_some());
        assert!(mon.log_baselines[0].is_some());
    }

    #[test]
    fn test_check_before_load_reports_nothing() {
        // Empty watch list is the guarded state: no baselines, no drift
        let mut mon = monitor();
        assert!(mon.check().is_empty());
    }

    // ==================== file drift tests ====================

    #[test]
    fn test_unchanged_file_never_drifts_and_skips_hashing() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("steady.txt");
        std::fs::write(&file, "steady content").unwrap();

        let mut mon = monitor();
        mon.load(Valuables {
            files: vec![file],
            ..Default::default()
        });

        let report = mon.check();
        assert!(report.files.is_empty());
        // Stats were unchanged, so the hash fallback never ran
        assert_eq!(mon.drift_hash_recomputes(), 0);
    }

    #[test]
    fn test_unavailable_baseline_is_never_reported() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("ghost.txt");
        std::fs::write(&file, "now you see me").unwrap();

        let mut mon = monitor();
        mon.load(Valuables {
            files: vec![file.clone()],
            ..Default::default()
        });

        // Force the sentinel, then change the file on disk
        mon.file_baselines[0] = FileBaseline::Unavailable;
        std::fs::write(&file, "completely different content").unwrap();

        let report = mon.check();
        assert!(
            report.files.is_empty(),
            "unavailable baselines must be skipped regardless of on-disk state"
        );
    }

    #[test]
    fn test_vanished_file_is_skipped_not_reported() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("gone.txt");
        std::fs::write(&file, "here today").unwrap();

        let mut mon = monitor();
        mon.load(Valuables {
            files: vec![file.clone()],
            ..Default::default()
        });

        std::fs::remove_file(&file).unwrap();
        let report = mon.check();
        assert!(report.files.is_empty());
        // The follow-up rebase records the sentinel
        assert!(mon.file_baselines[0].is_unavailable());
    }

    #[test]
    fn test_same_stat_content_change_caught_by_hash_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("sneaky.txt");
        std::fs::write(&file, "original").unwrap();

        let mut mon = monitor();
        mon.load(Valuables {
            files: vec![file.clone()],
            ..Default::default()
        });

        // Craft a baseline matching the file's current atime (so the
        // access-time branch stays quiet) but with a stale mtime, the way
        // a same-size overwrite that slipped past one poll would look
        let meta = std::fs::metadata(&file).unwrap();
        mon.file_baselines[0] = FileBaseline::Observed {
            content_hash: "deadbeef".to_string(),
            accessed: meta.accessed().unwrap(),
            modified: meta.modified().unwrap() - Duration::from_secs(10),
            size: meta.len(),
        };

        let report = mon.check();
        assert_eq!(report.files, vec![file]);
        assert_eq!(mon.drift_hash_recomputes(), 1);
    }

    #[test]
    fn test_stat_change_with_matching_hash_still_drifts() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("touched.txt");
        std::fs::write(&file, "same bytes").unwrap();

        let mut mon = monitor();
        mon.load(Valuables {
            files: vec![file.clone()],
            ..Default::default()
        });

        // Stale mtime in the baseline, but the content hash is accurate:
        // conservative policy still flags the stat change
        let meta = std::fs::metadata(&file).unwrap();
        let FileBaseline::Observed { content_hash, .. } = mon.file_baselines[0].clone() else {
            panic!("expected observed baseline");
        };
        mon.file_baselines[0] = FileBaseline::Observed {
            content_hash,
            accessed: meta.accessed().unwrap(),
            modified: meta.modified().unwrap() - Duration::from_secs(10),
            size: meta.len(),
        };

        let report = mon.check();
        assert_eq!(report.files, vec![file]);
    }

    #[test]
    fn test_end_to_end_overwrite_reported_once() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("target.txt");
        std::fs::write(&file, "A").unwrap();

        let mut mon = monitor();
        mon.load(Valuables {
            files: vec![file.clone()],
            ..Default::default()
        });

        // Overwrite with different content and size
        std::fs::write(&file, "BB").unwrap();

        let first = mon.check();
        assert_eq!(first.files, vec![file]);

        // No further change: the unconditional rebase already adopted the
        // new state, so the second pass is clean
        let second = mon.check();
        assert!(second.files.is_empty());
    }

    // ==================== dir drift tests ====================

    #[test]
    fn test_dir_modification_reported() {
        let dir = tempfile::tempdir().unwrap();
        let watched = dir.path().join("watched");
        std::fs::create_dir(&watched).unwrap();
        std::fs::write(watched.join("existing"), "x").unwrap();

        let mut mon = monitor();
        mon.load(Valuables {
            dirs: vec![watched.clone()],
            ..Default::default()
        });

        // Coarse-mtime filesystems need the change to land in a later tick
        std::thread::sleep(Duration::from_millis(1100));
        std::fs::write(watched.join("dropped_by_intruder"), "payload").unwrap();

        let report = mon.check();
        assert_eq!(report.dirs, vec![watched]);
    }

    #[test]
    fn test_untouched_dir_not_reported() {
        let dir = tempfile::tempdir().unwrap();

        let mut mon = monitor();
        mon.load(Valuables {
            dirs: vec![dir.path().to_path_buf()],
            ..Default::default()
        });

        let report = mon.check();
        assert!(report.dirs.is_empty());
    }

    #[test]
    fn test_vanished_dir_is_skipped() {
        let parent = tempfile::tempdir().unwrap();
        let watched = parent.path().join("doomed");
        std::fs::create_dir(&watched).unwrap();

        let mut mon = monitor();
        mon.load(Valuables {
            dirs: vec![watched.clone()],
            ..Default::default()
        });

        std::fs::remove_dir(&watched).unwrap();
        let report = mon.check();
        assert!(report.dirs.is_empty());
        assert!(mon.dir_baselines[0].is_none());
    }

    // ==================== log drift tests ====================

    #[test]
    fn test_log_entry_count_decrease_reported() {
        let dir = tempfile::tempdir().unwrap();
        let logs = dir.path().join("logs");
        std::fs::create_dir(&logs).unwrap();
        for i in 0..3 {
            std::fs::write(logs.join(format!("log.{i}")), "entry").unwrap();
        }

        let mut mon = monitor();
        mon.load(Valuables {
            logs: vec![logs.clone()],
            ..Default::default()
        });

        std::fs::remove_file(logs.join("log.1")).unwrap();
        let report = mon.check();
        assert_eq!(report.logs, vec![logs]);
    }

    #[test]
    fn test_log_entry_count_growth_not_reported() {
        let dir = tempfile::tempdir().unwrap();
        let logs = dir.path().join("logs");
        std::fs::create_dir(&logs).unwrap();
        std::fs::write(logs.join("log.0"), "entry").unwrap();

        let mut mon = monitor();
        mon.load(Valuables {
            logs: vec![logs.clone()],
            ..Default::default()
        });

        // Logs growing is business as usual
        std::fs::write(logs.join("log.1"), "entry").unwrap();
        std::fs::write(logs.join("log.2"), "entry").unwrap();
        let report = mon.check();
        assert!(report.logs.is_empty());
    }

    #[test]
    fn test_log_entry_count_unchanged_not_reported() {
        let dir = tempfile::tempdir().unwrap();
        let logs = dir.path().join("logs");
        std::fs::create_dir(&logs).unwrap();
        std::fs::write(logs.join("log.0"), "entry").unwrap();

        let mut mon = monitor();
        mon.load(Valuables {
            logs: vec![logs.clone()],
            ..Default::default()
        });

        assert!(mon.check().logs.is_empty());
    }

    // ==================== rebase tests ====================

    #[test]
    fn test_rebase_is_idempotent_without_changes() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("stable.txt");
        std::fs::write(&file, "stable").unwrap();
        let logs = dir.path().join("logs");
        std::fs::create_dir(&logs).unwrap();

        let mut mon = monitor();
        mon.load(Valuables {
            files: vec![file],
            dirs: vec![dir.path().to_path_buf()],
            logs: vec![logs],
        });

        let first_files = mon.file_baselines.clone();
        let first_dirs = mon.dir_baselines.clone();
        let first_logs = mon.log_baselines.clone();

        mon.rebase_all();
        assert_eq!(mon.file_baselines, first_files);
        assert_eq!(mon.dir_baselines, first_dirs);
        assert_eq!(mon.log_baselines, first_logs);

        assert!(mon.check().is_empty());
    }

    #[test]
    fn test_set_valuables_replaces_and_rebases() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        std::fs::write(&a, "a").unwrap();
        std::fs::write(&b, "b").unwrap();

        let mut mon = monitor();
        mon.load(Valuables {
            files: vec![a],
            ..Default::default()
        });

        mon.set_valuables(Valuables {
            files: vec![b.clone()],
            ..Default::default()
        });

        assert_eq!(mon.valuables().files, vec![b]);
        assert_eq!(mon.file_baselines.len(), 1);
        assert!(!mon.file_baselines[0].is_unavailable());
        // Fresh baseline means no instant drift
        assert!(mon.check().is_empty());
    }
}
