use std::path::Path;
use std::sync::atomic::AtomicBool;
use tempfile::TempDir;

use dev_space_audit::common::errors::AuditError;
use dev_space_audit::common::safety::HomeBoundary;
use dev_space_audit::scanner::report;
use dev_space_audit::scanner::size::compute_size;
use dev_space_audit::scanner::targets::{self, ScanResult, TargetConfig};
use dev_space_audit::scanner::{self, ScanOptions};

fn write_bytes(path: &Path, len: usize) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, vec![b'x'; len]).unwrap();
}

fn result(name: &str, category: &str, size: u64) -> ScanResult {
    ScanResult {
        name: name.to_string(),
        category: category.to_string(),
        path: std::path::PathBuf::from(format!("/home/dev/{}", name)),
        size,
        exists: size > 0,
        error: None,
    }
}

// ─── Size accumulator ────────────────────────────────────────────────────────

#[test]
fn test_tree_size_equals_sum_of_files() {
    let dir = TempDir::new().unwrap();
    write_bytes(&dir.path().join("a.bin"), 10);
    write_bytes(&dir.path().join("x/b.bin"), 200);
    write_bytes(&dir.path().join("x/y/z/c.bin"), 3000);
    std::fs::create_dir_all(dir.path().join("empty/nested")).unwrap();

    assert_eq!(compute_size(dir.path()).unwrap(), 3210);
}

#[test]
fn test_nonexistent_path_is_zero() {
    assert_eq!(compute_size(Path::new("/nonexistent/dev-space-audit/abc")).unwrap(), 0);
}

#[cfg(unix)]
#[test]
fn test_unexpected_root_error_is_reported() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("file.bin");
    write_bytes(&file, 16);

    // A regular file used as a directory fails with ENOTDIR, not NotFound
    let child = file.join("child");
    match compute_size(&child).unwrap_err() {
        AuditError::Size { path, .. } => assert_eq!(path, child),
        other => panic!("unexpected error: {other}"),
    }
}

#[cfg(unix)]
#[test]
fn test_symlink_root_is_zero() {
    let dir = TempDir::new().unwrap();
    let real = dir.path().join("real");
    write_bytes(&real.join("big.bin"), 5000);
    let link = dir.path().join("link");
    std::os::unix::fs::symlink(&real, &link).unwrap();

    assert_eq!(compute_size(&link).unwrap(), 0);
}

#[cfg(unix)]
#[test]
fn test_symlinks_inside_tree_are_not_followed() {
    let dir = TempDir::new().unwrap();
    let outside = dir.path().join("outside");
    write_bytes(&outside.join("huge.bin"), 100_000);
    let tree = dir.path().join("tree");
    write_bytes(&tree.join("own.bin"), 42);
    std::os::unix::fs::symlink(&outside, tree.join("dir-link")).unwrap();
    std::os::unix::fs::symlink(outside.join("huge.bin"), tree.join("file-link")).unwrap();

    assert_eq!(compute_size(&tree).unwrap(), 42);
}

#[cfg(unix)]
#[test]
fn test_circular_symlink_terminates() {
    let dir = TempDir::new().unwrap();
    write_bytes(&dir.path().join("f.bin"), 7);
    std::os::unix::fs::symlink(dir.path(), dir.path().join("loop")).unwrap();

    assert_eq!(compute_size(dir.path()).unwrap(), 7);
}

#[cfg(unix)]
#[test]
fn test_unreadable_subtree_is_skipped() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    write_bytes(&dir.path().join("ok.bin"), 100);
    let locked = dir.path().join("locked");
    write_bytes(&locked.join("hidden.bin"), 900);
    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o000)).unwrap();

    // Privileged users read through the mode bits; nothing to assert then
    let readable_anyway = std::fs::read_dir(&locked).is_ok();
    let size = compute_size(dir.path());
    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();

    if readable_anyway {
        assert_eq!(size.unwrap(), 1000);
    } else {
        assert_eq!(size.unwrap(), 100);
    }
}

// ─── Scanner ─────────────────────────────────────────────────────────────────

#[test]
fn test_scan_missing_plain_target() {
    let dir = TempDir::new().unwrap();
    let target = TargetConfig::new(dir.path().join(".npm"), "npm", "Node");
    let result = scanner::scan(&target);
    assert!(!result.exists);
    assert_eq!(result.size, 0);
    assert!(result.error.is_none());
}

#[test]
fn test_scan_npm_scenario() {
    let dir = TempDir::new().unwrap();
    let home = HomeBoundary::new(dir.path());
    let npm = home.expand("~/.npm");
    write_bytes(&npm.join("_cacache/index"), 1_000_000);
    write_bytes(&npm.join("_cacache/content/ab/cd"), 234_000);
    write_bytes(&npm.join("_logs/debug.log"), 567);

    let target = TargetConfig::new(npm, "npm Cache (~/.npm)", targets::NODE);
    let result = scanner::scan(&target);
    assert!(result.exists);
    assert_eq!(result.size, 1_234_567);
    assert_eq!(result.name, "npm Cache (~/.npm)");
}

#[test]
fn test_scan_glob_scenario_sums_matches() {
    let dir = TempDir::new().unwrap();
    let home = HomeBoundary::new(dir.path());
    let google = home.expand("~/Library/Caches/Google");
    write_bytes(&google.join("AndroidStudio2023.1/caches/a"), 1000);
    write_bytes(&google.join("AndroidStudio2024.2/caches/b"), 2000);
    write_bytes(&google.join("Chrome/cache"), 9999);

    let target = TargetConfig::glob(
        home.expand("~/Library/Caches/Google/AndroidStudio*"),
        "Android Studio Cache",
        targets::ANDROID,
    );
    let result = scanner::scan(&target);
    assert!(result.exists);
    assert_eq!(result.size, 3000);
    // The pattern, not a match, identifies the result
    assert!(result.path.to_string_lossy().ends_with("AndroidStudio*"));
}

#[test]
fn test_scan_glob_without_matches() {
    let dir = TempDir::new().unwrap();
    let target = TargetConfig::glob(dir.path().join("AndroidStudio*"), "AS", "Android");
    let result = scanner::scan(&target);
    assert!(!result.exists);
    assert_eq!(result.size, 0);
    assert!(result.error.is_none());
}

#[test]
fn test_scan_invalid_glob_reports_error() {
    let dir = TempDir::new().unwrap();
    let target = TargetConfig::glob(dir.path().join("[broken"), "Broken", "Misc");
    let result = scanner::scan(&target);
    assert!(!result.exists);
    assert_eq!(result.size, 0);
    assert!(result.error.is_some());
}

#[test]
fn test_scan_all_preserves_order() {
    let dir = TempDir::new().unwrap();
    let mut catalog = Vec::new();
    for i in 0..40 {
        let path = dir.path().join(format!("t{i}"));
        if i % 3 != 0 {
            write_bytes(&path.join("data"), (i + 1) * 10);
        }
        catalog.push(TargetConfig::new(path, &format!("target {i}"), "Cat"));
    }

    for parallel in [true, false] {
        let options = ScanOptions {
            parallel,
            show_progress: false,
        };
        let results = scanner::scan_all(&catalog, &options);
        assert_eq!(results.len(), catalog.len());
        for (i, (r, t)) in results.iter().zip(&catalog).enumerate() {
            assert_eq!(r.path, t.path);
            let expected = if i % 3 == 0 { 0 } else { ((i + 1) * 10) as u64 };
            assert_eq!(r.size, expected);
            assert_eq!(r.exists, i % 3 != 0);
        }
    }
}

#[test]
fn test_scan_cancelled_before_start() {
    let dir = TempDir::new().unwrap();
    let catalog = vec![TargetConfig::new(dir.path(), "tmp", "Cat")];
    let cancel = AtomicBool::new(true);
    let err = scanner::scan_all_cancellable(&catalog, &ScanOptions::default(), &cancel).unwrap_err();
    assert!(matches!(err, AuditError::Cancelled));
}

#[test]
fn test_run_scan_builds_report() {
    let dir = TempDir::new().unwrap();
    let home = HomeBoundary::new(dir.path());
    write_bytes(&home.expand("~/.npm/a"), 300);
    write_bytes(&home.expand("~/.gradle/b"), 500);
    let catalog = targets::builtin_targets(&home);

    let report = scanner::run_scan(&catalog, &ScanOptions::default(), 5, &AtomicBool::new(false)).unwrap();
    assert_eq!(report.results.len(), catalog.len());
    assert_eq!(report.grand_total, 800);
    assert_eq!(report.top[0].name, "Gradle Cache");
    assert_eq!(report.top[1].name, "npm Cache (~/.npm)");
}

// ─── Aggregation ─────────────────────────────────────────────────────────────

#[test]
fn test_grand_total_equals_sum_of_category_totals() {
    let results = vec![
        result("a", "Node", 100),
        result("b", "Xcode", 2500),
        result("c", "Node", 0),
        result("d", "Android", 40),
        result("e", "Xcode", 1),
    ];
    let groups = report::group_by_category(&results);
    let totals = report::category_totals(&groups);
    let sum: u64 = totals.iter().map(|(_, t)| t).sum();
    assert_eq!(report::grand_total(&results), sum);
    assert_eq!(
        totals,
        vec![
            ("Node".to_string(), 100),
            ("Xcode".to_string(), 2501),
            ("Android".to_string(), 40),
        ]
    );
}

#[test]
fn test_top_n_limits_filters_and_sorts() {
    let results: Vec<_> = (0..8u64)
        .map(|i| result(&format!("r{i}"), "C", i * 100))
        .collect();
    let top = report::top_n(&results, 5);
    assert_eq!(top.len(), 5);
    assert!(top.iter().all(|r| r.exists && r.size > 0));
    assert!(top.windows(2).all(|w| w[0].size >= w[1].size));
    assert_eq!(top[0].name, "r7");
}

#[test]
fn test_top_n_skips_absent_and_empty() {
    let mut missing = result("missing", "C", 0);
    missing.exists = false;
    let mut empty = result("empty", "C", 0);
    empty.exists = true;
    let results = vec![missing, empty, result("real", "C", 10)];
    let top = report::top_n(&results, 5);
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].name, "real");
}

#[test]
fn test_top_n_ties_keep_scan_order() {
    let results = vec![
        result("first", "C", 500),
        result("big", "C", 900),
        result("second", "C", 500),
        result("third", "C", 500),
    ];
    let names: Vec<_> = report::top_n(&results, 4)
        .into_iter()
        .map(|r| r.name)
        .collect();
    assert_eq!(names, ["big", "first", "second", "third"]);
}

#[test]
fn test_deletable_pairs_by_path_and_sorts() {
    let catalog = vec![
        TargetConfig::new("/home/dev/small", "small", "C"),
        TargetConfig::new("/home/dev/none", "none", "C"),
        TargetConfig::new("/home/dev/large", "large", "C"),
    ];
    let results = vec![
        result("small", "C", 10),
        result("none", "C", 0),
        result("large", "C", 99),
    ];
    let picked = report::deletable(&catalog, &results);
    let names: Vec<_> = picked.iter().map(|d| d.target.name.as_str()).collect();
    assert_eq!(names, ["large", "small"]);
}
