// tests/change_detector.rs

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use reloader::fs::RealFileSystem;
use reloader::fs::mock::{MockFileSystem, mtime};
use reloader::watch::{
    ChangeDetector, IgnoreRules, PathCollector, PollOutcome, SourceFilter, StaticInventory,
    StaticSearchPath,
};
use reloader_test_utils::init_tracing;
use reloader_test_utils::source_tree::{SourceTree, bump_mtime, set_mtime};

type TestResult = Result<(), Box<dyn Error>>;

fn detector_over(fs: &MockFileSystem, root: &str) -> ChangeDetector {
    let collector = PathCollector::new(
        Arc::new(fs.clone()),
        Arc::new(StaticInventory::default()),
        Arc::new(StaticSearchPath::new([root])),
        IgnoreRules::default(),
        SourceFilter::default(),
    );
    ChangeDetector::new(collector)
}

#[test]
fn first_poll_only_records_baselines() {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_file_with_mtime("/app/main.py", 100);
    fs.add_file_with_mtime("/app/util.py", 200);

    let mut detector = detector_over(&fs, "/app");

    assert_eq!(detector.poll(), PollOutcome::Unchanged);
    assert_eq!(detector.tracked(), 2);
    assert_eq!(
        detector.cached(&PathBuf::from("/app/main.py")),
        Some(mtime(100))
    );
}

#[test]
fn later_modification_time_triggers() {
    let fs = MockFileSystem::new();
    fs.add_file_with_mtime("/app/main.py", 100);

    let mut detector = detector_over(&fs, "/app");
    assert_eq!(detector.seed_baseline(), 1);

    fs.set_modified("/app/main.py", 101).unwrap();

    assert_eq!(
        detector.poll(),
        PollOutcome::Changed(PathBuf::from("/app/main.py"))
    );
}

#[test]
fn unchanged_modification_time_does_not_trigger() {
    let fs = MockFileSystem::new();
    fs.add_file_with_mtime("/app/main.py", 100);

    let mut detector = detector_over(&fs, "/app");
    detector.seed_baseline();

    for _ in 0..3 {
        assert_eq!(detector.poll(), PollOutcome::Unchanged);
    }
}

#[test]
fn earlier_modification_time_does_not_trigger() {
    let fs = MockFileSystem::new();
    fs.add_file_with_mtime("/app/main.py", 100);

    let mut detector = detector_over(&fs, "/app");
    detector.seed_baseline();

    fs.set_modified("/app/main.py", 50).unwrap();

    assert_eq!(detector.poll(), PollOutcome::Unchanged);
    assert_eq!(
        detector.cached(&PathBuf::from("/app/main.py")),
        Some(mtime(100))
    );
}

#[test]
fn vanished_files_are_skipped() {
    let fs = MockFileSystem::new();
    fs.add_file_with_mtime("/app/main.py", 100);
    fs.add_file_with_mtime("/app/gone.py", 100);

    let mut detector = detector_over(&fs, "/app");
    detector.seed_baseline();

    fs.remove_file("/app/gone.py");

    assert_eq!(detector.poll(), PollOutcome::Unchanged);
}

#[test]
fn files_appearing_later_are_baselined_not_reported() {
    let fs = MockFileSystem::new();
    fs.add_file_with_mtime("/app/main.py", 100);

    let mut detector = detector_over(&fs, "/app");
    detector.seed_baseline();
    assert_eq!(detector.tracked(), 1);

    fs.add_file_with_mtime("/app/new.py", 500);

    assert_eq!(detector.poll(), PollOutcome::Unchanged);
    assert_eq!(detector.tracked(), 2);

    fs.set_modified("/app/new.py", 501).unwrap();
    assert_eq!(
        detector.poll(),
        PollOutcome::Changed(PathBuf::from("/app/new.py"))
    );
}

#[test]
fn cache_keeps_the_baseline_after_a_trigger() {
    let fs = MockFileSystem::new();
    fs.add_file_with_mtime("/app/main.py", 100);

    let mut detector = detector_over(&fs, "/app");
    detector.seed_baseline();

    fs.set_modified("/app/main.py", 150).unwrap();

    assert!(matches!(detector.poll(), PollOutcome::Changed(_)));
    assert_eq!(
        detector.cached(&PathBuf::from("/app/main.py")),
        Some(mtime(100))
    );
    // Still newer than the baseline, so it keeps reporting.
    assert!(matches!(detector.poll(), PollOutcome::Changed(_)));
}

#[test]
fn detects_real_file_modifications() -> TestResult {
    init_tracing();
    let tree = SourceTree::new()?;
    let main = tree.file("src/main.py")?;
    let other = tree.file("src/other.py")?;
    set_mtime(&main, 1_000_000)?;
    set_mtime(&other, 1_000_000)?;

    let collector = PathCollector::new(
        Arc::new(RealFileSystem),
        Arc::new(StaticInventory::default()),
        Arc::new(StaticSearchPath::new([tree.path("src")])),
        IgnoreRules::default(),
        SourceFilter::default(),
    );
    let mut detector = ChangeDetector::new(collector);

    assert_eq!(detector.seed_baseline(), 2);
    assert_eq!(detector.poll(), PollOutcome::Unchanged);

    bump_mtime(&other, 5)?;

    assert_eq!(detector.poll(), PollOutcome::Changed(other));
    Ok(())
}
