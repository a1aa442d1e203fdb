//! Change tracker tests against on-disk dialect sources.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use dialect_assist::project::{ResourceGroup, StaticProjectResources};
use dialect_assist::{AssistConfig, ChangeBatch, ChangeTracker, DialectRegistry, ProjectKey};

use crate::helpers::fixtures::{project_dialect, project_dialect_with, write_archive, write_file};

const IDLE: Duration = Duration::from_secs(10);

fn setup(groups: Vec<ResourceGroup>) -> (Arc<DialectRegistry>, ChangeTracker, ProjectKey) {
    let resources = StaticProjectResources::new().with_project("app", groups);
    let registry = Arc::new(
        DialectRegistry::new(AssistConfig::default().with_shutdown_grace_period(IDLE))
            .with_resources(Arc::new(resources)),
    );
    let tracker = ChangeTracker::new(registry.clone());
    (registry, tracker, ProjectKey::from("app"))
}

fn names(registry: &DialectRegistry, project: &ProjectKey) -> Vec<String> {
    registry
        .attribute_processors_for_project(project)
        .iter()
        .map(|p| p.name().to_string())
        .collect()
}

#[test]
fn test_loaded_sources_are_tracked() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "ext.xml", &project_dialect("a"));
    let (registry, tracker, project) = setup(vec![ResourceGroup::Directory(dir.path().into())]);

    assert!(!tracker.tracked().is_tracked(&path));
    registry.ensure_project_loaded(&project);
    assert!(tracker.tracked().is_tracked(&path));
}

#[test]
fn test_changed_source_is_reloaded() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "ext.xml", &project_dialect("before"));
    let (registry, tracker, project) = setup(vec![ResourceGroup::Files(vec![path.clone()])]);
    assert_eq!(names(&registry, &project), vec!["before"]);

    write_file(
        dir.path(),
        "ext.xml",
        &project_dialect_with(&["after".into(), "extra".into()]),
    );
    assert_eq!(tracker.notify(ChangeBatch::changed([&path])), 1);
    assert!(tracker.wait_until_idle(IDLE));

    assert_eq!(names(&registry, &project), vec!["after", "extra"]);
}

#[test]
fn test_removed_source_drops_its_items() {
    let dir = tempfile::tempdir().unwrap();
    let keep = write_file(dir.path(), "keep.xml", &project_dialect("kept"));
    let gone = write_file(dir.path(), "gone.xml", &project_dialect("gone"));
    let (registry, tracker, project) =
        setup(vec![ResourceGroup::Files(vec![keep.clone(), gone.clone()])]);
    assert_eq!(names(&registry, &project), vec!["gone", "kept"]);

    std::fs::remove_file(&gone).unwrap();
    assert_eq!(tracker.notify(ChangeBatch::removed([&gone])), 1);
    assert!(tracker.wait_until_idle(IDLE));

    assert_eq!(names(&registry, &project), vec!["kept"]);
    assert_eq!(registry.project_sources(&project).len(), 1);
}

#[test]
fn test_source_broken_by_an_edit_drops_its_items() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "ext.xml", &project_dialect("a"));
    let (registry, tracker, project) = setup(vec![ResourceGroup::Files(vec![path.clone()])]);
    assert_eq!(names(&registry, &project), vec!["a"]);

    write_file(dir.path(), "ext.xml", "<dialect");
    tracker.notify(ChangeBatch::changed([&path]));
    assert!(tracker.wait_until_idle(IDLE));

    assert!(names(&registry, &project).is_empty());
}

#[test]
fn test_archive_change_reloads_every_entry() {
    let dir = tempfile::tempdir().unwrap();
    let build = |a: &str, b: &str| {
        write_archive(
            dir.path(),
            "dep.jar",
            &[
                ("one.xml", project_dialect(a).as_str()),
                ("two.xml", project_dialect(b).as_str()),
            ],
        )
    };
    let jar = build("a1", "b1");
    let (registry, tracker, project) = setup(vec![ResourceGroup::Archive(jar.clone())]);
    assert_eq!(names(&registry, &project), vec!["a1", "b1"]);

    build("a2", "b2");
    assert_eq!(tracker.notify(ChangeBatch::changed([&jar])), 2);
    assert!(tracker.wait_until_idle(IDLE));

    assert_eq!(names(&registry, &project), vec!["a2", "b2"]);
}

#[test]
fn test_untracked_paths_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "ext.xml", &project_dialect("a"));
    let (registry, tracker, project) = setup(vec![ResourceGroup::Files(vec![path])]);
    registry.ensure_project_loaded(&project);

    let batch = ChangeBatch::changed([Path::new("/elsewhere/other.xml")]);
    assert_eq!(tracker.notify(batch), 0);
    assert!(tracker.wait_until_idle(Duration::from_millis(10)));
}

#[test]
fn test_notifications_after_shutdown_are_discarded() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "ext.xml", &project_dialect("a"));
    let (registry, tracker, project) = setup(vec![ResourceGroup::Files(vec![path.clone()])]);
    assert_eq!(names(&registry, &project), vec!["a"]);

    tracker.shutdown();
    write_file(dir.path(), "ext.xml", &project_dialect("b"));
    assert_eq!(tracker.notify(ChangeBatch::changed([&path])), 0);

    assert_eq!(names(&registry, &project), vec!["a"]);
}

// =============================================================================
// RELOADS UNDER CONCURRENT QUERIES
// =============================================================================

fn generation_names(generation: usize) -> Vec<String> {
    (0..20).map(|i| format!("gen{generation}item{i:02}")).collect()
}

/// Replace `ext.xml` in one rename so the worker never reads a torn file.
fn publish(dir: &Path, generation: usize) -> PathBuf {
    let content = project_dialect_with(&generation_names(generation));
    let staged = write_file(dir, "ext.staged", &content);
    let path = dir.join("ext.xml");
    std::fs::rename(staged, &path).unwrap();
    path
}

#[test]
fn test_queries_during_reloads_see_whole_generations() {
    const LAST: usize = 30;

    let dir = tempfile::tempdir().unwrap();
    let path = publish(dir.path(), 0);
    let (registry, tracker, project) = setup(vec![ResourceGroup::Files(vec![path.clone()])]);
    assert_eq!(names(&registry, &project), generation_names(0));

    let done = AtomicBool::new(false);
    std::thread::scope(|scope| {
        let queries: Vec<_> = (0..50)
            .map(|_| {
                scope.spawn(|| {
                    while !done.load(Ordering::Relaxed) {
                        let seen = names(&registry, &project);
                        assert_eq!(seen.len(), 20, "partial item set: {seen:?}");
                        let generation = seen[0].split_once("item").unwrap().0;
                        let whole = seen
                            .iter()
                            .all(|n| n.split_once("item").unwrap().0 == generation);
                        assert!(whole, "mixed generations: {seen:?}");
                    }
                })
            })
            .collect();

        for generation in 1..=LAST {
            publish(dir.path(), generation);
            assert_eq!(tracker.notify(ChangeBatch::changed([&path])), 1);
        }
        let idle = tracker.wait_until_idle(IDLE);
        done.store(true, Ordering::Relaxed);

        let results: Vec<_> = queries.into_iter().map(|q| q.join()).collect();
        assert!(idle);
        assert!(results.iter().all(Result::is_ok));
    });

    assert_eq!(names(&registry, &project), generation_names(LAST));
}
