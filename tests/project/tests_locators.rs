//! Locator and loader tests against on-disk fixtures.

use std::sync::Arc;
use std::time::Duration;

use dialect_assist::dialect::{ItemKind, StaticClassMembers};
use dialect_assist::project::{
    BundledDialectLocator, DialectLoader, DialectLocator, ProjectDependencyLocator, ResourceGroup,
};
use dialect_assist::{AssistConfig, SourcePath};
use rstest::rstest;
use walkdir::WalkDir;

use crate::helpers::fixtures::{
    NOT_A_DIALECT, OBJECT_DIALECT, STANDARD_DIALECT, STRICT_DIALECT, project_dialect,
    write_archive, write_file,
};

// =============================================================================
// PROJECT DEPENDENCY SCAN
// =============================================================================

#[test]
fn test_scan_finds_definitions_in_every_group_kind() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    let src = write_file(root, "src/dialects/ext.xml", &project_dialect("one"));
    write_file(root, "src/config/beans.xml", NOT_A_DIALECT);
    write_file(root, "src/readme.txt", "not xml");
    let jar = write_archive(
        root,
        "lib/security.jar",
        &[
            ("META-INF/MANIFEST.MF", "Manifest-Version: 1.0"),
            ("META-INF/sec-dialect.xml", STRICT_DIALECT),
            ("META-INF/spring.xml", NOT_A_DIALECT),
        ],
    );
    let loose = write_file(root, "extra/app.xml", OBJECT_DIALECT);

    let locator = ProjectDependencyLocator::new(vec![
        ResourceGroup::Directory(root.join("src")),
        ResourceGroup::Archive(jar.clone()),
        ResourceGroup::Files(vec![loose.clone()]),
    ]);
    let paths: Vec<SourcePath> = locator.locate().into_iter().map(|s| s.path).collect();

    assert_eq!(
        paths,
        vec![
            SourcePath::file(src),
            SourcePath::archive_entry(jar, "META-INF/sec-dialect.xml"),
            SourcePath::file(loose),
        ]
    );
}

#[test]
fn test_loose_archives_are_opened() {
    let dir = tempfile::tempdir().unwrap();
    let jar = write_archive(dir.path(), "dep.jar", &[("d.xml", STANDARD_DIALECT)]);

    let locator = ProjectDependencyLocator::new(vec![ResourceGroup::Files(vec![jar.clone()])]);
    let sources = locator.locate();

    assert_eq!(sources.len(), 1);
    assert_eq!(sources[0].path, SourcePath::archive_entry(jar, "d.xml"));
}

#[test]
fn test_scan_with_single_worker_keeps_group_order() {
    let dir = tempfile::tempdir().unwrap();
    let groups: Vec<ResourceGroup> = (0..6)
        .map(|i| {
            let folder = dir.path().join(format!("g{i}"));
            write_file(&folder, "d.xml", &project_dialect(&format!("a{i}")));
            ResourceGroup::Directory(folder)
        })
        .collect();

    let config = AssistConfig::default()
        .with_scan_threads(1)
        .with_scan_grace_period(Duration::from_secs(30));
    let sources = ProjectDependencyLocator::from_config(groups, &config).locate();

    let folders: Vec<String> = sources
        .iter()
        .map(|s| match &s.path {
            SourcePath::File(path) => path
                .parent()
                .and_then(|p| p.file_name())
                .unwrap()
                .to_string_lossy()
                .into_owned(),
            other => panic!("unexpected source {other}"),
        })
        .collect();
    assert_eq!(folders, vec!["g0", "g1", "g2", "g3", "g4", "g5"]);
}

/// A group whose only candidate is a FIFO blocks its worker until a writer
/// opens the other end.
#[cfg(unix)]
#[test]
fn test_expired_grace_period_keeps_finished_groups() {
    let dir = tempfile::tempdir().unwrap();
    let first = write_file(dir.path(), "first/d.xml", &project_dialect("first"));
    let last = write_file(dir.path(), "last/d.xml", &project_dialect("last"));
    let fifo = dir.path().join("stalled.xml");
    let status = std::process::Command::new("mkfifo").arg(&fifo).status().unwrap();
    assert!(status.success());

    let config = AssistConfig::default()
        .with_scan_threads(3)
        .with_scan_grace_period(Duration::from_millis(500));
    let locator = ProjectDependencyLocator::from_config(
        vec![
            ResourceGroup::Files(vec![first.clone()]),
            ResourceGroup::Files(vec![fifo.clone()]),
            ResourceGroup::Files(vec![last.clone()]),
        ],
        &config,
    );

    let started = std::time::Instant::now();
    let paths: Vec<SourcePath> = locator.locate().into_iter().map(|s| s.path).collect();
    assert!(started.elapsed() < Duration::from_secs(10));
    assert_eq!(paths, vec![SourcePath::file(first), SourcePath::file(last)]);

    // Release the stalled worker; its late result has nowhere to go
    let mut writer = std::fs::OpenOptions::new().write(true).open(&fifo).unwrap();
    std::io::Write::write_all(&mut writer, project_dialect("late").as_bytes()).unwrap();
}

#[test]
fn test_missing_groups_yield_nothing() {
    let locator = ProjectDependencyLocator::new(vec![
        ResourceGroup::Directory("/does/not/exist".into()),
        ResourceGroup::Archive("/does/not/exist.jar".into()),
    ]);
    assert!(locator.locate().is_empty());
}

// =============================================================================
// BUNDLED DIRECTORY
// =============================================================================

#[test]
fn test_bundled_directory_is_read_in_name_order() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "b-security.xml", STRICT_DIALECT);
    write_file(dir.path(), "a-standard.xml", STANDARD_DIALECT);
    write_file(dir.path(), "notes.md", "# notes");

    let listed: Vec<String> = WalkDir::new(dir.path())
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(listed, vec!["a-standard.xml", "b-security.xml", "notes.md"]);

    let config = AssistConfig::default().with_bundled_dir(dir.path());
    let loaded = DialectLoader::default().load_dialects(&BundledDialectLocator::from_config(&config));
    let prefixes: Vec<&str> = loaded.iter().map(|d| d.dialect.prefix()).collect();
    assert_eq!(prefixes, vec!["th", "sec"]);
}

// =============================================================================
// LOADER
// =============================================================================

#[rstest]
#[case::not_xml("<dialect")]
#[case::wrong_namespace(NOT_A_DIALECT)]
#[case::missing_prefix(
    r#"<dialect xmlns="http://www.thymeleaf.org/extras/dialect" namespace-uri="http://x"/>"#
)]
fn test_malformed_sources_are_skipped(#[case] malformed: &str) {
    let locator = BundledDialectLocator::embedded_only()
        .with_embedded("bad.xml", malformed.as_bytes())
        .with_embedded("good.xml", STANDARD_DIALECT.as_bytes());

    let loaded = DialectLoader::default().load_dialects(&locator);
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].dialect.prefix(), "th");
}

#[test]
fn test_unresolved_expression_object_loads_without_helpers() {
    let locator =
        BundledDialectLocator::embedded_only().with_embedded("app.xml", OBJECT_DIALECT.as_bytes());

    let loaded = DialectLoader::default().load_dialects(&locator);
    assert_eq!(loaded.len(), 1);
    assert!(loaded[0].items.is_empty());

    let lister = StaticClassMembers::new().with_class(
        "org.example.UserHelper",
        [dialect_assist::dialect::ClassMember::method("isActive")],
    );
    let loaded = DialectLoader::new(Arc::new(lister)).load_dialects(&locator);
    assert_eq!(loaded[0].items.len(), 1);
    assert_eq!(loaded[0].items[0].kind(), ItemKind::HelperMethod);
    assert_eq!(loaded[0].items[0].full_name(), "#user.active");
}
