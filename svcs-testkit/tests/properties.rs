//! Behavioural properties of the store and commit engine, checked end to end
//! against the real filesystem.

use std::collections::HashSet;
use std::time::Duration;

use fs_err as fs;
use svcs_testkit::svcs_core::helpers::layout::RepoLayout;
use svcs_testkit::svcs_core::{CommitId, CommitInfo, ErrorKind};
use svcs_testkit::{TestRoot, TreeDiff, TreeSnapshot};

#[test]
fn initialize_twice_changes_nothing() {
    let root = TestRoot::new().unwrap();
    root.store().initialize("proj").unwrap();
    let once = TreeSnapshot::capture(root.root()).unwrap();

    let err = root.store().initialize("proj").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);

    let twice = TreeSnapshot::capture(root.root()).unwrap();
    TreeDiff::compare(&once, &twice).assert_empty();
}

#[test]
fn uninitialized_repository_is_not_found_everywhere() {
    let root = TestRoot::new().unwrap();
    let source = root.write_source("f.txt", b"f").unwrap();

    assert!(root.store().add_file("ghost", &source).unwrap_err().is_not_found());
    assert!(root.engine().commit("ghost", "m").unwrap_err().is_not_found());
    assert!(root.engine().log("ghost").unwrap_err().is_not_found());
    assert!(root.engine().status("ghost").unwrap_err().is_not_found());

    // Failed calls must not create the repository as a side effect.
    assert!(!root.root().join("ghost").exists());
}

#[test]
fn commit_captures_added_file() {
    let root = TestRoot::new().unwrap();
    root.repo_with_files("proj", &[("f.txt", b"payload")]).unwrap();

    let info = root.engine().commit("proj", "m").unwrap();
    let log = root.engine().log("proj").unwrap();

    assert_eq!(log.len(), 1);
    assert_eq!(log[0].message, "m");
    assert_eq!(log[0].id, info.id);
    assert_eq!(
        root.engine()
            .read_snapshot_file("proj", info.id.as_str(), "f.txt")
            .unwrap(),
        b"payload"
    );
}

#[test]
fn repeated_commits_have_distinct_ids_and_equal_snapshots() {
    let root = TestRoot::new().unwrap();
    root.repo_with_files("proj", &[("a.txt", b"a"), ("b.txt", b"b")])
        .unwrap();

    let first = root.engine().commit("proj", "one").unwrap();
    let second = root.engine().commit("proj", "two").unwrap();
    assert_ne!(first.id, second.id);

    let layout = RepoLayout::new(root.root().join("proj"));
    let working = TreeSnapshot::capture(&layout.files_dir()).unwrap();
    let snap_one = TreeSnapshot::capture(&layout.commit_files_dir(&first.id)).unwrap();
    let snap_two = TreeSnapshot::capture(&layout.commit_files_dir(&second.id)).unwrap();

    TreeDiff::compare(&snap_one, &snap_two).assert_empty();
    TreeDiff::compare(&working, &snap_one).assert_empty();
}

#[test]
fn later_changes_never_touch_earlier_snapshots() {
    let root = TestRoot::new().unwrap();
    root.repo_with_files("proj", &[("a.txt", b"before")]).unwrap();
    let first = root.engine().commit("proj", "one").unwrap();

    let layout = RepoLayout::new(root.root().join("proj"));
    let captured = TreeSnapshot::capture(&layout.commit_dir(&first.id)).unwrap();

    let source = root.write_source("a.txt", b"after").unwrap();
    root.store().add_file("proj", &source).unwrap();
    let extra = root.write_source("new.txt", b"new").unwrap();
    root.store().add_file("proj", &extra).unwrap();
    root.engine().commit("proj", "two").unwrap();

    let again = TreeSnapshot::capture(&layout.commit_dir(&first.id)).unwrap();
    TreeDiff::compare(&captured, &again).assert_empty();
}

#[test]
fn status_reports_each_name_once() {
    let root = TestRoot::new().unwrap();
    root.repo_with_files("proj", &[("a", b"1"), ("b", b"2"), ("a", b"3")])
        .unwrap();

    assert_eq!(root.engine().status("proj").unwrap(), vec!["a", "b"]);
    assert_eq!(root.read_working_file("proj", "a").unwrap(), b"3");
}

#[test]
fn end_to_end_session() {
    let root = TestRoot::new().unwrap();
    let store = root.store();
    let engine = root.engine();

    store.initialize("proj").unwrap();
    let notes = root.write_source("notes.txt", b"hello").unwrap();
    assert_eq!(store.add_file("proj", &notes).unwrap(), "notes.txt");
    let first = engine.commit("proj", "first").unwrap();
    assert_eq!(engine.log("proj").unwrap().len(), 1);

    fs::write(&notes, b"world").unwrap();
    store.add_file("proj", &notes).unwrap();
    let second = engine.commit("proj", "second").unwrap();

    let messages: Vec<String> = engine
        .log("proj")
        .unwrap()
        .into_iter()
        .map(|c| c.message)
        .collect();
    assert_eq!(messages, vec!["first", "second"]);

    assert_eq!(
        engine
            .read_snapshot_file("proj", first.id.as_str(), "notes.txt")
            .unwrap(),
        b"hello"
    );
    assert_eq!(
        engine
            .read_snapshot_file("proj", second.id.as_str(), "notes.txt")
            .unwrap(),
        b"world"
    );
}

#[test]
fn rapid_commits_keep_creation_order() {
    let root = TestRoot::new().unwrap();
    root.store().initialize("proj").unwrap();

    let created: Vec<CommitId> = (0..50)
        .map(|i| root.engine().commit("proj", &i.to_string()).unwrap().id)
        .collect();
    let unique: HashSet<&CommitId> = created.iter().collect();
    assert_eq!(unique.len(), created.len());

    let listed: Vec<CommitId> = root
        .engine()
        .log("proj")
        .unwrap()
        .into_iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(listed, created);
}

#[test]
fn legacy_repository_without_index_is_readable() {
    let root = TestRoot::new().unwrap();
    root.store().initialize("proj").unwrap();
    let layout = RepoLayout::new(root.root().join("proj"));

    // Commit written by a tool that kept no index and used naive timestamps.
    let id = "5f0c6e1b2a9d4c3e8f7a6b5c4d3e2f1a0b9c8d7e";
    let dir = layout.commits_dir().join(id);
    fs::create_dir_all(dir.join("files")).unwrap();
    fs::write(dir.join("files").join("old.txt"), b"old").unwrap();
    fs::write(
        dir.join("info.json"),
        format!(
            "{{\n    \"id\": \"{}\",\n    \"message\": \"legacy\",\n    \"timestamp\": \"2023-05-01T12:30:00.123456\"\n}}",
            id
        ),
    )
    .unwrap();

    root.engine().commit("proj", "current").unwrap();

    let log = root.engine().log("proj").unwrap();
    let messages: Vec<&str> = log.iter().map(|c| c.message.as_str()).collect();
    assert_eq!(messages, vec!["legacy", "current"]);

    let legacy: &CommitInfo = &log[0];
    assert_eq!(legacy.id.as_str(), id);
    assert_eq!(
        root.engine()
            .read_snapshot_file("proj", &id[..6], "old.txt")
            .unwrap(),
        b"old"
    );
}

#[test]
fn commit_blocked_by_live_lock_leaves_no_partial_entry() {
    let root = TestRoot::with_lock_timeout(Duration::from_millis(50)).unwrap();
    root.repo_with_files("proj", &[("a.txt", b"a")]).unwrap();
    let layout = RepoLayout::new(root.root().join("proj"));
    let before = TreeSnapshot::capture(&layout.commits_dir()).unwrap();

    // A live process (this one) holds the repository lock.
    let lock = root.root().join(".locks").join("proj.lock");
    fs::write(&lock, std::process::id().to_string()).unwrap();

    let err = root.engine().commit("proj", "blocked").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::LockTimeout);

    let after = TreeSnapshot::capture(&layout.commits_dir()).unwrap();
    TreeDiff::compare(&before, &after).assert_empty();
    assert!(root.engine().log("proj").unwrap().is_empty());

    fs::remove_file(&lock).unwrap();
    root.engine().commit("proj", "unblocked").unwrap();
    assert_eq!(root.engine().log("proj").unwrap().len(), 1);
}

#[cfg(unix)]
#[test]
fn lock_left_by_crashed_process_is_recovered() {
    let root = TestRoot::with_lock_timeout(Duration::from_millis(50)).unwrap();
    root.repo_with_files("proj", &[("a.txt", b"a")]).unwrap();
    let layout = RepoLayout::new(root.root().join("proj"));

    let mut child = std::process::Command::new("true").spawn().unwrap();
    let dead_pid = child.id();
    child.wait().unwrap();

    // Crashed mid-commit: lock still on disk, half-staged commit left behind.
    let lock = root.root().join(".locks").join("proj.lock");
    fs::write(&lock, format!("{}\n", dead_pid)).unwrap();
    fs::create_dir_all(layout.staging_dir().join("commit-deadbeef").join("files")).unwrap();

    let info = root.engine().commit("proj", "after crash").unwrap();
    assert!(!lock.exists());
    assert_eq!(fs::read_dir(layout.staging_dir()).unwrap().count(), 0);

    fs::write(&lock, format!("{}\n", dead_pid)).unwrap();
    let source = root.write_source("b.txt", b"b").unwrap();
    root.store().add_file("proj", &source).unwrap();
    assert!(!lock.exists());

    let log = root.engine().log("proj").unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0], info);
    assert_eq!(root.engine().status("proj").unwrap(), vec!["a.txt", "b.txt"]);
}

#[test]
fn working_set_survives_commit() {
    let root = TestRoot::new().unwrap();
    root.repo_with_files("proj", &[("a.txt", b"a")]).unwrap();
    let layout = RepoLayout::new(root.root().join("proj"));
    let before = TreeSnapshot::capture(&layout.files_dir()).unwrap();

    root.engine().commit("proj", "m").unwrap();

    let after = TreeSnapshot::capture(&layout.files_dir()).unwrap();
    TreeDiff::compare(&before, &after).assert_empty();
}

#[test]
fn repositories_are_independent() {
    let root = TestRoot::new().unwrap();
    root.repo_with_files("one", &[("a.txt", b"a")]).unwrap();
    root.repo_with_files("two", &[("b.txt", b"b")]).unwrap();

    root.engine().commit("one", "m").unwrap();

    assert_eq!(root.engine().log("one").unwrap().len(), 1);
    assert!(root.engine().log("two").unwrap().is_empty());
    assert_eq!(root.engine().status("two").unwrap(), vec!["b.txt"]);
    assert_eq!(root.store().list_repositories().unwrap(), vec!["one", "two"]);
}
