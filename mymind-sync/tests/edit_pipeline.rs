//! begin → edit file → save across "invocations", with a temp home.

use mymind_core::{RoutineId, RoutineItem, UserId};
use mymind_sync::memory::{Call, InMemoryRoutines};
use mymind_sync::pipeline::{self, SaveOptions, SaveReport};
use mymind_sync::{snapshot, working_file, Phase, SyncError};
use tempfile::TempDir;

fn owner() -> UserId {
    UserId::from("31")
}

fn seeded() -> InMemoryRoutines {
    InMemoryRoutines::seeded(
        owner(),
        vec![
            RoutineItem::new("양치하기", owner()).with_id(1),
            RoutineItem::new("숙제", owner()).with_id(2),
        ],
    )
}

#[test]
fn begin_writes_snapshot_and_working_file() {
    let home = TempDir::new().expect("home");
    let mut remote = seeded();
    let path = snapshot::working_path_at(home.path(), &owner()).expect("working path");

    let snap = pipeline::begin_at(home.path(), &mut remote, &owner(), &path).expect("begin");

    assert_eq!(snap.items.len(), 2);
    assert!(snapshot::load_at(home.path(), &owner()).expect("load").is_some());
    assert_eq!(working_file::read(&path).expect("read"), snap.items);
}

#[test]
fn save_applies_file_edits_and_clears_snapshot() {
    let home = TempDir::new().expect("home");
    let mut remote = seeded();
    let path = snapshot::working_path_at(home.path(), &owner()).expect("working path");
    pipeline::begin_at(home.path(), &mut remote, &owner(), &path).expect("begin");

    let mut items = working_file::read(&path).expect("read");
    items[0].title = "양치하기 (아침)".into();
    items.remove(1);
    items.push(RoutineItem::new("정리하기", UserId::default()));
    working_file::write(&path, &items).expect("write");

    let report = pipeline::save_at(home.path(), &mut remote, &owner(), &path, SaveOptions::default())
        .expect("save");

    let SaveReport::Saved(outcome) = report else {
        panic!("expected Saved");
    };
    assert_eq!(outcome.applied.len(), 3);
    assert!(outcome.refreshed);
    assert!(snapshot::load_at(home.path(), &owner()).expect("load").is_none());
    let on_disk = working_file::read(&path).expect("reread");
    assert!(on_disk.iter().all(|i| i.id.is_some()), "file holds server ids");
    assert_eq!(on_disk, remote.items());
}

#[test]
fn dry_run_plans_without_writing() {
    let home = TempDir::new().expect("home");
    let mut remote = seeded();
    let path = snapshot::working_path_at(home.path(), &owner()).expect("working path");
    pipeline::begin_at(home.path(), &mut remote, &owner(), &path).expect("begin");
    let mut items = working_file::read(&path).expect("read");
    items.clear();
    working_file::write(&path, &items).expect("write");

    let report = pipeline::save_at(
        home.path(),
        &mut remote,
        &owner(),
        &path,
        SaveOptions {
            dry_run: true,
            force: false,
        },
    )
    .expect("dry run");

    let SaveReport::Planned(diff) = report else {
        panic!("expected Planned");
    };
    assert_eq!(diff.plan.deletes, vec![RoutineId(1), RoutineId(2)]);
    assert!(remote.writes().is_empty());
    assert!(snapshot::load_at(home.path(), &owner()).expect("load").is_some());
}

#[test]
fn unchanged_file_is_nothing_to_do() {
    let home = TempDir::new().expect("home");
    let mut remote = seeded();
    let path = snapshot::working_path_at(home.path(), &owner()).expect("working path");
    pipeline::begin_at(home.path(), &mut remote, &owner(), &path).expect("begin");

    let report = pipeline::save_at(home.path(), &mut remote, &owner(), &path, SaveOptions::default())
        .expect("save");
    assert!(matches!(report, SaveReport::NothingToDo));
    assert!(remote.writes().is_empty());
}

#[test]
fn save_without_begin_is_refused() {
    let home = TempDir::new().expect("home");
    let mut remote = seeded();
    let path = snapshot::working_path_at(home.path(), &owner()).expect("working path");
    working_file::write(&path, remote.items()).expect("write");

    let err = pipeline::save_at(home.path(), &mut remote, &owner(), &path, SaveOptions::default())
        .unwrap_err();
    assert!(matches!(err, SyncError::NoEditInProgress { .. }), "got: {err}");
    assert!(remote.calls().is_empty(), "refused before contacting the server");
}

#[test]
fn server_change_since_begin_requires_force() {
    let home = TempDir::new().expect("home");
    let mut remote = seeded();
    let path = snapshot::working_path_at(home.path(), &owner()).expect("working path");
    pipeline::begin_at(home.path(), &mut remote, &owner(), &path).expect("begin");

    let mut moved = remote.items().to_vec();
    moved.push(RoutineItem::new("other parent's routine", owner()).with_id(9));
    remote.replace_items(moved);

    let err = pipeline::save_at(home.path(), &mut remote, &owner(), &path, SaveOptions::default())
        .unwrap_err();
    assert!(matches!(err, SyncError::BaselineMoved { .. }), "got: {err}");
    assert!(err.to_string().contains("1 added"));
    assert!(remote.writes().is_empty());

    let report = pipeline::save_at(
        home.path(),
        &mut remote,
        &owner(),
        &path,
        SaveOptions {
            dry_run: false,
            force: true,
        },
    )
    .expect("forced save");
    assert!(matches!(report, SaveReport::Saved(_)));
    assert_eq!(remote.writes(), vec![Call::Delete { id: RoutineId(9) }]);
}

#[test]
fn partial_failure_keeps_ids_so_retry_does_not_duplicate() {
    let home = TempDir::new().expect("home");
    let mut remote = seeded();
    let path = snapshot::working_path_at(home.path(), &owner()).expect("working path");
    pipeline::begin_at(home.path(), &mut remote, &owner(), &path).expect("begin");

    let mut items = working_file::read(&path).expect("read");
    items.push(RoutineItem::new("새 루틴", owner()));
    items[0].title = "changed".into();
    working_file::write(&path, &items).expect("write");
    remote.fail_on(Phase::Update, 1);

    let err = pipeline::save_at(home.path(), &mut remote, &owner(), &path, SaveOptions::default())
        .unwrap_err();
    assert!(matches!(err, SyncError::Reconcile(_)), "got: {err}");

    let on_disk = working_file::read(&path).expect("reread");
    assert!(on_disk.last().and_then(|i| i.id).is_some(), "created id persisted");

    pipeline::save_at(home.path(), &mut remote, &owner(), &path, SaveOptions::default())
        .expect("retry");
    let creates = remote
        .calls()
        .iter()
        .filter(|c| matches!(c, Call::Create { .. }))
        .count();
    assert_eq!(creates, 1);
    assert_eq!(remote.items()[0].title, "changed");
}

#[test]
fn diff_reads_file_against_live_list() {
    let home = TempDir::new().expect("home");
    let mut remote = seeded();
    let path = snapshot::working_path_at(home.path(), &owner()).expect("working path");
    pipeline::begin_at(home.path(), &mut remote, &owner(), &path).expect("begin");

    let mut items = working_file::read(&path).expect("read");
    items[1].title = "숙제 (수학)".into();
    working_file::write(&path, &items).expect("write");

    let diff = pipeline::diff_at(&mut remote, &owner(), &path).expect("diff");
    assert_eq!(diff.plan.updates, vec![1]);
    assert!(diff.unified_diff.contains("숙제 (수학)"));
}
