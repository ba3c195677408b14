//! Store behaviour across the public API: atomic user/role commits,
//! fail-closed legacy data, and build memory semantics.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::path::{Path, PathBuf};

use dockwarden_common::types::Role;
use dockwarden_store::bootstrap::ensure_admin;
use dockwarden_store::model::NewUser;
use dockwarden_store::{BuildMemoryStore, IdentityStore, JsonStore, StoreError};

fn new_user(name: &str, role: Role) -> NewUser {
    NewUser {
        username: name.into(),
        credential_hash: "hash".into(),
        is_admin: false,
        role,
    }
}

#[test]
fn failed_commit_exposes_neither_user_nor_role() {
    let dir = tempfile::tempdir().expect("tempdir");
    // A regular file where the state directory should be makes every write fail.
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"").expect("write blocker");
    let store = JsonStore::open(blocker.join("dockwarden.json")).expect("open");

    let err = store
        .create_user(new_user("frank", Role::all()))
        .expect_err("write must fail");
    assert!(matches!(err, StoreError::Io { .. }));

    assert!(store.find_by_username("frank").expect("read").is_none());
    let doc = store.snapshot();
    assert!(doc.users.is_empty());
    assert!(doc.roles.is_empty());
}

#[test]
fn failed_build_memory_commit_keeps_previous_path() {
    let dir = tempfile::tempdir().expect("tempdir");
    let state_dir = dir.path().join("state");
    let store = JsonStore::open(state_dir.join("dockwarden.json")).expect("open");
    store.put("web", Path::new("/srv/web")).expect("put");

    // Replace the state directory with a regular file so the next write fails.
    std::fs::remove_dir_all(&state_dir).expect("remove state dir");
    std::fs::write(&state_dir, b"").expect("block state dir");

    assert!(store.put("web", Path::new("/srv/other")).is_err());
    assert_eq!(
        BuildMemoryStore::get(&store, "web").expect("get"),
        Some(PathBuf::from("/srv/web"))
    );
}

#[test]
fn user_without_role_row_has_absent_role() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("dockwarden.json");
    std::fs::write(
        &path,
        r#"{
  "users": [
    { "id": 7, "username": "legacy", "credential_hash": "x", "is_admin": false }
  ],
  "roles": [],
  "container_configs": []
}"#,
    )
    .expect("seed");

    let store = JsonStore::open(&path).expect("open");
    let user = store.find_by_username("legacy").expect("read").expect("present");
    assert_eq!(user.id.get(), 7);
    assert_eq!(store.role_of(user.id).expect("role lookup"), None);
}

#[test]
fn ids_continue_after_legacy_rows() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("dockwarden.json");
    std::fs::write(
        &path,
        r#"{ "users": [ { "id": 7, "username": "legacy", "credential_hash": "x" } ] }"#,
    )
    .expect("seed");

    let store = JsonStore::open(&path).expect("open");
    let id = store.create_user(new_user("next", Role::default())).expect("create");
    assert_eq!(id.get(), 8);
}

#[test]
fn duplicate_username_on_disk_store() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("dockwarden.json");
    let store = JsonStore::open(&path).expect("open");
    let _ = store.create_user(new_user("bob", Role::default())).expect("first");
    assert!(matches!(
        store.create_user(new_user("bob", Role::default())),
        Err(StoreError::DuplicateUsername { .. })
    ));

    let reopened = JsonStore::open(&path).expect("reopen");
    assert_eq!(reopened.usernames().expect("list"), vec!["bob".to_string()]);
}

#[test]
fn bootstrap_on_empty_store_creates_full_admin() {
    let store = JsonStore::in_memory();
    let id = ensure_admin(&store, "admin123").expect("bootstrap").expect("created");
    let role = store.role_of(id).expect("role").expect("present");
    assert_eq!(
        role,
        Role {
            view: true,
            start_stop: true,
            rebuild: true
        }
    );
}

#[test]
fn rebuild_paths_are_per_container() {
    let store = JsonStore::in_memory();
    store.put("api", Path::new("/a")).expect("put api");
    store.put("web", Path::new("/w")).expect("put web");
    assert_eq!(
        BuildMemoryStore::get(&store, "api").expect("get"),
        Some(PathBuf::from("/a"))
    );
    assert_eq!(
        BuildMemoryStore::get(&store, "web").expect("get"),
        Some(PathBuf::from("/w"))
    );
    assert!(BuildMemoryStore::get(&store, "db").expect("get").is_none());
}
