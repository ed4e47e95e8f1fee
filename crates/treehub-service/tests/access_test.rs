//! Integration tests for folder access grants.

mod helpers;

use treehub_core::error::ErrorKind;
use treehub_entity::permission::{AccessLevel, Role};

use helpers::{Harness, assert_consistent, ctx};

#[tokio::test]
async fn test_grant_moves_user_between_levels() {
    let h = Harness::new();
    h.add_user("bob", None);
    let root = h.root("Root").await;
    let access = &h.services.access;

    access
        .grant(&ctx(), root.id, "bob", AccessLevel::Read)
        .await
        .unwrap();
    let folder = access
        .grant(&ctx(), root.id, "bob", AccessLevel::Write)
        .await
        .unwrap();

    assert!(!folder.grants.members(AccessLevel::Read).contains("bob"));
    assert!(folder.grants.members(AccessLevel::Write).contains("bob"));
    assert_eq!(access.role_of(root.id, "bob").await.unwrap(), Role::Write);
    assert_consistent(&h.memory);
}

#[tokio::test]
async fn test_repeated_grants_keep_sets_disjoint() {
    let h = Harness::new();
    for name in ["amy", "bob", "cat"] {
        h.add_user(name, None);
    }
    let root = h.root("Root").await;
    let access = &h.services.access;

    let sequence = [
        ("amy", AccessLevel::ReadWrite),
        ("bob", AccessLevel::Read),
        ("amy", AccessLevel::Read),
        ("bob", AccessLevel::ReadWrite),
        ("cat", AccessLevel::Write),
        ("bob", AccessLevel::ReadWrite),
    ];
    for (name, level) in sequence {
        let folder = access.grant(&ctx(), root.id, name, level).await.unwrap();
        assert!(folder.grants.is_disjoint());
    }

    assert_eq!(access.role_of(root.id, "amy").await.unwrap(), Role::Read);
    assert_eq!(access.role_of(root.id, "bob").await.unwrap(), Role::ReadWrite);
    assert_eq!(access.role_of(root.id, "cat").await.unwrap(), Role::Write);
}

#[tokio::test]
async fn test_grant_many_is_one_change() {
    let h = Harness::new();
    h.add_user("amy", None);
    h.add_user("bob", None);
    let root = h.root("Root").await;

    let folder = h
        .services
        .access
        .grant_many(
            &ctx(),
            root.id,
            &["amy".to_string(), "bob".to_string()],
            AccessLevel::ReadWrite,
        )
        .await
        .unwrap();
    assert_eq!(folder.grants.members(AccessLevel::ReadWrite).len(), 2);
}

#[tokio::test]
async fn test_grant_requires_known_user_and_folder() {
    let h = Harness::new();
    h.add_user("amy", None);
    let root = h.root("Root").await;
    let access = &h.services.access;

    let err = access
        .grant_many(
            &ctx(),
            root.id,
            &["amy".to_string(), "ghost".to_string()],
            AccessLevel::Read,
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    // Nothing was written for the known user either.
    assert!(h.reload(&root).await.grants.is_empty());

    let err = access
        .grant(&ctx(), uuid::Uuid::new_v4(), "amy", AccessLevel::Read)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_revoke_clears_every_level() {
    let h = Harness::new();
    h.add_user("bob", None);
    let root = h.root("Root").await;
    let access = &h.services.access;

    access
        .grant(&ctx(), root.id, "bob", AccessLevel::ReadWrite)
        .await
        .unwrap();
    let folder = access.revoke(&ctx(), root.id, "bob").await.unwrap();

    assert!(folder.grants.is_empty());
    assert_eq!(access.role_of(root.id, "bob").await.unwrap(), Role::None);
    // Revoking again is harmless.
    access.revoke(&ctx(), root.id, "bob").await.unwrap();
}

#[tokio::test]
async fn test_list_grantees_resolves_names() {
    let h = Harness::new();
    h.add_user("amy", None);
    h.add_user("bob", None);
    let root = h.root("Root").await;
    let access = &h.services.access;

    access
        .grant(&ctx(), root.id, "amy", AccessLevel::Read)
        .await
        .unwrap();
    access
        .grant(&ctx(), root.id, "bob", AccessLevel::Write)
        .await
        .unwrap();
    h.memory.remove_user("bob");

    let grantees = access.list_grantees(root.id).await.unwrap();
    assert_eq!(grantees.len(), 2);

    let amy = grantees.iter().find(|g| g.username == "amy").unwrap();
    assert_eq!(amy.role, Role::Read);
    assert_eq!(amy.first_name.as_deref(), Some("amy-first"));

    let bob = grantees.iter().find(|g| g.username == "bob").unwrap();
    assert_eq!(bob.role, Role::Write);
    assert!(bob.first_name.is_none());
}
