//! Integration tests for the notification log.

mod helpers;

use treehub_core::error::ErrorKind;

use helpers::{Harness, ctx, upload};
use treehub_service::RequestContext;

#[tokio::test]
async fn test_upload_emits_one_notification() {
    let h = Harness::new();
    let root = h.root("acme").await;

    let files = h
        .services
        .files
        .register_files(&ctx(), root.id, vec![upload("a.pdf"), upload("b.pdf")])
        .await
        .unwrap();
    assert_eq!(files.len(), 2);
    assert_eq!(files[0].logical_path, "/acme/a.pdf");
    assert_eq!(files[1].stored_name, "blob-b.pdf");

    let notes = h.services.notifications.list_all("acme").await.unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(
        notes[0].message,
        "alice uploaded 2 file(s) to /acme/: \"a.pdf\", \"b.pdf\""
    );
    assert!(!notes[0].read);
}

#[tokio::test]
async fn test_upload_validates_every_name_first() {
    let h = Harness::new();
    let root = h.root("acme").await;

    let err = h
        .services
        .files
        .register_files(&ctx(), root.id, vec![upload("ok.txt"), upload("bad/name")])
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidName);
    assert!(h.memory.files().is_empty());
}

#[tokio::test]
async fn test_listing_is_scoped_and_ordered() {
    let h = Harness::new();
    let notes = &h.services.notifications;
    let first = notes.append("acme", "first").await.unwrap();
    notes.append("acme", "second").await.unwrap();
    notes.append("globex", "elsewhere").await.unwrap();
    notes.mark_read(first.id).await.unwrap();

    let all: Vec<String> = notes
        .list_all("acme")
        .await
        .unwrap()
        .into_iter()
        .map(|n| n.message)
        .collect();
    assert_eq!(all, vec!["second", "first"]);

    let read = notes.list_read("acme").await.unwrap();
    assert_eq!(read.len(), 1);
    assert_eq!(read[0].id, first.id);

    let unread = notes.list_unread("acme").await.unwrap();
    assert_eq!(unread.len(), 1);
    assert_eq!(unread[0].message, "second");
}

#[tokio::test]
async fn test_super_owner_sees_every_tenant() {
    let h = Harness::new();
    let notes = &h.services.notifications;
    notes.append("acme", "one").await.unwrap();
    notes.append("globex", "two").await.unwrap();

    assert_eq!(notes.list_all("@admin").await.unwrap().len(), 2);

    let changed = notes.mark_all_read("@admin").await.unwrap();
    assert_eq!(changed, 2);
    assert!(notes.list_unread("globex").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_mark_all_read_is_scoped() {
    let h = Harness::new();
    let notes = &h.services.notifications;
    notes.append("acme", "one").await.unwrap();
    notes.append("acme", "two").await.unwrap();
    notes.append("globex", "three").await.unwrap();

    assert_eq!(notes.mark_all_read("acme").await.unwrap(), 2);
    assert_eq!(notes.mark_all_read("acme").await.unwrap(), 0);
    assert_eq!(notes.list_unread("globex").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_mark_read_unknown_id() {
    let h = Harness::new();
    let err = h
        .services
        .notifications
        .mark_read(uuid::Uuid::new_v4())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_events_are_scoped_to_request_owner() {
    let h = Harness::new();
    let root = h.root("Root").await;
    let a = h.folder(&root, "A").await;

    let tenant = RequestContext::new("erin", "globex");
    h.services.tree.rename(&tenant, a.id, "B").await.unwrap();

    assert!(h.services.notifications.list_all("acme").await.unwrap().is_empty());
    let notes = h.services.notifications.list_all("globex").await.unwrap();
    assert_eq!(notes[0].message, "erin renamed folder \"A\" to \"B\"");
}
