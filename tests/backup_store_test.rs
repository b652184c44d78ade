// Integration tests for the backup store lifecycle: save, load, delete, list

use hookdraft_backup::{
    Attachment, BackupRecord, BackupStorage, BackupStore, MemoryBackupStorage, MessageData, MessageEditor,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::collections::BTreeSet;
use std::sync::Arc;

fn setup() -> (BackupStore, MemoryBackupStorage, MessageEditor) {
    let storage = MemoryBackupStorage::new("backups");
    let editor = MessageEditor::new();
    let store = BackupStore::new(Arc::new(storage.clone()), editor.clone());
    (store, storage, editor)
}

fn names(store: &BackupStore) -> Vec<String> {
    store.backup_list().into_iter().map(|record| record.name).collect()
}

#[tokio::test]
async fn test_initialize_loads_existing_backups() {
    let (store, storage, _) = setup();
    storage.put("Existing", &MessageData::new()).await.unwrap();
    storage.put("Another", &MessageData::new()).await.unwrap();

    assert!(store.backup_list().is_empty());
    store.initialize().await.unwrap();

    assert_eq!(
        store.backup_list(),
        vec![BackupRecord::new("Another"), BackupRecord::new("Existing")]
    );
}

#[tokio::test]
async fn test_list_tracks_every_mutation() {
    let (store, storage, _) = setup();
    store.initialize().await.unwrap();

    let steps: [(&str, bool); 7] = [
        ("a", true),
        ("b", true),
        ("a", true),
        ("c", true),
        ("b", false),
        ("missing", false),
        ("d", true),
    ];

    for (name, save) in steps {
        if save {
            store
                .save_backup(name, Some(MessageData::new().with("content", json!(name))))
                .await
                .unwrap();
        } else {
            store.delete_backup(name).await.unwrap();
        }

        let listed: BTreeSet<String> = names(&store).into_iter().collect();
        let stored: BTreeSet<String> = storage.keys().await.unwrap().into_iter().collect();
        assert_eq!(listed, stored);
    }

    assert_eq!(names(&store), vec!["a", "c", "d"]);
}

#[tokio::test]
async fn test_save_overwrites_existing_name() {
    let (store, _, editor) = setup();
    let first = MessageData::new().with("content", json!("first"));
    let second = MessageData::new().with("content", json!("second"));

    store.save_backup("A", Some(first)).await.unwrap();
    store.save_backup("A", Some(second.clone())).await.unwrap();
    store.load_backup("A").await.unwrap();

    assert_eq!(editor.message_data(), second);
    assert_eq!(names(&store), vec!["A"]);
}

#[tokio::test]
async fn test_save_captures_editor_without_attachments() {
    let (store, storage, editor) = setup();
    editor.replace(
        MessageData::new()
            .with("content", json!("with a file"))
            .with("username", json!("Captain Hook")),
    );
    editor.attach(Attachment::new("screenshot.png", vec![0x89u8, 0x50, 0x4e, 0x47]));

    store.save_backup("Draft", None).await.unwrap();

    let stored = storage.get("Draft").await.unwrap().unwrap();
    assert_eq!(
        stored,
        MessageData::new()
            .with("content", json!("with a file"))
            .with("username", json!("Captain Hook"))
    );
    assert_eq!(stored.get("files"), None);
    // The editor keeps its attachment; only the backup drops it
    assert_eq!(editor.attachments().len(), 1);
}

#[tokio::test]
async fn test_load_replaces_active_message() {
    let (store, _, editor) = setup();
    store
        .save_backup("Saved", Some(MessageData::new().with("content", json!("saved"))))
        .await
        .unwrap();

    editor.replace(MessageData::new().with("username", json!("unsaved")));
    editor.attach(Attachment::new("a.txt", "hello"));

    store.load_backup("Saved").await.unwrap();

    assert_eq!(editor.message_data(), MessageData::new().with("content", json!("saved")));
    assert!(editor.attachments().is_empty());
}

#[tokio::test]
async fn test_load_missing_backup_clears_editor() {
    let (store, _, editor) = setup();
    editor.replace(MessageData::new().with("content", json!("left over")));

    store.load_backup("Nope").await.unwrap();

    assert!(editor.message_data().is_empty());
}

#[tokio::test]
async fn test_delete_missing_backup_is_noop() {
    let (store, storage, _) = setup();
    store.save_backup("Keep", Some(MessageData::new())).await.unwrap();

    store.delete_backup("Missing").await.unwrap();

    assert_eq!(names(&store), vec!["Keep"]);
    assert_eq!(storage.len(), 1);
}

#[tokio::test]
async fn test_share_link_loads_into_editor() {
    let (store, _, editor) = setup();
    let message = MessageData::new()
        .with("content", json!("shared draft"))
        .with("embeds", json!([{"title": "Hi", "imageUrl": "https://cdn.example/x.png"}]));
    store.save_backup("Shared", Some(message.clone())).await.unwrap();

    let link = store.share_link("Shared").await.unwrap();
    assert!(link.starts_with("backup:"));

    store.load_shared(&format!("#{}", link)).await.unwrap();
    assert_eq!(editor.message_data(), message);

    assert!(store.share_link("Missing").await.is_err());
}
