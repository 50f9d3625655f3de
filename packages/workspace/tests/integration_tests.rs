/// Integration tests for the complete persistence flow
/// Tests store → migrate → session → mutations → store
use mailcraft_common::{find_block, is_valid};
use mailcraft_document::{BlockType, EmailDocument};
use mailcraft_editor::{ApplyOutcome, Mutation};
use mailcraft_workspace::{DocumentStore, FileStore, StoreError, Workspace, WorkspaceError};
use serde_json::json;

async fn file_workspace() -> (tempfile::TempDir, Workspace<FileStore>) {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::open(dir.path()).await.unwrap();
    (dir, Workspace::new(store))
}

#[tokio::test]
async fn test_file_store_round_trip() {
    let (_dir, mut workspace) = file_workspace().await;
    let id = workspace.create("Newsletter").await.unwrap().document().id.clone();

    let outcome = workspace
        .apply(&Mutation::AddBlock {
            block_type: BlockType::Button,
            column_id: None,
        })
        .await
        .unwrap();
    let block_id = workspace.session().unwrap().selected_block().unwrap().to_string();
    assert!(outcome.is_applied());
    workspace.save().await.unwrap();

    workspace.close();
    let session = workspace.open(&id).await.unwrap();

    assert!(find_block(session.document(), &block_id).is_some());
    assert!(!session.can_undo());
    assert!(is_valid(session.document()));
}

#[tokio::test]
async fn test_legacy_file_migrated_on_open() {
    let (dir, mut workspace) = file_workspace().await;
    let legacy = json!({
        "id": "spring-promo",
        "name": "Spring promo",
        "subject": "Fresh deals",
        "content": [
            { "id": "hero", "type": "image", "props": { "src": "hero.jpg" } },
            { "id": "cta", "type": "button", "props": { "text": "Shop" } }
        ],
        "created": "2023-03-01T08:00:00Z",
        "lastModified": "2023-03-02T08:00:00Z"
    });
    std::fs::write(dir.path().join("spring-promo.json"), legacy.to_string()).unwrap();

    let session = workspace.open("spring-promo").await.unwrap();
    let doc = session.document();

    assert_eq!(doc.sections.len(), 1);
    let layouts = &doc.sections[0].layouts;
    assert_eq!(layouts.len(), 2);
    assert_eq!(layouts[0].columns[0].blocks[0].id, "hero");
    assert_eq!(layouts[1].columns[0].blocks[0].id, "cta");
    assert_eq!(doc.subject.as_deref(), Some("Fresh deals"));

    // First save rewrites the file in the sectioned schema
    workspace.save().await.unwrap();
    let raw = std::fs::read_to_string(dir.path().join("spring-promo.json")).unwrap();
    assert!(raw.contains("\"sections\""));
    assert!(!raw.contains("\"content\":"));
}

#[tokio::test]
async fn test_list_skips_non_document_files() {
    let (dir, workspace) = file_workspace().await;
    workspace.store().create_document("One").await.unwrap();
    workspace.store().create_document("Two").await.unwrap();
    std::fs::write(dir.path().join("notes.txt"), "not a document").unwrap();

    let docs = workspace.list().await.unwrap();

    let mut names: Vec<String> = docs.into_iter().map(|d| d.name).collect();
    names.sort();
    assert_eq!(names, vec!["One".to_string(), "Two".to_string()]);
}

#[tokio::test]
async fn test_failed_auto_save_keeps_edit() {
    let (dir, mut workspace) = file_workspace().await;
    workspace.create("Before").await.unwrap();

    // Removing the store directory makes every write fail
    std::fs::remove_dir_all(dir.path()).unwrap();

    let result = workspace
        .apply(&Mutation::RenameDocument {
            name: "After".to_string(),
        })
        .await;

    assert!(matches!(
        result,
        Err(WorkspaceError::Store(StoreError::Io(_)))
    ));
    let session = workspace.session().unwrap();
    assert_eq!(session.document().name, "After");
    assert!(session.is_dirty());
    assert!(session.can_undo());
}

#[tokio::test]
async fn test_failed_delete_keeps_open_session() {
    let (dir, mut workspace) = file_workspace().await;
    let id = workspace.create("Draft").await.unwrap().document().id.clone();
    workspace
        .apply(&Mutation::AddBlock {
            block_type: BlockType::Text,
            column_id: None,
        })
        .await
        .unwrap();

    std::fs::remove_dir_all(dir.path()).unwrap();

    let result = workspace.delete(&id).await;
    assert!(matches!(result, Err(WorkspaceError::Store(_))));

    let session = workspace.session().unwrap();
    assert_eq!(session.document().id, id);
    assert_eq!(session.document().block_count(), 1);
    assert!(session.is_dirty());
    assert!(session.can_undo());
}

#[tokio::test]
async fn test_refusal_through_workspace() {
    let (_dir, mut workspace) = file_workspace().await;
    let session = workspace.create("Limits").await.unwrap();
    let section_id = session.document().sections[0].id.clone();
    let before = session.document().clone();

    let outcome = workspace
        .apply(&Mutation::DeleteSection { section_id })
        .await
        .unwrap();

    assert!(matches!(outcome, ApplyOutcome::Refused(_)));
    assert_eq!(workspace.document(), Some(&before));
}

#[tokio::test]
async fn test_saved_copy_is_stamped() {
    let (_dir, mut workspace) = file_workspace().await;
    let id = workspace.create("Stamped").await.unwrap().document().id.clone();
    workspace
        .apply(&Mutation::AddSection { name: None })
        .await
        .unwrap();
    let in_memory: EmailDocument = workspace.document().unwrap().clone();

    let stamp = workspace.save().await.unwrap();

    let stored = workspace.store().get_document(&id).await.unwrap().unwrap();
    assert_eq!(stored.last_modified, stamp);
    assert_eq!(stored.sections, in_memory.sections);
    assert_eq!(workspace.document(), Some(&in_memory));
}
