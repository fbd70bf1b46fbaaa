use cornellapp::error::CornellError;
use cornellapp::model::{AnnotationRecord, DocumentId, Highlight, Stage, StageId, Sticker, Vocab};
use cornellapp::store::fs::FileStore;
use cornellapp::store::DocumentSource;
use std::fs;
use tempfile::TempDir;

fn stage(id: i64, index: u32, text: &str) -> Stage {
    Stage {
        id: StageId(id),
        index,
        title: format!("Part {}", index),
        objective: "Understand it".to_string(),
        text: text.to_string(),
        suggested_vocabulary: vec![Vocab {
            word: "lorem".to_string(),
            definition: "placeholder".to_string(),
        }],
        note: None,
    }
}

fn setup() -> (TempDir, FileStore) {
    let dir = TempDir::new().unwrap();
    let store = FileStore::new(dir.path().to_path_buf());
    (dir, store)
}

#[test]
fn test_import_then_list_in_stage_order() {
    let (_dir, store) = setup();
    let plan = vec![stage(12, 2, "second"), stage(11, 1, "first")];
    store
        .import_document(DocumentId(1), "first second", Some(&plan))
        .unwrap();

    let stages = store.list_stages(DocumentId(1)).unwrap();
    let ids: Vec<StageId> = stages.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![StageId(11), StageId(12)]);
    assert!(stages.iter().all(|s| s.note.is_none()));
    assert_eq!(store.raw_text(DocumentId(1)).unwrap(), "first second");
}

#[test]
fn test_document_without_plan_has_no_stages() {
    let (_dir, store) = setup();
    store
        .import_document(DocumentId(2), "Lorem ipsum", None)
        .unwrap();

    assert!(store.list_stages(DocumentId(2)).unwrap().is_empty());
    assert_eq!(store.raw_text(DocumentId(2)).unwrap(), "Lorem ipsum");
}

#[test]
fn test_unknown_document_is_an_error() {
    let (_dir, store) = setup();
    assert!(matches!(
        store.list_stages(DocumentId(404)),
        Err(CornellError::DocumentNotFound(DocumentId(404)))
    ));
    assert!(store.raw_text(DocumentId(404)).is_err());
}

#[test]
fn test_corrupt_plan_is_a_fetch_error() {
    let (dir, store) = setup();
    store.import_document(DocumentId(3), "text", None).unwrap();
    fs::write(
        dir.path().join("documents/3/stages.json"),
        "{ not a plan",
    )
    .unwrap();

    assert!(matches!(
        store.list_stages(DocumentId(3)),
        Err(CornellError::Fetch(_))
    ));
}

#[test]
fn test_saved_note_comes_back_with_its_stage() {
    let (_dir, mut store) = setup();
    store
        .import_document(DocumentId(1), "x", Some(&[stage(11, 1, "text")]))
        .unwrap();

    let record = AnnotationRecord {
        cue_stickers: vec![Sticker::new("Why X?".to_string(), Some("X".to_string()))],
        note_stickers: vec![],
        highlights: vec![Highlight::new("text".to_string())],
        summary: "short".to_string(),
    };
    store.save_annotation_record(StageId(11), &record).unwrap();

    let stages = store.list_stages(DocumentId(1)).unwrap();
    assert_eq!(stages[0].note.as_ref(), Some(&record));
}

#[test]
fn test_saving_twice_replaces_the_note() {
    let (_dir, mut store) = setup();
    store
        .import_document(DocumentId(1), "x", Some(&[stage(11, 1, "text")]))
        .unwrap();

    let mut record = AnnotationRecord::default();
    record.summary = "first".to_string();
    store.save_annotation_record(StageId(11), &record).unwrap();
    record.summary = "second".to_string();
    store.save_annotation_record(StageId(11), &record).unwrap();

    let stages = store.list_stages(DocumentId(1)).unwrap();
    assert_eq!(stages[0].note.as_ref().unwrap().summary, "second");
}

#[test]
fn test_save_for_unknown_stage_fails() {
    let (_dir, mut store) = setup();
    store
        .import_document(DocumentId(1), "x", Some(&[stage(11, 1, "text")]))
        .unwrap();

    let err = store
        .save_annotation_record(StageId(99), &AnnotationRecord::default())
        .unwrap_err();
    assert!(matches!(err, CornellError::Persist(_)));
    assert!(!store.note_path(StageId(99)).exists());
}

#[test]
fn test_atomic_write_leaves_no_tmp_files() {
    let (_dir, mut store) = setup();
    store
        .import_document(DocumentId(1), "x", Some(&[stage(11, 1, "text")]))
        .unwrap();
    store
        .save_annotation_record(StageId(11), &AnnotationRecord::default())
        .unwrap();

    for dir in [
        store.root().join("notes"),
        store.root().join("documents").join("1"),
    ] {
        for entry in fs::read_dir(&dir).unwrap() {
            let path = entry.unwrap().path();
            let name = path.file_name().unwrap().to_str().unwrap().to_string();
            assert!(!name.ends_with(".tmp"), "Found leftover tmp file: {}", name);
        }
    }
}

#[test]
fn test_unreadable_note_is_treated_as_absent() {
    let (_dir, store) = setup();
    store
        .import_document(DocumentId(1), "x", Some(&[stage(11, 1, "text")]))
        .unwrap();
    fs::create_dir_all(store.root().join("notes")).unwrap();
    fs::write(store.note_path(StageId(11)), "garbage").unwrap();

    let stages = store.list_stages(DocumentId(1)).unwrap();
    assert!(stages[0].note.is_none());
}

#[test]
fn test_note_file_with_inline_arrays_loads() {
    let (_dir, store) = setup();
    store
        .import_document(DocumentId(1), "x", Some(&[stage(11, 1, "text")]))
        .unwrap();
    fs::create_dir_all(store.root().join("notes")).unwrap();
    let legacy = r#"{
        "cues_stickers": [{"id": "6f1c1d3e-2a4b-4c5d-8e9f-0a1b2c3d4e5f", "content": "Why?", "createdAt": "2024-01-01T00:00:00Z"}],
        "notes_stickers": null,
        "highlights": "not json",
        "summary_bottom": null
    }"#;
    fs::write(store.note_path(StageId(11)), legacy).unwrap();

    let stages = store.list_stages(DocumentId(1)).unwrap();
    let note = stages[0].note.as_ref().unwrap();
    assert_eq!(note.cue_stickers.len(), 1);
    assert_eq!(note.cue_stickers[0].content, "Why?");
    assert!(note.note_stickers.is_empty());
    assert!(note.highlights.is_empty());
    assert_eq!(note.summary, "");
}

#[test]
fn test_summary_counts_stages_vocab_and_notes() {
    let (_dir, mut store) = setup();
    let plan = vec![stage(11, 1, "a"), stage(12, 2, "b")];
    store.import_document(DocumentId(1), "ab", Some(&plan)).unwrap();

    let mut record = AnnotationRecord::default();
    record.summary = "only the second".to_string();
    store.save_annotation_record(StageId(12), &record).unwrap();

    let summary = store.document_summary(DocumentId(1)).unwrap();
    assert_eq!(summary.total_stages, 2);
    assert_eq!(summary.total_vocab_suggested, 2);
    assert_eq!(summary.notes.len(), 1);
    assert_eq!(summary.notes[0].stage_id, StageId(12));
    assert_eq!(summary.notes[0].stage_index, 2);
}
