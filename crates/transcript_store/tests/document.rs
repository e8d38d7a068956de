use debate_protocol::{SessionConfig, Side};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use transcript_store::{
    ArchiveImporter, DocumentCodec, DocumentError, ExportDocument, TranscriptStore, Turn,
};

fn sample_store() -> TranscriptStore {
    let mut store = TranscriptStore::new();
    store.append(Side::Pro, "Cats are independent.");
    store.append(Side::Con, "Dogs are loyal.");
    store.append(Side::Pro, "Independence is a virtue.");
    store
}

fn sample_config() -> SessionConfig {
    SessionConfig::new("Cats vs dogs")
        .with_pro_system("argue for cats")
        .with_con_system("argue for dogs")
        .with_rounds(2)
}

#[test]
fn export_reports_turn_count_as_total_rounds() {
    let store = sample_store();
    let document = DocumentCodec::export(
        &sample_config(),
        Some("2026-10-19T10:00:00Z"),
        store.turns(),
    )
    .expect("export should succeed");

    assert_eq!(document.total_rounds, 3);
    assert_eq!(document.transcript.len(), 3);
    assert_eq!(document.config["topic"], json!("Cats vs dogs"));
    assert_eq!(document.config["rounds"], json!(2));
    assert_eq!(document.config["start_time"], json!("2026-10-19T10:00:00Z"));
    assert_eq!(document.transcript[1].role, "反方");
    assert_eq!(document.transcript[0].role, "正方");
}

#[test]
fn export_rejects_empty_transcript() {
    let error = DocumentCodec::export(&sample_config(), None, &[])
        .expect_err("empty transcript must not export");
    assert!(matches!(error, DocumentError::EmptyTranscript));
}

#[test]
fn exported_document_reimports_to_same_turns() {
    let store = sample_store();
    let document =
        DocumentCodec::export(&sample_config(), None, store.turns()).expect("export should succeed");
    let text = DocumentCodec::to_json_pretty(&document).expect("document should serialize");

    let imported = DocumentCodec::import(&text).expect("document should parse");
    let report = imported.normalize();

    assert!(report.skipped.is_empty());
    assert_eq!(report.turns, store.turns().to_vec());
    assert_eq!(imported.config_value()["topic"], json!("Cats vs dogs"));
    assert_eq!(imported.export_time(), Some(document.export_time.as_str()));
}

#[test]
fn export_json_shape_is_stable() {
    let turns = vec![Turn::new(
        Side::Pro,
        "hi",
        Some("2026-10-19T10:00:00Z".to_string()),
    )];
    let document = DocumentCodec::export_with_config(json!({"topic": "t"}), &turns)
        .expect("export should succeed");
    let value = serde_json::to_value(&document).expect("document should serialize");

    assert_eq!(value["transcript"], json!([{
        "side": "pro",
        "role": "正方",
        "content": "hi",
        "timestamp": "2026-10-19T10:00:00Z",
    }]));
    assert_eq!(value["total_rounds"], json!(1));
    assert!(value["export_time"].as_str().is_some());
}

#[test]
fn import_distinguishes_empty_and_malformed_input() {
    assert!(matches!(
        DocumentCodec::import("   \n"),
        Err(DocumentError::EmptyInput)
    ));
    let error = DocumentCodec::import("{not json").expect_err("malformed must fail");
    assert!(error.is_malformed_json());
}

#[test]
fn import_accepts_document_without_transcript() {
    let imported = DocumentCodec::import(r#"{"config": {"topic": "x"}}"#)
        .expect("object should parse");
    assert!(imported.normalize().turns.is_empty());
}

#[test]
fn write_and_read_round_trip_through_file() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let path = dir.path().join("debate.json");
    let store = sample_store();
    let document =
        DocumentCodec::export(&sample_config(), None, store.turns()).expect("export should succeed");

    DocumentCodec::write_to(&path, &document).expect("document should be written");
    let text = std::fs::read_to_string(&path).expect("file should be readable");
    let parsed: ExportDocument = serde_json::from_str(&text).expect("file holds an export");
    assert_eq!(parsed, document);

    let imported = DocumentCodec::read_from(&path).expect("document should be read back");
    assert_eq!(
        ArchiveImporter::normalize(imported.value()),
        store.turns().to_vec()
    );
}

#[test]
fn read_from_missing_file_reports_path() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let path = dir.path().join("missing.json");

    let error = DocumentCodec::read_from(&path).expect_err("missing file must fail");
    match error {
        DocumentError::Io { path: failed, .. } => assert_eq!(failed, path),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn bare_array_text_is_treated_as_transcript() {
    let imported = DocumentCodec::import(r#"[{"role":"正方","text":"Hello"}]"#)
        .expect("array should parse");
    assert_eq!(imported.value().get("transcript").map(Value::is_array), Some(true));
    assert_eq!(
        imported.normalize().turns,
        vec![Turn::new(Side::Pro, "Hello", None)]
    );
}
