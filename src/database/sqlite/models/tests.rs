use chrono::Utc;

use super::*;

#[test]
fn document_serde_round_trip() {
    let document = Document {
        id: "doc-1".to_string(),
        file_name: "report.json".to_string(),
        content: "{\"a\":1}".to_string(),
        created_at: Utc::now().naive_utc(),
    };

    let json = serde_json::to_string(&document).expect("should serialize document");
    let parsed: Document = serde_json::from_str(&json).expect("should deserialize document");

    assert_eq!(parsed, document);
}

#[test]
fn new_document_carries_identifier() {
    let new_document = NewDocument {
        id: "doc-7".to_string(),
        file_name: "notes.txt".to_string(),
        content: "hello".to_string(),
    };

    assert_eq!(new_document.id, "doc-7");
    assert_ne!(new_document.id, new_document.file_name);
}
