//! Schema files on disk.

use std::fs;

use ntest::timeout;
use tempfile::tempdir;

use rdf_core::{RdfError, SchemaFile};

use super::helpers::trade;

#[timeout(5000)]
#[test]
fn test_schema_file_roundtrip_on_disk() {
    let d = trade(true);
    let dir = tempdir().unwrap();
    let path = dir.path().join("trade.json");
    fs::write(&path, SchemaFile::from_descriptor(&d).to_json().unwrap()).unwrap();

    let loaded = SchemaFile::from_path(&path).unwrap();
    assert_eq!(loaded.fingerprint, Some(d.fingerprint()));
    let d2 = loaded.into_descriptor().unwrap();
    assert_eq!(d2.mem_size(), d.mem_size());
    assert_eq!(d2.describe(true), d.describe(true));
}

#[timeout(5000)]
#[test]
fn test_stale_fingerprint_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("trade.json");
    fs::write(
        &path,
        r#"{
            "name": "trade",
            "fingerprint": 1,
            "fields": [ { "name": "qty", "type": "i32" } ]
        }"#,
    )
    .unwrap();

    let err = SchemaFile::from_path(&path)
        .unwrap()
        .into_descriptor()
        .unwrap_err();
    assert!(matches!(err, RdfError::Schema(_)));
}

#[timeout(5000)]
#[test]
fn test_missing_schema_file() {
    let dir = tempdir().unwrap();
    let err = SchemaFile::from_path(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, RdfError::Io(msg) if msg.contains("absent.json")));
}

#[timeout(5000)]
#[test]
fn test_string_field_without_payload_rejected() {
    let schema = SchemaFile::from_json(
        r#"{ "name": "bad", "fields": [ { "name": "sym", "type": "*key8*" } ] }"#,
    )
    .unwrap();
    assert!(matches!(
        schema.into_descriptor(),
        Err(RdfError::MissingPayload { .. })
    ));
}
