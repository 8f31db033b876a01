//! Record views over buffers and files.

use std::fs;
use std::io::Write;

use ntest::timeout;
use tempfile::{tempdir, NamedTempFile};

use rdf_core::{RdfError, RecordBuffer, RecordView, Timestamp, Value};

use super::helpers::trade;

const SYMBOLS: [&str; 4] = ["AAPL", "MSFT", "IBM", "GOOG"];

#[timeout(1000)]
#[test]
fn test_view_over_written_buffer() {
    let d = trade(true);
    let mut buf = RecordBuffer::new(&d, SYMBOLS.len()).unwrap();
    for (i, sym) in SYMBOLS.iter().enumerate() {
        let mut rec = buf.record_mut(i).unwrap();
        rec.set("sym", *sym).unwrap();
        rec.set("ts", Timestamp::from_nanos(i as i64)).unwrap();
        rec.set("qty", (i as i32 + 1) * 100).unwrap();
    }

    let view = RecordView::new(&d, buf.as_bytes()).unwrap();
    assert_eq!(view.len(), 4);
    let symbols: Vec<&str> = view.iter().map(|r| r.get("sym").unwrap()).collect();
    assert_eq!(symbols, SYMBOLS.to_vec());

    let third = view.get(2).unwrap();
    assert_eq!(third.value("qty").unwrap(), Value::I32(300));
    assert_eq!(
        third.get::<Timestamp>("ts").unwrap(),
        Timestamp::from_nanos(2)
    );

    let mut count = 0;
    for rec in view {
        assert!(rec.get::<i32>("qty").unwrap() > 0);
        count += 1;
    }
    assert_eq!(count, 4);
}

#[timeout(1000)]
#[test]
fn test_view_is_restartable() {
    let d = trade(false);
    let buf = RecordBuffer::new(&d, 3).unwrap();
    let view = buf.view();
    assert_eq!(view.iter().count(), 3);
    assert_eq!(view.iter().count(), 3);
    assert_eq!(view.iter().nth(2).unwrap().as_bytes().len(), d.mem_size());
}

#[timeout(1000)]
#[test]
fn test_partial_trailing_record_fails_fast() {
    let d = trade(true);
    let buf = RecordBuffer::new(&d, 2).unwrap();
    let short = &buf.as_bytes()[..d.mem_size() + 3];
    assert_eq!(
        RecordView::new(&d, short).err(),
        Some(RdfError::RecordSizeMismatch {
            len: d.mem_size() + 3,
            record_size: d.mem_size(),
        })
    );
}

#[timeout(5000)]
#[test]
fn test_records_survive_file_roundtrip() {
    let d = trade(true);
    let mut buf = RecordBuffer::new(&d, SYMBOLS.len()).unwrap();
    for (i, mut rec) in buf.view_mut().iter_mut().enumerate() {
        rec.set("sym", SYMBOLS[i]).unwrap();
        rec.set("qty", i as i32).unwrap();
    }

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(buf.as_bytes()).unwrap();
    file.flush().unwrap();

    let bytes = fs::read(file.path()).unwrap();
    assert_eq!(bytes.len() % d.mem_size(), 0);

    let mut loaded = RecordBuffer::new(&d, bytes.len() / d.mem_size()).unwrap();
    loaded.as_bytes_mut().copy_from_slice(&bytes);
    let rendered: Vec<String> = loaded
        .view()
        .iter()
        .map(|r| r.get::<&str>("sym").unwrap().to_string())
        .collect();
    assert_eq!(rendered, SYMBOLS.to_vec());
    assert_eq!(loaded.record(3).unwrap().get::<i32>("qty").unwrap(), 3);
}

#[timeout(5000)]
#[test]
fn test_truncated_file_rejected() {
    let d = trade(true);
    let buf = RecordBuffer::new(&d, 2).unwrap();
    let dir = tempdir().unwrap();
    let path = dir.path().join("trades.bin");
    fs::write(&path, &buf.as_bytes()[..buf.as_bytes().len() - 1]).unwrap();

    let bytes = fs::read(&path).unwrap();
    let mut scratch = RecordBuffer::new(&d, 2).unwrap();
    scratch.as_bytes_mut()[..bytes.len()].copy_from_slice(&bytes);
    assert!(matches!(
        RecordView::new(&d, &scratch.as_bytes()[..bytes.len()]),
        Err(RdfError::RecordSizeMismatch { .. })
    ));
}
