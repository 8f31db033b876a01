//! Fixed layout scenarios.

use ntest::timeout;

use rdf_core::{FieldType, RecordBuffer, Timestamp};

use super::helpers::{trade, trade_fields};

/// Unpacked: declaration order, ts aligned up to 8, record padded to 24
#[timeout(1000)]
#[test]
fn test_scenario_unpacked_trade() {
    let d = trade(false);
    assert_eq!(d.offset("sym").unwrap(), 0);
    assert_eq!(d.offset("ts").unwrap(), 8);
    assert_eq!(d.offset("qty").unwrap(), 16);
    assert_eq!(d.mem_align(), 8);
    assert_eq!(d.mem_size(), 24);
}

/// Packed: widest alignment placed first, logical order untouched
#[timeout(1000)]
#[test]
fn test_scenario_packed_trade() {
    let d = trade(true);
    let physical: Vec<&str> = d.physical_fields().map(|f| f.name()).collect();
    assert_eq!(physical, vec!["ts", "qty", "sym"]);

    assert_eq!(d.field(0).unwrap().name(), "sym");
    assert_eq!(d.field(1).unwrap().name(), "ts");
    assert_eq!(d.field(2).unwrap().name(), "qty");
    assert_eq!(d.offset("ts").unwrap(), 0);
    assert!(d.mem_size() <= trade(false).mem_size());
}

/// A full 8-byte key payload needs 9 bytes, pushing ts to the next 8 boundary
#[timeout(1000)]
#[test]
fn test_full_key_payload_includes_prefix() {
    let d = rdf_core::Descriptor::new("trade", trade_fields(8), false).unwrap();
    let sym = d.find_by_name("sym").unwrap();
    assert_eq!(sym.size(), 9);
    assert_eq!(d.offset("ts").unwrap(), 16);
    assert_eq!(d.mem_size(), 32);
}

/// Key "AAPL" round-trips and its prefix byte holds the length
#[timeout(1000)]
#[test]
fn test_scenario_key_prefix() {
    let d = rdf_core::Descriptor::new("trade", trade_fields(8), true).unwrap();
    let mut buf = RecordBuffer::new(&d, 1).unwrap();
    buf.record_mut(0).unwrap().set("sym", "AAPL").unwrap();

    let sym = d.find_by_name("sym").unwrap();
    assert_eq!(sym.field_type(), FieldType::Key8);
    assert_eq!(buf.record(0).unwrap().get::<&str>("sym").unwrap(), "AAPL");
    assert_eq!(buf.as_bytes()[sym.offset()], 4);
    assert_eq!(&buf.as_bytes()[sym.offset() + 1..sym.offset() + 5], b"AAPL");
}

#[timeout(1000)]
#[test]
fn test_timestamp_stored_as_raw_nanos() {
    let d = trade(true);
    let mut buf = RecordBuffer::new(&d, 1).unwrap();
    let ts = d.str_to_time("20240102 03:04:05").unwrap();
    buf.record_mut(0).unwrap().set("ts", ts).unwrap();

    let at = d.timestamp_offset().unwrap();
    let mut raw = [0u8; 8];
    raw.copy_from_slice(&buf.as_bytes()[at..at + 8]);
    assert_eq!(i64::from_ne_bytes(raw), ts.as_nanos());
    assert_eq!(
        buf.record(0).unwrap().get::<Timestamp>("ts").unwrap(),
        ts
    );
}
