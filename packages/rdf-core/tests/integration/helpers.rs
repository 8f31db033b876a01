//! Shared fixtures for integration tests.

use rdf_core::{Descriptor, Field, FieldType, FieldsBuilder};

/// `sym` key with `cap` payload bytes, a timestamp and an i32 quantity.
pub fn trade_fields(cap: usize) -> FieldsBuilder {
    FieldsBuilder::new()
        .push(Field::new("sym", "symbol", FieldType::Key8, cap).unwrap())
        .push(Field::new("ts", "trade time", FieldType::Timestamp, 0).unwrap())
        .push(Field::new("qty", "quantity", FieldType::Int32, 0).unwrap())
}

pub fn trade(pack: bool) -> Descriptor {
    Descriptor::new("trade", trade_fields(7), pack).unwrap()
}

/// Payload given to string-like fields by [`field_of`].
pub const STRING_PAYLOAD: usize = 11;

/// A field of `field_type` named after its index.
pub fn field_of(index: usize, field_type: FieldType) -> Field {
    let payload = if field_type.is_string_like() {
        STRING_PAYLOAD
    } else {
        0
    };
    Field::new(format!("f{index}"), "", field_type, payload).unwrap()
}
