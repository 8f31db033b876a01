//! Field type catalog and the value types it maps to.

mod catalog;
mod value;

pub use catalog::{catalog_is_ordered, FieldType, PrefixWidth, TypeProps, TYPE_COUNT, TYPE_PROPS};
pub use value::{Char, Utf16Char, Utf32Char, Utf8Char, Value, F128, F16};
