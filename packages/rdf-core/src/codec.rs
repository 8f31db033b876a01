//! Typed read/write of field values inside a record's bytes.
//!
//! Fixed-width values are stored in native byte order at the field's offset.
//! String-like values are stored as `[len prefix: u8 | u16][len bytes]`
//! inside the field's reserved `prefix + payload` bytes.
//!
//! # Contract
//! The typed functions ([`read`], [`write`]) only check in debug builds that
//! the Rust type matches the field's declared type, that the field address is
//! aligned, and that the record slice covers the field. Release builds skip
//! these checks; slicing still bounds-checks, so a violation panics or reads
//! garbage but never touches memory outside the slice. The dynamic functions
//! ([`read_value`], [`write_value`]) always check the type, and the checked
//! reads ([`try_read`], [`read_value`]) report string bytes the codec could
//! not have written as [`RdfError::CorruptField`].

use std::mem::size_of;

use crate::error::{RdfError, Result};
use crate::layout::LaidOutField;
use crate::time::Timestamp;
use crate::types::{Char, FieldType, PrefixWidth, Utf16Char, Utf32Char, Utf8Char, Value, F128, F16};

/// A Rust type that can be stored in a field.
pub trait FieldValue<'a>: Sized {
    /// Returns `true` if this type may be stored in a field of `field_type`.
    fn accepts(field_type: FieldType) -> bool;

    /// Writes `self` into `dst`, the field's exact byte range.
    fn encode(self, field: &LaidOutField, dst: &mut [u8]) -> Result<()>;

    /// Reads a value from `src`, the field's exact byte range.
    fn decode(field: &LaidOutField, src: &'a [u8]) -> Self;

    /// Like [`FieldValue::decode`], but fails on bytes that no valid write
    /// could have produced. Fixed-width types accept every bit pattern.
    #[inline]
    fn try_decode(field: &LaidOutField, src: &'a [u8]) -> Result<Self> {
        Ok(Self::decode(field, src))
    }
}

fn array<const N: usize>(src: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&src[..N]);
    out
}

macro_rules! primitive_value {
    ($($ty:ty => $field_type:ident),* $(,)?) => {
        $(
            impl<'a> FieldValue<'a> for $ty {
                #[inline]
                fn accepts(field_type: FieldType) -> bool {
                    field_type == FieldType::$field_type
                }

                #[inline]
                fn encode(self, _field: &LaidOutField, dst: &mut [u8]) -> Result<()> {
                    dst[..size_of::<$ty>()].copy_from_slice(&self.to_ne_bytes());
                    Ok(())
                }

                #[inline]
                fn decode(_field: &LaidOutField, src: &'a [u8]) -> Self {
                    <$ty>::from_ne_bytes(array(src))
                }
            }
        )*
    };
}

macro_rules! newtype_value {
    ($($ty:ty => $field_type:ident as $repr:ty { into: $into:expr, from: $from:expr }),* $(,)?) => {
        $(
            impl<'a> FieldValue<'a> for $ty {
                #[inline]
                fn accepts(field_type: FieldType) -> bool {
                    field_type == FieldType::$field_type
                }

                #[inline]
                fn encode(self, _field: &LaidOutField, dst: &mut [u8]) -> Result<()> {
                    let into: fn($ty) -> $repr = $into;
                    dst[..size_of::<$repr>()].copy_from_slice(&into(self).to_ne_bytes());
                    Ok(())
                }

                #[inline]
                fn decode(_field: &LaidOutField, src: &'a [u8]) -> Self {
                    let from: fn($repr) -> $ty = $from;
                    from(<$repr>::from_ne_bytes(array(src)))
                }
            }
        )*
    };
}

primitive_value! {
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => Uint8,
    u16 => Uint16,
    u32 => Uint32,
    u64 => Uint64,
    f32 => Float32,
    f64 => Float64,
}

// Float16 and Float128 travel as raw bits; the character types as code units.
newtype_value! {
    Timestamp => Timestamp as i64 { into: Timestamp::as_nanos, from: Timestamp::from_nanos },
    F16 => Float16 as u16 { into: F16::to_bits, from: F16::from_bits },
    F128 => Float128 as u128 { into: F128::to_bits, from: F128::from_bits },
    Char => Char as u8 { into: |c| c.0, from: Char },
    Utf8Char => UtfChar8 as u8 { into: |c| c.0, from: Utf8Char },
    Utf16Char => UtfChar16 as u16 { into: |c| c.0, from: Utf16Char },
    Utf32Char => UtfChar32 as u32 { into: |c| c.0, from: Utf32Char },
}

impl<'a> FieldValue<'a> for bool {
    #[inline]
    fn accepts(field_type: FieldType) -> bool {
        field_type == FieldType::Bool
    }

    #[inline]
    fn encode(self, _field: &LaidOutField, dst: &mut [u8]) -> Result<()> {
        dst[0] = u8::from(self);
        Ok(())
    }

    #[inline]
    fn decode(_field: &LaidOutField, src: &'a [u8]) -> Self {
        src[0] != 0
    }
}

fn prefix_width(field: &LaidOutField) -> PrefixWidth {
    match field.field_type().prefix_width() {
        Some(width) => width,
        None => {
            debug_assert!(false, "field '{}' is not string-like", field.name());
            PrefixWidth::U8
        }
    }
}

impl<'a> FieldValue<'a> for &'a str {
    #[inline]
    fn accepts(field_type: FieldType) -> bool {
        field_type.is_string_like()
    }

    fn encode(self, field: &LaidOutField, dst: &mut [u8]) -> Result<()> {
        let bytes = self.as_bytes();
        let len = bytes.len();
        if len > field.payload() {
            return Err(RdfError::PayloadOverflow {
                field: field.name().to_string(),
                len,
                capacity: field.payload(),
            });
        }

        let width = prefix_width(field);
        if len > width.max_len() {
            return Err(RdfError::PrefixOverflow {
                field: field.name().to_string(),
                len,
                max: width.max_len(),
            });
        }

        let start = width.bytes();
        match width {
            PrefixWidth::U8 => dst[0] = len as u8,
            PrefixWidth::U16 => dst[..start].copy_from_slice(&(len as u16).to_ne_bytes()),
        }
        dst[start..start + len].copy_from_slice(bytes);
        Ok(())
    }

    fn decode(field: &LaidOutField, src: &'a [u8]) -> Self {
        let bytes = payload_bytes(field, src);
        match std::str::from_utf8(bytes) {
            Ok(s) => s,
            Err(_) => {
                debug_assert!(false, "field '{}' holds invalid UTF-8", field.name());
                ""
            }
        }
    }

    fn try_decode(field: &LaidOutField, src: &'a [u8]) -> Result<Self> {
        let bytes = checked_payload_bytes(field, src)?;
        std::str::from_utf8(bytes).map_err(|e| RdfError::CorruptField {
            field: field.name().to_string(),
            reason: format!("invalid UTF-8 at byte {}", e.valid_up_to()),
        })
    }
}

fn stored_len(width: PrefixWidth, src: &[u8]) -> usize {
    match width {
        PrefixWidth::U8 => src[0] as usize,
        PrefixWidth::U16 => u16::from_ne_bytes(array(src)) as usize,
    }
}

/// Length-prefixed content, rejecting a prefix larger than the capacity.
fn checked_payload_bytes<'a>(field: &LaidOutField, src: &'a [u8]) -> Result<&'a [u8]> {
    let width = prefix_width(field);
    let start = width.bytes();
    let len = stored_len(width, src);
    if len > field.payload() {
        return Err(RdfError::CorruptField {
            field: field.name().to_string(),
            reason: format!("length prefix {} exceeds capacity {}", len, field.payload()),
        });
    }
    Ok(&src[start..start + len])
}

/// Length-prefixed content of a string-like field's byte range.
fn payload_bytes<'a>(field: &LaidOutField, src: &'a [u8]) -> &'a [u8] {
    let width = prefix_width(field);
    let start = width.bytes();
    let len = stored_len(width, src);
    debug_assert!(
        len <= field.payload(),
        "field '{}' prefix {} exceeds capacity {}",
        field.name(),
        len,
        field.payload()
    );
    let len = len.min(field.payload());
    &src[start..start + len]
}

#[inline]
fn check_access(record: &[u8], field: &LaidOutField) {
    debug_assert!(
        field.end_offset() <= record.len(),
        "field '{}' [{}, {}) outside record of {} bytes",
        field.name(),
        field.offset(),
        field.end_offset(),
        record.len()
    );
    debug_assert!(
        (record.as_ptr() as usize + field.offset()) % field.align() == 0,
        "field '{}' address not aligned to {}",
        field.name(),
        field.align()
    );
}

/// Writes `value` into `field` of `record`.
///
/// `record` starts at the record's first byte. A failed string write may
/// leave the field partially written.
///
/// # Errors
/// `PayloadOverflow` or `PrefixOverflow` for strings that do not fit.
#[inline]
pub fn write<'v, V: FieldValue<'v>>(record: &mut [u8], field: &LaidOutField, value: V) -> Result<()> {
    debug_assert!(
        V::accepts(field.field_type()),
        "field '{}' of type {} written with {}",
        field.name(),
        field.field_type(),
        std::any::type_name::<V>()
    );
    check_access(record, field);
    value.encode(field, &mut record[field.offset()..field.end_offset()])
}

/// Reads `field` from `record`.
///
/// String values borrow from `record` and are only valid while it is.
#[inline]
pub fn read<'a, V: FieldValue<'a>>(record: &'a [u8], field: &LaidOutField) -> V {
    debug_assert!(
        V::accepts(field.field_type()),
        "field '{}' of type {} read as {}",
        field.name(),
        field.field_type(),
        std::any::type_name::<V>()
    );
    check_access(record, field);
    V::decode(field, &record[field.offset()..field.end_offset()])
}

/// Reads `field` from `record`, validating string contents.
///
/// # Errors
/// `CorruptField` if a string field's length prefix exceeds its capacity or
/// its bytes are not UTF-8.
#[inline]
pub fn try_read<'a, V: FieldValue<'a>>(record: &'a [u8], field: &LaidOutField) -> Result<V> {
    debug_assert!(
        V::accepts(field.field_type()),
        "field '{}' of type {} read as {}",
        field.name(),
        field.field_type(),
        std::any::type_name::<V>()
    );
    check_access(record, field);
    V::try_decode(field, &record[field.offset()..field.end_offset()])
}

/// Raw content bytes of a string-like field, without the length prefix.
pub fn read_bytes<'a>(record: &'a [u8], field: &LaidOutField) -> &'a [u8] {
    debug_assert!(field.field_type().is_string_like());
    check_access(record, field);
    payload_bytes(field, &record[field.offset()..field.end_offset()])
}

/// Reads `field` as a dynamically typed [`Value`].
///
/// # Errors
/// `CorruptField` for string fields, as in [`try_read`].
pub fn read_value<'a>(record: &'a [u8], field: &LaidOutField) -> Result<Value<'a>> {
    Ok(match field.field_type() {
        FieldType::Key8 | FieldType::Key16 => Value::Key(try_read(record, field)?),
        FieldType::String8 | FieldType::String16 => Value::Str(try_read(record, field)?),
        FieldType::Timestamp => Value::Timestamp(read(record, field)),
        FieldType::Char => Value::Char(read(record, field)),
        FieldType::UtfChar8 => Value::Utf8(read(record, field)),
        FieldType::UtfChar16 => Value::Utf16(read(record, field)),
        FieldType::UtfChar32 => Value::Utf32(read(record, field)),
        FieldType::Int8 => Value::I8(read(record, field)),
        FieldType::Int16 => Value::I16(read(record, field)),
        FieldType::Int32 => Value::I32(read(record, field)),
        FieldType::Int64 => Value::I64(read(record, field)),
        FieldType::Uint8 => Value::U8(read(record, field)),
        FieldType::Uint16 => Value::U16(read(record, field)),
        FieldType::Uint32 => Value::U32(read(record, field)),
        FieldType::Uint64 => Value::U64(read(record, field)),
        FieldType::Float16 => Value::F16(read(record, field)),
        FieldType::Float32 => Value::F32(read(record, field)),
        FieldType::Float64 => Value::F64(read(record, field)),
        FieldType::Float128 => Value::F128(read(record, field)),
        FieldType::Bool => Value::Bool(read(record, field)),
    })
}

/// Writes a dynamically typed [`Value`] into `field`.
///
/// # Errors
/// `TypeMismatch` if the value kind does not fit the field, plus the string
/// errors of [`write`].
pub fn write_value(record: &mut [u8], field: &LaidOutField, value: &Value<'_>) -> Result<()> {
    if !value.fits(field.field_type()) {
        return Err(RdfError::TypeMismatch {
            field: field.name().to_string(),
            expected: field.field_type().name(),
            got: value.kind(),
        });
    }
    match *value {
        Value::Key(s) | Value::Str(s) => write(record, field, s),
        Value::Timestamp(v) => write(record, field, v),
        Value::Char(v) => write(record, field, v),
        Value::Utf8(v) => write(record, field, v),
        Value::Utf16(v) => write(record, field, v),
        Value::Utf32(v) => write(record, field, v),
        Value::I8(v) => write(record, field, v),
        Value::I16(v) => write(record, field, v),
        Value::I32(v) => write(record, field, v),
        Value::I64(v) => write(record, field, v),
        Value::U8(v) => write(record, field, v),
        Value::U16(v) => write(record, field, v),
        Value::U32(v) => write(record, field, v),
        Value::U64(v) => write(record, field, v),
        Value::F16(v) => write(record, field, v),
        Value::F32(v) => write(record, field, v),
        Value::F64(v) => write(record, field, v),
        Value::F128(v) => write(record, field, v),
        Value::Bool(v) => write(record, field, v),
    }
}
