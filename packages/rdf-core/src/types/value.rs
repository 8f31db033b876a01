use std::fmt;

use super::catalog::FieldType;
use crate::time::Timestamp;

/// IEEE-754 binary16 value kept as raw bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct F16(pub u16);

/// IEEE-754 binary128 value kept as raw bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct F128(pub u128);

/// Single-byte character (C `char`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Char(pub u8);

/// UTF-8 code unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Utf8Char(pub u8);

/// UTF-16 code unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Utf16Char(pub u16);

/// UTF-32 code unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Utf32Char(pub u32);

/// Rounds `value >> shift` to nearest, ties to even.
fn round_shift(value: u128, shift: u32) -> u128 {
    if shift == 0 {
        return value;
    }
    if shift >= 128 {
        return 0;
    }
    let half = 1u128 << (shift - 1);
    let rem = value & ((1u128 << shift) - 1);
    let mut out = value >> shift;
    if rem > half || (rem == half && out & 1 == 1) {
        out += 1;
    }
    out
}

impl F16 {
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    pub const fn to_bits(self) -> u16 {
        self.0
    }

    /// Converts from `f32`, rounding to nearest even.
    pub fn from_f32(value: f32) -> Self {
        let x = value.to_bits();
        let sign = ((x >> 16) & 0x8000) as u16;
        let exp = ((x >> 23) & 0xff) as i32;
        let man = x & 0x007f_ffff;

        if exp == 0xff {
            let nan = if man != 0 { 0x0200 } else { 0 };
            return Self(sign | 0x7c00 | nan);
        }

        let e = exp - 127 + 15;
        if e >= 0x1f {
            return Self(sign | 0x7c00);
        }
        if e <= 0 {
            if e < -10 {
                return Self(sign);
            }
            let full = (man | 0x0080_0000) as u128;
            let bits = round_shift(full, (14 - e) as u32) as u16;
            return Self(sign | bits);
        }

        // A mantissa carry rolls into the exponent, up to infinity.
        let bits = ((e as u128) << 10) + round_shift(man as u128, 13);
        Self(sign | bits as u16)
    }

    pub fn to_f32(self) -> f32 {
        let h = self.0;
        let sign = ((h & 0x8000) as u32) << 16;
        let exp = ((h >> 10) & 0x1f) as u32;
        let man = (h & 0x03ff) as u32;
        match exp {
            0 => {
                let magnitude = man as f32 / 16_777_216.0;
                if sign != 0 {
                    -magnitude
                } else {
                    magnitude
                }
            }
            0x1f => f32::from_bits(sign | 0x7f80_0000 | (man << 13)),
            _ => f32::from_bits(sign | ((exp + 112) << 23) | (man << 13)),
        }
    }
}

impl F128 {
    const MANTISSA_BITS: u32 = 112;
    const MANTISSA_MASK: u128 = (1u128 << Self::MANTISSA_BITS) - 1;
    const EXP_MAX: u128 = 0x7fff;

    pub const fn from_bits(bits: u128) -> Self {
        Self(bits)
    }

    pub const fn to_bits(self) -> u128 {
        self.0
    }

    /// Widens an `f64`. Exact for every finite input.
    pub fn from_f64(value: f64) -> Self {
        let x = value.to_bits();
        let sign = ((x >> 63) as u128) << 127;
        let exp = ((x >> 52) & 0x7ff) as i64;
        let man = (x & 0x000f_ffff_ffff_ffff) as u128;

        if exp == 0x7ff {
            return Self(sign | (Self::EXP_MAX << Self::MANTISSA_BITS) | (man << 60));
        }
        if exp == 0 {
            if man == 0 {
                return Self(sign);
            }
            // f64 subnormal: normalise around its highest set bit.
            let top = 127 - man.leading_zeros() as i64;
            let qexp = (top - 1074 + 16383) as u128;
            let qman = (man << (Self::MANTISSA_BITS as i64 - top)) & Self::MANTISSA_MASK;
            return Self(sign | (qexp << Self::MANTISSA_BITS) | qman);
        }

        let qexp = (exp - 1023 + 16383) as u128;
        Self(sign | (qexp << Self::MANTISSA_BITS) | (man << 60))
    }

    /// Narrows to `f64`, rounding to nearest even.
    pub fn to_f64(self) -> f64 {
        let bits = self.0;
        let sign = ((bits >> 127) as u64) << 63;
        let exp = ((bits >> Self::MANTISSA_BITS) & Self::EXP_MAX) as i64;
        let man = bits & Self::MANTISSA_MASK;

        if exp == Self::EXP_MAX as i64 {
            let mut narrow = (man >> 60) as u64;
            if man != 0 && narrow == 0 {
                narrow = 1;
            }
            return f64::from_bits(sign | (0x7ff << 52) | narrow);
        }
        if exp == 0 {
            return f64::from_bits(sign);
        }

        let e = exp - 16383 + 1023;
        if e >= 0x7ff {
            return f64::from_bits(sign | (0x7ff << 52));
        }
        if e <= 0 {
            let shift = 61 - e;
            let full = man | (1u128 << Self::MANTISSA_BITS);
            let narrow = round_shift(full, shift.min(128) as u32) as u64;
            return f64::from_bits(sign | narrow);
        }

        let narrow = ((e as u128) << 52) + round_shift(man, 60);
        f64::from_bits(sign | narrow as u64)
    }
}

impl From<f32> for F16 {
    fn from(value: f32) -> Self {
        F16::from_f32(value)
    }
}

impl From<f64> for F128 {
    fn from(value: f64) -> Self {
        F128::from_f64(value)
    }
}

impl fmt::Display for F16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_f32(), f)
    }
}

impl fmt::Display for F128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_f64(), f)
    }
}

/// A decoded field value borrowing string payloads from the record buffer.
///
/// One variant per catalog entry (string kinds share a variant per role).
/// Matching on it is exhaustive, so a new catalog type cannot be added
/// without teaching the codec about it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    Key(&'a str),
    Str(&'a str),
    Timestamp(Timestamp),
    Char(Char),
    Utf8(Utf8Char),
    Utf16(Utf16Char),
    Utf32(Utf32Char),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F16(F16),
    F32(f32),
    F64(f64),
    F128(F128),
    Bool(bool),
}

impl Value<'_> {
    /// Short name of the value kind, used in mismatch errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Key(_) => "key",
            Value::Str(_) => "string",
            Value::Timestamp(_) => "tstamp",
            Value::Char(_) => "char",
            Value::Utf8(_) => "utf-c8",
            Value::Utf16(_) => "utf-c16",
            Value::Utf32(_) => "utf-c32",
            Value::I8(_) => "i8",
            Value::I16(_) => "i16",
            Value::I32(_) => "i32",
            Value::I64(_) => "i64",
            Value::U8(_) => "u8",
            Value::U16(_) => "u16",
            Value::U32(_) => "u32",
            Value::U64(_) => "u64",
            Value::F16(_) => "f16",
            Value::F32(_) => "f32",
            Value::F64(_) => "f64",
            Value::F128(_) => "f128",
            Value::Bool(_) => "bool",
        }
    }

    /// Returns `true` if this value can be stored in a field of `field_type`.
    ///
    /// Keys and strings share one encoding, so either kind fits any
    /// string-like field. Reads report the kind the field declares.
    pub fn fits(&self, field_type: FieldType) -> bool {
        matches!(
            (self, field_type),
            (
                Value::Key(_) | Value::Str(_),
                FieldType::Key8 | FieldType::Key16 | FieldType::String8 | FieldType::String16
            )
                | (Value::Timestamp(_), FieldType::Timestamp)
                | (Value::Char(_), FieldType::Char)
                | (Value::Utf8(_), FieldType::UtfChar8)
                | (Value::Utf16(_), FieldType::UtfChar16)
                | (Value::Utf32(_), FieldType::UtfChar32)
                | (Value::I8(_), FieldType::Int8)
                | (Value::I16(_), FieldType::Int16)
                | (Value::I32(_), FieldType::Int32)
                | (Value::I64(_), FieldType::Int64)
                | (Value::U8(_), FieldType::Uint8)
                | (Value::U16(_), FieldType::Uint16)
                | (Value::U32(_), FieldType::Uint32)
                | (Value::U64(_), FieldType::Uint64)
                | (Value::F16(_), FieldType::Float16)
                | (Value::F32(_), FieldType::Float32)
                | (Value::F64(_), FieldType::Float64)
                | (Value::F128(_), FieldType::Float128)
                | (Value::Bool(_), FieldType::Bool)
        )
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // `pad` keeps width/alignment flags working for every variant.
        let text = match self {
            Value::Key(s) | Value::Str(s) => return f.pad(s),
            Value::Timestamp(ts) => ts.as_nanos().to_string(),
            Value::Char(c) => char::from(c.0).to_string(),
            Value::Utf8(c) => c.0.to_string(),
            Value::Utf16(c) => c.0.to_string(),
            Value::Utf32(c) => c.0.to_string(),
            Value::I8(v) => v.to_string(),
            Value::I16(v) => v.to_string(),
            Value::I32(v) => v.to_string(),
            Value::I64(v) => v.to_string(),
            Value::U8(v) => v.to_string(),
            Value::U16(v) => v.to_string(),
            Value::U32(v) => v.to_string(),
            Value::U64(v) => v.to_string(),
            Value::F16(v) => v.to_string(),
            Value::F32(v) => v.to_string(),
            Value::F64(v) => v.to_string(),
            Value::F128(v) => v.to_string(),
            Value::Bool(v) => v.to_string(),
        };
        f.pad(&text)
    }
}
