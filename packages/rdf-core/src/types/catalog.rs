use std::fmt;
use std::mem::{align_of, size_of};
use std::str::FromStr;

use crate::error::{RdfError, Result};

/// Logical type of a record field.
///
/// The discriminant doubles as the row index into [`TYPE_PROPS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum FieldType {
    /// Key string with 8-bit length prefix
    Key8 = 0,
    /// Key string with 16-bit length prefix
    Key16,
    /// String with 8-bit length prefix
    String8,
    /// String with 16-bit length prefix
    String16,
    /// Nanoseconds since the Unix epoch
    Timestamp,
    Char,
    UtfChar8,
    UtfChar16,
    UtfChar32,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Float16,
    Float32,
    Float64,
    Float128,
    Bool,
}

/// Width of the length prefix written in front of string payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrefixWidth {
    U8,
    U16,
}

impl PrefixWidth {
    /// Number of bytes the prefix occupies.
    pub const fn bytes(self) -> usize {
        match self {
            PrefixWidth::U8 => size_of::<u8>(),
            PrefixWidth::U16 => size_of::<u16>(),
        }
    }

    /// Largest payload length the prefix can express.
    pub const fn max_len(self) -> usize {
        match self {
            PrefixWidth::U8 => u8::MAX as usize,
            PrefixWidth::U16 => u16::MAX as usize,
        }
    }
}

/// Catalog row describing one logical type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeProps {
    pub field_type: FieldType,
    pub name: &'static str,
    /// Intrinsic size in bytes (the length prefix for string-like types)
    pub size: usize,
    pub align: usize,
}

const fn props<T>(field_type: FieldType, name: &'static str) -> TypeProps {
    TypeProps {
        field_type,
        name,
        size: size_of::<T>(),
        align: align_of::<T>(),
    }
}

/// Number of logical field types.
pub const TYPE_COUNT: usize = 22;

// Float16 and Float128 are stored as raw IEEE-754 bits, so their rows borrow
// the size and alignment of the matching unsigned integer.
const CATALOG: [TypeProps; TYPE_COUNT] = [
    props::<u8>(FieldType::Key8, "*key8*"),
    props::<u16>(FieldType::Key16, "*key16*"),
    props::<u8>(FieldType::String8, "str8"),
    props::<u16>(FieldType::String16, "str16"),
    props::<i64>(FieldType::Timestamp, "tstamp"),
    props::<u8>(FieldType::Char, "char"),
    props::<u8>(FieldType::UtfChar8, "utf-c8"),
    props::<u16>(FieldType::UtfChar16, "utf-c16"),
    props::<u32>(FieldType::UtfChar32, "utf-c32"),
    props::<i8>(FieldType::Int8, "i8"),
    props::<i16>(FieldType::Int16, "i16"),
    props::<i32>(FieldType::Int32, "i32"),
    props::<i64>(FieldType::Int64, "i64"),
    props::<u8>(FieldType::Uint8, "u8"),
    props::<u16>(FieldType::Uint16, "u16"),
    props::<u32>(FieldType::Uint32, "u32"),
    props::<u64>(FieldType::Uint64, "u64"),
    props::<u16>(FieldType::Float16, "f16"),
    props::<f32>(FieldType::Float32, "f32"),
    props::<f64>(FieldType::Float64, "f64"),
    props::<u128>(FieldType::Float128, "f128"),
    props::<bool>(FieldType::Bool, "bool"),
];

/// Type catalog, indexed by `FieldType as usize`.
pub static TYPE_PROPS: [TypeProps; TYPE_COUNT] = CATALOG;

/// Returns `true` if every catalog row sits at the index of its own tag.
pub const fn catalog_is_ordered() -> bool {
    let mut i = 0;
    while i < TYPE_COUNT {
        if CATALOG[i].field_type as usize != i {
            return false;
        }
        i += 1;
    }
    true
}

const _: () = assert!(
    catalog_is_ordered(),
    "TYPE_PROPS order does not match the FieldType discriminants"
);

impl FieldType {
    /// Every field type in catalog order.
    pub const ALL: [FieldType; TYPE_COUNT] = [
        FieldType::Key8,
        FieldType::Key16,
        FieldType::String8,
        FieldType::String16,
        FieldType::Timestamp,
        FieldType::Char,
        FieldType::UtfChar8,
        FieldType::UtfChar16,
        FieldType::UtfChar32,
        FieldType::Int8,
        FieldType::Int16,
        FieldType::Int32,
        FieldType::Int64,
        FieldType::Uint8,
        FieldType::Uint16,
        FieldType::Uint32,
        FieldType::Uint64,
        FieldType::Float16,
        FieldType::Float32,
        FieldType::Float64,
        FieldType::Float128,
        FieldType::Bool,
    ];

    /// Catalog row for this type.
    #[inline]
    pub fn props(self) -> &'static TypeProps {
        &TYPE_PROPS[self as usize]
    }

    /// Display name, e.g. `"i32"` or `"*key8*"`.
    #[inline]
    pub fn name(self) -> &'static str {
        self.props().name
    }

    /// Intrinsic size in bytes, excluding any string payload.
    #[inline]
    pub fn size(self) -> usize {
        self.props().size
    }

    #[inline]
    pub fn align(self) -> usize {
        self.props().align
    }

    /// Returns `true` for the four length-prefixed string types.
    #[inline]
    pub fn is_string_like(self) -> bool {
        self.prefix_width().is_some()
    }

    /// Returns `true` for string types carrying the key role.
    #[inline]
    pub fn is_key(self) -> bool {
        matches!(self, FieldType::Key8 | FieldType::Key16)
    }

    /// Length prefix width, or `None` for fixed-width types.
    pub fn prefix_width(self) -> Option<PrefixWidth> {
        match self {
            FieldType::Key8 | FieldType::String8 => Some(PrefixWidth::U8),
            FieldType::Key16 | FieldType::String16 => Some(PrefixWidth::U16),
            _ => None,
        }
    }

    /// Looks up a type by its display name.
    pub fn from_name(name: &str) -> Result<Self> {
        TYPE_PROPS
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.field_type)
            .ok_or_else(|| RdfError::UnknownType(name.to_string()))
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FieldType {
    type Err = RdfError;

    fn from_str(s: &str) -> Result<Self> {
        FieldType::from_name(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_index_matches_tag() {
        assert!(catalog_is_ordered());
        for (i, ty) in FieldType::ALL.iter().enumerate() {
            assert_eq!(*ty as usize, i);
            assert_eq!(TYPE_PROPS[i].field_type, *ty);
        }
    }

    #[test]
    fn test_sizes_and_alignment() {
        assert_eq!(FieldType::Key8.size(), 1);
        assert_eq!(FieldType::Key16.size(), 2);
        assert_eq!(FieldType::String16.align(), 2);
        assert_eq!(FieldType::Timestamp.size(), 8);
        assert_eq!(FieldType::Timestamp.align(), 8);
        assert_eq!(FieldType::Int32.size(), 4);
        assert_eq!(FieldType::Float16.size(), 2);
        assert_eq!(FieldType::Float128.size(), 16);
        assert_eq!(FieldType::Float128.align(), align_of::<u128>());
        assert_eq!(FieldType::Bool.size(), 1);
        for ty in FieldType::ALL {
            assert!(ty.align().is_power_of_two());
            assert_eq!(ty.size() % ty.align(), 0);
        }
    }

    #[test]
    fn test_string_like_types() {
        let strings: Vec<_> = FieldType::ALL
            .into_iter()
            .filter(|t| t.is_string_like())
            .collect();
        assert_eq!(
            strings,
            vec![
                FieldType::Key8,
                FieldType::Key16,
                FieldType::String8,
                FieldType::String16
            ]
        );
        assert_eq!(FieldType::Key8.prefix_width(), Some(PrefixWidth::U8));
        assert_eq!(FieldType::String16.prefix_width(), Some(PrefixWidth::U16));
        assert_eq!(FieldType::Uint16.prefix_width(), None);
        assert!(FieldType::Key16.is_key());
        assert!(!FieldType::String8.is_key());
        assert_eq!(PrefixWidth::U8.max_len(), 255);
        assert_eq!(PrefixWidth::U16.max_len(), 65535);
    }

    #[test]
    fn test_lookup_by_name() {
        for ty in FieldType::ALL {
            assert_eq!(FieldType::from_name(ty.name()).unwrap(), ty);
        }
        assert_eq!("tstamp".parse::<FieldType>().unwrap(), FieldType::Timestamp);
        assert_eq!(
            FieldType::from_name("decimal"),
            Err(RdfError::UnknownType("decimal".to_string()))
        );
    }
}
