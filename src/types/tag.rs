//! Type tags for generically stored values.
//!
//! A closed set of value kinds. Generic compare, hash and serialize routines
//! match on the tag exhaustively. Discriminants are part of external formats
//! and never change once assigned.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::{Error, Result};

/// Dynamic kind of a generically stored value.
#[repr(u8)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TypeTag {
    /// No value present.
    #[default]
    Empty = 0,
    Multi = 1,
    Enum = 2,
    Boolean = 3,
    /// Opaque memory block.
    Block = 4,
    /// Raw NUL-terminated character data.
    Nuller = 5,
    /// Structured string cursor.
    Placer = 6,
    /// Generic string buffer.
    Stringer = 7,
    Int8 = 8,
    Int16 = 9,
    Int32 = 10,
    Int64 = 11,
    Uint8 = 12,
    Uint16 = 13,
    Uint32 = 14,
    Uint64 = 15,
    Float = 16,
    Double = 17,
}

impl TypeTag {
    /// Every tag, in discriminant order.
    pub const ALL: [TypeTag; 18] = [
        TypeTag::Empty,
        TypeTag::Multi,
        TypeTag::Enum,
        TypeTag::Boolean,
        TypeTag::Block,
        TypeTag::Nuller,
        TypeTag::Placer,
        TypeTag::Stringer,
        TypeTag::Int8,
        TypeTag::Int16,
        TypeTag::Int32,
        TypeTag::Int64,
        TypeTag::Uint8,
        TypeTag::Uint16,
        TypeTag::Uint32,
        TypeTag::Uint64,
        TypeTag::Float,
        TypeTag::Double,
    ];

    /// Human-readable name used in diagnostics and format dispatch.
    pub const fn name(self) -> &'static str {
        match self {
            TypeTag::Empty => "empty",
            TypeTag::Multi => "multi",
            TypeTag::Enum => "enum",
            TypeTag::Boolean => "boolean",
            TypeTag::Block => "block",
            TypeTag::Nuller => "nuller",
            TypeTag::Placer => "placer",
            TypeTag::Stringer => "stringer",
            TypeTag::Int8 => "int8",
            TypeTag::Int16 => "int16",
            TypeTag::Int32 => "int32",
            TypeTag::Int64 => "int64",
            TypeTag::Uint8 => "uint8",
            TypeTag::Uint16 => "uint16",
            TypeTag::Uint32 => "uint32",
            TypeTag::Uint64 => "uint64",
            TypeTag::Float => "float",
            TypeTag::Double => "double",
        }
    }

    /// Stable numeric identity.
    pub const fn as_raw(self) -> u8 {
        self as u8
    }

    /// Look up a tag by its numeric identity.
    pub fn from_raw(raw: u32) -> Result<Self> {
        usize::try_from(raw)
            .ok()
            .and_then(|idx| Self::ALL.get(idx).copied())
            .ok_or(Error::UnknownTag(raw))
    }

    pub fn is_empty(self) -> bool {
        self == TypeTag::Empty
    }

    pub fn is_integer(self) -> bool {
        matches!(
            self,
            TypeTag::Int8
                | TypeTag::Int16
                | TypeTag::Int32
                | TypeTag::Int64
                | TypeTag::Uint8
                | TypeTag::Uint16
                | TypeTag::Uint32
                | TypeTag::Uint64
        )
    }

    pub fn is_signed(self) -> bool {
        matches!(
            self,
            TypeTag::Int8
                | TypeTag::Int16
                | TypeTag::Int32
                | TypeTag::Int64
                | TypeTag::Float
                | TypeTag::Double
        )
    }

    pub fn is_float(self) -> bool {
        matches!(self, TypeTag::Float | TypeTag::Double)
    }

    /// Byte width of fixed-size scalar kinds; `None` for variable or opaque kinds.
    pub fn fixed_width(self) -> Option<usize> {
        match self {
            TypeTag::Boolean | TypeTag::Int8 | TypeTag::Uint8 => Some(1),
            TypeTag::Int16 | TypeTag::Uint16 => Some(2),
            TypeTag::Int32 | TypeTag::Uint32 | TypeTag::Float => Some(4),
            TypeTag::Int64 | TypeTag::Uint64 | TypeTag::Double => Some(8),
            TypeTag::Empty
            | TypeTag::Multi
            | TypeTag::Enum
            | TypeTag::Block
            | TypeTag::Nuller
            | TypeTag::Placer
            | TypeTag::Stringer => None,
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u32> for TypeTag {
    type Error = Error;

    fn try_from(raw: u32) -> Result<Self> {
        Self::from_raw(raw)
    }
}

impl TryFrom<u8> for TypeTag {
    type Error = Error;

    fn try_from(raw: u8) -> Result<Self> {
        Self::from_raw(u32::from(raw))
    }
}

impl From<TypeTag> for u8 {
    fn from(tag: TypeTag) -> Self {
        tag.as_raw()
    }
}

/// Name lookup on a raw tag value, as read from an external format.
pub fn type_name(raw: u32) -> Result<&'static str> {
    TypeTag::from_raw(raw).map(TypeTag::name)
}
