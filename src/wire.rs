//! Wire-level building blocks: wire types, field keys and raw payloads
//!
//! A field on the wire is a varint key, `(tag << 3) | wire_type`, followed by a
//! payload whose framing depends on the wire type.

use crate::errors::{Error, Result};
use byteorder_lite::{ByteOrder, LE};
use core::fmt;

/// How a field's payload is framed on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireType {
    /// int32, int64, uint32, uint64, sint32, sint64, bool, enum
    Varint = 0,
    /// fixed64, sfixed64, double
    Fixed64 = 1,
    /// string, bytes, embedded messages
    LengthDelimited = 2,
    /// Deprecated group start, never accepted by the reader
    StartGroup = 3,
    /// Deprecated group end, never accepted by the reader
    EndGroup = 4,
    /// fixed32, sfixed32, float
    Fixed32 = 5,
}

impl WireType {
    /// Converts the low 3 bits of a field key
    pub fn from_code(code: u8) -> Result<WireType> {
        match code {
            0 => Ok(WireType::Varint),
            1 => Ok(WireType::Fixed64),
            2 => Ok(WireType::LengthDelimited),
            3 => Ok(WireType::StartGroup),
            4 => Ok(WireType::EndGroup),
            5 => Ok(WireType::Fixed32),
            c => Err(Error::UnsupportedWireType(c)),
        }
    }

    /// The 3-bit code of this wire type
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WireType::Varint => "varint",
            WireType::Fixed64 => "fixed64",
            WireType::LengthDelimited => "length-delimited",
            WireType::StartGroup => "start-group",
            WireType::EndGroup => "end-group",
            WireType::Fixed32 => "fixed32",
        };
        write!(f, "{} ({})", name, self.code())
    }
}

/// A decoded field key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldKey {
    /// Field number, never 0
    pub tag: u64,
    /// Payload framing
    pub wire_type: WireType,
}

impl FieldKey {
    /// Creates a key, without validating the tag
    pub const fn new(tag: u64, wire_type: WireType) -> FieldKey {
        FieldKey { tag, wire_type }
    }

    /// Splits a raw varint key into tag and wire type
    ///
    /// Tag 0 is rejected before the wire type is looked at.
    pub fn from_raw(key: u64) -> Result<FieldKey> {
        let tag = key >> 3;
        if tag == 0 {
            return Err(Error::IllegalTag);
        }
        let wire_type = WireType::from_code((key & 0x7) as u8)?;
        Ok(FieldKey { tag, wire_type })
    }

    /// The varint value written on the wire for this key
    pub fn to_raw(self) -> u64 {
        (self.tag << 3) | u64::from(self.wire_type.code())
    }
}

/// The undecoded body of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload<'a> {
    /// A decoded varint
    Varint(u64),
    /// 8 little endian bytes
    Fixed64([u8; 8]),
    /// A view of the length-delimited bytes, without the length prefix
    LengthDelimited(&'a [u8]),
    /// 4 little endian bytes
    Fixed32([u8; 4]),
}

impl<'a> Payload<'a> {
    /// Wire type this payload was framed with
    pub fn wire_type(&self) -> WireType {
        match self {
            Payload::Varint(_) => WireType::Varint,
            Payload::Fixed64(_) => WireType::Fixed64,
            Payload::LengthDelimited(_) => WireType::LengthDelimited,
            Payload::Fixed32(_) => WireType::Fixed32,
        }
    }
}

/// A field key and its payload, as read off the wire
///
/// Accessors narrow the payload to the scalar type a schema declares. Asking
/// for a type of another wire type is a `WireTypeMismatch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawField<'a> {
    /// The field key
    pub key: FieldKey,
    /// The field body
    pub payload: Payload<'a>,
}

impl<'a> RawField<'a> {
    fn mismatch(&self, expected: WireType) -> Error {
        Error::WireTypeMismatch {
            tag: self.key.tag,
            expected,
            found: self.payload.wire_type(),
        }
    }

    /// Field number
    pub fn tag(&self) -> u64 {
        self.key.tag
    }

    /// The raw varint value
    pub fn varint(&self) -> Result<u64> {
        match self.payload {
            Payload::Varint(v) => Ok(v),
            _ => Err(self.mismatch(WireType::Varint)),
        }
    }

    /// Reads int32 (varint, truncated to the low 32 bits)
    pub fn int32(&self) -> Result<i32> {
        self.varint().map(|v| v as i32)
    }

    /// Reads int64 (varint)
    pub fn int64(&self) -> Result<i64> {
        self.varint().map(|v| v as i64)
    }

    /// Reads uint32 (varint)
    pub fn uint32(&self) -> Result<u32> {
        self.varint().map(|v| v as u32)
    }

    /// Reads uint64 (varint)
    pub fn uint64(&self) -> Result<u64> {
        self.varint()
    }

    /// Reads sint32 (zigzag varint)
    pub fn sint32(&self) -> Result<i32> {
        let n = self.varint()? as u32;
        Ok(((n >> 1) as i32) ^ -((n & 1) as i32))
    }

    /// Reads sint64 (zigzag varint)
    pub fn sint64(&self) -> Result<i64> {
        let n = self.varint()?;
        Ok(((n >> 1) as i64) ^ -((n & 1) as i64))
    }

    /// Reads bool (varint, check if != 0)
    pub fn bool(&self) -> Result<bool> {
        self.varint().map(|v| v != 0)
    }

    /// Reads enum, encoded as i32
    pub fn enum_value<E: From<i32>>(&self) -> Result<E> {
        self.int32().map(E::from)
    }

    fn fixed64_bytes(&self) -> Result<[u8; 8]> {
        match self.payload {
            Payload::Fixed64(b) => Ok(b),
            _ => Err(self.mismatch(WireType::Fixed64)),
        }
    }

    fn fixed32_bytes(&self) -> Result<[u8; 4]> {
        match self.payload {
            Payload::Fixed32(b) => Ok(b),
            _ => Err(self.mismatch(WireType::Fixed32)),
        }
    }

    /// Reads fixed64 (little endian u64)
    pub fn fixed64(&self) -> Result<u64> {
        self.fixed64_bytes().map(|b| LE::read_u64(&b))
    }

    /// Reads sfixed64 (little endian i64)
    pub fn sfixed64(&self) -> Result<i64> {
        self.fixed64_bytes().map(|b| LE::read_i64(&b))
    }

    /// Reads double (little endian f64)
    pub fn double(&self) -> Result<f64> {
        self.fixed64_bytes().map(|b| LE::read_f64(&b))
    }

    /// Reads fixed32 (little endian u32)
    pub fn fixed32(&self) -> Result<u32> {
        self.fixed32_bytes().map(|b| LE::read_u32(&b))
    }

    /// Reads sfixed32 (little endian i32)
    pub fn sfixed32(&self) -> Result<i32> {
        self.fixed32_bytes().map(|b| LE::read_i32(&b))
    }

    /// Reads float (little endian f32)
    pub fn float(&self) -> Result<f32> {
        self.fixed32_bytes().map(|b| LE::read_f32(&b))
    }

    /// Reads bytes, borrowed from the input buffer
    pub fn bytes(&self) -> Result<&'a [u8]> {
        match self.payload {
            Payload::LengthDelimited(b) => Ok(b),
            _ => Err(self.mismatch(WireType::LengthDelimited)),
        }
    }

    /// Reads string, borrowed from the input buffer
    pub fn string(&self) -> Result<&'a str> {
        let b = self.bytes()?;
        core::str::from_utf8(b).map_err(|e| e.into())
    }
}
