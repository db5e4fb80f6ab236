//! A module to describe and (de)serialize messages
//!
//! Each message type supplies a static table of its fields. The reader looks
//! every decoded tag up in that table and hands the payload to the matching
//! `merge` function.

use crate::errors::Result;
use crate::reader::BytesReader;
use crate::wire::{RawField, WireType};
use crate::writer::{Writer, WriterBackend};
use core::fmt;

/// The declared type of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// int32 (varint)
    Int32,
    /// int64 (varint)
    Int64,
    /// uint32 (varint)
    UInt32,
    /// uint64 (varint)
    UInt64,
    /// sint32 (zigzag varint)
    SInt32,
    /// sint64 (zigzag varint)
    SInt64,
    /// bool (varint)
    Bool,
    /// enum (varint)
    Enum,
    /// fixed64
    Fixed64,
    /// sfixed64
    SFixed64,
    /// double
    Double,
    /// fixed32
    Fixed32,
    /// sfixed32
    SFixed32,
    /// float
    Float,
    /// UTF-8 text
    String,
    /// Opaque bytes
    Bytes,
    /// An embedded message
    Message,
}

impl FieldKind {
    /// The wire type a field of this kind must arrive with
    pub const fn wire_type(self) -> WireType {
        match self {
            FieldKind::Int32
            | FieldKind::Int64
            | FieldKind::UInt32
            | FieldKind::UInt64
            | FieldKind::SInt32
            | FieldKind::SInt64
            | FieldKind::Bool
            | FieldKind::Enum => WireType::Varint,
            FieldKind::Fixed64 | FieldKind::SFixed64 | FieldKind::Double => WireType::Fixed64,
            FieldKind::Fixed32 | FieldKind::SFixed32 | FieldKind::Float => WireType::Fixed32,
            FieldKind::String | FieldKind::Bytes | FieldKind::Message => {
                WireType::LengthDelimited
            }
        }
    }
}

/// Stores a decoded field into its target message
pub type MergeFn<M> = for<'a> fn(&mut M, &mut BytesReader<'a>, RawField<'a>) -> Result<()>;

/// One entry of a message's field table
pub struct FieldDescriptor<M> {
    /// Field number
    pub tag: u64,
    /// Field name, used in logs
    pub name: &'static str,
    /// Declared type
    pub kind: FieldKind,
    /// Converts the payload and assigns it
    ///
    /// Only called once the payload's wire type matched `kind`.
    pub merge: MergeFn<M>,
}

impl<M> FieldDescriptor<M> {
    /// Creates a new table entry
    pub const fn new(tag: u64, name: &'static str, kind: FieldKind, merge: MergeFn<M>) -> Self {
        FieldDescriptor {
            tag,
            name,
            kind,
            merge,
        }
    }

    /// The wire type this field must arrive with
    pub const fn wire_type(&self) -> WireType {
        self.kind.wire_type()
    }
}

impl<M> fmt::Debug for FieldDescriptor<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("tag", &self.tag)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}

/// A trait to provide basic information about a given message
pub trait MessageInfo {
    /// Full message path, in form of Module.Message
    const PATH: &'static str;
}

/// A trait to handle deserialization from protocol buffers.
pub trait MessageRead: MessageInfo + Default + Sized + 'static {
    /// Field table, looked up by tag for every field read
    const FIELDS: &'static [FieldDescriptor<Self>];

    /// Looks up the table entry for `tag`
    fn field(tag: u64) -> Option<&'static FieldDescriptor<Self>> {
        Self::FIELDS.iter().find(|f| f.tag == tag)
    }

    /// Constructs an instance of `Self` by reading fields until the reader is exhausted
    ///
    /// It does NOT read message length first. If you want to read a
    /// length-delimited message, use `BytesReader::read_nested` directly
    fn from_reader(r: &mut BytesReader<'_>) -> Result<Self> {
        r.read_message()
    }
}

/// A trait to handle serialization to protocol buffers.
pub trait MessageWrite: Sized {
    /// Writes `Self` into W writer, without a length prefix
    fn write_message<W: WriterBackend>(&self, _: &mut Writer<W>) -> Result<()> {
        Ok(())
    }

    /// Computes necessary binary size of self once serialized in protobuf
    fn get_size(&self) -> usize {
        0
    }
}
