//! A module to manage protobuf deserialization

use crate::config::DecoderConfig;
use crate::errors::{Error, Result};
use crate::message::MessageRead;
use crate::wire::{FieldKey, Payload, RawField, WireType};
use log::trace;

#[cfg(feature = "std")]
use log::debug;
#[cfg(feature = "std")]
use std::{fs::File, io::Read, path::Path};

/// Longest varint holding a u64: 9 full groups plus 1 bit
const MAX_VARINT_LEN: usize = 10;

/// A struct to read protocol binary buffers
/// ```rust
/// # mod foo_bar {
/// #     use quack_wire::{BytesReader, FieldDescriptor, FieldKind, MessageInfo, MessageRead, RawField, Result};
/// #     #[derive(Default)]
/// #     pub struct Foo { pub id: u32 }
/// #     impl MessageInfo for Foo { const PATH: &'static str = "foo_bar.Foo"; }
/// #     impl MessageRead for Foo {
/// #         const FIELDS: &'static [FieldDescriptor<Self>] =
/// #             &[FieldDescriptor::new(1, "id", FieldKind::UInt32, Foo::merge_id)];
/// #     }
/// #     impl Foo {
/// #         fn merge_id<'a>(m: &mut Foo, _: &mut BytesReader<'a>, f: RawField<'a>) -> Result<()> {
/// #             m.id = f.uint32()?;
/// #             Ok(())
/// #         }
/// #     }
/// # }
/// # use foo_bar::Foo;
/// # use quack_wire::{BytesReader, MessageRead};
///     // bytes is a buffer on the data we want to deserialize;
///     // typically bytes is read from a `Read`:
///     // r.read_to_end(&mut bytes).expect("cannot read bytes");
///     let bytes: Vec<u8> = vec![0x08, 0x2a];
///     // we can build a bytes reader directly out of the bytes
///     let mut reader = BytesReader::from_bytes(&bytes);
///
///     // now decoding is as easy as:
///     let foo = Foo::from_reader(&mut reader).expect("Cannot read Foo");
///     assert_eq!(foo.id, 42);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BytesReader<'a> {
    bytes: &'a [u8],
    start: usize,
    depth: usize,
    max_depth: usize,
}

impl<'a> BytesReader<'a> {
    /// Creates a new reader over `bytes` with the default limits
    pub fn from_bytes(bytes: &'a [u8]) -> Self {
        Self::with_config(bytes, &DecoderConfig::default())
    }

    /// Creates a new reader over `bytes` with the given limits
    pub fn with_config(bytes: &'a [u8], config: &DecoderConfig) -> Self {
        BytesReader {
            bytes,
            start: 0,
            depth: 0,
            max_depth: config.max_depth,
        }
    }

    /// Reads the next byte
    #[cfg_attr(feature = "std", inline(always))]
    pub fn read_u8(&mut self) -> Result<u8> {
        let b = self
            .bytes
            .get(self.start)
            .ok_or(Error::UnexpectedEndOfBuffer)?;
        self.start += 1;
        Ok(*b)
    }

    /// Reads the next `len` bytes
    #[cfg_attr(feature = "std", inline(always))]
    pub fn read_slice(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self
            .start
            .checked_add(len)
            .ok_or(Error::UnexpectedEndOfBuffer)?;
        let s = self
            .bytes
            .get(self.start..end)
            .ok_or(Error::UnexpectedEndOfBuffer)?;
        self.start = end;
        Ok(s)
    }

    #[cfg_attr(feature = "std", inline)]
    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_slice(N)?);
        Ok(out)
    }

    /// Reads the next varint encoded u64
    ///
    /// Groups are least significant first. The 10th group may only hold the
    /// top bit of the u64, anything more is an overflow.
    #[cfg_attr(feature = "std", inline)]
    pub fn read_varint(&mut self) -> Result<u64> {
        let mut r = 0u64;
        for i in 0..MAX_VARINT_LEN {
            let b = self.read_u8()?;
            if i == MAX_VARINT_LEN - 1 && b > 1 {
                return Err(Error::VarintOverflow);
            }
            r |= u64::from(b & 0x7f) << (7 * i);
            if (b & 0x80) == 0 {
                return Ok(r);
            }
        }
        Err(Error::VarintOverflow)
    }

    /// Reads the next field key
    #[cfg_attr(feature = "std", inline)]
    pub fn read_key(&mut self) -> Result<FieldKey> {
        FieldKey::from_raw(self.read_varint()?)
    }

    /// Reads a payload framed as `wire_type`, leaving the reader on the next key
    pub fn read_payload(&mut self, wire_type: WireType) -> Result<Payload<'a>> {
        match wire_type {
            WireType::Varint => self.read_varint().map(Payload::Varint),
            WireType::Fixed64 => self.read_array().map(Payload::Fixed64),
            WireType::Fixed32 => self.read_array().map(Payload::Fixed32),
            WireType::LengthDelimited => {
                // a length that does not fit usize cannot fit the buffer either
                let len = usize::try_from(self.read_varint()?)
                    .map_err(|_| Error::UnexpectedEndOfBuffer)?;
                self.read_slice(len).map(Payload::LengthDelimited)
            }
            WireType::StartGroup | WireType::EndGroup => {
                Err(Error::UnsupportedWireType(wire_type.code()))
            }
        }
    }

    /// Reads the next key and its payload
    pub fn read_field(&mut self) -> Result<RawField<'a>> {
        let key = self.read_key()?;
        let payload = self.read_payload(key.wire_type)?;
        Ok(RawField { key, payload })
    }

    /// Reads fields into a fresh `M` until the buffer is exhausted
    ///
    /// Unknown tags are skipped. A known tag with the wrong wire type fails.
    pub fn read_message<M: MessageRead>(&mut self) -> Result<M> {
        let mut msg = M::default();
        while self.has_remaining() {
            let field = self.read_field()?;
            match M::field(field.key.tag) {
                Some(d) if d.wire_type() == field.key.wire_type => (d.merge)(&mut msg, self, field)?,
                Some(d) => {
                    return Err(Error::WireTypeMismatch {
                        tag: field.key.tag,
                        expected: d.wire_type(),
                        found: field.key.wire_type,
                    })
                }
                None => trace!(
                    "{}: skipping unknown field {} ({})",
                    M::PATH,
                    field.key.tag,
                    field.key.wire_type
                ),
            }
        }
        Ok(msg)
    }

    /// Reads an embedded message out of a length-delimited field
    ///
    /// The message is decoded by a child reader over the field's bytes, one
    /// level deeper than `self`.
    pub fn read_nested<M: MessageRead>(&self, field: RawField<'a>) -> Result<M> {
        let bytes = field.bytes()?;
        if self.depth >= self.max_depth {
            return Err(Error::NestingTooDeep(self.max_depth));
        }
        trace!("{}: entering at depth {}", M::PATH, self.depth + 1);
        let mut child = BytesReader {
            bytes,
            start: 0,
            depth: self.depth + 1,
            max_depth: self.max_depth,
        };
        child.read_message()
    }

    /// Gets the remaining length of bytes not read yet
    #[cfg_attr(feature = "std", inline(always))]
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.bytes.len() - self.start
    }

    /// Checks if there is anything left to read
    #[cfg_attr(feature = "std", inline(always))]
    pub fn has_remaining(&self) -> bool {
        self.start < self.bytes.len()
    }

    /// Checks if `self.len == 0`
    #[cfg_attr(feature = "std", inline(always))]
    pub fn is_eof(&self) -> bool {
        !self.has_remaining()
    }

    /// Current offset into the buffer
    pub fn position(&self) -> usize {
        self.start
    }

    /// Nesting depth of this reader; 0 for a top-level message
    pub fn depth(&self) -> usize {
        self.depth
    }
}

/// Deserialize a `MessageRead` from a `&[u8]` without a length prefix
pub fn decode<M: MessageRead>(bytes: &[u8]) -> Result<M> {
    BytesReader::from_bytes(bytes).read_message()
}

/// Same as `decode`, with explicit limits
pub fn decode_with_config<M: MessageRead>(bytes: &[u8], config: &DecoderConfig) -> Result<M> {
    BytesReader::with_config(bytes, config).read_message()
}

/// A struct to read protobuf data
///
/// Contrary to `BytesReader`, this struct will own a buffer
///
/// ```rust,no_run
/// # use quack_wire::{person::Person, Reader};
/// // create a reader, which will parse the protobuf binary file and pop events
/// let reader = Reader::from_file("/path/to/binary/protobuf.bin")
///     .expect("Cannot read input file");
///
/// // Use the generated module fns with the reader to convert your data into rust structs.
/// let person: Person = reader.read().expect("Cannot read message");
/// ```
#[cfg(feature = "std")]
#[derive(Debug)]
pub struct Reader {
    buffer: Vec<u8>,
    config: DecoderConfig,
}

#[cfg(feature = "std")]
impl Reader {
    /// Creates a new `Reader`
    pub fn from_reader<R: Read>(mut r: R, capacity: usize) -> Result<Reader> {
        let mut buffer = Vec::with_capacity(capacity);
        r.read_to_end(&mut buffer)?;
        debug!("read {} bytes", buffer.len());
        Ok(Reader::from_bytes(buffer))
    }

    /// Creates a new `Reader` out of a file path
    pub fn from_file<P: AsRef<Path>>(src: P) -> Result<Reader> {
        let src = src.as_ref();
        let len = src.metadata()?.len() as usize;
        debug!("reading {}", src.display());
        let f = File::open(src)?;
        Reader::from_reader(f, len)
    }

    /// Creates a new reader consuming the bytes
    pub fn from_bytes(bytes: Vec<u8>) -> Reader {
        Reader {
            buffer: bytes,
            config: DecoderConfig::default(),
        }
    }

    /// Replaces the decoder limits
    pub fn with_config(mut self, config: DecoderConfig) -> Reader {
        self.config = config;
        self
    }

    /// Decodes the whole buffer as one message
    pub fn read<M: MessageRead>(&self) -> Result<M> {
        decode_with_config(&self.buffer, &self.config)
    }

    /// Gets the inner buffer
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }
}
