//! A module to serialize messages, mostly to build test fixtures

use crate::errors::{Error, Result};
use crate::message::MessageWrite;
use crate::wire::{FieldKey, WireType};
use alloc::vec::Vec;
use byteorder_lite::{ByteOrder, LittleEndian as LE};

/// A struct to write protobuf messages
///
/// ```rust
/// # use quack_wire::{person::{Age, Person}, BytesWriter, Writer};
/// let person = Person { name: None, age: Some(Age { value: 20 }) };
/// let mut out = [0u8; 4];
/// {
///     let mut writer = Writer::new(BytesWriter::new(&mut out));
///     writer.write_message_without_len(&person).expect("Cannot write Person");
/// }
/// assert_eq!(out, [0x12, 0x02, 0x08, 0x14]);
/// ```
pub struct Writer<W: WriterBackend> {
    inner: W,
}

impl<W: WriterBackend> Writer<W> {
    /// Creates a new `Writer`
    pub fn new(w: W) -> Writer<W> {
        Writer { inner: w }
    }

    /// Gets the backend back
    pub fn into_inner(self) -> W {
        self.inner
    }

    /// Writes a `varint` (compacted `u64`)
    pub fn write_varint(&mut self, mut v: u64) -> Result<()> {
        while v > 0x7f {
            self.inner.pb_write_u8(((v as u8) & 0x7f) | 0x80)?;
            v >>= 7;
        }
        self.inner.pb_write_u8(v as u8)
    }

    /// Writes a field key, which represents both the field number and the wire type
    #[cfg_attr(feature = "std", inline(always))]
    pub fn write_key(&mut self, tag: u64, wire_type: WireType) -> Result<()> {
        self.write_varint(FieldKey::new(tag, wire_type).to_raw())
    }

    /// Writes a `int32` which is internally coded as a sign extended `varint`
    #[cfg_attr(feature = "std", inline(always))]
    pub fn write_int32(&mut self, v: i32) -> Result<()> {
        self.write_varint(v as i64 as u64)
    }

    /// Writes a `int64` which is internally coded as a `varint`
    #[cfg_attr(feature = "std", inline(always))]
    pub fn write_int64(&mut self, v: i64) -> Result<()> {
        self.write_varint(v as u64)
    }

    /// Writes a `uint32` which is internally coded as a `varint`
    #[cfg_attr(feature = "std", inline(always))]
    pub fn write_uint32(&mut self, v: u32) -> Result<()> {
        self.write_varint(u64::from(v))
    }

    /// Writes a `uint64` which is internally coded as a `varint`
    #[cfg_attr(feature = "std", inline(always))]
    pub fn write_uint64(&mut self, v: u64) -> Result<()> {
        self.write_varint(v)
    }

    /// Writes a `sint32` which is internally coded as a zigzag `varint`
    #[cfg_attr(feature = "std", inline(always))]
    pub fn write_sint32(&mut self, v: i32) -> Result<()> {
        self.write_varint(((v << 1) ^ (v >> 31)) as u32 as u64)
    }

    /// Writes a `sint64` which is internally coded as a zigzag `varint`
    #[cfg_attr(feature = "std", inline(always))]
    pub fn write_sint64(&mut self, v: i64) -> Result<()> {
        self.write_varint(((v << 1) ^ (v >> 63)) as u64)
    }

    /// Writes a `bool` 1 = true, 0 = false
    #[cfg_attr(feature = "std", inline(always))]
    pub fn write_bool(&mut self, v: bool) -> Result<()> {
        self.write_varint(u64::from(v))
    }

    /// Writes an `enum` converting it to a `i32` first
    #[cfg_attr(feature = "std", inline(always))]
    pub fn write_enum(&mut self, v: i32) -> Result<()> {
        self.write_int32(v)
    }

    /// Writes a `fixed64` which is little endian coded `u64`
    #[cfg_attr(feature = "std", inline(always))]
    pub fn write_fixed64(&mut self, v: u64) -> Result<()> {
        let mut b = [0u8; 8];
        LE::write_u64(&mut b, v);
        self.inner.pb_write_all(&b)
    }

    /// Writes a `sfixed64` which is little endian coded `i64`
    #[cfg_attr(feature = "std", inline(always))]
    pub fn write_sfixed64(&mut self, v: i64) -> Result<()> {
        self.write_fixed64(v as u64)
    }

    /// Writes a `double`
    #[cfg_attr(feature = "std", inline(always))]
    pub fn write_double(&mut self, v: f64) -> Result<()> {
        self.write_fixed64(v.to_bits())
    }

    /// Writes a `fixed32` which is little endian coded `u32`
    #[cfg_attr(feature = "std", inline(always))]
    pub fn write_fixed32(&mut self, v: u32) -> Result<()> {
        let mut b = [0u8; 4];
        LE::write_u32(&mut b, v);
        self.inner.pb_write_all(&b)
    }

    /// Writes a `sfixed32` which is little endian coded `i32`
    #[cfg_attr(feature = "std", inline(always))]
    pub fn write_sfixed32(&mut self, v: i32) -> Result<()> {
        self.write_fixed32(v as u32)
    }

    /// Writes a `float`
    #[cfg_attr(feature = "std", inline(always))]
    pub fn write_float(&mut self, v: f32) -> Result<()> {
        self.write_fixed32(v.to_bits())
    }

    /// Writes `bytes`: length first then the chunk of data
    #[cfg_attr(feature = "std", inline(always))]
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.write_varint(bytes.len() as u64)?;
        self.inner.pb_write_all(bytes)
    }

    /// Writes `string`: length first then the chunk of data
    #[cfg_attr(feature = "std", inline(always))]
    pub fn write_string(&mut self, s: &str) -> Result<()> {
        self.write_bytes(s.as_bytes())
    }

    /// Writes an embedded message, prefixed with its length
    #[cfg_attr(feature = "std", inline)]
    pub fn write_message<M: MessageWrite>(&mut self, m: &M) -> Result<()> {
        self.write_varint(m.get_size() as u64)?;
        m.write_message(self)
    }

    /// Writes a message which implements `MessageWrite` without adding the length prefix
    #[cfg_attr(feature = "std", inline)]
    pub fn write_message_without_len<M: MessageWrite>(&mut self, m: &M) -> Result<()> {
        m.write_message(self)
    }

    /// Writes another item prefixed with its field key
    #[cfg_attr(feature = "std", inline)]
    pub fn write_with_key<F>(&mut self, tag: u64, wire_type: WireType, mut write: F) -> Result<()>
    where
        F: FnMut(&mut Self) -> Result<()>,
    {
        self.write_key(tag, wire_type)?;
        write(self)
    }
}

/// Writer backend abstraction
pub trait WriterBackend {
    /// Write a u8
    fn pb_write_u8(&mut self, x: u8) -> Result<()>;

    /// Write all bytes in buf
    fn pb_write_all(&mut self, buf: &[u8]) -> Result<()>;
}

/// A writer backend for fixed size byte buffers
pub struct BytesWriter<'a> {
    buf: &'a mut [u8],
    cursor: usize,
}

impl<'a> BytesWriter<'a> {
    /// Create a new BytesWriter to write into `buf`
    pub fn new(buf: &'a mut [u8]) -> BytesWriter<'a> {
        BytesWriter { buf, cursor: 0 }
    }

    /// Number of bytes written so far
    pub fn written(&self) -> usize {
        self.cursor
    }
}

impl<'a> WriterBackend for BytesWriter<'a> {
    #[cfg_attr(feature = "std", inline(always))]
    fn pb_write_u8(&mut self, x: u8) -> Result<()> {
        self.pb_write_all(&[x])
    }

    #[cfg_attr(feature = "std", inline(always))]
    fn pb_write_all(&mut self, buf: &[u8]) -> Result<()> {
        if self.buf.len() - self.cursor < buf.len() {
            Err(Error::UnexpectedEndOfBuffer)
        } else {
            self.buf[self.cursor..self.cursor + buf.len()].copy_from_slice(buf);
            self.cursor += buf.len();
            Ok(())
        }
    }
}

#[cfg(feature = "std")]
impl<W: std::io::Write> WriterBackend for W {
    #[inline(always)]
    fn pb_write_u8(&mut self, x: u8) -> Result<()> {
        self.write_all(&[x]).map_err(|e| e.into())
    }

    #[inline(always)]
    fn pb_write_all(&mut self, buf: &[u8]) -> Result<()> {
        self.write_all(buf).map_err(|e| e.into())
    }
}

#[cfg(not(feature = "std"))]
impl WriterBackend for Vec<u8> {
    fn pb_write_u8(&mut self, x: u8) -> Result<()> {
        self.push(x);
        Ok(())
    }

    fn pb_write_all(&mut self, buf: &[u8]) -> Result<()> {
        self.extend_from_slice(buf);
        Ok(())
    }
}

/// Serialize a `MessageWrite` into a `Vec`, without a length prefix
pub fn serialize_into_vec<M: MessageWrite>(message: &M) -> Result<Vec<u8>> {
    let mut writer = Writer::new(Vec::with_capacity(message.get_size()));
    writer.write_message_without_len(message)?;
    Ok(writer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::BytesReader;
    use crate::sizeofs::sizeof_varint;

    fn varint_bytes(v: u64) -> Vec<u8> {
        let mut w = Writer::new(Vec::new());
        w.write_varint(v).unwrap();
        w.into_inner()
    }

    #[test]
    fn varint_layout() {
        assert_eq!(varint_bytes(0), [0x00]);
        assert_eq!(varint_bytes(1), [0x01]);
        assert_eq!(varint_bytes(300), [0xac, 0x02]);
        assert_eq!(varint_bytes(u64::MAX).len(), 10);
    }

    #[test]
    fn varint_matches_reader_and_size() {
        for v in [0u64, 127, 128, 300, 16_384, i64::MAX as u64, u64::MAX] {
            let bytes = varint_bytes(v);
            assert_eq!(bytes.len(), sizeof_varint(v));
            assert_eq!(BytesReader::from_bytes(&bytes).read_varint().unwrap(), v);
        }
    }

    #[test]
    fn bytes_writer_is_bounded() {
        let mut buf = [0u8; 2];
        let mut w = Writer::new(BytesWriter::new(&mut buf));
        assert!(w.write_key(1, WireType::Varint).is_ok());
        assert!(matches!(
            w.write_fixed32(7),
            Err(Error::UnexpectedEndOfBuffer)
        ));
        assert_eq!(w.into_inner().written(), 1);
    }

    #[test]
    fn fixed_and_zigzag() {
        let mut w = Writer::new(Vec::new());
        w.write_sfixed32(-2).unwrap();
        w.write_sint32(-1).unwrap();
        w.write_sint64(1).unwrap();
        assert_eq!(w.into_inner(), [0xfe, 0xff, 0xff, 0xff, 0x01, 0x02]);
    }
}
