use quack_wire::{
    decode, serialize_into_vec, BytesReader, Error, FieldDescriptor, FieldKind, MessageInfo,
    MessageRead, MessageWrite, RawField, Result, WireType, Writer, WriterBackend,
};
use quickcheck::quickcheck;

#[derive(Debug, Default, PartialEq, Clone, Copy)]
enum Color {
    #[default]
    Red,
    Green,
    Unknown(i32),
}

impl From<i32> for Color {
    fn from(i: i32) -> Self {
        match i {
            0 => Color::Red,
            1 => Color::Green,
            i => Color::Unknown(i),
        }
    }
}

impl From<Color> for i32 {
    fn from(c: Color) -> i32 {
        match c {
            Color::Red => 0,
            Color::Green => 1,
            Color::Unknown(i) => i,
        }
    }
}

/// One field of every kind
#[derive(Debug, Default, PartialEq, Clone)]
struct Scalars {
    int32: i32,
    int64: i64,
    uint32: u32,
    uint64: u64,
    sint32: i32,
    sint64: i64,
    flag: bool,
    color: Color,
    fixed64: u64,
    sfixed64: i64,
    double: f64,
    fixed32: u32,
    sfixed32: i32,
    float: f32,
    text: String,
    blob: Vec<u8>,
}

impl Scalars {
    fn merge_int32<'a>(m: &mut Self, _: &mut BytesReader<'a>, f: RawField<'a>) -> Result<()> {
        m.int32 = f.int32()?;
        Ok(())
    }
    fn merge_int64<'a>(m: &mut Self, _: &mut BytesReader<'a>, f: RawField<'a>) -> Result<()> {
        m.int64 = f.int64()?;
        Ok(())
    }
    fn merge_uint32<'a>(m: &mut Self, _: &mut BytesReader<'a>, f: RawField<'a>) -> Result<()> {
        m.uint32 = f.uint32()?;
        Ok(())
    }
    fn merge_uint64<'a>(m: &mut Self, _: &mut BytesReader<'a>, f: RawField<'a>) -> Result<()> {
        m.uint64 = f.uint64()?;
        Ok(())
    }
    fn merge_sint32<'a>(m: &mut Self, _: &mut BytesReader<'a>, f: RawField<'a>) -> Result<()> {
        m.sint32 = f.sint32()?;
        Ok(())
    }
    fn merge_sint64<'a>(m: &mut Self, _: &mut BytesReader<'a>, f: RawField<'a>) -> Result<()> {
        m.sint64 = f.sint64()?;
        Ok(())
    }
    fn merge_flag<'a>(m: &mut Self, _: &mut BytesReader<'a>, f: RawField<'a>) -> Result<()> {
        m.flag = f.bool()?;
        Ok(())
    }
    fn merge_color<'a>(m: &mut Self, _: &mut BytesReader<'a>, f: RawField<'a>) -> Result<()> {
        m.color = f.enum_value()?;
        Ok(())
    }
    fn merge_fixed64<'a>(m: &mut Self, _: &mut BytesReader<'a>, f: RawField<'a>) -> Result<()> {
        m.fixed64 = f.fixed64()?;
        Ok(())
    }
    fn merge_sfixed64<'a>(m: &mut Self, _: &mut BytesReader<'a>, f: RawField<'a>) -> Result<()> {
        m.sfixed64 = f.sfixed64()?;
        Ok(())
    }
    fn merge_double<'a>(m: &mut Self, _: &mut BytesReader<'a>, f: RawField<'a>) -> Result<()> {
        m.double = f.double()?;
        Ok(())
    }
    fn merge_fixed32<'a>(m: &mut Self, _: &mut BytesReader<'a>, f: RawField<'a>) -> Result<()> {
        m.fixed32 = f.fixed32()?;
        Ok(())
    }
    fn merge_sfixed32<'a>(m: &mut Self, _: &mut BytesReader<'a>, f: RawField<'a>) -> Result<()> {
        m.sfixed32 = f.sfixed32()?;
        Ok(())
    }
    fn merge_float<'a>(m: &mut Self, _: &mut BytesReader<'a>, f: RawField<'a>) -> Result<()> {
        m.float = f.float()?;
        Ok(())
    }
    fn merge_text<'a>(m: &mut Self, _: &mut BytesReader<'a>, f: RawField<'a>) -> Result<()> {
        m.text = f.string()?.to_owned();
        Ok(())
    }
    fn merge_blob<'a>(m: &mut Self, _: &mut BytesReader<'a>, f: RawField<'a>) -> Result<()> {
        m.blob = f.bytes()?.to_vec();
        Ok(())
    }
}

impl MessageInfo for Scalars {
    const PATH: &'static str = "tests.Scalars";
}

impl MessageRead for Scalars {
    const FIELDS: &'static [FieldDescriptor<Self>] = &[
        FieldDescriptor::new(1, "int32", FieldKind::Int32, Scalars::merge_int32),
        FieldDescriptor::new(2, "int64", FieldKind::Int64, Scalars::merge_int64),
        FieldDescriptor::new(3, "uint32", FieldKind::UInt32, Scalars::merge_uint32),
        FieldDescriptor::new(4, "uint64", FieldKind::UInt64, Scalars::merge_uint64),
        FieldDescriptor::new(5, "sint32", FieldKind::SInt32, Scalars::merge_sint32),
        FieldDescriptor::new(6, "sint64", FieldKind::SInt64, Scalars::merge_sint64),
        FieldDescriptor::new(7, "flag", FieldKind::Bool, Scalars::merge_flag),
        FieldDescriptor::new(8, "color", FieldKind::Enum, Scalars::merge_color),
        FieldDescriptor::new(9, "fixed64", FieldKind::Fixed64, Scalars::merge_fixed64),
        FieldDescriptor::new(10, "sfixed64", FieldKind::SFixed64, Scalars::merge_sfixed64),
        FieldDescriptor::new(11, "double", FieldKind::Double, Scalars::merge_double),
        FieldDescriptor::new(12, "fixed32", FieldKind::Fixed32, Scalars::merge_fixed32),
        FieldDescriptor::new(13, "sfixed32", FieldKind::SFixed32, Scalars::merge_sfixed32),
        FieldDescriptor::new(14, "float", FieldKind::Float, Scalars::merge_float),
        FieldDescriptor::new(15, "text", FieldKind::String, Scalars::merge_text),
        // a tag needing a 2 byte key
        FieldDescriptor::new(2048, "blob", FieldKind::Bytes, Scalars::merge_blob),
    ];
}

impl MessageWrite for Scalars {
    fn get_size(&self) -> usize {
        // only used as a capacity hint here
        0
    }

    fn write_message<W: WriterBackend>(&self, w: &mut Writer<W>) -> Result<()> {
        use WireType::*;
        w.write_with_key(1, Varint, |w| w.write_int32(self.int32))?;
        w.write_with_key(2, Varint, |w| w.write_int64(self.int64))?;
        w.write_with_key(3, Varint, |w| w.write_uint32(self.uint32))?;
        w.write_with_key(4, Varint, |w| w.write_uint64(self.uint64))?;
        w.write_with_key(5, Varint, |w| w.write_sint32(self.sint32))?;
        w.write_with_key(6, Varint, |w| w.write_sint64(self.sint64))?;
        w.write_with_key(7, Varint, |w| w.write_bool(self.flag))?;
        w.write_with_key(8, Varint, |w| w.write_enum(self.color.into()))?;
        w.write_with_key(9, Fixed64, |w| w.write_fixed64(self.fixed64))?;
        w.write_with_key(10, Fixed64, |w| w.write_sfixed64(self.sfixed64))?;
        w.write_with_key(11, Fixed64, |w| w.write_double(self.double))?;
        w.write_with_key(12, Fixed32, |w| w.write_fixed32(self.fixed32))?;
        w.write_with_key(13, Fixed32, |w| w.write_sfixed32(self.sfixed32))?;
        w.write_with_key(14, Fixed32, |w| w.write_float(self.float))?;
        w.write_with_key(15, LengthDelimited, |w| w.write_string(&self.text))?;
        w.write_with_key(2048, LengthDelimited, |w| w.write_bytes(&self.blob))
    }
}

fn sample() -> Scalars {
    Scalars {
        int32: -42,
        int64: i64::MIN,
        uint32: u32::MAX,
        uint64: u64::MAX,
        sint32: -300,
        sint64: i64::MAX,
        flag: true,
        color: Color::Unknown(-5),
        fixed64: 0x0102_0304_0506_0708,
        sfixed64: -1,
        double: -0.25,
        fixed32: 0xdead_beef,
        sfixed32: i32::MIN,
        float: 3.5,
        text: "quack".to_string(),
        blob: vec![0, 0xff, 0x80],
    }
}

#[test]
fn test_every_kind_round_trips() {
    let s = sample();
    let bytes = serialize_into_vec(&s).unwrap();
    assert_eq!(decode::<Scalars>(&bytes).unwrap(), s);
}

#[test]
fn test_two_byte_key() {
    let s = Scalars {
        blob: vec![7],
        ..Scalars::default()
    };
    let bytes = serialize_into_vec(&s).unwrap();
    // (2048 << 3) | 2 == 0x4002
    assert!(bytes.ends_with(&[0x82, 0x80, 0x01, 0x01, 0x07]));
    assert_eq!(decode::<Scalars>(&bytes).unwrap(), s);
}

#[test]
fn test_fixed_kinds_reject_varint() {
    match decode::<Scalars>(&[0x60, 0x01]) {
        Err(Error::WireTypeMismatch {
            tag,
            expected,
            found,
        }) => {
            assert_eq!(tag, 12);
            assert_eq!(expected, WireType::Fixed32);
            assert_eq!(found, WireType::Varint);
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_truncated_fixed() {
    // fixed64 field with only 7 bytes
    assert!(matches!(
        decode::<Scalars>(&[0x49, 1, 2, 3, 4, 5, 6, 7]),
        Err(Error::UnexpectedEndOfBuffer)
    ));
}

#[test]
fn test_integers_round_trip() {
    fn prop(int32: i32, int64: i64, sint32: i32, sint64: i64, uint64: u64) -> bool {
        let s = Scalars {
            int32,
            int64,
            sint32,
            sint64,
            uint64,
            ..sample()
        };
        let bytes = serialize_into_vec(&s).unwrap();
        decode::<Scalars>(&bytes).unwrap() == s
    }
    quickcheck(prop as fn(i32, i64, i32, i64, u64) -> bool);
}
