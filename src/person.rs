//! The `Person` schema
//!
//! ```text
//! message Person { Name name = 1; Age age = 2; }
//! message Name { string value = 1; }
//! message Age { int32 value = 1; }
//! ```

use crate::errors::Result;
use crate::message::{FieldDescriptor, FieldKind, MessageInfo, MessageRead, MessageWrite};
use crate::reader::BytesReader;
use crate::sizeofs::{sizeof_int32, sizeof_key, sizeof_len};
use crate::wire::{RawField, WireType};
use crate::writer::{Writer, WriterBackend};
use alloc::string::{String, ToString};

/// A person; both fields are embedded messages
#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub struct Person {
    /// Tag 1
    pub name: Option<Name>,
    /// Tag 2
    pub age: Option<Age>,
}

impl Person {
    fn merge_name<'a>(m: &mut Person, r: &mut BytesReader<'a>, f: RawField<'a>) -> Result<()> {
        m.name = Some(r.read_nested(f)?);
        Ok(())
    }

    fn merge_age<'a>(m: &mut Person, r: &mut BytesReader<'a>, f: RawField<'a>) -> Result<()> {
        m.age = Some(r.read_nested(f)?);
        Ok(())
    }
}

impl MessageInfo for Person {
    const PATH: &'static str = "person.Person";
}

impl MessageRead for Person {
    const FIELDS: &'static [FieldDescriptor<Self>] = &[
        FieldDescriptor::new(1, "name", FieldKind::Message, Person::merge_name),
        FieldDescriptor::new(2, "age", FieldKind::Message, Person::merge_age),
    ];
}

impl MessageWrite for Person {
    fn get_size(&self) -> usize {
        self.name
            .as_ref()
            .map_or(0, |m| sizeof_key(1) + sizeof_len(m.get_size()))
            + self
                .age
                .as_ref()
                .map_or(0, |m| sizeof_key(2) + sizeof_len(m.get_size()))
    }

    fn write_message<W: WriterBackend>(&self, w: &mut Writer<W>) -> Result<()> {
        if let Some(ref s) = self.name {
            w.write_with_key(1, WireType::LengthDelimited, |w| w.write_message(s))?;
        }
        if let Some(ref s) = self.age {
            w.write_with_key(2, WireType::LengthDelimited, |w| w.write_message(s))?;
        }
        Ok(())
    }
}

/// A name wrapper
#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub struct Name {
    /// Tag 1, string
    pub value: String,
}

impl Name {
    fn merge_value<'a>(m: &mut Name, _: &mut BytesReader<'a>, f: RawField<'a>) -> Result<()> {
        m.value = f.string()?.to_string();
        Ok(())
    }
}

impl MessageInfo for Name {
    const PATH: &'static str = "person.Name";
}

impl MessageRead for Name {
    const FIELDS: &'static [FieldDescriptor<Self>] = &[FieldDescriptor::new(
        1,
        "value",
        FieldKind::String,
        Name::merge_value,
    )];
}

impl MessageWrite for Name {
    fn get_size(&self) -> usize {
        if self.value.is_empty() {
            0
        } else {
            sizeof_key(1) + sizeof_len(self.value.len())
        }
    }

    fn write_message<W: WriterBackend>(&self, w: &mut Writer<W>) -> Result<()> {
        if !self.value.is_empty() {
            w.write_with_key(1, WireType::LengthDelimited, |w| w.write_string(&self.value))?;
        }
        Ok(())
    }
}

/// An age wrapper
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct Age {
    /// Tag 1, int32
    pub value: i32,
}

impl Age {
    fn merge_value<'a>(m: &mut Age, _: &mut BytesReader<'a>, f: RawField<'a>) -> Result<()> {
        m.value = f.int32()?;
        Ok(())
    }
}

impl MessageInfo for Age {
    const PATH: &'static str = "person.Age";
}

impl MessageRead for Age {
    const FIELDS: &'static [FieldDescriptor<Self>] = &[FieldDescriptor::new(
        1,
        "value",
        FieldKind::Int32,
        Age::merge_value,
    )];
}

impl MessageWrite for Age {
    fn get_size(&self) -> usize {
        if self.value == 0 {
            0
        } else {
            sizeof_key(1) + sizeof_int32(self.value)
        }
    }

    fn write_message<W: WriterBackend>(&self, w: &mut Writer<W>) -> Result<()> {
        if self.value != 0 {
            w.write_with_key(1, WireType::Varint, |w| w.write_int32(self.value))?;
        }
        Ok(())
    }
}
