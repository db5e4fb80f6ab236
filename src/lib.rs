//! A library to read binary protobuf buffers
//!
//! Messages describe their fields in a static table (`MessageRead::FIELDS`);
//! the reader walks the buffer once, dispatching every field by tag and
//! descending into embedded messages over borrowed sub-slices.

#![deny(missing_docs)]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod config;
pub mod errors;
pub mod message;
pub mod person;
pub mod reader;
pub mod sizeofs;
pub mod wire;
pub mod writer;

pub use crate::{
    config::{DecoderConfig, DEFAULT_MAX_DEPTH},
    errors::{Error, Result},
    message::{FieldDescriptor, FieldKind, MergeFn, MessageInfo, MessageRead, MessageWrite},
    reader::{decode, decode_with_config, BytesReader},
    wire::{FieldKey, Payload, RawField, WireType},
    writer::{serialize_into_vec, BytesWriter, Writer, WriterBackend},
};

#[cfg(feature = "std")]
pub use crate::reader::Reader;
