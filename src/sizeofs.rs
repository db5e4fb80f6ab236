//! A module to compute the binary size of data once encoded
//!
//! This module is used to size length-delimited embedded messages before
//! writing them

/// Computes the binary size of the varint encoded u64
pub fn sizeof_varint(v: u64) -> usize {
    match v {
        0x0..=0x7F => 1,
        0x80..=0x3FFF => 2,
        0x4000..=0x1F_FFFF => 3,
        0x20_0000..=0xFFF_FFFF => 4,
        0x1000_0000..=0x7_FFFF_FFFF => 5,
        0x8_0000_0000..=0x3FF_FFFF_FFFF => 6,
        0x400_0000_0000..=0x1_FFFF_FFFF_FFFF => 7,
        0x2_0000_0000_0000..=0xFF_FFFF_FFFF_FFFF => 8,
        0x100_0000_0000_0000..=0x7FFF_FFFF_FFFF_FFFF => 9,
        _ => 10,
    }
}

/// Computes the binary size of a variable length chunk of data (wire type 2)
///
/// The total size is the varint encoded length size plus the length itself
pub fn sizeof_len(len: usize) -> usize {
    sizeof_varint(len as u64) + len
}

/// Computes the binary size of a field key
pub fn sizeof_key(tag: u64) -> usize {
    sizeof_varint(tag << 3)
}

/// Computes the binary size of the int32 (negative values take 10 bytes)
pub fn sizeof_int32(v: i32) -> usize {
    sizeof_varint(v as i64 as u64)
}

/// Computes the binary size of the int64
pub fn sizeof_int64(v: i64) -> usize {
    sizeof_varint(v as u64)
}

/// Computes the binary size of the sint32 once zigzag encoded
pub fn sizeof_sint32(v: i32) -> usize {
    sizeof_varint(((v << 1) ^ (v >> 31)) as u32 as u64)
}

/// Computes the binary size of the sint64 once zigzag encoded
pub fn sizeof_sint64(v: i64) -> usize {
    sizeof_varint(((v << 1) ^ (v >> 63)) as u64)
}
