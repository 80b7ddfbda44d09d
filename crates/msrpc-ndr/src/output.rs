//! Sequential NDR writer

use crate::alignment::Alignment;
use crate::error::Result;
use crate::marshal::Marshallable;
use bytes::{BufMut, Bytes, BytesMut};
use std::mem;

/// First referent id handed out for embedded pointers
pub const FIRST_REFERENT_ID: u32 = 0x0002_0000;

/// NDR stub writer
///
/// Tracks the write position for alignment and hands out referent ids for
/// non-null embedded pointers.
#[derive(Debug)]
pub struct PacketOutput {
    buf: BytesMut,
    next_referent_id: u32,
}

impl PacketOutput {
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
            next_referent_id: FIRST_REFERENT_ID,
        }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.buf.len()
    }

    /// Write zero bytes up to the next multiple of `alignment`
    pub fn align(&mut self, alignment: Alignment) {
        let padding = alignment.padding(self.buf.len());
        self.buf.put_bytes(0, padding);
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buf.put_u8(value);
    }

    pub fn write_u16(&mut self, value: u16) {
        self.align(Alignment::for_width(mem::size_of::<u16>()));
        self.buf.put_u16_le(value);
    }

    pub fn write_i16(&mut self, value: i16) {
        self.write_u16(value as u16);
    }

    pub fn write_u32(&mut self, value: u32) {
        self.align(Alignment::for_width(mem::size_of::<u32>()));
        self.buf.put_u32_le(value);
    }

    pub fn write_i32(&mut self, value: i32) {
        self.write_u32(value as u32);
    }

    pub fn write_u64(&mut self, value: u64) {
        self.align(Alignment::for_width(mem::size_of::<u64>()));
        self.buf.put_u64_le(value);
    }

    pub fn write_i64(&mut self, value: i64) {
        self.write_u64(value as u64);
    }

    /// Write raw bytes without alignment
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.put_slice(bytes);
    }

    /// Write a fresh referent id and return it
    pub fn write_referent_id(&mut self) -> u32 {
        let referent_id = self.next_referent_id;
        self.next_referent_id = self.next_referent_id.wrapping_add(4);
        self.write_u32(referent_id);
        referent_id
    }

    pub fn write_null_pointer(&mut self) {
        self.write_u32(0);
    }

    /// Write a referent id when `present`, a null pointer otherwise
    pub fn write_pointer(&mut self, present: bool) {
        if present {
            self.write_referent_id();
        } else {
            self.write_null_pointer();
        }
    }

    /// Write a conformant `max_count`
    pub fn write_conformant_count(&mut self, count: usize) {
        self.write_u32(count as u32);
    }

    /// Drive all three phases of a single entity
    pub fn write_marshallable<T: Marshallable + ?Sized>(&mut self, entity: &T) -> Result<()> {
        entity.marshal_preamble(self)?;
        entity.marshal_entity(self)?;
        entity.marshal_deferrals(self)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn freeze(self) -> Bytes {
        self.buf.freeze()
    }
}

impl Default for PacketOutput {
    fn default() -> Self {
        Self::new()
    }
}
