//! Sequential NDR reader
//!
//! `PacketInput` walks a response stub front to back. Every primitive read
//! aligns implicitly to the primitive's width, measured from the start of the
//! stub, and fails with [`NdrError::Underrun`] rather than yielding zeros when
//! the stub runs out.

use crate::alignment::Alignment;
use crate::config::DecodeLimits;
use crate::error::{NdrError, Result};
use crate::marshal::Unmarshallable;
use bytes::{Buf, Bytes};
use std::mem;
use tracing::trace;

/// NDR stub reader
#[derive(Debug, Clone)]
pub struct PacketInput {
    buf: Bytes,
    position: usize,
    limits: DecodeLimits,
}

impl PacketInput {
    pub fn new(buf: impl Into<Bytes>) -> Self {
        Self::with_limits(buf, DecodeLimits::default())
    }

    pub fn with_limits(buf: impl Into<Bytes>, limits: DecodeLimits) -> Self {
        Self {
            buf: buf.into(),
            position: 0,
            limits,
        }
    }

    /// Offset from the start of the stub
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    pub fn limits(&self) -> &DecodeLimits {
        &self.limits
    }

    fn ensure(&self, needed: usize) -> Result<()> {
        if self.buf.remaining() < needed {
            return Err(NdrError::Underrun {
                needed,
                have: self.buf.remaining(),
                position: self.position,
            });
        }
        Ok(())
    }

    /// Skip pad bytes up to the next multiple of `alignment`
    pub fn align(&mut self, alignment: Alignment) -> Result<()> {
        let padding = alignment.padding(self.position);
        self.skip(padding)
    }

    pub fn skip(&mut self, count: usize) -> Result<()> {
        self.ensure(count)?;
        self.buf.advance(count);
        self.position += count;
        Ok(())
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.ensure(1)?;
        self.position += 1;
        Ok(self.buf.get_u8())
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        self.align(Alignment::for_width(mem::size_of::<u16>()))?;
        self.ensure(2)?;
        self.position += 2;
        Ok(self.buf.get_u16_le())
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        self.read_u16().map(|v| v as i16)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        self.align(Alignment::for_width(mem::size_of::<u32>()))?;
        self.ensure(4)?;
        self.position += 4;
        Ok(self.buf.get_u32_le())
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        self.read_u32().map(|v| v as i32)
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        self.align(Alignment::for_width(mem::size_of::<u64>()))?;
        self.ensure(8)?;
        self.position += 8;
        Ok(self.buf.get_u64_le())
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        self.read_u64().map(|v| v as i64)
    }

    /// Read `len` raw bytes without alignment
    pub fn read_bytes(&mut self, len: usize) -> Result<Bytes> {
        self.ensure(len)?;
        self.position += len;
        Ok(self.buf.copy_to_bytes(len))
    }

    /// Read exactly `N` raw bytes without alignment
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        self.ensure(N)?;
        let mut out = [0u8; N];
        self.buf.copy_to_slice(&mut out);
        self.position += N;
        Ok(out)
    }

    /// Read a pointer referent id, `None` for a null pointer
    pub fn read_referent_id(&mut self) -> Result<Option<u32>> {
        let referent_id = self.read_u32()?;
        trace!("referent id 0x{:08x} at offset {}", referent_id, self.position - 4);
        Ok(if referent_id == 0 {
            None
        } else {
            Some(referent_id)
        })
    }

    /// Read a conformant `max_count`, rejecting counts above the array limit
    pub fn read_conformant_count(&mut self, field: &'static str) -> Result<usize> {
        let count = self.read_u32()? as usize;
        trace!("{}: conformant count {}", field, count);
        if count > self.limits.max_array_elements {
            return Err(NdrError::structure(
                field,
                format!(
                    "conformant count {} exceeds limit {}",
                    count, self.limits.max_array_elements
                ),
            ));
        }
        Ok(count)
    }

    /// Drive all three phases of a single entity
    pub fn read_unmarshallable<T: Unmarshallable + ?Sized>(&mut self, entity: &mut T) -> Result<()> {
        entity.unmarshal_preamble(self)?;
        entity.unmarshal_entity(self)?;
        entity.unmarshal_deferrals(self)
    }
}
