//! `OLD_LARGE_INTEGER`
//!
//! A 64-bit value split into two 32-bit halves, so it aligns to 4 bytes
//! rather than 8.

use crate::alignment::Alignment;
use crate::error::Result;
use crate::input::PacketInput;
use crate::marshal::{Marshallable, Unmarshallable};
use crate::output::PacketOutput;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct OldLargeInteger {
    pub low_part: u32,
    pub high_part: i32,
}

impl OldLargeInteger {
    pub fn new(low_part: u32, high_part: i32) -> Self {
        Self {
            low_part,
            high_part,
        }
    }

    pub fn as_i64(&self) -> i64 {
        ((self.high_part as i64) << 32) | self.low_part as i64
    }
}

impl From<i64> for OldLargeInteger {
    fn from(value: i64) -> Self {
        Self {
            low_part: value as u32,
            high_part: (value >> 32) as i32,
        }
    }
}

impl From<OldLargeInteger> for i64 {
    fn from(value: OldLargeInteger) -> Self {
        value.as_i64()
    }
}

impl Unmarshallable for OldLargeInteger {
    fn unmarshal_preamble(&mut self, _input: &mut PacketInput) -> Result<()> {
        Ok(())
    }

    fn unmarshal_entity(&mut self, input: &mut PacketInput) -> Result<()> {
        input.align(Alignment::Four)?;
        self.low_part = input.read_u32()?;
        self.high_part = input.read_i32()?;
        Ok(())
    }

    fn unmarshal_deferrals(&mut self, _input: &mut PacketInput) -> Result<()> {
        Ok(())
    }
}

impl Marshallable for OldLargeInteger {
    fn marshal_preamble(&self, _output: &mut PacketOutput) -> Result<()> {
        Ok(())
    }

    fn marshal_entity(&self, output: &mut PacketOutput) -> Result<()> {
        output.align(Alignment::Four);
        output.write_u32(self.low_part);
        output.write_i32(self.high_part);
        Ok(())
    }

    fn marshal_deferrals(&self, _output: &mut PacketOutput) -> Result<()> {
        Ok(())
    }
}
