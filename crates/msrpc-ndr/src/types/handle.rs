//! Context handles
//!
//! A context handle is 20 opaque bytes issued by the server. It is written
//! and read verbatim and never interpreted.

use crate::alignment::Alignment;
use crate::error::{NdrError, Result};
use crate::input::PacketInput;
use crate::marshal::{Marshallable, Unmarshallable};
use crate::output::PacketOutput;
use std::fmt;

/// Wire size of a context handle
pub const CONTEXT_HANDLE_SIZE: usize = 20;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ContextHandle([u8; CONTEXT_HANDLE_SIZE]);

impl ContextHandle {
    pub fn new(bytes: [u8; CONTEXT_HANDLE_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; CONTEXT_HANDLE_SIZE] = bytes.try_into().map_err(|_| {
            NdrError::structure(
                "context_handle",
                format!("expected {} bytes, got {}", CONTEXT_HANDLE_SIZE, bytes.len()),
            )
        })?;
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; CONTEXT_HANDLE_SIZE] {
        &self.0
    }

    /// All-zero handle, as returned for a closed handle
    pub fn is_nil(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }
}

impl fmt::Debug for ContextHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContextHandle(")?;
        for b in &self.0 {
            write!(f, "{:02x}", b)?;
        }
        write!(f, ")")
    }
}

impl Unmarshallable for ContextHandle {
    fn unmarshal_preamble(&mut self, _input: &mut PacketInput) -> Result<()> {
        Ok(())
    }

    fn unmarshal_entity(&mut self, input: &mut PacketInput) -> Result<()> {
        input.align(Alignment::Four)?;
        self.0 = input.read_array::<CONTEXT_HANDLE_SIZE>()?;
        Ok(())
    }

    fn unmarshal_deferrals(&mut self, _input: &mut PacketInput) -> Result<()> {
        Ok(())
    }
}

impl Marshallable for ContextHandle {
    fn marshal_preamble(&self, _output: &mut PacketOutput) -> Result<()> {
        Ok(())
    }

    fn marshal_entity(&self, output: &mut PacketOutput) -> Result<()> {
        output.align(Alignment::Four);
        output.write_bytes(&self.0);
        Ok(())
    }

    fn marshal_deferrals(&self, _output: &mut PacketOutput) -> Result<()> {
        Ok(())
    }
}
