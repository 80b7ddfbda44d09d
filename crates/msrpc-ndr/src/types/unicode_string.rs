//! `RPC_UNICODE_STRING`
//!
//! ```text
//! typedef struct _RPC_UNICODE_STRING {
//!     unsigned short Length;
//!     unsigned short MaximumLength;
//!     [size_is(MaximumLength/2), length_is(Length/2)] WCHAR* Buffer;
//! } RPC_UNICODE_STRING;
//! ```
//!
//! The entity phase carries the two lengths and the buffer's referent id; the
//! buffer itself is a conformant varying array written in the deferral phase.
//! Lengths are in bytes and the buffer is not null terminated.

use crate::alignment::Alignment;
use crate::error::{NdrError, Result};
use crate::input::PacketInput;
use crate::marshal::{Marshallable, Unmarshallable};
use crate::output::PacketOutput;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RpcUnicodeString {
    value: Option<String>,
    length: u16,
    maximum_length: u16,
}

impl RpcUnicodeString {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let bytes = (value.encode_utf16().count() * 2).min(u16::MAX as usize & !1) as u16;
        Self {
            value: Some(value),
            length: bytes,
            maximum_length: bytes,
        }
    }

    /// A string whose buffer pointer is null
    pub fn null() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn into_string(self) -> Option<String> {
        self.value
    }

    pub fn is_null(&self) -> bool {
        self.value.is_none()
    }

    /// Length in bytes
    pub fn length(&self) -> u16 {
        self.length
    }

    /// Maximum length in bytes
    pub fn maximum_length(&self) -> u16 {
        self.maximum_length
    }
}

impl From<&str> for RpcUnicodeString {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for RpcUnicodeString {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl fmt::Display for RpcUnicodeString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value.as_deref().unwrap_or(""))
    }
}

impl Unmarshallable for RpcUnicodeString {
    fn unmarshal_preamble(&mut self, _input: &mut PacketInput) -> Result<()> {
        Ok(())
    }

    fn unmarshal_entity(&mut self, input: &mut PacketInput) -> Result<()> {
        input.align(Alignment::Four)?;
        self.length = input.read_u16()?;
        self.maximum_length = input.read_u16()?;
        // Placeholder until the deferral phase fills it in
        self.value = input.read_referent_id()?.map(|_| String::new());
        Ok(())
    }

    fn unmarshal_deferrals(&mut self, input: &mut PacketInput) -> Result<()> {
        if self.value.is_none() {
            return Ok(());
        }

        let max_count = input.read_conformant_count("RPC_UNICODE_STRING.Buffer")?;
        let offset = input.read_u32()?;
        let actual_count = input.read_u32()? as usize;

        if offset != 0 {
            return Err(NdrError::structure(
                "RPC_UNICODE_STRING.Buffer",
                format!("unexpected variance offset {}", offset),
            ));
        }
        if actual_count > max_count {
            return Err(NdrError::structure(
                "RPC_UNICODE_STRING.Buffer",
                format!("actual_count {} exceeds max_count {}", actual_count, max_count),
            ));
        }
        if actual_count > input.limits().max_string_chars {
            return Err(NdrError::structure(
                "RPC_UNICODE_STRING.Buffer",
                format!(
                    "{} characters exceeds limit {}",
                    actual_count,
                    input.limits().max_string_chars
                ),
            ));
        }
        if actual_count * 2 != self.length as usize {
            return Err(NdrError::structure(
                "RPC_UNICODE_STRING.Length",
                format!(
                    "length {} does not match {} transmitted characters",
                    self.length, actual_count
                ),
            ));
        }

        let raw = input.read_bytes(actual_count * 2)?;
        let units: Vec<u16> = raw
            .chunks_exact(2)
            .map(|c| u16::from_le_bytes([c[0], c[1]]))
            .collect();
        let value = String::from_utf16(&units).map_err(|source| NdrError::InvalidString {
            field: "RPC_UNICODE_STRING.Buffer",
            source,
        })?;
        self.value = Some(value);
        Ok(())
    }
}

impl Marshallable for RpcUnicodeString {
    fn marshal_preamble(&self, _output: &mut PacketOutput) -> Result<()> {
        Ok(())
    }

    fn marshal_entity(&self, output: &mut PacketOutput) -> Result<()> {
        if let Some(value) = &self.value {
            let bytes = value.encode_utf16().count() * 2;
            if bytes != self.length as usize || bytes > self.maximum_length as usize {
                return Err(NdrError::structure(
                    "RPC_UNICODE_STRING.Length",
                    format!("{} bytes of text do not fit a 16-bit byte length", bytes),
                ));
            }
        }
        output.align(Alignment::Four);
        output.write_u16(self.length);
        output.write_u16(self.maximum_length);
        output.write_pointer(self.value.is_some());
        Ok(())
    }

    fn marshal_deferrals(&self, output: &mut PacketOutput) -> Result<()> {
        let Some(value) = &self.value else {
            return Ok(());
        };
        let units: Vec<u16> = value.encode_utf16().collect();
        output.write_conformant_count(self.maximum_length as usize / 2);
        output.write_u32(0);
        output.write_u32(units.len() as u32);
        for unit in units {
            output.write_u16(unit);
        }
        Ok(())
    }
}
