//! `RPC_SID`
//!
//! ```text
//! typedef struct _RPC_SID {
//!     unsigned char Revision;
//!     unsigned char SubAuthorityCount;
//!     RPC_SID_IDENTIFIER_AUTHORITY IdentifierAuthority;
//!     [size_is(SubAuthorityCount)] unsigned long SubAuthority[];
//! } RPC_SID;
//! ```
//!
//! A conformant structure: the `max_count` of `SubAuthority` is hoisted in
//! front of the structure and read in the preamble.

use crate::alignment::Alignment;
use crate::error::{NdrError, Result};
use crate::input::PacketInput;
use crate::marshal::{Marshallable, Unmarshallable};
use crate::output::PacketOutput;
use std::fmt;

/// Largest `SubAuthorityCount` a SID may carry
pub const MAX_SUB_AUTHORITIES: usize = 15;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct RpcSid {
    revision: u8,
    identifier_authority: [u8; 6],
    sub_authorities: Vec<u32>,
}

impl RpcSid {
    pub fn new(revision: u8, identifier_authority: [u8; 6], sub_authorities: Vec<u32>) -> Self {
        Self {
            revision,
            identifier_authority,
            sub_authorities,
        }
    }

    pub fn revision(&self) -> u8 {
        self.revision
    }

    pub fn identifier_authority(&self) -> [u8; 6] {
        self.identifier_authority
    }

    pub fn sub_authorities(&self) -> &[u32] {
        &self.sub_authorities
    }

    /// Relative identifier (the last sub-authority)
    pub fn rid(&self) -> Option<u32> {
        self.sub_authorities.last().copied()
    }
}

impl fmt::Display for RpcSid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let authority = self
            .identifier_authority
            .iter()
            .fold(0u64, |acc, b| (acc << 8) | *b as u64);
        write!(f, "S-{}-{}", self.revision, authority)?;
        for sub in &self.sub_authorities {
            write!(f, "-{}", sub)?;
        }
        Ok(())
    }
}

impl Unmarshallable for RpcSid {
    fn unmarshal_preamble(&mut self, input: &mut PacketInput) -> Result<()> {
        let max_count = input.read_conformant_count("RPC_SID.SubAuthority")?;
        if max_count > MAX_SUB_AUTHORITIES {
            return Err(NdrError::structure(
                "RPC_SID.SubAuthority",
                format!("{} sub-authorities exceeds {}", max_count, MAX_SUB_AUTHORITIES),
            ));
        }
        self.sub_authorities = vec![0; max_count];
        Ok(())
    }

    fn unmarshal_entity(&mut self, input: &mut PacketInput) -> Result<()> {
        input.align(Alignment::Four)?;
        self.revision = input.read_u8()?;
        let count = input.read_u8()? as usize;
        if count != self.sub_authorities.len() {
            return Err(NdrError::structure(
                "RPC_SID.SubAuthorityCount",
                format!(
                    "count {} does not match conformant max_count {}",
                    count,
                    self.sub_authorities.len()
                ),
            ));
        }
        self.identifier_authority = input.read_array::<6>()?;
        for sub in self.sub_authorities.iter_mut() {
            *sub = input.read_u32()?;
        }
        Ok(())
    }

    fn unmarshal_deferrals(&mut self, _input: &mut PacketInput) -> Result<()> {
        Ok(())
    }
}

impl Marshallable for RpcSid {
    fn marshal_preamble(&self, output: &mut PacketOutput) -> Result<()> {
        output.write_conformant_count(self.sub_authorities.len());
        Ok(())
    }

    fn marshal_entity(&self, output: &mut PacketOutput) -> Result<()> {
        if self.sub_authorities.len() > u8::MAX as usize {
            return Err(NdrError::structure(
                "RPC_SID.SubAuthorityCount",
                format!("{} sub-authorities do not fit in a byte", self.sub_authorities.len()),
            ));
        }
        output.align(Alignment::Four);
        output.write_u8(self.revision);
        output.write_u8(self.sub_authorities.len() as u8);
        output.write_bytes(&self.identifier_authority);
        for sub in &self.sub_authorities {
            output.write_u32(*sub);
        }
        Ok(())
    }

    fn marshal_deferrals(&self, _output: &mut PacketOutput) -> Result<()> {
        Ok(())
    }
}
