//! Domain enumeration: groups (opnum 11), users (opnum 13), aliases (opnum 15)
//!
//! ```text
//! typedef struct _SAMPR_RID_ENUMERATION {
//!     unsigned long RelativeId;
//!     RPC_UNICODE_STRING Name;
//! } SAMPR_RID_ENUMERATION;
//!
//! typedef struct _SAMPR_ENUMERATION_BUFFER {
//!     unsigned long EntriesRead;
//!     [size_is(EntriesRead)] PSAMPR_RID_ENUMERATION Buffer;
//! } SAMPR_ENUMERATION_BUFFER;
//!
//! long SamrEnumerateGroupsInDomain(
//!     [in] SAMPR_HANDLE DomainHandle,
//!     [in, out] unsigned long* EnumerationContext,
//!     [out] PSAMPR_ENUMERATION_BUFFER* Buffer,
//!     [in] unsigned long PreferedMaximumLength,
//!     [out] unsigned long* CountReturned
//! );
//! ```
//!
//! Users take an extra `UserAccountControl` filter ahead of
//! `PreferedMaximumLength`; aliases match groups.

use crate::messages::RequestCall;
use msrpc_ndr::{
    check_count, read_counted_array, write_counted_array, Alignment, ContextHandle, Marshallable,
    NdrError, PacketInput, PacketOutput, Result, RpcUnicodeString, Unmarshallable,
};

/// Let the server pick how much to return per call
pub const DEFAULT_PREFERED_MAXIMUM_LENGTH: u32 = 0xFFFF_FFFF;

/// `SAMPR_RID_ENUMERATION`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RidEnumeration {
    pub relative_id: u32,
    pub name: RpcUnicodeString,
}

impl RidEnumeration {
    pub fn new(relative_id: u32, name: impl Into<RpcUnicodeString>) -> Self {
        Self {
            relative_id,
            name: name.into(),
        }
    }
}

impl Unmarshallable for RidEnumeration {
    fn unmarshal_preamble(&mut self, _input: &mut PacketInput) -> Result<()> {
        Ok(())
    }

    fn unmarshal_entity(&mut self, input: &mut PacketInput) -> Result<()> {
        input.align(Alignment::Four)?;
        self.relative_id = input.read_u32()?;
        self.name.unmarshal_entity(input)
    }

    fn unmarshal_deferrals(&mut self, input: &mut PacketInput) -> Result<()> {
        self.name.unmarshal_deferrals(input)
    }
}

impl Marshallable for RidEnumeration {
    fn marshal_preamble(&self, _output: &mut PacketOutput) -> Result<()> {
        Ok(())
    }

    fn marshal_entity(&self, output: &mut PacketOutput) -> Result<()> {
        output.align(Alignment::Four);
        output.write_u32(self.relative_id);
        self.name.marshal_entity(output)
    }

    fn marshal_deferrals(&self, output: &mut PacketOutput) -> Result<()> {
        self.name.marshal_deferrals(output)
    }
}

/// `SAMPR_ENUMERATION_BUFFER`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EnumerationBuffer {
    entries: Vec<RidEnumeration>,
    entries_read: usize,
    present: bool,
}

impl EnumerationBuffer {
    pub fn new(entries: Vec<RidEnumeration>) -> Self {
        Self {
            entries_read: entries.len(),
            present: !entries.is_empty(),
            entries,
        }
    }

    pub fn entries(&self) -> &[RidEnumeration] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<RidEnumeration> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Unmarshallable for EnumerationBuffer {
    fn unmarshal_preamble(&mut self, _input: &mut PacketInput) -> Result<()> {
        Ok(())
    }

    fn unmarshal_entity(&mut self, input: &mut PacketInput) -> Result<()> {
        input.align(Alignment::Four)?;
        self.entries_read = input.read_u32()? as usize;
        self.present = input.read_referent_id()?.is_some();
        if !self.present && self.entries_read != 0 {
            return Err(NdrError::structure(
                "SAMPR_ENUMERATION_BUFFER.Buffer",
                format!("null array for {} entries", self.entries_read),
            ));
        }
        Ok(())
    }

    fn unmarshal_deferrals(&mut self, input: &mut PacketInput) -> Result<()> {
        self.entries = if self.present {
            read_counted_array(input, "SAMPR_ENUMERATION_BUFFER.EntriesRead", self.entries_read)?
        } else {
            Vec::new()
        };
        Ok(())
    }
}

impl Marshallable for EnumerationBuffer {
    fn marshal_preamble(&self, _output: &mut PacketOutput) -> Result<()> {
        Ok(())
    }

    fn marshal_entity(&self, output: &mut PacketOutput) -> Result<()> {
        output.align(Alignment::Four);
        output.write_u32(self.entries.len() as u32);
        output.write_pointer(!self.entries.is_empty());
        Ok(())
    }

    fn marshal_deferrals(&self, output: &mut PacketOutput) -> Result<()> {
        if !self.entries.is_empty() {
            write_counted_array(output, &self.entries)?;
        }
        Ok(())
    }
}

/// Response shared by the three enumeration calls
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SamrEnumerateResponse {
    enumeration_context: u32,
    buffer: Option<EnumerationBuffer>,
    count_returned: u32,
}

impl SamrEnumerateResponse {
    /// Token to pass back on the next call when more entries remain
    pub fn resume_token(&self) -> u32 {
        self.enumeration_context
    }

    pub fn entries(&self) -> &[RidEnumeration] {
        self.buffer.as_ref().map(EnumerationBuffer::entries).unwrap_or(&[])
    }

    pub fn count_returned(&self) -> u32 {
        self.count_returned
    }
}

impl Unmarshallable for SamrEnumerateResponse {
    fn unmarshal_preamble(&mut self, _input: &mut PacketInput) -> Result<()> {
        Ok(())
    }

    fn unmarshal_entity(&mut self, input: &mut PacketInput) -> Result<()> {
        self.enumeration_context = input.read_u32()?;
        self.buffer = match input.read_referent_id()? {
            Some(_) => {
                let mut buffer = EnumerationBuffer::default();
                input.read_unmarshallable(&mut buffer)?;
                Some(buffer)
            }
            None => None,
        };
        self.count_returned = input.read_u32()?;
        check_count("CountReturned", self.count_returned as usize, self.entries().len())
    }

    fn unmarshal_deferrals(&mut self, _input: &mut PacketInput) -> Result<()> {
        Ok(())
    }
}

fn marshal_enumerate(
    output: &mut PacketOutput,
    domain_handle: &ContextHandle,
    enumeration_context: u32,
    user_account_control: Option<u32>,
    prefered_maximum_length: u32,
) -> Result<()> {
    output.write_marshallable(domain_handle)?;
    output.write_u32(enumeration_context);
    if let Some(user_account_control) = user_account_control {
        output.write_u32(user_account_control);
    }
    output.write_u32(prefered_maximum_length);
    Ok(())
}

pub struct SamrEnumerateGroupsInDomainRequest {
    domain_handle: ContextHandle,
    enumeration_context: u32,
    prefered_maximum_length: u32,
}

impl SamrEnumerateGroupsInDomainRequest {
    /// `enumeration_context` is 0 on the first call, then the previous
    /// response's resume token
    pub fn new(domain_handle: ContextHandle, enumeration_context: u32) -> Self {
        Self {
            domain_handle,
            enumeration_context,
            prefered_maximum_length: DEFAULT_PREFERED_MAXIMUM_LENGTH,
        }
    }

    pub fn with_prefered_maximum_length(mut self, length: u32) -> Self {
        self.prefered_maximum_length = length;
        self
    }
}

impl RequestCall for SamrEnumerateGroupsInDomainRequest {
    type Response = SamrEnumerateResponse;
    const OP_NUM: u16 = 11;

    fn marshal(&self, output: &mut PacketOutput) -> Result<()> {
        marshal_enumerate(
            output,
            &self.domain_handle,
            self.enumeration_context,
            None,
            self.prefered_maximum_length,
        )
    }

    fn response_object(&self) -> SamrEnumerateResponse {
        SamrEnumerateResponse::default()
    }
}

pub struct SamrEnumerateUsersInDomainRequest {
    domain_handle: ContextHandle,
    enumeration_context: u32,
    user_account_control: u32,
    prefered_maximum_length: u32,
}

impl SamrEnumerateUsersInDomainRequest {
    /// `user_account_control` filters on account flags; 0 returns every user
    pub fn new(domain_handle: ContextHandle, enumeration_context: u32, user_account_control: u32) -> Self {
        Self {
            domain_handle,
            enumeration_context,
            user_account_control,
            prefered_maximum_length: DEFAULT_PREFERED_MAXIMUM_LENGTH,
        }
    }

    pub fn with_prefered_maximum_length(mut self, length: u32) -> Self {
        self.prefered_maximum_length = length;
        self
    }
}

impl RequestCall for SamrEnumerateUsersInDomainRequest {
    type Response = SamrEnumerateResponse;
    const OP_NUM: u16 = 13;

    fn marshal(&self, output: &mut PacketOutput) -> Result<()> {
        marshal_enumerate(
            output,
            &self.domain_handle,
            self.enumeration_context,
            Some(self.user_account_control),
            self.prefered_maximum_length,
        )
    }

    fn response_object(&self) -> SamrEnumerateResponse {
        SamrEnumerateResponse::default()
    }
}

pub struct SamrEnumerateAliasesInDomainRequest {
    domain_handle: ContextHandle,
    enumeration_context: u32,
    prefered_maximum_length: u32,
}

impl SamrEnumerateAliasesInDomainRequest {
    pub fn new(domain_handle: ContextHandle, enumeration_context: u32) -> Self {
        Self {
            domain_handle,
            enumeration_context,
            prefered_maximum_length: DEFAULT_PREFERED_MAXIMUM_LENGTH,
        }
    }

    pub fn with_prefered_maximum_length(mut self, length: u32) -> Self {
        self.prefered_maximum_length = length;
        self
    }
}

impl RequestCall for SamrEnumerateAliasesInDomainRequest {
    type Response = SamrEnumerateResponse;
    const OP_NUM: u16 = 15;

    fn marshal(&self, output: &mut PacketOutput) -> Result<()> {
        marshal_enumerate(
            output,
            &self.domain_handle,
            self.enumeration_context,
            None,
            self.prefered_maximum_length,
        )
    }

    fn response_object(&self) -> SamrEnumerateResponse {
        SamrEnumerateResponse::default()
    }
}
