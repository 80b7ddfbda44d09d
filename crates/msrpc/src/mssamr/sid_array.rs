//! SID arrays and `SamrGetMembersInAlias` (opnum 33)
//!
//! ```text
//! typedef struct _SAMPR_SID_INFORMATION {
//!     PRPC_SID SidPointer;
//! } SAMPR_SID_INFORMATION;
//!
//! typedef struct _SAMPR_PSID_ARRAY_OUT {
//!     unsigned long Count;
//!     [size_is(Count)] PSAMPR_SID_INFORMATION Sids;
//! } SAMPR_PSID_ARRAY_OUT;
//!
//! long SamrGetMembersInAlias(
//!     [in] SAMPR_HANDLE AliasHandle,
//!     [out] PSAMPR_PSID_ARRAY_OUT Members
//! );
//! ```

use crate::messages::RequestCall;
use msrpc_ndr::{
    read_counted_array, write_counted_array, Alignment, ContextHandle, Marshallable, NdrError,
    PacketInput, PacketOutput, Result, RpcSid, Unmarshallable,
};

/// `SAMPR_SID_INFORMATION`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SidInformation {
    sid: Option<RpcSid>,
}

impl SidInformation {
    pub fn new(sid: RpcSid) -> Self {
        Self { sid: Some(sid) }
    }

    pub fn sid(&self) -> Option<&RpcSid> {
        self.sid.as_ref()
    }
}

impl Unmarshallable for SidInformation {
    fn unmarshal_preamble(&mut self, _input: &mut PacketInput) -> Result<()> {
        Ok(())
    }

    fn unmarshal_entity(&mut self, input: &mut PacketInput) -> Result<()> {
        input.align(Alignment::Four)?;
        self.sid = input.read_referent_id()?.map(|_| RpcSid::default());
        Ok(())
    }

    fn unmarshal_deferrals(&mut self, input: &mut PacketInput) -> Result<()> {
        if let Some(sid) = self.sid.as_mut() {
            input.read_unmarshallable(sid)?;
        }
        Ok(())
    }
}

impl Marshallable for SidInformation {
    fn marshal_preamble(&self, _output: &mut PacketOutput) -> Result<()> {
        Ok(())
    }

    fn marshal_entity(&self, output: &mut PacketOutput) -> Result<()> {
        output.align(Alignment::Four);
        output.write_pointer(self.sid.is_some());
        Ok(())
    }

    fn marshal_deferrals(&self, output: &mut PacketOutput) -> Result<()> {
        if let Some(sid) = &self.sid {
            output.write_marshallable(sid)?;
        }
        Ok(())
    }
}

/// `SAMPR_PSID_ARRAY_OUT`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SidArrayOut {
    entries: Vec<SidInformation>,
    count: usize,
    present: bool,
}

impl SidArrayOut {
    pub fn new(sids: Vec<RpcSid>) -> Self {
        let entries: Vec<SidInformation> = sids.into_iter().map(SidInformation::new).collect();
        Self {
            count: entries.len(),
            present: !entries.is_empty(),
            entries,
        }
    }

    pub fn entries(&self) -> &[SidInformation] {
        &self.entries
    }

    /// Every non-null SID, in wire order
    pub fn sids(&self) -> impl Iterator<Item = &RpcSid> {
        self.entries.iter().filter_map(SidInformation::sid)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Unmarshallable for SidArrayOut {
    fn unmarshal_preamble(&mut self, _input: &mut PacketInput) -> Result<()> {
        Ok(())
    }

    fn unmarshal_entity(&mut self, input: &mut PacketInput) -> Result<()> {
        input.align(Alignment::Four)?;
        self.count = input.read_u32()? as usize;
        self.present = input.read_referent_id()?.is_some();
        if !self.present && self.count != 0 {
            return Err(NdrError::structure(
                "SAMPR_PSID_ARRAY_OUT.Sids",
                format!("null array for {} entries", self.count),
            ));
        }
        Ok(())
    }

    fn unmarshal_deferrals(&mut self, input: &mut PacketInput) -> Result<()> {
        self.entries = if self.present {
            read_counted_array(input, "SAMPR_PSID_ARRAY_OUT.Count", self.count)?
        } else {
            Vec::new()
        };
        Ok(())
    }
}

impl Marshallable for SidArrayOut {
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

pub struct SamrGetMembersInAliasRequest {
    alias_handle: ContextHandle,
}

impl SamrGetMembersInAliasRequest {
    pub fn new(alias_handle: ContextHandle) -> Self {
        Self { alias_handle }
    }
}

impl RequestCall for SamrGetMembersInAliasRequest {
    type Response = SamrGetMembersInAliasResponse;
    const OP_NUM: u16 = 33;

    fn marshal(&self, output: &mut PacketOutput) -> Result<()> {
        output.write_marshallable(&self.alias_handle)
    }

    fn response_object(&self) -> SamrGetMembersInAliasResponse {
        SamrGetMembersInAliasResponse::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SamrGetMembersInAliasResponse {
    members: SidArrayOut,
}

impl SamrGetMembersInAliasResponse {
    pub fn members(&self) -> &SidArrayOut {
        &self.members
    }

    pub fn into_members(self) -> SidArrayOut {
        self.members
    }
}

impl Unmarshallable for SamrGetMembersInAliasResponse {
    fn unmarshal_preamble(&mut self, _input: &mut PacketInput) -> Result<()> {
        Ok(())
    }

    fn unmarshal_entity(&mut self, input: &mut PacketInput) -> Result<()> {
        input.read_unmarshallable(&mut self.members)
    }

    fn unmarshal_deferrals(&mut self, _input: &mut PacketInput) -> Result<()> {
        Ok(())
    }
}
