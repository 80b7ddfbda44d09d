//! `LsarLookupNames` (opnum 14)
//!
//! ```text
//! NTSTATUS LsarLookupNames(
//!     [in] LSAPR_HANDLE PolicyHandle,
//!     [in, range(0,1000)] unsigned long Count,
//!     [in, size_is(Count)] PRPC_UNICODE_STRING Names,
//!     [out] PLSAPR_REFERENCED_DOMAIN_LIST* ReferencedDomains,
//!     [in, out] PLSAPR_TRANSLATED_SIDS TranslatedSids,
//!     [in] LSAP_LOOKUP_LEVEL LookupLevel,
//!     [in, out] unsigned long* MappedCount
//! );
//! ```

use crate::messages::RequestCall;
use crate::mslsad::objects::{LsaTranslatedSid, LsaTranslatedSids, ReferencedDomainList, TrustInformation};
use msrpc_ndr::{
    write_counted_array, ContextHandle, NdrError, PacketInput, PacketOutput, Result,
    RpcUnicodeString, Unmarshallable,
};

/// Largest `Count` the server accepts
pub const MAX_LOOKUP_NAMES: usize = 1000;

/// `LSAP_LOOKUP_LEVEL`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u16)]
pub enum LookupLevel {
    #[default]
    Workstation = 1,
    PreferredDomainController = 2,
    GlobalCatalog = 3,
    GlobalCatalogOnly = 4,
    PrimaryDomainControllerOnly = 5,
    ForestTrustedDomains = 6,
    ReadOnlyDomainController = 7,
}

pub struct LsarLookupNamesRequest {
    policy_handle: ContextHandle,
    names: Vec<RpcUnicodeString>,
    lookup_level: LookupLevel,
}

impl LsarLookupNamesRequest {
    pub fn new<I, S>(policy_handle: ContextHandle, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<RpcUnicodeString>,
    {
        Self {
            policy_handle,
            names: names.into_iter().map(Into::into).collect(),
            lookup_level: LookupLevel::default(),
        }
    }

    pub fn with_lookup_level(mut self, lookup_level: LookupLevel) -> Self {
        self.lookup_level = lookup_level;
        self
    }

    pub fn names(&self) -> &[RpcUnicodeString] {
        &self.names
    }
}

impl RequestCall for LsarLookupNamesRequest {
    type Response = LsarLookupNamesResponse;
    const OP_NUM: u16 = 14;

    fn marshal(&self, output: &mut PacketOutput) -> Result<()> {
        if self.names.len() > MAX_LOOKUP_NAMES {
            return Err(NdrError::structure(
                "LsarLookupNames.Count",
                format!("{} names exceeds {}", self.names.len(), MAX_LOOKUP_NAMES),
            ));
        }
        output.write_marshallable(&self.policy_handle)?;
        output.write_u32(self.names.len() as u32);
        write_counted_array(output, &self.names)?;
        output.write_marshallable(&LsaTranslatedSids::default())?;
        output.write_u16(self.lookup_level as u16);
        // MappedCount
        output.write_u32(0);
        Ok(())
    }

    fn response_object(&self) -> LsarLookupNamesResponse {
        LsarLookupNamesResponse::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LsarLookupNamesResponse {
    referenced_domains: Option<ReferencedDomainList>,
    translated_sids: LsaTranslatedSids,
    mapped_count: u32,
}

impl LsarLookupNamesResponse {
    pub fn referenced_domains(&self) -> Option<&ReferencedDomainList> {
        self.referenced_domains.as_ref()
    }

    pub fn translated_sids(&self) -> &[LsaTranslatedSid] {
        self.translated_sids.sids()
    }

    pub fn mapped_count(&self) -> u32 {
        self.mapped_count
    }

    /// Referenced domain of a translated SID from this response
    pub fn domain_of(&self, sid: &LsaTranslatedSid) -> Result<Option<&TrustInformation>> {
        match &self.referenced_domains {
            Some(domains) => domains.resolve(sid),
            None => match sid.domain()? {
                None => Ok(None),
                Some(index) => Err(NdrError::structure(
                    "LSA_TRANSLATED_SID.DomainIndex",
                    format!("index {} but no referenced domain list", index),
                )),
            },
        }
    }
}

impl Unmarshallable for LsarLookupNamesResponse {
    fn unmarshal_preamble(&mut self, _input: &mut PacketInput) -> Result<()> {
        Ok(())
    }

    fn unmarshal_entity(&mut self, input: &mut PacketInput) -> Result<()> {
        self.referenced_domains = match input.read_referent_id()? {
            Some(_) => {
                let mut domains = ReferencedDomainList::default();
                input.read_unmarshallable(&mut domains)?;
                Some(domains)
            }
            None => None,
        };
        input.read_unmarshallable(&mut self.translated_sids)?;
        self.mapped_count = input.read_u32()?;
        Ok(())
    }

    fn unmarshal_deferrals(&mut self, _input: &mut PacketInput) -> Result<()> {
        Ok(())
    }
}
