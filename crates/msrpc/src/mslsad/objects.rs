//! MS-LSAD structures

use super::lookup_names::MAX_LOOKUP_NAMES;
use msrpc_ndr::{
    read_counted_array, write_counted_array, Alignment, Marshallable, NdrError, PacketInput,
    PacketOutput, Result, RpcSid, RpcUnicodeString, Unmarshallable,
};

/// `DomainIndex` value meaning "no referenced domain"
pub const NO_DOMAIN_INDEX: i32 = -1;

/// `SID_NAME_USE`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum SidNameUse {
    User = 1,
    Group = 2,
    Domain = 3,
    Alias = 4,
    WellKnownGroup = 5,
    DeletedAccount = 6,
    Invalid = 7,
    Unknown = 8,
    Computer = 9,
    Label = 10,
}

impl TryFrom<u32> for SidNameUse {
    type Error = u32;

    fn try_from(value: u32) -> std::result::Result<Self, u32> {
        Ok(match value {
            1 => SidNameUse::User,
            2 => SidNameUse::Group,
            3 => SidNameUse::Domain,
            4 => SidNameUse::Alias,
            5 => SidNameUse::WellKnownGroup,
            6 => SidNameUse::DeletedAccount,
            7 => SidNameUse::Invalid,
            8 => SidNameUse::Unknown,
            9 => SidNameUse::Computer,
            10 => SidNameUse::Label,
            other => return Err(other),
        })
    }
}

/// `LSA_TRANSLATED_SID`
///
/// ```text
/// typedef struct _LSA_TRANSLATED_SID {
///     SID_NAME_USE Use;
///     unsigned long RelativeId;
///     long DomainIndex;
/// } LSA_TRANSLATED_SID;
/// ```
///
/// `DomainIndex` points into the `LSAPR_REFERENCED_DOMAIN_LIST` returned
/// alongside. It is kept as transmitted; [`LsaTranslatedSid::domain`] and
/// [`ReferencedDomainList::resolve`] validate it when it is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LsaTranslatedSid {
    pub sid_type: u32,
    pub relative_id: u32,
    pub domain_index: i32,
}

impl LsaTranslatedSid {
    pub fn new(sid_type: u32, relative_id: u32, domain_index: i32) -> Self {
        Self {
            sid_type,
            relative_id,
            domain_index,
        }
    }

    pub fn sid_name_use(&self) -> Option<SidNameUse> {
        SidNameUse::try_from(self.sid_type).ok()
    }

    /// Index of the referenced domain, `None` when no domain applies
    pub fn domain(&self) -> Result<Option<usize>> {
        match self.domain_index {
            NO_DOMAIN_INDEX => Ok(None),
            index if index >= 0 => Ok(Some(index as usize)),
            index => Err(NdrError::structure(
                "LSA_TRANSLATED_SID.DomainIndex",
                format!("negative index {} other than -1", index),
            )),
        }
    }
}

impl Unmarshallable for LsaTranslatedSid {
    fn unmarshal_preamble(&mut self, _input: &mut PacketInput) -> Result<()> {
        Ok(())
    }

    fn unmarshal_entity(&mut self, input: &mut PacketInput) -> Result<()> {
        input.align(Alignment::Four)?;
        self.sid_type = input.read_u32()?;
        self.relative_id = input.read_u32()?;
        self.domain_index = input.read_i32()?;
        Ok(())
    }

    fn unmarshal_deferrals(&mut self, _input: &mut PacketInput) -> Result<()> {
        Ok(())
    }
}

impl Marshallable for LsaTranslatedSid {
    fn marshal_preamble(&self, _output: &mut PacketOutput) -> Result<()> {
        Ok(())
    }

    fn marshal_entity(&self, output: &mut PacketOutput) -> Result<()> {
        output.align(Alignment::Four);
        output.write_u32(self.sid_type);
        output.write_u32(self.relative_id);
        output.write_i32(self.domain_index);
        Ok(())
    }

    fn marshal_deferrals(&self, _output: &mut PacketOutput) -> Result<()> {
        Ok(())
    }
}

/// `LSAPR_TRANSLATED_SIDS`
///
/// ```text
/// typedef struct _LSAPR_TRANSLATED_SIDS {
///     [range(0,1000)] unsigned long Entries;
///     [size_is(Entries)] PLSA_TRANSLATED_SID Sids;
/// } LSAPR_TRANSLATED_SIDS;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LsaTranslatedSids {
    sids: Vec<LsaTranslatedSid>,
    entries: usize,
    present: bool,
}

impl LsaTranslatedSids {
    pub fn new(sids: Vec<LsaTranslatedSid>) -> Self {
        Self {
            entries: sids.len(),
            present: !sids.is_empty(),
            sids,
        }
    }

    pub fn sids(&self) -> &[LsaTranslatedSid] {
        &self.sids
    }

    pub fn into_sids(self) -> Vec<LsaTranslatedSid> {
        self.sids
    }

    pub fn len(&self) -> usize {
        self.sids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sids.is_empty()
    }
}

impl Unmarshallable for LsaTranslatedSids {
    fn unmarshal_preamble(&mut self, _input: &mut PacketInput) -> Result<()> {
        Ok(())
    }

    fn unmarshal_entity(&mut self, input: &mut PacketInput) -> Result<()> {
        input.align(Alignment::Four)?;
        self.entries = input.read_u32()? as usize;
        if self.entries > MAX_LOOKUP_NAMES {
            return Err(NdrError::structure(
                "LSAPR_TRANSLATED_SIDS.Entries",
                format!("{} entries exceeds {}", self.entries, MAX_LOOKUP_NAMES),
            ));
        }
        self.present = input.read_referent_id()?.is_some();
        if !self.present && self.entries != 0 {
            return Err(NdrError::structure(
                "LSAPR_TRANSLATED_SIDS.Sids",
                format!("null array for {} entries", self.entries),
            ));
        }
        Ok(())
    }

    fn unmarshal_deferrals(&mut self, input: &mut PacketInput) -> Result<()> {
        self.sids = if self.present {
            read_counted_array(input, "LSAPR_TRANSLATED_SIDS.Entries", self.entries)?
        } else {
            Vec::new()
        };
        Ok(())
    }
}

impl Marshallable for LsaTranslatedSids {
    fn marshal_preamble(&self, _output: &mut PacketOutput) -> Result<()> {
        Ok(())
    }

    fn marshal_entity(&self, output: &mut PacketOutput) -> Result<()> {
        output.align(Alignment::Four);
        output.write_u32(self.sids.len() as u32);
        output.write_pointer(!self.sids.is_empty());
        Ok(())
    }

    fn marshal_deferrals(&self, output: &mut PacketOutput) -> Result<()> {
        if !self.sids.is_empty() {
            write_counted_array(output, &self.sids)?;
        }
        Ok(())
    }
}

/// `LSAPR_TRUST_INFORMATION`
///
/// ```text
/// typedef struct _LSAPR_TRUST_INFORMATION {
///     RPC_UNICODE_STRING Name;
///     PRPC_SID Sid;
/// } LSAPR_TRUST_INFORMATION;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrustInformation {
    pub name: RpcUnicodeString,
    pub sid: Option<RpcSid>,
}

impl TrustInformation {
    pub fn new(name: impl Into<RpcUnicodeString>, sid: Option<RpcSid>) -> Self {
        Self {
            name: name.into(),
            sid,
        }
    }
}

impl Unmarshallable for TrustInformation {
    fn unmarshal_preamble(&mut self, _input: &mut PacketInput) -> Result<()> {
        Ok(())
    }

    fn unmarshal_entity(&mut self, input: &mut PacketInput) -> Result<()> {
        input.align(Alignment::Four)?;
        self.name.unmarshal_entity(input)?;
        self.sid = input.read_referent_id()?.map(|_| RpcSid::default());
        Ok(())
    }

    fn unmarshal_deferrals(&mut self, input: &mut PacketInput) -> Result<()> {
        self.name.unmarshal_deferrals(input)?;
        if let Some(sid) = self.sid.as_mut() {
            input.read_unmarshallable(sid)?;
        }
        Ok(())
    }
}

impl Marshallable for TrustInformation {
    fn marshal_preamble(&self, _output: &mut PacketOutput) -> Result<()> {
        Ok(())
    }

    fn marshal_entity(&self, output: &mut PacketOutput) -> Result<()> {
        output.align(Alignment::Four);
        self.name.marshal_entity(output)?;
        output.write_pointer(self.sid.is_some());
        Ok(())
    }

    fn marshal_deferrals(&self, output: &mut PacketOutput) -> Result<()> {
        self.name.marshal_deferrals(output)?;
        if let Some(sid) = &self.sid {
            output.write_marshallable(sid)?;
        }
        Ok(())
    }
}

/// `LSAPR_REFERENCED_DOMAIN_LIST`
///
/// ```text
/// typedef struct _LSAPR_REFERENCED_DOMAIN_LIST {
///     unsigned long Entries;
///     [size_is(Entries)] PLSAPR_TRUST_INFORMATION Domains;
///     unsigned long MaxEntries;
/// } LSAPR_REFERENCED_DOMAIN_LIST;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReferencedDomainList {
    domains: Vec<TrustInformation>,
    max_entries: u32,
    entries: usize,
    present: bool,
}

impl ReferencedDomainList {
    pub fn new(domains: Vec<TrustInformation>, max_entries: u32) -> Self {
        Self {
            entries: domains.len(),
            present: !domains.is_empty(),
            domains,
            max_entries,
        }
    }

    pub fn domains(&self) -> &[TrustInformation] {
        &self.domains
    }

    pub fn max_entries(&self) -> u32 {
        self.max_entries
    }

    /// Domain referenced by a translated SID
    ///
    /// `Ok(None)` for the "no domain" sentinel. Any other negative index, or
    /// an index past the end of the list, is a malformed reply.
    pub fn resolve(&self, sid: &LsaTranslatedSid) -> Result<Option<&TrustInformation>> {
        match sid.domain()? {
            None => Ok(None),
            Some(index) => self.domains.get(index).map(Some).ok_or_else(|| {
                NdrError::structure(
                    "LSA_TRANSLATED_SID.DomainIndex",
                    format!(
                        "index {} outside referenced domain list of {}",
                        index,
                        self.domains.len()
                    ),
                )
            }),
        }
    }
}

impl Unmarshallable for ReferencedDomainList {
    fn unmarshal_preamble(&mut self, _input: &mut PacketInput) -> Result<()> {
        Ok(())
    }

    fn unmarshal_entity(&mut self, input: &mut PacketInput) -> Result<()> {
        input.align(Alignment::Four)?;
        self.entries = input.read_u32()? as usize;
        self.present = input.read_referent_id()?.is_some();
        self.max_entries = input.read_u32()?;
        if !self.present && self.entries != 0 {
            return Err(NdrError::structure(
                "LSAPR_REFERENCED_DOMAIN_LIST.Domains",
                format!("null array for {} entries", self.entries),
            ));
        }
        Ok(())
    }

    fn unmarshal_deferrals(&mut self, input: &mut PacketInput) -> Result<()> {
        self.domains = if self.present {
            read_counted_array(input, "LSAPR_REFERENCED_DOMAIN_LIST.Entries", self.entries)?
        } else {
            Vec::new()
        };
        Ok(())
    }
}

impl Marshallable for ReferencedDomainList {
    fn marshal_preamble(&self, _output: &mut PacketOutput) -> Result<()> {
        Ok(())
    }

    fn marshal_entity(&self, output: &mut PacketOutput) -> Result<()> {
        output.align(Alignment::Four);
        output.write_u32(self.domains.len() as u32);
        output.write_pointer(!self.domains.is_empty());
        output.write_u32(self.max_entries);
        Ok(())
    }

    fn marshal_deferrals(&self, output: &mut PacketOutput) -> Result<()> {
        if !self.domains.is_empty() {
            write_counted_array(output, &self.domains)?;
        }
        Ok(())
    }
}
