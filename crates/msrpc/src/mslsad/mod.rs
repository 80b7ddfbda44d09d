//! MS-LSAD (Local Security Authority, Domain Policy) client messages

mod lookup_names;
mod objects;

pub use lookup_names::{LookupLevel, LsarLookupNamesRequest, LsarLookupNamesResponse, MAX_LOOKUP_NAMES};
pub use objects::{
    LsaTranslatedSid, LsaTranslatedSids, ReferencedDomainList, SidNameUse, TrustInformation,
    NO_DOMAIN_INDEX,
};
