//! MS-SAMR (Security Account Manager Remote) client messages
mod domain_info;
mod enumeration;
mod sid_array;

pub use domain_info::{
    DomainInformation, DomainInformationClass, DomainLockoutInfo, DomainLogOffInfo, DomainPasswordInfo,
    SamrQueryInformationDomainRequest, SamrQueryInformationDomainResponse,
};
pub use enumeration::{
    EnumerationBuffer, RidEnumeration, SamrEnumerateAliasesInDomainRequest, SamrEnumerateGroupsInDomainRequest,
    SamrEnumerateResponse, SamrEnumerateUsersInDomainRequest, DEFAULT_PREFERED_MAXIMUM_LENGTH,
};
pub use sid_array::{SamrGetMembersInAliasRequest, SamrGetMembersInAliasResponse, SidArrayOut, SidInformation};
