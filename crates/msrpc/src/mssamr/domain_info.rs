//! `SamrQueryInformationDomain` (opnum 8)
//!
//! ```text
//! typedef [switch_type(DOMAIN_INFORMATION_CLASS)] union _SAMPR_DOMAIN_INFO_BUFFER {
//!     [case(DomainPasswordInformation)] DOMAIN_PASSWORD_INFORMATION Password;
//!     [case(DomainLogoffInformation)]   DOMAIN_LOGOFF_INFORMATION Logoff;
//!     [case(DomainLockoutInformation)]  SAMPR_DOMAIN_LOCKOUT_INFORMATION Lockout;
//!     ...
//! } SAMPR_DOMAIN_INFO_BUFFER;
//!
//! long SamrQueryInformationDomain(
//!     [in] SAMPR_HANDLE DomainHandle,
//!     [in] DOMAIN_INFORMATION_CLASS DomainInformationClass,
//!     [out, switch_is(DomainInformationClass)] PSAMPR_DOMAIN_INFO_BUFFER* Buffer
//! );
//! ```

use crate::messages::RequestCall;
use msrpc_ndr::{
    Alignment, ContextHandle, Marshallable, NdrError, OldLargeInteger, PacketInput, PacketOutput,
    Result, Unmarshallable,
};
use std::fmt;

/// `DOMAIN_INFORMATION_CLASS` values this client decodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum DomainInformationClass {
    Password = 1,
    LogOff = 3,
    Lockout = 12,
}

impl TryFrom<u16> for DomainInformationClass {
    type Error = NdrError;

    fn try_from(value: u16) -> Result<Self> {
        match value {
            1 => Ok(Self::Password),
            3 => Ok(Self::LogOff),
            12 => Ok(Self::Lockout),
            other => Err(NdrError::structure(
                "DOMAIN_INFORMATION_CLASS",
                format!("unsupported class {}", other),
            )),
        }
    }
}

impl fmt::Display for DomainInformationClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Password => "DomainPasswordInformation",
            Self::LogOff => "DomainLogoffInformation",
            Self::Lockout => "DomainLockoutInformation",
        };
        f.write_str(name)
    }
}

/// `DOMAIN_PASSWORD_INFORMATION`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DomainPasswordInfo {
    pub min_password_length: u16,
    pub password_history_length: u16,
    pub password_properties: u32,
    pub max_password_age: OldLargeInteger,
    pub min_password_age: OldLargeInteger,
}

/// `DOMAIN_LOGOFF_INFORMATION`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DomainLogOffInfo {
    pub force_logoff: OldLargeInteger,
}

/// `SAMPR_DOMAIN_LOCKOUT_INFORMATION`
///
/// The two intervals are `LARGE_INTEGER` hypers, unlike the split
/// `OLD_LARGE_INTEGER` of the password arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DomainLockoutInfo {
    pub lockout_duration: i64,
    pub lockout_observation_window: i64,
    pub lockout_threshold: u16,
}

/// `SAMPR_DOMAIN_INFO_BUFFER`, restricted to the supported arms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainInformation {
    Password(DomainPasswordInfo),
    LogOff(DomainLogOffInfo),
    Lockout(DomainLockoutInfo),
}

impl DomainInformation {
    /// Empty arm to decode a reply to a query for `class`
    pub fn for_class(class: DomainInformationClass) -> Self {
        match class {
            DomainInformationClass::Password => Self::Password(DomainPasswordInfo::default()),
            DomainInformationClass::LogOff => Self::LogOff(DomainLogOffInfo::default()),
            DomainInformationClass::Lockout => Self::Lockout(DomainLockoutInfo::default()),
        }
    }

    pub fn class(&self) -> DomainInformationClass {
        match self {
            Self::Password(_) => DomainInformationClass::Password,
            Self::LogOff(_) => DomainInformationClass::LogOff,
            Self::Lockout(_) => DomainInformationClass::Lockout,
        }
    }
}

impl Unmarshallable for DomainInformation {
    fn unmarshal_preamble(&mut self, input: &mut PacketInput) -> Result<()> {
        let tag = input.read_u16()?;
        let expected = self.class();
        if tag != expected as u16 {
            return Err(NdrError::structure(
                "SAMPR_DOMAIN_INFO_BUFFER.tag",
                format!("tag {} does not match requested {}", tag, expected),
            ));
        }
        Ok(())
    }

    fn unmarshal_entity(&mut self, input: &mut PacketInput) -> Result<()> {
        // the lockout arm's hypers set the union's alignment
        input.align(Alignment::Eight)?;
        match self {
            Self::Password(info) => {
                info.min_password_length = input.read_u16()?;
                info.password_history_length = input.read_u16()?;
                info.password_properties = input.read_u32()?;
                input.read_unmarshallable(&mut info.max_password_age)?;
                input.read_unmarshallable(&mut info.min_password_age)?;
            }
            Self::LogOff(info) => {
                input.read_unmarshallable(&mut info.force_logoff)?;
            }
            Self::Lockout(info) => {
                info.lockout_duration = input.read_i64()?;
                info.lockout_observation_window = input.read_i64()?;
                info.lockout_threshold = input.read_u16()?;
            }
        }
        Ok(())
    }

    fn unmarshal_deferrals(&mut self, _input: &mut PacketInput) -> Result<()> {
        Ok(())
    }
}

impl Marshallable for DomainInformation {
    fn marshal_preamble(&self, output: &mut PacketOutput) -> Result<()> {
        output.write_u16(self.class() as u16);
        Ok(())
    }

    fn marshal_entity(&self, output: &mut PacketOutput) -> Result<()> {
        output.align(Alignment::Eight);
        match self {
            Self::Password(info) => {
                output.write_u16(info.min_password_length);
                output.write_u16(info.password_history_length);
                output.write_u32(info.password_properties);
                output.write_marshallable(&info.max_password_age)?;
                output.write_marshallable(&info.min_password_age)?;
            }
            Self::LogOff(info) => {
                output.write_marshallable(&info.force_logoff)?;
            }
            Self::Lockout(info) => {
                output.write_i64(info.lockout_duration);
                output.write_i64(info.lockout_observation_window);
                output.write_u16(info.lockout_threshold);
            }
        }
        Ok(())
    }

    fn marshal_deferrals(&self, _output: &mut PacketOutput) -> Result<()> {
        Ok(())
    }
}

pub struct SamrQueryInformationDomainRequest {
    domain_handle: ContextHandle,
    class: DomainInformationClass,
}

impl SamrQueryInformationDomainRequest {
    pub fn new(domain_handle: ContextHandle, class: DomainInformationClass) -> Self {
        Self {
            domain_handle,
            class,
        }
    }

    pub fn password(domain_handle: ContextHandle) -> Self {
        Self::new(domain_handle, DomainInformationClass::Password)
    }

    pub fn logoff(domain_handle: ContextHandle) -> Self {
        Self::new(domain_handle, DomainInformationClass::LogOff)
    }

    pub fn lockout(domain_handle: ContextHandle) -> Self {
        Self::new(domain_handle, DomainInformationClass::Lockout)
    }

    pub fn class(&self) -> DomainInformationClass {
        self.class
    }
}

impl RequestCall for SamrQueryInformationDomainRequest {
    type Response = SamrQueryInformationDomainResponse;
    const OP_NUM: u16 = 8;

    fn marshal(&self, output: &mut PacketOutput) -> Result<()> {
        output.write_marshallable(&self.domain_handle)?;
        output.write_u16(self.class as u16);
        Ok(())
    }

    fn response_object(&self) -> SamrQueryInformationDomainResponse {
        SamrQueryInformationDomainResponse::new(self.class)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamrQueryInformationDomainResponse {
    class: DomainInformationClass,
    buffer: Option<DomainInformation>,
}

impl SamrQueryInformationDomainResponse {
    /// Response expecting the arm selected by `class`
    pub fn new(class: DomainInformationClass) -> Self {
        Self {
            class,
            buffer: None,
        }
    }

    pub fn buffer(&self) -> Option<&DomainInformation> {
        self.buffer.as_ref()
    }

    pub fn password(&self) -> Option<&DomainPasswordInfo> {
        match &self.buffer {
            Some(DomainInformation::Password(info)) => Some(info),
            _ => None,
        }
    }

    pub fn logoff(&self) -> Option<&DomainLogOffInfo> {
        match &self.buffer {
            Some(DomainInformation::LogOff(info)) => Some(info),
            _ => None,
        }
    }

    pub fn lockout(&self) -> Option<&DomainLockoutInfo> {
        match &self.buffer {
            Some(DomainInformation::Lockout(info)) => Some(info),
            _ => None,
        }
    }
}

impl Unmarshallable for SamrQueryInformationDomainResponse {
    fn unmarshal_preamble(&mut self, _input: &mut PacketInput) -> Result<()> {
        Ok(())
    }

    fn unmarshal_entity(&mut self, input: &mut PacketInput) -> Result<()> {
        self.buffer = match input.read_referent_id()? {
            Some(_) => {
                let mut info = DomainInformation::for_class(self.class);
                input.read_unmarshallable(&mut info)?;
                Some(info)
            }
            None => None,
        };
        Ok(())
    }

    fn unmarshal_deferrals(&mut self, _input: &mut PacketInput) -> Result<()> {
        Ok(())
    }
}
