//! Common test utilities for integration tests
//!
//! [`MockDirectory`] plays the server side of MS-LSAD and MS-SAMR for a small
//! fixed domain. It decodes request stubs with the same NDR engine the client
//! uses and answers with hand-assembled response stubs. [`LoopbackTransport`]
//! connects a client to it without any I/O.

#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use parking_lot::Mutex;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use msrpc::mslsad::{LsaTranslatedSid, LsaTranslatedSids, ReferencedDomainList, SidNameUse, TrustInformation, NO_DOMAIN_INDEX};
use msrpc::mssamr::{
    DomainInformation, DomainInformationClass, DomainLockoutInfo, DomainLogOffInfo, DomainPasswordInfo,
    EnumerationBuffer, RidEnumeration, SamrEnumerateUsersInDomainRequest, SidArrayOut,
};
use msrpc::{RpcClient, RpcTransport, TransportError};
use msrpc_ndr::{
    read_counted_array, write_counted_array, ContextHandle, OldLargeInteger, PacketInput, PacketOutput,
    RpcSid, RpcUnicodeString,
};

pub const STATUS_SUCCESS: u32 = 0;
pub const STATUS_MORE_ENTRIES: u32 = 0x0000_0105;
pub const STATUS_SOME_NOT_MAPPED: u32 = 0x0000_0107;
pub const STATUS_NONE_MAPPED: u32 = 0xC000_0073;

pub const DOMAIN_NAME: &str = "CORP";

/// Initialize logging for tests
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_test_writer()
        .try_init();
}

pub fn policy_handle() -> ContextHandle {
    ContextHandle::new([0x11; 20])
}

pub fn domain_handle() -> ContextHandle {
    ContextHandle::new([0xD0; 20])
}

pub fn alias_handle() -> ContextHandle {
    ContextHandle::new([0xA5; 20])
}

/// S-1-5-21-1004336348-1177238915-682003330
pub fn domain_sid() -> RpcSid {
    RpcSid::new(1, [0, 0, 0, 0, 0, 5], vec![21, 1_004_336_348, 1_177_238_915, 682_003_330])
}

/// A SID of the fixture domain ending in `rid`
pub fn account_sid(rid: u32) -> RpcSid {
    let mut sub_authorities = domain_sid().sub_authorities().to_vec();
    sub_authorities.push(rid);
    RpcSid::new(1, [0, 0, 0, 0, 0, 5], sub_authorities)
}

/// Server misbehaviour to inject into the next replies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// `CountReturned` one higher than the entries sent
    WrongCountReturned,
    /// `EntriesRead` claims one more element than the array carries
    ShortEnumeration,
    /// Union arm other than the requested class
    WrongUnionTag,
    /// Eight zero bytes after the return value
    TrailingBytes,
    /// Reply stub cut off before the return value
    Truncated,
}

/// In-memory LSA and SAM server for one domain
pub struct MockDirectory {
    users: Vec<(u32, &'static str)>,
    groups: Vec<(u32, &'static str)>,
    aliases: Vec<(u32, &'static str)>,
    alias_members: Vec<u32>,
    page_size: usize,
    fault: Mutex<Option<Fault>>,
    calls: Mutex<Vec<u16>>,
}

impl MockDirectory {
    pub fn new() -> Self {
        Self {
            users: vec![
                (500, "Administrator"),
                (501, "Guest"),
                (502, "krbtgt"),
                (1104, "alice"),
                (1105, "bob"),
                (1106, "carol"),
                (1107, "svc_backup"),
            ],
            groups: vec![
                (512, "Domain Admins"),
                (513, "Domain Users"),
                (514, "Domain Guests"),
            ],
            aliases: vec![(1108, "Remote Desktop Users"), (1109, "Backup Operators")],
            alias_members: vec![1104, 1105, 1107],
            page_size: 3,
            fault: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Entries returned per enumeration call
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn inject(&self, fault: Fault) {
        *self.fault.lock() = Some(fault);
    }

    pub fn clear_fault(&self) {
        *self.fault.lock() = None;
    }

    pub fn users(&self) -> &[(u32, &'static str)] {
        &self.users
    }

    pub fn groups(&self) -> &[(u32, &'static str)] {
        &self.groups
    }

    pub fn alias_members(&self) -> &[u32] {
        &self.alias_members
    }

    /// Opnums served so far, in arrival order
    pub fn calls(&self) -> Vec<u16> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn password_info() -> DomainPasswordInfo {
        DomainPasswordInfo {
            min_password_length: 7,
            password_history_length: 24,
            password_properties: 1,
            // 42 days and 1 day, as negative 100ns intervals
            max_password_age: OldLargeInteger::from(-36_288_000_000_000),
            min_password_age: OldLargeInteger::from(-864_000_000_000),
        }
    }

    pub fn lockout_info() -> DomainLockoutInfo {
        DomainLockoutInfo {
            // 30 minutes, as negative 100ns intervals
            lockout_duration: -18_000_000_000,
            lockout_observation_window: -18_000_000_000,
            lockout_threshold: 5,
        }
    }

    /// Decode one request stub and produce the response stub
    pub fn serve(&self, stub: Bytes) -> Result<Bytes, TransportError> {
        let mut input = PacketInput::new(stub);
        let opnum = input.read_u16()?;
        self.calls.lock().push(opnum);
        let fault = *self.fault.lock();
        debug!("MockDirectory serving opnum {} (fault: {:?})", opnum, fault);

        let mut handle = ContextHandle::default();
        input.read_unmarshallable(&mut handle)?;

        let mut output = PacketOutput::new();
        let status = match opnum {
            8 => self.query_information_domain(&mut input, &mut output, fault)?,
            11 => self.enumerate(&self.groups, &mut input, &mut output, fault, false)?,
            13 => self.enumerate(&self.users, &mut input, &mut output, fault, true)?,
            14 => self.lookup_names(&mut input, &mut output)?,
            15 => self.enumerate(&self.aliases, &mut input, &mut output, fault, false)?,
            33 => self.members_in_alias(&mut output)?,
            other => return Err(format!("opnum {} not implemented", other).into()),
        };

        if fault == Some(Fault::Truncated) {
            return Ok(output.freeze());
        }
        output.write_u32(status);
        if fault == Some(Fault::TrailingBytes) {
            output.write_u64(0);
        }
        Ok(output.freeze())
    }

    fn query_information_domain(
        &self,
        input: &mut PacketInput,
        output: &mut PacketOutput,
        fault: Option<Fault>,
    ) -> Result<u32, TransportError> {
        let class = DomainInformationClass::try_from(input.read_u16()?)?;
        let info = match (class, fault) {
            (DomainInformationClass::LogOff, Some(Fault::WrongUnionTag)) => {
                DomainInformation::Password(Self::password_info())
            }
            (_, Some(Fault::WrongUnionTag)) => DomainInformation::LogOff(DomainLogOffInfo::default()),
            (DomainInformationClass::Password, _) => DomainInformation::Password(Self::password_info()),
            (DomainInformationClass::LogOff, _) => DomainInformation::LogOff(DomainLogOffInfo {
                force_logoff: OldLargeInteger::new(0, i32::MIN),
            }),
            (DomainInformationClass::Lockout, _) => DomainInformation::Lockout(Self::lockout_info()),
        };
        output.write_referent_id();
        output.write_marshallable(&info)?;
        Ok(STATUS_SUCCESS)
    }

    fn enumerate(
        &self,
        accounts: &[(u32, &'static str)],
        input: &mut PacketInput,
        output: &mut PacketOutput,
        fault: Option<Fault>,
        with_account_control: bool,
    ) -> Result<u32, TransportError> {
        let start = input.read_u32()? as usize;
        if with_account_control {
            let _user_account_control = input.read_u32()?;
        }
        let _prefered_maximum_length = input.read_u32()?;

        let end = (start + self.page_size).min(accounts.len());
        let entries: Vec<RidEnumeration> = accounts
            .get(start..end)
            .unwrap_or(&[])
            .iter()
            .map(|(rid, name)| RidEnumeration::new(*rid, *name))
            .collect();
        let returned = entries.len() as u32;

        output.write_u32(end as u32);
        match fault {
            Some(Fault::ShortEnumeration) => {
                output.write_referent_id();
                output.write_u32(returned + 1);
                output.write_referent_id();
                write_counted_array(output, &entries)?;
            }
            _ if entries.is_empty() => output.write_null_pointer(),
            _ => {
                output.write_referent_id();
                output.write_marshallable(&EnumerationBuffer::new(entries))?;
            }
        }
        let count_returned = match fault {
            Some(Fault::WrongCountReturned) | Some(Fault::ShortEnumeration) => returned + 1,
            _ => returned,
        };
        output.write_u32(count_returned);

        Ok(if end < accounts.len() {
            STATUS_MORE_ENTRIES
        } else {
            STATUS_SUCCESS
        })
    }

    fn lookup_names(&self, input: &mut PacketInput, output: &mut PacketOutput) -> Result<u32, TransportError> {
        let count = input.read_u32()? as usize;
        let names: Vec<RpcUnicodeString> = read_counted_array(input, "Names", count)?;

        let sids: Vec<LsaTranslatedSid> = names
            .iter()
            .map(|name| {
                let found = self
                    .users
                    .iter()
                    .find(|(_, user)| name.as_str().is_some_and(|n| n.eq_ignore_ascii_case(user)));
                match found {
                    Some((rid, _)) => LsaTranslatedSid::new(SidNameUse::User as u32, *rid, 0),
                    None => LsaTranslatedSid::new(SidNameUse::Unknown as u32, 0, NO_DOMAIN_INDEX),
                }
            })
            .collect();
        let mapped = sids.iter().filter(|sid| sid.domain_index != NO_DOMAIN_INDEX).count();

        output.write_referent_id();
        output.write_marshallable(&ReferencedDomainList::new(
            vec![TrustInformation::new(DOMAIN_NAME, Some(domain_sid()))],
            32,
        ))?;
        output.write_marshallable(&LsaTranslatedSids::new(sids))?;
        output.write_u32(mapped as u32);

        Ok(match mapped {
            0 => STATUS_NONE_MAPPED,
            n if n == names.len() => STATUS_SUCCESS,
            _ => STATUS_SOME_NOT_MAPPED,
        })
    }

    fn members_in_alias(&self, output: &mut PacketOutput) -> Result<u32, TransportError> {
        let members = SidArrayOut::new(self.alias_members.iter().map(|rid| account_sid(*rid)).collect());
        output.write_marshallable(&members)?;
        Ok(STATUS_SUCCESS)
    }
}

impl Default for MockDirectory {
    fn default() -> Self {
        Self::new()
    }
}

/// Transport that hands each stub straight to a [`MockDirectory`]
pub struct LoopbackTransport {
    directory: Arc<MockDirectory>,
    pending: Option<Bytes>,
    latency: Option<Duration>,
}

impl LoopbackTransport {
    pub fn new(directory: Arc<MockDirectory>) -> Self {
        Self {
            directory,
            pending: None,
            latency: None,
        }
    }

    /// Sleep before every reply
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }
}

impl RpcTransport for LoopbackTransport {
    fn send(&mut self, stub: Bytes) -> Result<(), TransportError> {
        self.pending = Some(self.directory.serve(stub)?);
        Ok(())
    }

    fn receive(&mut self) -> Result<Bytes, TransportError> {
        if let Some(latency) = self.latency {
            std::thread::sleep(latency);
        }
        self.pending.take().ok_or_else(|| "receive without a pending request".into())
    }
}

/// Page through every user with `SamrEnumerateUsersInDomain`
pub fn enumerate_all_users<T: RpcTransport>(client: &mut RpcClient<T>) -> msrpc::Result<Vec<RidEnumeration>> {
    let mut users = Vec::new();
    let mut context = 0;
    loop {
        let request = SamrEnumerateUsersInDomainRequest::new(domain_handle(), context, 0);
        let response = client.call(&request)?;
        let more = response.has_more_entries();
        let page = response.into_result()?;
        context = page.resume_token();
        users.extend(page.entries().iter().cloned());
        if !more {
            return Ok(users);
        }
    }
}

/// Statistics for concurrent test runs
pub struct ConcurrentStats {
    success: AtomicU64,
    failure: AtomicU64,
    total_latency_us: AtomicU64,
    max_latency_us: AtomicU64,
}

impl ConcurrentStats {
    pub fn new() -> Self {
        Self {
            success: AtomicU64::new(0),
            failure: AtomicU64::new(0),
            total_latency_us: AtomicU64::new(0),
            max_latency_us: AtomicU64::new(0),
        }
    }

    pub fn record_success(&self, latency: Duration) {
        let us = latency.as_micros() as u64;
        self.success.fetch_add(1, Ordering::Relaxed);
        self.total_latency_us.fetch_add(us, Ordering::Relaxed);
        self.max_latency_us.fetch_max(us, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failure.fetch_add(1, Ordering::Relaxed);
    }

    pub fn success_count(&self) -> u64 {
        self.success.load(Ordering::Relaxed)
    }

    pub fn failure_count(&self) -> u64 {
        self.failure.load(Ordering::Relaxed)
    }

    pub fn avg_latency(&self) -> Duration {
        let count = self.success_count();
        if count == 0 {
            return Duration::ZERO;
        }
        Duration::from_micros(self.total_latency_us.load(Ordering::Relaxed) / count)
    }

    pub fn max_latency(&self) -> Duration {
        Duration::from_micros(self.max_latency_us.load(Ordering::Relaxed))
    }
}

impl Default for ConcurrentStats {
    fn default() -> Self {
        Self::new()
    }
}
