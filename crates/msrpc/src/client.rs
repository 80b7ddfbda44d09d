//! MS-RPC client
//!
//! Binds a transport to the call envelope. Each call runs synchronously on
//! the caller's thread; clients share no state, so independent clients may
//! be used from separate threads.

use crate::error::Result;
use crate::messages::{Call, CallResponse, RequestCall};
use crate::transport::RpcTransport;
use msrpc_ndr::DecodeLimits;
use tracing::debug;

/// Client issuing calls over a single transport
pub struct RpcClient<T> {
    transport: T,
    limits: DecodeLimits,
    check_trailing: bool,
}

impl<T: RpcTransport> RpcClient<T> {
    /// Create a client with default decode limits
    pub fn new(transport: T) -> Self {
        RpcClientBuilder::new().build(transport)
    }

    /// Make an RPC call
    ///
    /// Marshals `request`, exchanges stubs over the transport and decodes the
    /// reply into the request's response type. Any failure aborts the call;
    /// nothing is retried.
    pub fn call<R: RequestCall>(&mut self, request: &R) -> Result<CallResponse<R::Response>> {
        debug!("Starting call: opnum={}", R::OP_NUM);
        Call::new(request)
            .with_limits(self.limits)
            .with_trailing_check(self.check_trailing)
            .execute(&mut self.transport)
    }

    pub fn limits(&self) -> &DecodeLimits {
        &self.limits
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_inner(self) -> T {
        self.transport
    }
}

/// Builder for MS-RPC clients
#[derive(Debug, Clone)]
pub struct RpcClientBuilder {
    limits: DecodeLimits,
    check_trailing: bool,
}

impl RpcClientBuilder {
    pub fn new() -> Self {
        Self {
            limits: DecodeLimits::default(),
            check_trailing: false,
        }
    }

    /// Set the limits applied to every decoded response
    pub fn decode_limits(mut self, limits: DecodeLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Reject responses with unread bytes after the return value
    pub fn check_trailing(mut self, check: bool) -> Self {
        self.check_trailing = check;
        self
    }

    pub fn build<T: RpcTransport>(self, transport: T) -> RpcClient<T> {
        RpcClient {
            transport,
            limits: self.limits,
            check_trailing: self.check_trailing,
        }
    }
}

impl Default for RpcClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
