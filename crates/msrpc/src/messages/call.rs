use crate::error::{Result, RpcError};
use crate::messages::{CallResponse, RequestCall};
use crate::transport::RpcTransport;
use bytes::Bytes;
use msrpc_ndr::{Alignment, DecodeLimits, NdrError, PacketInput, PacketOutput};
use tracing::{debug, trace};

/// Lifecycle of a single call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallState {
    Built,
    Marshalled,
    AwaitingBytes,
    Decoding,
    Complete,
    Failed,
}

/// One request on its way through marshal, transport and decode
///
/// A call runs at most once. Retrying means building a new `Call`.
#[derive(Debug)]
pub struct Call<'r, R: RequestCall> {
    request: &'r R,
    state: CallState,
    limits: DecodeLimits,
    check_trailing: bool,
}

impl<'r, R: RequestCall> Call<'r, R> {
    pub fn new(request: &'r R) -> Self {
        Self {
            request,
            state: CallState::Built,
            limits: DecodeLimits::default(),
            check_trailing: false,
        }
    }

    /// Limits applied while decoding the response
    pub fn with_limits(mut self, limits: DecodeLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Reject responses that leave unread bytes beyond alignment padding
    pub fn with_trailing_check(mut self, check_trailing: bool) -> Self {
        self.check_trailing = check_trailing;
        self
    }

    pub fn state(&self) -> CallState {
        self.state
    }

    fn advance(&mut self, next: CallState) {
        trace!("opnum {}: {:?} -> {:?}", R::OP_NUM, self.state, next);
        self.state = next;
    }

    fn fail<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(err) = &result {
            debug!("opnum {} failed in {:?}: {}", R::OP_NUM, self.state, err);
            self.state = CallState::Failed;
        }
        result
    }

    /// Marshal, send, receive and decode
    pub fn execute<T: RpcTransport + ?Sized>(&mut self, transport: &mut T) -> Result<CallResponse<R::Response>> {
        if self.state != CallState::Built {
            return Err(RpcError::InvalidState { state: self.state });
        }

        let stub = self.marshal();
        let stub = self.fail(stub)?;
        self.advance(CallState::Marshalled);

        debug!("Sending request: opnum={}, stub_len={}", R::OP_NUM, stub.len());
        let sent = transport.send(stub).map_err(RpcError::Transport);
        self.fail(sent)?;
        self.advance(CallState::AwaitingBytes);

        let reply = transport.receive().map_err(RpcError::Transport);
        let reply = self.fail(reply)?;
        debug!("Received response: opnum={}, stub_len={}", R::OP_NUM, reply.len());
        self.advance(CallState::Decoding);

        let response = self.decode(reply);
        let response = self.fail(response)?;
        self.advance(CallState::Complete);
        Ok(response)
    }

    /// Opnum followed by the request body
    fn marshal(&self) -> Result<Bytes> {
        let mut output = PacketOutput::new();
        output.write_u16(R::OP_NUM);
        self.request.marshal(&mut output)?;
        Ok(output.freeze())
    }

    /// Response phases, then the 4-byte aligned return value
    fn decode(&self, reply: Bytes) -> Result<CallResponse<R::Response>> {
        let mut input = PacketInput::with_limits(reply, self.limits);
        let mut response = self.request.response_object();
        input.read_unmarshallable(&mut response)?;
        input.align(Alignment::Four)?;
        let return_value = input.read_u32()?;

        if input.remaining() > 0 {
            trace!("{} unread bytes after return value", input.remaining());
            if self.check_trailing && input.remaining() >= Alignment::Eight.bytes() {
                return Err(NdrError::structure(
                    "stub",
                    format!("{} unread bytes after return value", input.remaining()),
                )
                .into());
            }
        }

        Ok(CallResponse::new(response, return_value))
    }
}
