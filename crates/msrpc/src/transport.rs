//! Transport boundary
//!
//! Named pipes, SMB and socket framing live outside this crate. A transport
//! only has to move one request stub out and one response stub back, both
//! synchronously.

use crate::error::TransportError;
use bytes::Bytes;

/// Byte-oriented request/response channel
pub trait RpcTransport {
    /// Send a complete request stub
    fn send(&mut self, stub: Bytes) -> Result<(), TransportError>;

    /// Block until the matching response stub arrives
    fn receive(&mut self) -> Result<Bytes, TransportError>;
}

impl<T: RpcTransport + ?Sized> RpcTransport for &mut T {
    fn send(&mut self, stub: Bytes) -> Result<(), TransportError> {
        (**self).send(stub)
    }

    fn receive(&mut self) -> Result<Bytes, TransportError> {
        (**self).receive()
    }
}

impl<T: RpcTransport + ?Sized> RpcTransport for Box<T> {
    fn send(&mut self, stub: Bytes) -> Result<(), TransportError> {
        (**self).send(stub)
    }

    fn receive(&mut self) -> Result<Bytes, TransportError> {
        (**self).receive()
    }
}
