//! Error types for MS-RPC calls

use crate::messages::CallState;
use msrpc_ndr::NdrError;
use thiserror::Error;

/// Failure reported by a transport collaborator, passed through untouched
pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

/// RPC call error types
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("NDR error: {0}")]
    Ndr(#[from] NdrError),

    #[error("transport error: {0}")]
    Transport(#[source] TransportError),

    #[error("call cannot be executed from state {state:?}")]
    InvalidState { state: CallState },

    #[error("call returned status 0x{0:08x}")]
    Status(u32),
}

impl RpcError {
    pub fn transport(err: impl Into<TransportError>) -> Self {
        RpcError::Transport(err.into())
    }

    pub fn is_underrun(&self) -> bool {
        matches!(self, RpcError::Ndr(err) if err.is_underrun())
    }

    pub fn is_structure(&self) -> bool {
        matches!(self, RpcError::Ndr(err) if err.is_structure())
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, RpcError::Transport(_))
    }
}

pub type Result<T> = std::result::Result<T, RpcError>;
