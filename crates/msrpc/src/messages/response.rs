use crate::error::{Result, RpcError};

pub const STATUS_SUCCESS: u32 = 0x0000_0000;
pub const STATUS_MORE_ENTRIES: u32 = 0x0000_0105;
pub const STATUS_SOME_NOT_MAPPED: u32 = 0x0000_0107;
pub const STATUS_NO_MORE_ENTRIES: u32 = 0x8000_001A;

/// Decoded response payload plus the operation's return value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallResponse<T> {
    payload: T,
    return_value: u32,
}

impl<T> CallResponse<T> {
    pub fn new(payload: T, return_value: u32) -> Self {
        Self {
            payload,
            return_value,
        }
    }

    pub fn payload(&self) -> &T {
        &self.payload
    }

    pub fn into_payload(self) -> T {
        self.payload
    }

    /// NTSTATUS returned by the server
    pub fn return_value(&self) -> u32 {
        self.return_value
    }

    /// Success and informational codes, as `NT_SUCCESS` defines them
    pub fn is_success(&self) -> bool {
        (self.return_value as i32) >= 0
    }

    /// An enumeration stopped early; call again with the returned resume token
    pub fn has_more_entries(&self) -> bool {
        self.return_value == STATUS_MORE_ENTRIES
    }

    /// Payload if the status is a success code, `RpcError::Status` otherwise
    pub fn into_result(self) -> Result<T> {
        if self.is_success() {
            Ok(self.payload)
        } else {
            Err(RpcError::Status(self.return_value))
        }
    }
}
