//! Building blocks shared by MS-LSAD and MS-SAMR structures

mod handle;
mod large_integer;
mod sid;
mod unicode_string;

pub use handle::{ContextHandle, CONTEXT_HANDLE_SIZE};
pub use large_integer::OldLargeInteger;
pub use sid::RpcSid;
pub use unicode_string::RpcUnicodeString;
