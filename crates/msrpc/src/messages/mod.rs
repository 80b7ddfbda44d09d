//! Request/response envelope
//!
//! A [`RequestCall`] knows its operation number, how to marshal its body and
//! which response object decodes the reply. A [`Call`] drives one request
//! through `Built -> Marshalled -> AwaitingBytes -> Decoding -> Complete`,
//! landing in `Failed` on the first error.

mod call;
mod request;
mod response;

pub use call::{Call, CallState};
pub use request::RequestCall;
pub use response::{
    CallResponse, STATUS_MORE_ENTRIES, STATUS_NO_MORE_ENTRIES, STATUS_SOME_NOT_MAPPED,
    STATUS_SUCCESS,
};
