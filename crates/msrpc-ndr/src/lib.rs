//! NDR (Network Data Representation) marshalling engine
//!
//! This crate provides the client-side encoding used by MS-RPC interfaces such
//! as MS-LSAD and MS-SAMR.
//!
//! # NDR Wire Format
//!
//! - Little-endian scalars aligned to their natural size (1, 2, 4, or 8 bytes)
//! - Structures align to their most strictly aligned member
//! - Embedded pointers are a 4-byte referent id; the referent follows after
//!   every fixed-size member of the enclosing structure or array
//! - Conformant arrays carry a 4-byte `max_count` ahead of their elements
//!
//! Structures implement [`Unmarshallable`] and [`Marshallable`], whose three
//! phases (preamble, entity, deferrals) mirror that layout.

mod alignment;
mod config;
mod error;
mod input;
mod marshal;
mod output;
pub mod types;

pub use alignment::Alignment;
pub use config::{DecodeLimits, DEFAULT_MAX_ARRAY_ELEMENTS, DEFAULT_MAX_STRING_CHARS};
pub use error::{NdrError, Result};
pub use input::PacketInput;
pub use marshal::{
    check_count, read_counted_array, read_entities, write_counted_array, write_entities,
    Marshallable, Unmarshallable,
};
pub use output::{PacketOutput, FIRST_REFERENT_ID};
pub use types::{ContextHandle, OldLargeInteger, RpcSid, RpcUnicodeString};

/// Re-export bytes for convenience
pub use bytes::{Bytes, BytesMut};
